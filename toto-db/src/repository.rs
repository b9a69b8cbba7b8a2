use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, ErrorCode, OpenFlags};

use crate::config::StoreConfig;
use crate::db::{SELECT_ALL, query_raw_draws};
use crate::error::RepositoryError;
use crate::models::{DrawRecord, Game};

/// Source de l'historique complet des tirages.
///
/// Renvoie tous les tirages, dans un ordre quelconque et sans filtrage :
/// l'appelant filtre lui-même son instantané.
pub trait DrawRepository {
    fn fetch_all_draws(&self) -> Result<Vec<DrawRecord>, RepositoryError>;
}

impl<R: DrawRepository + ?Sized> DrawRepository for &R {
    fn fetch_all_draws(&self) -> Result<Vec<DrawRecord>, RepositoryError> {
        (**self).fetch_all_draws()
    }
}

/// Accès en lecture seule à la base SQLite.
///
/// Chaque lecture ouvre sa propre connexion : plusieurs threads peuvent
/// partager le dépôt, chacun lisant son instantané.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    config: StoreConfig,
    game: Game,
}

impl SqliteRepository {
    /// Vérifie que la base existe et s'ouvre. Un fichier absent donne
    /// [`RepositoryError::Unavailable`] au lieu de créer une base vide.
    pub fn open(config: &StoreConfig) -> Result<Self, RepositoryError> {
        let repo = Self {
            config: config.clone(),
            game: Game::TOTO,
        };
        repo.connect()?;
        tracing::debug!(path = %repo.config.database.display(), "Base ouverte en lecture seule");
        Ok(repo)
    }

    fn connect(&self) -> Result<Connection, RepositoryError> {
        let path = &self.config.database;
        let busy_timeout = self.config.busy_timeout();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| classify(e, path, busy_timeout))?;
        conn.busy_timeout(busy_timeout)
            .map_err(|e| classify(e, path, busy_timeout))?;
        Ok(conn)
    }
}

impl DrawRepository for SqliteRepository {
    fn fetch_all_draws(&self) -> Result<Vec<DrawRecord>, RepositoryError> {
        let conn = self.connect()?;
        let rows = query_raw_draws(&conn, SELECT_ALL, [])
            .map_err(|e| classify(e, &self.config.database, self.config.busy_timeout()))?;
        let draws = rows
            .into_iter()
            .map(|raw| raw.into_record(&self.game))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = draws.len(), "Tirages lus");
        Ok(draws)
    }
}

fn classify(err: rusqlite::Error, path: &Path, waited: Duration) -> RepositoryError {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
            RepositoryError::Timeout {
                path: path.to_path_buf(),
                waited,
            }
        }
        _ => RepositoryError::Unavailable {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

/// Historique gardé en mémoire.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    draws: Vec<DrawRecord>,
}

impl MemoryRepository {
    pub fn new(draws: Vec<DrawRecord>) -> Self {
        Self { draws }
    }
}

impl DrawRepository for MemoryRepository {
    fn fetch_all_draws(&self) -> Result<Vec<DrawRecord>, RepositoryError> {
        Ok(self.draws.clone())
    }
}
