use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Échecs de la base de tirages vus par les appelants d'un dépôt.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Base impossible à ouvrir ou à interroger.
    #[error("Base de tirages indisponible ({path})")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Base restée verrouillée au-delà du délai configuré.
    #[error("Base de tirages occupée : délai de {waited:?} dépassé ({path})")]
    Timeout { path: PathBuf, waited: Duration },

    /// Ligne stockée qui ne décrit pas un tirage valide.
    #[error("Tirage invalide en base ({date}) : {reason}")]
    InvalidRecord { date: String, reason: String },
}
