use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Emplacement de la base et délai d'attente maximal sur une base verrouillée.
///
/// Construite une fois au démarrage puis passée par référence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StoreConfig {
    pub database: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_db_path(),
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    pub fn with_database(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

pub fn default_db_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("toto.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_with_db_file() {
        let config = StoreConfig::default();
        assert!(config.database.ends_with("data/toto.db"));
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_with_database_keeps_timeout() {
        let config = StoreConfig::with_database("/tmp/other.db");
        assert_eq!(config.database, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.busy_timeout_ms, 5000);
    }
}
