use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use toto_db::config::StoreConfig;

/// Fichier lu dans le répertoire courant quand `--config` est absent.
pub const DEFAULT_CONFIG_FILE: &str = "toto.toml";

/// Configuration du processus, construite une seule fois au démarrage.
///
/// ```toml
/// [store]
/// database = "data/toto.db"
/// busy_timeout_ms = 5000
///
/// [logging]
/// level = "warn"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Fichier explicite obligatoire s'il est donné, sinon `toto.toml` s'il existe,
    /// sinon les valeurs par défaut.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Configuration invalide {:?}", path))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        Ok(config)
    }
}
