// ============================================================================
// Module : config
// ============================================================================
// Configuration de l'application via variables d'environnement
//
// CONCEPTS :
// - dotenvy::dotenv() est appelé dans main() avant from_env()
// - Chaque valeur a un défaut raisonnable (service local sur le port 8000)
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// URL par défaut du service de données de marché
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/market-data";

/// Timeout par défaut des requêtes HTTP (secondes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Répertoire par défaut des fichiers de logs
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Paramètres de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Endpoint GET du service (reçoit ?brand=...&model=...)
    pub api_url: String,

    /// Timeout appliqué par le transport HTTP
    pub request_timeout: Duration,

    /// Répertoire des logs (rotation quotidienne)
    pub log_dir: PathBuf,
}

impl Config {
    /// Lit la configuration depuis l'environnement
    ///
    /// Variables :
    /// - SNEAKERWATCH_API_URL
    /// - SNEAKERWATCH_TIMEOUT_SECS
    /// - SNEAKERWATCH_LOG_DIR
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lookup
    ///
    /// CONCEPT RUST : Closures génériques
    /// - F: Fn(&str) -> Option<String> accepte std::env::var ou une HashMap en test
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("SNEAKERWATCH_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match lookup("SNEAKERWATCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SNEAKERWATCH_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let log_dir = lookup("SNEAKERWATCH_LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            log_dir,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SNEAKERWATCH_API_URL", "http://example.test/api/market-data"),
            ("SNEAKERWATCH_TIMEOUT_SECS", "5"),
            ("SNEAKERWATCH_LOG_DIR", "/tmp/sw-logs"),
        ]);

        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_url, "http://example.test/api/market-data");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/sw-logs"));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = Config::from_lookup(|k| {
            (k == "SNEAKERWATCH_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
