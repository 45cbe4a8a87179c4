// ============================================================================
// Module : config
// ============================================================================
// Configuration de l'application : chemins, URL ViaCEP, délai de paiement
//
// CONCEPTS RUST :
// 1. Valeurs par défaut + surcharge par variables d'environnement
// 2. Closure de lookup : from_lookup() accepte n'importe quelle source
//    (std::env::var en production, HashMap dans les tests)
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::viacep::DEFAULT_BASE_URL;

/// Nom de l'application (répertoires, fichier de log)
pub const APP_NAME: &str = "myfinance";

/// Délai simulé du paiement
pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 2000;

pub const ENV_DATA_DIR: &str = "MYFINANCE_DATA_DIR";
pub const ENV_LOG_DIR: &str = "MYFINANCE_LOG_DIR";
pub const ENV_VIACEP_URL: &str = "MYFINANCE_VIACEP_URL";
pub const ENV_PAYMENT_DELAY_MS: &str = "MYFINANCE_PAYMENT_DELAY_MS";

/// Configuration résolue au démarrage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Répertoire des données persistées (lançamentos)
    pub data_dir: PathBuf,
    /// Répertoire des logs (rotation quotidienne)
    pub log_dir: PathBuf,
    /// URL de base du service ViaCEP
    pub viacep_base_url: String,
    /// Durée du paiement simulé
    pub payment_delay: Duration,
}

impl Config {
    /// Lit la configuration depuis l'environnement du processus
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lookup
    ///
    /// Les valeurs vides sont ignorées (valeur par défaut conservée).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(url) = get(ENV_VIACEP_URL) {
            config.viacep_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get(ENV_PAYMENT_DELAY_MS) {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} invalide : {:?}", ENV_PAYMENT_DELAY_MS, raw))?;
            config.payment_delay = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

impl Default for Config {
    /// Données dans ~/.local/share/myfinance (Linux), logs dans ./logs
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            data_dir,
            log_dir: PathBuf::from("./logs"),
            viacep_base_url: DEFAULT_BASE_URL.to_string(),
            payment_delay: Duration::from_millis(DEFAULT_PAYMENT_DELAY_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.viacep_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.payment_delay, Duration::from_millis(2000));
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_DATA_DIR, "/tmp/mf"),
            (ENV_VIACEP_URL, "http://localhost:8080/ws/"),
            (ENV_PAYMENT_DELAY_MS, "10"),
            (ENV_LOG_DIR, "  "),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/mf"));
        assert_eq!(config.viacep_base_url, "http://localhost:8080/ws");
        assert_eq!(config.payment_delay, Duration::from_millis(10));
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
    }

    #[test]
    fn test_invalid_delay() {
        let result = Config::from_lookup(lookup_from(&[(ENV_PAYMENT_DELAY_MS, "deux")]));
        assert!(result.is_err());
    }
}
