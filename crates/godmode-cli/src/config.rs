//! # Configuration File
//!
//! Optional YAML file passed with `--config`. Every section and key may be
//! omitted; unknown keys are rejected so typos surface immediately.
//!
//! ```yaml
//! hash:
//!   algorithms: [sha256, sha512]
//! cron:
//!   horizon_years: 4
//!   preview: 5
//! cipher:
//!   kdf:
//!     memory_kib: 19456
//!     iterations: 2
//!     parallelism: 1
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use godmode_core::CronHorizon;
use godmode_crypto::{DigestRegistry, KdfParams};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub hash: HashConfig,
    pub cron: CronConfig,
    pub cipher: CipherConfig,
}

/// `hash` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashConfig {
    /// Restrict the `hash` subcommand to these registry names.
    pub algorithms: Option<Vec<String>>,
}

/// `cron` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CronConfig {
    /// How far ahead to search for the next run.
    pub horizon_years: u32,
    /// Upcoming runs shown when `--count` is not given.
    pub preview: usize,
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            horizon_years: 4,
            preview: 5,
        }
    }
}

/// `cipher` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CipherConfig {
    pub kdf: KdfParams,
}

impl Config {
    /// Load from `path`, or defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate YAML text. An empty document yields defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text).context("failed to parse YAML")?
        };
        config.digest_registry()?;
        config.cron_horizon()?;
        Ok(config)
    }

    /// The digest registry the `hash` subcommand runs.
    pub fn digest_registry(&self) -> Result<DigestRegistry> {
        let registry = DigestRegistry::default();
        match &self.hash.algorithms {
            Some(names) => registry
                .restrict(names)
                .context("hash.algorithms names an unknown algorithm"),
            None => Ok(registry),
        }
    }

    /// The cron search horizon.
    pub fn cron_horizon(&self) -> Result<CronHorizon> {
        CronHorizon::years(self.cron.horizon_years).context("cron.horizon_years is out of range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cron.horizon_years, 4);
        assert_eq!(config.cron.preview, 5);
        assert_eq!(config.cipher.kdf, KdfParams::default());
        assert_eq!(config.digest_registry().unwrap().names().len(), 7);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_yaml("cron:\n  preview: 3\n").unwrap();
        assert_eq!(config.cron.preview, 3);
        assert_eq!(config.cron.horizon_years, 4);
        assert!(config.hash.algorithms.is_none());
    }

    #[test]
    fn full_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("godmode.yaml");
        std::fs::write(
            &path,
            "hash:\n  algorithms: [sha256, md5]\n\
             cron:\n  horizon_years: 10\n  preview: 2\n\
             cipher:\n  kdf:\n    memory_kib: 4096\n    iterations: 3\n    parallelism: 1\n",
        )
        .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.digest_registry().unwrap().names(), vec!["sha256", "md5"]);
        assert_eq!(config.cipher.kdf.memory_kib, 4096);
        assert_eq!(config.cipher.kdf.iterations, 3);
        assert_eq!(config.cron.horizon_years, 10);
    }

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(Config::from_yaml("hashes: {}\n").is_err());
        assert!(Config::from_yaml("cron:\n  horizon: 4\n").is_err());
        assert!(Config::from_yaml("cipher:\n  kdf:\n    rounds: 4\n").is_err());
    }

    #[test]
    fn unknown_algorithm_rejected() {
        let err = Config::from_yaml("hash:\n  algorithms: [sha256, whirlpool]\n").unwrap_err();
        assert!(format!("{err:#}").contains("whirlpool"));
    }

    #[test]
    fn horizon_out_of_range_rejected() {
        assert!(Config::from_yaml("cron:\n  horizon_years: 0\n").is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = Config::load(Some(Path::new("/no/such/godmode.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/no/such/godmode.yaml"));
    }
}
