use anyhow::{Context as AnyhowContext, Result};
use pantry_normalizer::NormalizerConfig;
use pantry_recommend::QueryConfig;
use pantry_vector_index::FitParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_ENV: &str = "PANTRY_CONFIG";

/// `pantry.toml`: every section is optional and falls back to defaults.
///
/// ```toml
/// normalizer_tables = "tables.json"   # replaces [normalizer] when set
///
/// [fit]
/// min_df = 4
/// max_df = 0.8
///
/// [query]
/// default_top_k = 5
/// max_top_k = 100
///
/// [server]
/// bind = "127.0.0.1:7700"
/// public = false      # allow non-loopback binds; needs PANTRY_ADMIN_TOKEN
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PantryConfig {
    pub normalizer: NormalizerConfig,
    pub normalizer_tables: Option<PathBuf>,
    pub fit: FitParams,
    pub query: QueryConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ServerConfig {
    pub bind: String,
    pub public: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7700".to_string(),
            public: false,
        }
    }
}

impl PantryConfig {
    /// `--config` wins over `PANTRY_CONFIG`; with neither, defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        if let Some(tables) = config.normalizer_tables.clone() {
            let tables = if tables.is_relative() {
                path.parent().map_or(tables.clone(), |dir| dir.join(&tables))
            } else {
                tables
            };
            config.normalizer = NormalizerConfig::from_file(&tables)?;
            log::info!("Normalizer tables loaded from {}", tables.display());
        }

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub(crate) fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.normalizer.validate().map_err(anyhow::Error::msg)?;
        self.fit.validate()?;
        self.query.validate()?;
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_config_is_all_defaults() {
        let config = PantryConfig::from_toml_str("").unwrap();
        assert_eq!(config.fit, FitParams::default());
        assert_eq!(config.query, QueryConfig::default());
        assert_eq!(config.server.bind, "127.0.0.1:7700");
        assert!(!config.server.public);
        assert_eq!(config.normalizer, NormalizerConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = PantryConfig::from_toml_str(
            r#"
            [fit]
            min_df = 2

            [query]
            default_top_k = 3

            [server]
            bind = "127.0.0.1:9000"
            public = true
            "#,
        )
        .unwrap();
        assert_eq!(config.fit.min_df, 2);
        assert_eq!(config.fit.max_df, 0.8);
        assert_eq!(config.query.default_top_k, 3);
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert!(config.server.public);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(PantryConfig::from_toml_str("[fit]\nmax_df = 2.0").is_err());
        assert!(PantryConfig::from_toml_str("[query]\ndefault_top_k = 0").is_err());
        assert!(PantryConfig::from_toml_str("[server]\nbind = \"\"").is_err());
    }

    #[test]
    fn relative_normalizer_tables_resolve_next_to_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tables.json"),
            r#"{"domain_stopwords": ["smoked"]}"#,
        )
        .unwrap();
        let path = dir.path().join("pantry.toml");
        fs::write(&path, "normalizer_tables = \"tables.json\"\n").unwrap();

        let config = PantryConfig::load(Some(&path)).unwrap();
        assert_eq!(config.normalizer.domain_stopwords, vec!["smoked"]);
        assert_eq!(
            config.normalizer.unit_patterns,
            NormalizerConfig::default().unit_patterns
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(PantryConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
