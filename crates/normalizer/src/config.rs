use crate::error::{NormalizerError, Result};
use crate::tables;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for ingredient text normalization
///
/// Every table is data: swapping one out never requires touching the
/// pipeline in [`TextNormalizer`](crate::TextNormalizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Regex removing numeric quantities and fractions
    pub quantity_pattern: String,

    /// Unit alternatives, joined into one pattern with a trailing `\b\.?`
    pub unit_patterns: Vec<String>,

    /// Domain stopwords (descriptive and cooking terms)
    pub domain_stopwords: Vec<String>,

    /// General English stopwords
    pub english_stopwords: Vec<String>,

    /// Irregular word -> lemma overrides, consulted before suffix rules
    pub lemma_exceptions: BTreeMap<String, String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            quantity_pattern: tables::QUANTITY_PATTERN.to_string(),
            unit_patterns: owned(tables::UNIT_PATTERNS),
            domain_stopwords: owned(tables::DOMAIN_STOPWORDS),
            english_stopwords: owned(tables::ENGLISH_STOPWORDS),
            lemma_exceptions: tables::LEMMA_EXCEPTIONS
                .iter()
                .map(|(word, lemma)| ((*word).to_string(), (*lemma).to_string()))
                .collect(),
        }
    }
}

impl NormalizerConfig {
    /// Parse a config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| NormalizerError::ConfigParse(e.to_string()))?;
        config.validate().map_err(NormalizerError::invalid_config)?;
        Ok(config)
    }

    /// Load a config file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| NormalizerError::ConfigParse(format!("{}: {e}", path.display())))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            let config: Self = serde_json::from_str(&raw)
                .map_err(|e| NormalizerError::ConfigParse(e.to_string()))?;
            config.validate().map_err(NormalizerError::invalid_config)?;
            Ok(config)
        } else {
            Self::from_toml_str(&raw)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.quantity_pattern.trim().is_empty() {
            return Err("quantity_pattern must not be empty".to_string());
        }

        if let Some(idx) = self.unit_patterns.iter().position(|p| p.trim().is_empty()) {
            return Err(format!("unit_patterns[{idx}] is empty"));
        }

        for (word, lemma) in &self.lemma_exceptions {
            if word.is_empty() || lemma.is_empty() {
                return Err(format!(
                    "lemma_exceptions entries must be non-empty (got '{word}' -> '{lemma}')"
                ));
            }
        }

        Ok(())
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
