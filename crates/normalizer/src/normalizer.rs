use crate::config::NormalizerConfig;
use crate::error::{NormalizerError, Result};
use crate::ingredient_list::parse_ingredient_list;
use crate::lemmatize::Lemmatizer;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Turns raw ingredient text into normalized tokens.
///
/// Holds only compiled, read-only tables, so one instance can be shared
/// across threads and every call is independent of the others.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    quantity: Regex,
    units: Regex,
    lemmatizer: Lemmatizer,
    english_stopwords: HashSet<String>,
    domain_stopwords: HashSet<String>,
}

impl TextNormalizer {
    /// Compile a normalizer from configuration
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        config.validate().map_err(NormalizerError::invalid_config)?;

        let quantity = Regex::new(&config.quantity_pattern)
            .map_err(|e| NormalizerError::invalid_pattern(&config.quantity_pattern, e))?;

        let unit_source = config
            .unit_patterns
            .iter()
            .map(|pattern| unit_alternative(pattern))
            .collect::<Vec<_>>()
            .join("|");
        let units =
            Regex::new(&unit_source).map_err(|e| NormalizerError::invalid_pattern(&unit_source, e))?;

        log::debug!(
            "Normalizer tables: {} unit patterns, {} domain stopwords, {} lemma exceptions",
            config.unit_patterns.len(),
            config.domain_stopwords.len(),
            config.lemma_exceptions.len()
        );

        Ok(Self {
            quantity,
            units,
            lemmatizer: Lemmatizer::new(&config.lemma_exceptions),
            english_stopwords: config.english_stopwords.iter().cloned().collect(),
            domain_stopwords: config.domain_stopwords.iter().cloned().collect(),
        })
    }

    /// Normalizer built from the built-in tables
    pub fn with_defaults() -> Result<Self> {
        Self::new(&NormalizerConfig::default())
    }

    /// Normalize one raw ingredient string into its filtered token sequence.
    ///
    /// Pipeline: lowercase, strip quantities, strip units, trim, tokenize,
    /// lemmatize, drop stopwords / single characters / punctuation.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> Vec<String> {
        let lowered = raw.to_lowercase();
        let without_quantities = self.quantity.replace_all(&lowered, "");
        let without_units = self.units.replace_all(&without_quantities, "");
        let text = without_units.trim();

        text.unicode_words()
            .filter(|word| !self.english_stopwords.contains(*word))
            .map(|word| self.lemmatizer.lemmatize(strip_clitic(word)))
            .filter(|token| self.keep(token))
            .collect()
    }

    /// Normalized tokens joined with single spaces
    #[must_use]
    pub fn normalize_to_string(&self, raw: &str) -> String {
        self.normalize(raw).join(" ")
    }

    /// Clean every entry of an ingredient list and reduce the result to a set.
    ///
    /// Empty results are discarded. The set drops both the original order
    /// and duplicate entries; iteration order is lexicographic.
    #[must_use]
    pub fn clean_ingredients<S: AsRef<str>>(&self, ingredients: &[S]) -> BTreeSet<String> {
        ingredients
            .iter()
            .map(|raw| self.normalize_to_string(raw.as_ref()))
            .filter(|cleaned| !cleaned.is_empty())
            .collect()
    }

    /// Parse and clean a raw scraped ingredient field.
    ///
    /// A field that is not a list of strings degrades to an empty set.
    #[must_use]
    pub fn clean_raw_ingredients(&self, raw: &str) -> BTreeSet<String> {
        parse_ingredient_list(raw)
            .map(|items| self.clean_ingredients(&items))
            .unwrap_or_default()
    }

    fn keep(&self, token: &str) -> bool {
        token.chars().count() > 1
            && !token.chars().all(|c| c.is_ascii_punctuation())
            && !self.english_stopwords.contains(token)
            && !self.domain_stopwords.contains(token)
    }
}

/// A unit entry may end in a literal dot (`pkg.`); a word boundary after it
/// would demand a letter, so only bare entries get `\b` and an optional dot.
fn unit_alternative(pattern: &str) -> String {
    if pattern.ends_with(r"\.") {
        format!("(?:{pattern})")
    } else {
        format!(r"(?:{pattern})\b\.?")
    }
}

/// `it's` -> `it`, `baker's` -> `baker`, `don't` -> `don`.
fn strip_clitic(word: &str) -> &str {
    match word.find(['\'', '\u{2019}']) {
        Some(at) if at > 0 => &word[..at],
        _ => word,
    }
}

/// Join a cleaned ingredient set into the pseudo-document the vectorizer sees.
#[must_use]
pub fn document_text(cleaned: &BTreeSet<String>) -> String {
    cleaned
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
