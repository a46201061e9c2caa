use crate::error::{IndexError, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Word tokens of at least two word characters.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Splits a pseudo-document into n-gram terms.
#[derive(Debug, Clone)]
pub struct Analyzer {
    token: Regex,
    ngram_range: (usize, usize),
}

impl Analyzer {
    pub fn new(ngram_range: (usize, usize)) -> Result<Self> {
        let token = Regex::new(TOKEN_PATTERN)
            .map_err(|e| IndexError::InvalidParams(format!("token pattern: {e}")))?;
        Ok(Self { token, ngram_range })
    }

    /// Terms in document order: all n-grams of the smallest size first.
    #[must_use]
    pub fn terms(&self, document: &str) -> Vec<String> {
        let tokens: Vec<&str> = self
            .token
            .find_iter(document)
            .map(|m| m.as_str())
            .collect();

        let (lo, hi) = self.ngram_range;
        let mut terms = Vec::new();
        for n in lo..=hi {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Raw term counts for one document
    #[must_use]
    pub fn term_counts(&self, document: &str) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for term in self.terms(document) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }
}
