use crate::corpus::Corpus;
use crate::error::{IndexError, Result};
use crate::matrix::DocumentTermMatrix;
use crate::params::FitParams;
use crate::tfidf::VectorIndexBuilder;
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const BUNDLE_SCHEMA_VERSION: u32 = 1;

const BIGRAM_LOG_SAMPLE: usize = 50;

/// Corpus, vocabulary and document-term matrix from one build, persisted
/// and validated as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexBundle {
    schema_version: u32,
    build_id: String,
    #[serde(default)]
    built_at_unix_ms: Option<u64>,
    fit_params: FitParams,
    corpus: Corpus,
    vocabulary: Vocabulary,
    matrix: DocumentTermMatrix,
    checksum: String,
}

#[derive(Serialize)]
struct BuildIdView<'a> {
    fit_params: &'a FitParams,
    corpus: &'a Corpus,
}

#[derive(Serialize)]
struct ChecksumView<'a> {
    schema_version: u32,
    build_id: &'a str,
    fit_params: &'a FitParams,
    corpus: &'a Corpus,
    vocabulary: &'a Vocabulary,
    matrix: &'a DocumentTermMatrix,
}

impl IndexBundle {
    /// Run the offline build: fit TF-IDF over the corpus documents.
    pub fn build(corpus: Corpus, params: FitParams) -> Result<Self> {
        log::info!(
            "Building index over {} recipes (min_df={}, max_df={}, ngram_range={:?})",
            corpus.len(),
            params.min_df,
            params.max_df,
            params.ngram_range
        );
        let builder = VectorIndexBuilder::new(params)?;
        let (vocabulary, matrix) = builder.fit(&corpus.documents())?;
        let sample: Vec<&str> = vocabulary.bigrams().take(BIGRAM_LOG_SAMPLE).collect();
        if !sample.is_empty() {
            log::info!("Learned bigrams (sample): {}", sample.join(", "));
        }
        let mut bundle = Self::from_parts(corpus, vocabulary, matrix, params)?;
        bundle.built_at_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| u64::try_from(d.as_millis()).ok());
        log::info!(
            "Index built: {} terms, {} stored weights, build {}",
            bundle.vocabulary.len(),
            bundle.matrix.nnz(),
            bundle.build_id
        );
        Ok(bundle)
    }

    /// Couple already-fitted parts, rejecting any misalignment
    pub fn from_parts(
        corpus: Corpus,
        vocabulary: Vocabulary,
        matrix: DocumentTermMatrix,
        fit_params: FitParams,
    ) -> Result<Self> {
        check_alignment(&corpus, &vocabulary, &matrix)?;
        let build_id = digest(&BuildIdView {
            fit_params: &fit_params,
            corpus: &corpus,
        })?;
        let mut bundle = Self {
            schema_version: BUNDLE_SCHEMA_VERSION,
            build_id,
            built_at_unix_ms: None,
            fit_params,
            corpus,
            vocabulary,
            matrix,
            checksum: String::new(),
        };
        bundle.checksum = bundle.compute_checksum()?;
        Ok(bundle)
    }

    /// Load and validate a bundle written by [`save`](Self::save)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading index bundle from {}", path.display());
        let bytes = std::fs::read(path)?;
        let bundle = Self::from_slice(&bytes)?;
        log::info!(
            "Loaded build {}: {} recipes, {} terms",
            bundle.build_id,
            bundle.corpus.len(),
            bundle.vocabulary.len()
        );
        Ok(bundle)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bundle: Self = serde_json::from_slice(bytes)?;
        if bundle.schema_version != BUNDLE_SCHEMA_VERSION {
            return Err(IndexError::UnsupportedSchema {
                found: bundle.schema_version,
                expected: BUNDLE_SCHEMA_VERSION,
            });
        }
        bundle.validate()?;
        Ok(bundle)
    }

    /// Write atomically: serialize to `<path>.tmp`, then rename over `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        log::info!("Index bundle saved to {}", path.display());
        Ok(())
    }

    /// Alignment and checksum verification
    pub fn validate(&self) -> Result<()> {
        check_alignment(&self.corpus, &self.vocabulary, &self.matrix)?;
        let actual = self.compute_checksum()?;
        if actual != self.checksum {
            return Err(IndexError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    #[must_use]
    pub const fn built_at_unix_ms(&self) -> Option<u64> {
        self.built_at_unix_ms
    }

    #[must_use]
    pub const fn fit_params(&self) -> &FitParams {
        &self.fit_params
    }

    #[must_use]
    pub const fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[must_use]
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub const fn matrix(&self) -> &DocumentTermMatrix {
        &self.matrix
    }

    fn compute_checksum(&self) -> Result<String> {
        digest(&ChecksumView {
            schema_version: self.schema_version,
            build_id: &self.build_id,
            fit_params: &self.fit_params,
            corpus: &self.corpus,
            vocabulary: &self.vocabulary,
            matrix: &self.matrix,
        })
    }
}

fn check_alignment(
    corpus: &Corpus,
    vocabulary: &Vocabulary,
    matrix: &DocumentTermMatrix,
) -> Result<()> {
    matrix.validate()?;
    if corpus.len() != matrix.n_rows() {
        return Err(IndexError::mismatch(
            "corpus length vs matrix rows",
            corpus.len(),
            matrix.n_rows(),
        ));
    }
    if vocabulary.len() != matrix.n_cols() {
        return Err(IndexError::mismatch(
            "vocabulary size vs matrix columns",
            vocabulary.len(),
            matrix.n_cols(),
        ));
    }
    Ok(())
}

fn digest<T: Serialize>(value: &T) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(value)?);
    Ok(format!("{:x}", hasher.finalize()))
}
