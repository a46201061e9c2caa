use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    #[error("Invalid fit parameters: {0}")]
    InvalidParams(String),

    #[error("Index mismatch ({what}): expected {expected}, got {actual}")]
    IndexMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Corrupt index: {0}")]
    Corrupt(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Unsupported bundle schema_version {found} (expected {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },

    #[error("Normalizer error: {0}")]
    NormalizerError(#[from] pantry_normalizer::NormalizerError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl IndexError {
    pub(crate) fn mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::IndexMismatch {
            what,
            expected,
            actual,
        }
    }
}
