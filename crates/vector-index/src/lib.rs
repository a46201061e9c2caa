//! # Pantry Vector Index
//!
//! TF-IDF vector space over normalized recipe documents, cosine scoring and
//! the versioned bundle that keeps corpus, vocabulary and matrix aligned.
//!
//! ## Architecture
//!
//! ```text
//! recipes.csv
//!     │
//!     ├──> Corpus (TextNormalizer per recipe)
//!     │      └─> "ground beef onion" pseudo-documents
//!     │
//!     ├──> VectorIndexBuilder (min_df, max_df, 1-2 grams)
//!     │      └─> Vocabulary + DocumentTermMatrix (L2 rows)
//!     │
//!     ├──> SimilarityEngine
//!     │      └─> cosine score per row
//!     │
//!     └──> IndexBundle
//!            └─> JSON + sha256 checksum
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pantry_normalizer::TextNormalizer;
//! use pantry_vector_index::{Corpus, FitParams, IndexBundle, SimilarityEngine};
//!
//! fn main() -> anyhow::Result<()> {
//!     let normalizer = TextNormalizer::with_defaults()?;
//!     let corpus = Corpus::read_csv("recipes.csv", &normalizer)?;
//!     let bundle = IndexBundle::build(corpus, FitParams::default())?;
//!     bundle.save("index.json")?;
//!
//!     let query = bundle.vocabulary().transform("chicken garlic");
//!     let scores = SimilarityEngine::score(&query, bundle.matrix())?;
//!     println!("{} scores", scores.len());
//!     Ok(())
//! }
//! ```

mod analyzer;
mod bundle;
mod corpus;
mod error;
mod matrix;
mod params;
mod similarity;
mod tfidf;
mod vocabulary;

pub use analyzer::Analyzer;
pub use bundle::{IndexBundle, BUNDLE_SCHEMA_VERSION};
pub use corpus::{Corpus, RawRecipe, Recipe};
pub use error::{IndexError, Result};
pub use matrix::{DocumentTermMatrix, SparseRow, SparseVector};
pub use params::FitParams;
pub use similarity::SimilarityEngine;
pub use tfidf::VectorIndexBuilder;
pub use vocabulary::Vocabulary;
