//! # Pantry Normalizer
//!
//! Turns heterogeneous, scraped ingredient text into a stable token vocabulary.
//!
//! ## Pipeline
//!
//! ```text
//! "2 cups chopped fresh Tomatoes"
//!     │
//!     ├──> lowercase
//!     ├──> strip quantities   (1, 1 1/2, 2-3)
//!     ├──> strip units        (cup, tbsp, oz, -inch, ...)
//!     ├──> tokenize           (Unicode word boundaries)
//!     ├──> lemmatize          (tomatoes → tomato)
//!     └──> filter             (stopwords, cooking terms, 1-char, punctuation)
//!            └─> ["tomato"]
//! ```
//!
//! All tables (units, stopwords, lemma exceptions) live in [`NormalizerConfig`]
//! and can be replaced from a TOML or JSON file.
//!
//! ## Example
//!
//! ```rust
//! use pantry_normalizer::{document_text, TextNormalizer};
//!
//! let normalizer = TextNormalizer::with_defaults().unwrap();
//! assert_eq!(normalizer.normalize("2 cups chopped fresh Tomatoes"), vec!["tomato"]);
//!
//! let cleaned = normalizer.clean_raw_ingredients("['1 lb ground beef', '2 onions']");
//! assert_eq!(document_text(&cleaned), "ground beef onion");
//! ```

mod config;
mod error;
mod ingredient_list;
mod lemmatize;
mod normalizer;
pub mod tables;

pub use config::NormalizerConfig;
pub use error::{NormalizerError, Result};
pub use ingredient_list::{parse_ingredient_list, strings_from_json};
pub use lemmatize::Lemmatizer;
pub use normalizer::{document_text, TextNormalizer};
