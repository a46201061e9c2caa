//! # Pantry Recommend
//!
//! Query-time side of pantry: takes the ingredients a user has on hand and
//! ranks the corpus of a loaded [`IndexBundle`](pantry_vector_index::IndexBundle).
//!
//! ## Request stages
//!
//! ```text
//! ["Chicken", "2 cups rice"]
//!     │
//!     ├──> validating    (non-empty, top_k > 0, max_calories >= 0)
//!     ├──> vectorizing   (TextNormalizer + frozen vocabulary)
//!     ├──> scoring       (cosine per corpus row)
//!     ├──> filtering     (calories <= max_calories)
//!     └──> selecting     (score desc, index asc, top_k)
//!            └─> Vec<Recommendation>
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pantry_recommend::{RecommendationService, ServiceHandle};
//! use pantry_vector_index::IndexBundle;
//!
//! fn main() -> anyhow::Result<()> {
//!     let service = RecommendationService::new(IndexBundle::load("index.json")?)?;
//!     let handle = ServiceHandle::new(service);
//!
//!     let service = handle.current();
//!     for hit in service.recommend_by_ingredients(&["chicken", "rice"], Some(600.0), 5)? {
//!         println!("{:.3} {}", hit.similarity, hit.recipe.title);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handle;
mod service;

pub use config::QueryConfig;
pub use error::{RecommendError, Result};
pub use handle::ServiceHandle;
pub use service::{Recommendation, RecommendationService};
