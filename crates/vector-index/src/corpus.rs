use crate::error::Result;
use pantry_normalizer::{document_text, parse_ingredient_list, TextNormalizer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One corpus entry. Identity is its position in the [`Corpus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,

    /// Ingredient lines as scraped
    pub ingredients: Vec<String>,

    /// Normalized ingredient set (order and duplicates discarded)
    pub cleaned_ingredients: BTreeSet<String>,

    /// Calories per serving; `None` when the source had no usable value
    pub calories: Option<f64>,

    #[serde(default)]
    pub serves: Option<u32>,

    #[serde(default)]
    pub total_time: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl Recipe {
    /// The pseudo-document this recipe contributes to the vector space
    #[must_use]
    pub fn document(&self) -> String {
        document_text(&self.cleaned_ingredients)
    }
}

/// A recipe record as supplied by the scraping pipeline, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecipe {
    pub title: String,

    /// Ingredient list serialized as a JSON array or Python list literal
    #[serde(default)]
    pub ingredients: String,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub calories: Option<f64>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub serves: Option<u32>,

    #[serde(default, rename = "total time", alias = "total_time")]
    pub total_time: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl RawRecipe {
    /// Normalize into a [`Recipe`]. Never fails: unparseable ingredient fields
    /// and unusable calorie values degrade locally.
    #[must_use]
    pub fn into_recipe(self, normalizer: &TextNormalizer, row: usize) -> Recipe {
        let ingredients = parse_ingredient_list(&self.ingredients).unwrap_or_else(|| {
            log::warn!(
                "Recipe #{row} ('{}'): ingredient field is not a list, indexing it with no ingredients",
                self.title
            );
            Vec::new()
        });
        let cleaned_ingredients = normalizer.clean_ingredients(&ingredients);

        let calories = self.calories.filter(|c| c.is_finite() && *c >= 0.0);
        if calories.is_none() && self.calories.is_some() {
            log::warn!("Recipe #{row} ('{}'): ignoring invalid calories value", self.title);
        }

        Recipe {
            title: self.title,
            ingredients,
            cleaned_ingredients,
            calories,
            serves: self.serves,
            total_time: non_blank(self.total_time),
            image: non_blank(self.image),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Ordered, fixed-length recipe collection. Row `i` of the document-term
/// matrix belongs to `recipes[i]`; there is no API to reorder or insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    recipes: Vec<Recipe>,
}

impl Corpus {
    /// Normalize raw records, keeping their order
    #[must_use]
    pub fn from_raw(raw: Vec<RawRecipe>, normalizer: &TextNormalizer) -> Self {
        let recipes = raw
            .into_iter()
            .enumerate()
            .map(|(row, record)| record.into_recipe(normalizer, row))
            .collect();
        Self { recipes }
    }

    #[must_use]
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Read the scraped CSV export (`title`, `ingredients`, `calories`, `serves`,
    /// `total time`, `image`; other columns ignored).
    pub fn read_csv(path: impl AsRef<Path>, normalizer: &TextNormalizer) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Reading raw corpus from {}", path.display());
        let mut reader = csv::Reader::from_path(path)?;
        let raw = reader
            .deserialize::<RawRecipe>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let corpus = Self::from_raw(raw, normalizer);
        log::info!("Loaded {} recipes", corpus.len());
        Ok(corpus)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Pseudo-documents in corpus order
    #[must_use]
    pub fn documents(&self) -> Vec<String> {
        self.recipes.iter().map(Recipe::document).collect()
    }
}
