use crate::config::QueryConfig;
use crate::error::{RecommendError, Result};
use pantry_normalizer::TextNormalizer;
use pantry_protocol::{IngredientCount, RecipeCard, RecommendRequest, RecommendResponse};
use pantry_vector_index::{IndexBundle, Recipe, SimilarityEngine, SparseVector};
use std::cmp::Ordering;
use std::collections::BTreeMap;

const NO_MATCHES: &str =
    "No recipes matched. Try other ingredients or raise the calorie limit.";

/// One ranked recipe, borrowed from the service's corpus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation<'a> {
    /// Position in the corpus
    pub index: usize,
    pub recipe: &'a Recipe,
    /// Cosine similarity in `[0, 1]`
    pub similarity: f64,
}

impl Recommendation<'_> {
    #[must_use]
    pub fn to_card(&self) -> RecipeCard {
        RecipeCard {
            title: self.recipe.title.clone(),
            calories: self.recipe.calories,
            similarity: self.similarity,
            image: self.recipe.image.clone(),
            ingredients: self.recipe.ingredients.clone(),
            serves: self.recipe.serves,
            total_time: self.recipe.total_time.clone(),
        }
    }
}

/// Read-only query engine over one loaded [`IndexBundle`].
///
/// Construct once and share by reference (or `Arc`); every query method
/// takes `&self`.
pub struct RecommendationService {
    bundle: IndexBundle,
    normalizer: TextNormalizer,
    query: QueryConfig,
}

impl RecommendationService {
    /// Service with the default normalizer tables and query settings
    pub fn new(bundle: IndexBundle) -> Result<Self> {
        Ok(Self::with_normalizer(bundle, TextNormalizer::with_defaults()?))
    }

    /// Queries must be normalized with the same tables the corpus was built with.
    #[must_use]
    pub fn with_normalizer(bundle: IndexBundle, normalizer: TextNormalizer) -> Self {
        Self {
            bundle,
            normalizer,
            query: QueryConfig::default(),
        }
    }

    pub fn with_query_config(mut self, query: QueryConfig) -> Result<Self> {
        query.validate()?;
        self.query = query;
        Ok(self)
    }

    #[must_use]
    pub const fn bundle(&self) -> &IndexBundle {
        &self.bundle
    }

    #[must_use]
    pub const fn query_config(&self) -> &QueryConfig {
        &self.query
    }

    /// Rank the corpus against a list of ingredients.
    ///
    /// Results are sorted by similarity descending, ties by ascending corpus
    /// index, and hold at most `top_k` entries. With `max_calories` set, only
    /// recipes with known calories `<= max_calories` survive. An empty result
    /// is not an error.
    pub fn recommend_by_ingredients<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        max_calories: Option<f64>,
        top_k: usize,
    ) -> Result<Vec<Recommendation<'_>>> {
        log::debug!(
            "validating: {} ingredient(s), max_calories={max_calories:?}, top_k={top_k}",
            ingredients.len()
        );
        validate(ingredients, max_calories, top_k)?;

        let query = self.vectorize(ingredients);
        log::debug!("vectorizing: {} known term(s)", query.nnz());

        let scores = SimilarityEngine::score(&query, self.bundle.matrix())?;
        log::debug!("scoring: {} row(s)", scores.len());

        let total = scores.len();
        let candidates = self.filter(scores, max_calories);
        log::debug!("filtering: {} of {total} row(s) kept", candidates.len());

        let selected = select_top_k(candidates, top_k);
        log::debug!("selecting: {} result(s)", selected.len());

        Ok(self.materialize(selected))
    }

    /// Request/response form of [`recommend_by_ingredients`](Self::recommend_by_ingredients),
    /// applying the configured `top_k` default and cap.
    pub fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse> {
        let top_k = self.query.resolve_top_k(request.top_k);
        let results: Vec<RecipeCard> = self
            .recommend_by_ingredients(&request.ingredients, request.max_calories, top_k)?
            .iter()
            .map(Recommendation::to_card)
            .collect();
        let message = results.is_empty().then(|| NO_MATCHES.to_string());
        Ok(RecommendResponse { results, message })
    }

    /// Recipes closest to corpus entry `index`, excluding the entry itself
    pub fn similar_recipes(&self, index: usize, top_k: usize) -> Result<Vec<Recommendation<'_>>> {
        if top_k == 0 {
            return Err(RecommendError::InvalidTopK);
        }
        let len = self.bundle.corpus().len();
        let row = self
            .bundle
            .matrix()
            .row_vector(index)
            .ok_or(RecommendError::RecipeNotFound { index, len })?;

        let candidates = SimilarityEngine::score(&row, self.bundle.matrix())?
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .collect();
        Ok(self.materialize(select_top_k(candidates, top_k)))
    }

    /// Most frequent tokens across all cleaned ingredient documents,
    /// by count descending then token ascending.
    #[must_use]
    pub fn most_used_ingredients(&self, top_n: usize) -> Vec<IngredientCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for recipe in self.bundle.corpus().recipes() {
            for ingredient in &recipe.cleaned_ingredients {
                for token in ingredient.split_whitespace() {
                    *counts.entry(token).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(top_n)
            .map(|(ingredient, count)| IngredientCount {
                ingredient: ingredient.to_string(),
                count,
            })
            .collect()
    }

    fn vectorize<S: AsRef<str>>(&self, ingredients: &[S]) -> SparseVector {
        let document = ingredients
            .iter()
            .flat_map(|ingredient| self.normalizer.normalize(ingredient.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");
        self.bundle.vocabulary().transform(&document)
    }

    fn filter(&self, scores: Vec<f64>, max_calories: Option<f64>) -> Vec<(usize, f64)> {
        let recipes = self.bundle.corpus().recipes();
        scores
            .into_iter()
            .enumerate()
            .filter(|(i, _)| match max_calories {
                None => true,
                Some(max) => recipes
                    .get(*i)
                    .and_then(|recipe| recipe.calories)
                    .is_some_and(|calories| calories <= max),
            })
            .collect()
    }

    fn materialize(&self, selected: Vec<(usize, f64)>) -> Vec<Recommendation<'_>> {
        let corpus = self.bundle.corpus();
        selected
            .into_iter()
            .filter_map(|(index, similarity)| {
                corpus.get(index).map(|recipe| Recommendation {
                    index,
                    recipe,
                    similarity,
                })
            })
            .collect()
    }
}

fn validate<S: AsRef<str>>(ingredients: &[S], max_calories: Option<f64>, top_k: usize) -> Result<()> {
    if ingredients.is_empty() {
        return Err(RecommendError::InvalidInput(
            "ingredient list is empty".to_string(),
        ));
    }
    if ingredients.iter().all(|i| i.as_ref().trim().is_empty()) {
        return Err(RecommendError::InvalidInput(
            "every ingredient is blank".to_string(),
        ));
    }
    if top_k == 0 {
        return Err(RecommendError::InvalidTopK);
    }
    if let Some(max) = max_calories {
        if max.is_nan() || max < 0.0 {
            return Err(RecommendError::InvalidMaxCalories(max));
        }
    }
    Ok(())
}

/// Similarity descending, then corpus index ascending
fn rank(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

fn select_top_k(mut candidates: Vec<(usize, f64)>, top_k: usize) -> Vec<(usize, f64)> {
    if top_k == 0 {
        return Vec::new();
    }
    if top_k < candidates.len() {
        candidates.select_nth_unstable_by(top_k - 1, rank);
        candidates.truncate(top_k);
    }
    candidates.sort_by(rank);
    candidates
}
