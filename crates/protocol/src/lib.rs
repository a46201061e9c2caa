use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const ERROR_INVALID_INPUT: &str = "invalid_input";
pub const ERROR_INVALID_REQUEST: &str = "invalid_request";
pub const ERROR_INDEX_MISMATCH: &str = "index_mismatch";
pub const ERROR_INTERNAL: &str = "internal";

/// Query posted to `/recommend` (or built from CLI flags)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecommendRequest {
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

impl RecommendRequest {
    /// Build a request from comma-separated free text: items are trimmed,
    /// lowercased, and blank items dropped.
    #[must_use]
    pub fn from_comma_list(raw: &str) -> Self {
        Self {
            ingredients: split_ingredient_input(raw),
            max_calories: None,
            top_k: None,
        }
    }
}

#[must_use]
pub fn split_ingredient_input(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// One ranked recipe, shaped for display
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeCard {
    pub title: String,
    /// `null` when the corpus has no calorie value for the recipe
    pub calories: Option<f64>,
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serves: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RecommendResponse {
    pub results: Vec<RecipeCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IngredientCount {
    pub ingredient: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthReport {
    pub status: String,
    pub schema_version: u32,
    pub build_id: String,
    pub recipes: usize,
    pub vocabulary_size: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            hint: default_hint(code).map(str::to_string),
        }
    }
}

fn default_hint(code: &str) -> Option<&'static str> {
    match code {
        ERROR_INVALID_INPUT => {
            Some("Provide at least one non-blank ingredient and a positive top_k.")
        }
        ERROR_INVALID_REQUEST => Some(
            "Send JSON like {\"ingredients\": [\"chicken\", \"rice\"], \"max_calories\": 600, \"top_k\": 5}.",
        ),
        ERROR_INDEX_MISMATCH => Some("Rebuild the index with `pantry build` and restart."),
        _ => None,
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
