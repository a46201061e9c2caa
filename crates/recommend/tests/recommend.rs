use pantry_normalizer::TextNormalizer;
use pantry_protocol::RecommendRequest;
use pantry_recommend::{RecommendError, RecommendationService, ServiceHandle};
use pantry_vector_index::{Corpus, FitParams, IndexBundle, RawRecipe};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::tempdir;

fn raw(title: &str, ingredients: &[&str], calories: Option<f64>) -> RawRecipe {
    RawRecipe {
        title: title.to_string(),
        ingredients: serde_json::to_string(ingredients).unwrap(),
        calories,
        ..Default::default()
    }
}

fn service_for(recipes: Vec<RawRecipe>) -> RecommendationService {
    let normalizer = TextNormalizer::with_defaults().unwrap();
    let corpus = Corpus::from_raw(recipes, &normalizer);
    let bundle = IndexBundle::build(corpus, FitParams::permissive()).unwrap();
    RecommendationService::with_normalizer(bundle, normalizer)
}

/// Recipe 0 shares both query ingredients, recipe 1 one, recipe 2 none.
fn scenario_service() -> RecommendationService {
    service_for(vec![
        raw("Chicken Rice", &["1 lb chicken", "2 cups rice"], Some(800.0)),
        raw("Chicken Broccoli", &["chicken", "broccoli"], Some(450.0)),
        raw("Tofu Noodles", &["tofu", "8 oz noodles"], Some(300.0)),
    ])
}

fn indices(
    service: &RecommendationService,
    ingredients: &[&str],
    max: Option<f64>,
    top_k: usize,
) -> Vec<usize> {
    service
        .recommend_by_ingredients(ingredients, max, top_k)
        .unwrap()
        .iter()
        .map(|hit| hit.index)
        .collect()
}

#[test]
fn ranks_by_shared_ingredients() {
    let service = scenario_service();
    let hits = service
        .recommend_by_ingredients(&["chicken", "rice"], None, 3)
        .unwrap();

    assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!((hits[0].similarity - 1.0).abs() < 1e-9);
    assert!(hits[1].similarity > 0.0 && hits[1].similarity < hits[0].similarity);
    assert_eq!(hits[2].similarity, 0.0);
    assert_eq!(hits[0].recipe.title, "Chicken Rice");
}

#[test]
fn calorie_ceiling_excludes_best_match() {
    let service = scenario_service();
    assert_eq!(indices(&service, &["chicken", "rice"], Some(500.0), 3), vec![1, 2]);
    // Ceiling is inclusive.
    assert_eq!(indices(&service, &["chicken", "rice"], Some(450.0), 3), vec![1, 2]);
    assert_eq!(indices(&service, &["chicken", "rice"], Some(299.0), 3), Vec::<usize>::new());
}

#[test]
fn top_k_larger_than_corpus_returns_everything() {
    let service = scenario_service();
    assert_eq!(indices(&service, &["chicken", "rice"], None, 10).len(), 3);
    assert_eq!(indices(&service, &["chicken", "rice"], None, 1), vec![0]);
}

#[test]
fn unknown_terms_score_zero_in_corpus_order() {
    let service = scenario_service();
    let hits = service
        .recommend_by_ingredients(&["saffron", "2 tsp vanilla"], None, 3)
        .unwrap();
    assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!(hits.iter().all(|h| h.similarity == 0.0));

    assert_eq!(indices(&service, &["saffron"], Some(500.0), 1), vec![1]);
}

#[test]
fn ingredients_that_normalize_to_nothing_are_not_an_error() {
    let service = scenario_service();
    assert_eq!(indices(&service, &["fresh water", "a pinch"], None, 2), vec![0, 1]);
}

#[test]
fn empty_or_blank_input_is_rejected() {
    let service = scenario_service();
    let none: [&str; 0] = [];
    assert!(matches!(
        service.recommend_by_ingredients(&none, None, 3),
        Err(RecommendError::InvalidInput(_))
    ));
    assert!(matches!(
        service.recommend_by_ingredients(&["", "  "], None, 3),
        Err(RecommendError::InvalidInput(_))
    ));
    assert!(matches!(
        service.recommend_by_ingredients(&["rice"], None, 0),
        Err(RecommendError::InvalidTopK)
    ));
    assert!(matches!(
        service.recommend_by_ingredients(&["rice"], Some(-10.0), 3),
        Err(RecommendError::InvalidMaxCalories(_))
    ));
}

#[test]
fn missing_calories_are_excluded_only_when_filtering() {
    let service = service_for(vec![
        raw("Plain Rice", &["rice"], None),
        raw("Rice Bowl", &["rice", "egg"], Some(350.0)),
    ]);
    assert_eq!(indices(&service, &["rice"], None, 5), vec![0, 1]);
    assert_eq!(indices(&service, &["rice"], Some(1000.0), 5), vec![1]);
}

#[test]
fn equal_scores_keep_corpus_order() {
    let service = service_for(vec![
        raw("Rice", &["rice"], Some(100.0)),
        raw("Egg Toast", &["egg", "toast"], Some(200.0)),
        raw("Toast Egg", &["toast", "egg"], Some(200.0)),
        raw("Egg Toast Again", &["egg", "toast"], Some(200.0)),
    ]);
    let hits = service.recommend_by_ingredients(&["egg"], None, 3).unwrap();
    assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(hits[0].similarity, hits[2].similarity);
}

// Cleaned ingredients are a set per recipe: repeated lines do not raise term
// frequency. Changing this alters weighting; update this test deliberately.
#[test]
fn duplicate_ingredient_lines_collapse_to_one_term() {
    let service = service_for(vec![
        raw("Egg Heavy", &["2 eggs", "1 egg", "1 egg yolk", "bread"], Some(300.0)),
        raw("Egg Light", &["egg", "egg yolk", "bread"], Some(300.0)),
        raw("Soup", &["onion"], Some(100.0)),
    ]);
    let corpus = service.bundle().corpus();
    assert_eq!(
        corpus.get(0).unwrap().cleaned_ingredients,
        corpus.get(1).unwrap().cleaned_ingredients
    );

    let hits = service.recommend_by_ingredients(&["egg"], None, 2).unwrap();
    assert_eq!(hits[0].similarity, hits[1].similarity);
    assert_eq!(hits[0].index, 0);
}

#[test]
fn results_survive_a_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.json");
    let service = scenario_service();
    service.bundle().save(&path).unwrap();

    let reloaded = RecommendationService::new(IndexBundle::load(&path).unwrap()).unwrap();
    let before = service
        .recommend_by_ingredients(&["chicken", "broccoli"], None, 3)
        .unwrap();
    let after = reloaded
        .recommend_by_ingredients(&["chicken", "broccoli"], None, 3)
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn request_form_applies_defaults_and_reports_no_matches() {
    let service = scenario_service();

    let response = service
        .recommend(&RecommendRequest::from_comma_list("Chicken, RICE"))
        .unwrap();
    assert_eq!(response.results.len(), 3);
    assert_eq!(response.results[0].title, "Chicken Rice");
    assert_eq!(response.results[0].calories, Some(800.0));
    assert_eq!(
        response.results[0].ingredients,
        vec!["1 lb chicken", "2 cups rice"]
    );
    assert_eq!(response.message, None);

    let empty = service
        .recommend(&RecommendRequest {
            ingredients: vec!["tofu".to_string()],
            max_calories: Some(10.0),
            top_k: Some(2),
        })
        .unwrap();
    assert!(empty.results.is_empty());
    assert!(empty.message.is_some());

    let zero = service.recommend(&RecommendRequest {
        ingredients: vec!["tofu".to_string()],
        max_calories: None,
        top_k: Some(0),
    });
    assert!(matches!(zero, Err(RecommendError::InvalidTopK)));
}

#[test]
fn similar_recipes_exclude_the_anchor() {
    let service = scenario_service();
    let hits = service.similar_recipes(0, 5).unwrap();
    assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![1, 2]);
    assert!(hits[0].similarity > 0.0);

    assert!(matches!(
        service.similar_recipes(7, 5),
        Err(RecommendError::RecipeNotFound { index: 7, len: 3 })
    ));
}

#[test]
fn most_used_ingredients_count_tokens_across_corpus() {
    let service = scenario_service();
    let top: Vec<(String, usize)> = service
        .most_used_ingredients(3)
        .into_iter()
        .map(|c| (c.ingredient, c.count))
        .collect();
    assert_eq!(
        top,
        vec![
            ("chicken".to_string(), 2),
            ("broccoli".to_string(), 1),
            ("noodle".to_string(), 1),
        ]
    );
}

#[test]
fn concurrent_queries_share_one_service() {
    let service = Arc::new(scenario_service());
    let expected = indices(&service, &["chicken", "rice"], None, 3);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let service = Arc::clone(&service);
            let expected = expected.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    assert_eq!(indices(&service, &["chicken", "rice"], None, 3), expected);
                }
            });
        }
    });
}

#[test]
fn swap_replaces_the_whole_service() {
    let handle = ServiceHandle::new(scenario_service());
    let before = handle.current();

    let replacement = service_for(vec![
        raw("Rice", &["rice"], Some(100.0)),
        raw("Egg", &["egg"], Some(100.0)),
    ]);
    let previous = handle.swap(replacement);

    assert_eq!(previous.bundle().build_id(), before.bundle().build_id());
    assert_eq!(before.bundle().corpus().len(), 3);
    assert_eq!(handle.current().bundle().corpus().len(), 2);
    assert_eq!(indices(&handle.current(), &["egg"], None, 1), vec![1]);
    // The old snapshot still answers consistently.
    assert_eq!(indices(&before, &["chicken", "rice"], None, 1), vec![0]);
}

const POOL: &[&str] = &[
    "chicken", "rice", "broccoli", "tofu", "noodles", "saffron", "egg", "",
];

fn pantry_service() -> RecommendationService {
    service_for(vec![
        raw("Chicken Rice", &["chicken", "rice"], Some(800.0)),
        raw("Chicken Broccoli", &["chicken", "broccoli"], Some(450.0)),
        raw("Tofu Noodles", &["tofu", "noodles"], Some(300.0)),
        raw("Egg Fried Rice", &["egg", "rice"], None),
        raw("Broccoli Tofu", &["broccoli", "tofu"], Some(450.0)),
        raw("Plain Rice", &["rice"], Some(200.0)),
    ])
}

proptest! {
    #[test]
    fn proptest_results_are_bounded_filtered_and_ordered(
        picks in prop::collection::vec(0..POOL.len(), 1..5),
        max_calories in prop::option::of(0.0f64..1000.0),
        top_k in 1usize..8,
    ) {
        let service = pantry_service();
        let ingredients: Vec<&str> = picks.iter().map(|&i| POOL[i]).collect();
        prop_assume!(ingredients.iter().any(|i| !i.trim().is_empty()));

        let hits = service
            .recommend_by_ingredients(&ingredients, max_calories, top_k)
            .unwrap();
        let again = service
            .recommend_by_ingredients(&ingredients, max_calories, top_k)
            .unwrap();
        prop_assert_eq!(&hits, &again);

        prop_assert!(hits.len() <= top_k);
        for hit in &hits {
            prop_assert!((0.0..=1.0).contains(&hit.similarity));
            if let Some(max) = max_calories {
                prop_assert!(hit.recipe.calories.is_some_and(|c| c <= max));
            }
        }
        for pair in hits.windows(2) {
            prop_assert!(
                pair[0].similarity > pair[1].similarity
                    || (pair[0].similarity == pair[1].similarity && pair[0].index < pair[1].index)
            );
        }
    }
}
