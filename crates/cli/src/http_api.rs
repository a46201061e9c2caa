use crate::config::PantryConfig;
use crate::access::ReloadKey;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use pantry_protocol::{
    serialize_json, ErrorEnvelope, HealthReport, RecommendRequest, ERROR_INTERNAL,
    ERROR_INVALID_REQUEST,
};
use pantry_recommend::{RecommendError, RecommendationService, ServiceHandle};
use pantry_vector_index::BUNDLE_SCHEMA_VERSION;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) struct HttpState {
    pub handle: ServiceHandle,
    pub index_path: PathBuf,
    pub config: PantryConfig,
    pub reload_key: Option<ReloadKey>,
}

pub(crate) fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/health", get(health))
        .route("/reload", post(reload))
        .with_state(state)
}

async fn recommend(State(state): State<Arc<HttpState>>, body: Bytes) -> Result<Response, StatusCode> {
    let request: RecommendRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let envelope =
                ErrorEnvelope::new(ERROR_INVALID_REQUEST, format!("Invalid JSON request: {err}"));
            return build_response(StatusCode::BAD_REQUEST, &envelope);
        }
    };

    let service = state.handle.current();
    match service.recommend(&request) {
        Ok(response) => build_response(StatusCode::OK, &response),
        Err(err) => error_response(&err),
    }
}

async fn health(State(state): State<Arc<HttpState>>) -> Result<Response, StatusCode> {
    let service = state.handle.current();
    build_response(StatusCode::OK, &health_report(&service))
}

async fn reload(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    if let Some(key) = &state.reload_key {
        let authorized = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| key.admits(value));
        if !authorized {
            let envelope = ErrorEnvelope::new(
                ERROR_INVALID_REQUEST,
                "Missing or invalid Authorization header",
            );
            return build_response(StatusCode::UNAUTHORIZED, &envelope);
        }
    }

    let path = state.index_path.clone();
    let config = state.config.clone();
    let loaded = tokio::task::spawn_blocking(move || crate::load_service(&path, &config))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match loaded {
        Ok(service) => {
            state.handle.swap(service);
            build_response(StatusCode::OK, &health_report(&state.handle.current()))
        }
        Err(err) => {
            log::error!("Reload of {} failed: {err}", state.index_path.display());
            error_response(&err)
        }
    }
}

pub(crate) fn health_report(service: &RecommendationService) -> HealthReport {
    let bundle = service.bundle();
    HealthReport {
        status: "ok".to_string(),
        schema_version: BUNDLE_SCHEMA_VERSION,
        build_id: bundle.build_id().to_string(),
        recipes: bundle.corpus().len(),
        vocabulary_size: bundle.vocabulary().len(),
    }
}

fn error_response(err: &RecommendError) -> Result<Response, StatusCode> {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let message = if err.code() == ERROR_INTERNAL {
        log::error!("Request failed: {err}");
        "Internal error".to_string()
    } else {
        err.to_string()
    };
    build_response(status, &ErrorEnvelope::new(err.code(), message))
}

fn build_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response, StatusCode> {
    let bytes = serialize_json(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_bytes();

    HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_normalizer::TextNormalizer;
    use pantry_protocol::RecommendResponse;
    use pantry_vector_index::{Corpus, FitParams, IndexBundle, RawRecipe};
    use serde_json::Value;
    use tempfile::tempdir;

    fn bundle(titles: &[(&str, &str)]) -> IndexBundle {
        let normalizer = TextNormalizer::with_defaults().unwrap();
        let raw = titles
            .iter()
            .map(|(title, ingredients)| RawRecipe {
                title: (*title).to_string(),
                ingredients: (*ingredients).to_string(),
                calories: Some(400.0),
                ..Default::default()
            })
            .collect();
        IndexBundle::build(Corpus::from_raw(raw, &normalizer), FitParams::permissive()).unwrap()
    }

    fn state(index_path: PathBuf, admin_token: Option<&str>) -> Arc<HttpState> {
        let service = RecommendationService::new(bundle(&[
            ("Chicken Rice", "['chicken', 'rice']"),
            ("Tofu Bowl", "['tofu', 'rice']"),
        ]))
        .unwrap();
        Arc::new(HttpState {
            handle: ServiceHandle::new(service),
            index_path,
            config: PantryConfig::default(),
            reload_key: admin_token.map(|token| ReloadKey::from_secret(token).unwrap()),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn recommend_returns_ranked_cards() {
        let state = state(PathBuf::from("unused.json"), None);
        let body = Bytes::from(r#"{"ingredients":["chicken"],"top_k":1}"#);
        let response = recommend(State(state), body).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: RecommendResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].title, "Chicken Rice");
    }

    #[tokio::test]
    async fn bad_requests_get_error_envelopes() {
        let state = state(PathBuf::from("unused.json"), None);

        let response = recommend(State(state.clone()), Bytes::from("not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "invalid_request");

        let response = recommend(State(state), Bytes::from(r#"{"ingredients":[" "]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "invalid_input");
        assert!(body["hint"].is_string());
    }

    #[tokio::test]
    async fn health_reports_loaded_build() {
        let state = state(PathBuf::from("unused.json"), None);
        let expected = state.handle.current().bundle().build_id().to_string();
        let body = body_json(health(State(state)).await.unwrap()).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["recipes"], 2);
        assert_eq!(body["build_id"], expected.as_str());
    }

    #[tokio::test]
    async fn reload_swaps_in_the_bundle_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        bundle(&[
            ("Egg Toast", "['egg', 'bread']"),
            ("Rice", "['rice']"),
            ("Omelette", "['egg', 'cheese']"),
        ])
        .save(&path)
        .unwrap();

        let state = state(path, Some("secret"));
        let response = reload(State(state.clone()), HeaderMap::new()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.handle.current().bundle().corpus().len(), 2);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer secret".parse().unwrap());
        let response = reload(State(state.clone()), headers).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["recipes"], 3);
        assert_eq!(state.handle.current().bundle().corpus().len(), 3);
    }

    #[tokio::test]
    async fn reload_rejects_wrong_credentials_before_touching_disk() {
        let state = state(PathBuf::from("missing.json"), Some("secret"));

        for header in ["Bearer nope", "Basic secret", "secret"] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, header.parse().unwrap());
            let response = reload(State(state.clone()), headers).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{header}");
            assert_eq!(body_json(response).await["code"], "invalid_request");
        }

        // Accepted credentials reach the loader, which fails on the missing file.
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "bearer secret".parse().unwrap());
        let response = reload(State(state.clone()), headers).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.handle.current().bundle().corpus().len(), 2);
    }

    #[tokio::test]
    async fn failed_reload_keeps_the_current_service() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "{}").unwrap();

        let state = state(path, None);
        let before = state.handle.current().bundle().build_id().to_string();
        let response = reload(State(state.clone()), HeaderMap::new()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.handle.current().bundle().build_id(), before);
    }
}
