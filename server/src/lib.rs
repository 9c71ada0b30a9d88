use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::{routing::get, Json, Router};
use filmdex_core::persist::{load_index, IndexPaths};
use filmdex_core::{Document, Mode, SearchEngine, SearchPage};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default)]
    pub mode: Mode,
}
fn default_page() -> usize { 1 }

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

/// Loads the persisted index under `index_dir` into a query engine.
pub fn load_engine(index_dir: &str) -> Result<SearchEngine> {
    let (index, docs, meta) = load_index(&IndexPaths::new(index_dir))
        .with_context(|| format!("loading index from {index_dir}"))?;
    tracing::info!(
        index_dir,
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        stop_words = index.normalizer().stop_words().len(),
        created_at = %meta.created_at,
        "index loaded"
    );
    Ok(SearchEngine::new(index, docs))
}

/// Loads the index and builds the router with permissive CORS.
pub fn build_app(index_dir: &str) -> Result<Router> {
    Ok(router(load_engine(index_dir)?, &[]))
}

/// Allowed browser origins; an empty or fully unparsable list allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let allow = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(allow).allow_methods([Method::GET])
}

pub fn router(engine: SearchEngine, allowed_origins: &[String]) -> Router {
    let app_state = AppState { engine: Arc::new(engine) };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchPage> {
    Json(state.engine.search(&params.q, params.mode, params.page))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> Result<Json<Document>, (StatusCode, Json<serde_json::Value>)> {
    match state.engine.document(doc_id) {
        Some(doc) => Ok(Json(doc.clone())),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

