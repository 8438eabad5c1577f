use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api_errors::AppError,
    app_state::AppState,
    errors::LabError,
    item_store::Item,
    linear_model::FeatureVector,
};

pub const WELCOME_MESSAGE: &str = "Welcome to the Item Lab API";

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    category: String,
    price_lt: f64,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    category: String,
    price_less_than: f64,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    item_id: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    items: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    detail: &'static str,
}

/// Build the full API router: item CRUD, demo query endpoints, prediction and
/// health checks.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/items/", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(read_item).put(update_item).delete(delete_item),
        )
        .route("/filter/", get(filter_items))
        .route("/search/", get(search_items))
        .route("/predict/", post(predict))
        // health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": WELCOME_MESSAGE,
        "endpoints": {
            "items": "/items/",
            "item": "/items/{id}",
            "filter": "/filter/?category=&price_lt=",
            "search": "/search/?q=&skip=&limit=",
            "predict": "/predict/",
            "health": "/healthz",
            "ready": "/readyz",
        }
    }))
}

fn item_not_found(id: i64) -> AppError {
    LabError::not_found("item", id.to_string()).into()
}

async fn list_items(State(st): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(st.items.list()?))
}

async fn read_item(
    State(st): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = id?;
    st.items.get(id)?.map(Json).ok_or_else(|| item_not_found(id))
}

async fn create_item(
    State(st): State<Arc<AppState>>,
    body: Result<Json<Item>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let Json(item) = body?;
    let created = st.items.create(item)?;
    tracing::info!(id = created.id, "Item created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item(
    State(st): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Item>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = id?;
    let Json(item) = body?;
    st.items
        .update(id, item)?
        .map(Json)
        .ok_or_else(|| item_not_found(id))
}

async fn delete_item(
    State(st): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DetailResponse>, AppError> {
    let Path(id) = id?;
    if !st.items.delete(id)? {
        return Err(item_not_found(id));
    }
    Ok(Json(DetailResponse {
        detail: "Item deleted",
    }))
}

async fn filter_items(
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<FilterResponse>, AppError> {
    let Query(params) = params?;
    Ok(Json(FilterResponse {
        category: params.category,
        price_less_than: params.price_lt,
    }))
}

// Placeholder result set; skip/limit are accepted but not applied.
async fn search_items(
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(params) = params?;
    tracing::debug!(skip = params.skip, limit = params.limit, "search");
    Ok(Json(SearchResponse {
        items: vec![
            SearchHit {
                item_id: "123".into(),
            },
            SearchHit {
                item_id: "456".into(),
            },
        ],
        q: params.q.filter(|q| !q.is_empty()),
    }))
}

async fn predict(
    State(st): State<Arc<AppState>>,
    body: Result<Json<FeatureVector>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    // Bad prediction input is a 400, unlike the item endpoints.
    let Json(features) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let prediction = st.predictor.predict(&features)?;
    Ok(Json(PredictionResponse { prediction }))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(State(st): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ready": st.predictor.is_loaded(),
        "model": st.predictor.status(),
    }))
}
