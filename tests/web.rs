// tests/web.rs
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for .oneshot()

use itemlab::app_state::AppState;
use itemlab::item_store::{InMemoryItemStore, ItemStore};
use itemlab::linear_model::LinearModel;
use itemlab::prediction::PredictionService;
use itemlab::routes::{build_router, WELCOME_MESSAGE};
use itemlab::training::SyntheticTrainer;

fn state(items: InMemoryItemStore) -> Arc<AppState> {
    let items: Arc<dyn ItemStore> = Arc::new(items);
    let predictor = Arc::new(PredictionService::new(Arc::new(SyntheticTrainer::default())));
    Arc::new(AppState::new(items, predictor))
}

fn app_with(st: &Arc<AppState>) -> Router {
    build_router(Arc::clone(st))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send_raw(app: &Router, method: &str, uri: &str, raw: &'static str) -> StatusCode {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(raw))
        .unwrap();
    app.clone().oneshot(req).await.unwrap().status()
}

#[tokio::test]
async fn root_returns_welcome_and_endpoint_map() {
    let app = app_with(&state(InMemoryItemStore::new()));
    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], WELCOME_MESSAGE);
    assert_eq!(body["endpoints"]["predict"], "/predict/");
}

#[tokio::test]
async fn list_returns_seeded_items_in_order() {
    let app = app_with(&state(InMemoryItemStore::seeded()));
    let (status, body) = send(&app, "GET", "/items/", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(body[0]["description"], "This is the first item.");
}

#[tokio::test]
async fn item_lifecycle_scenario() {
    let st = state(InMemoryItemStore::seeded());
    let app = app_with(&st);
    let widget = json!({"id": 4, "name": "Widget", "description": null});

    let (status, body) = send(&app, "POST", "/items/", Some(widget.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, widget);
    assert_eq!(st.items.len().unwrap(), 4);

    let (status, body) = send(&app, "GET", "/items/4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, widget);

    let (status, body) = send(&app, "DELETE", "/items/4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"detail": "Item deleted"}));
    assert_eq!(st.items.len().unwrap(), 3);

    let (status, body) = send(&app, "GET", "/items/4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Item not found"}));
}

#[tokio::test]
async fn missing_item_on_empty_store_is_404() {
    let app = app_with(&state(InMemoryItemStore::new()));
    let (status, body) = send(&app, "GET", "/items/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Item not found");
}

#[tokio::test]
async fn create_with_missing_description_defaults_to_null() {
    let app = app_with(&state(InMemoryItemStore::new()));
    let (status, body) = send(&app, "POST", "/items/", Some(json!({"id": 9, "name": "Bare"}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 9, "name": "Bare", "description": null}));
}

#[tokio::test]
async fn create_with_schema_mismatch_is_422() {
    let st = state(InMemoryItemStore::new());
    let app = app_with(&st);

    let (status, body) = send(&app, "POST", "/items/", Some(json!({"id": "abc", "name": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("detail").is_some());

    let (status, _) = send(&app, "POST", "/items/", Some(json!({"id": 1}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(send_raw(&app, "POST", "/items/", "{not json").await, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(st.items.is_empty().unwrap());
}

#[tokio::test]
async fn non_integer_path_id_is_422() {
    let app = app_with(&state(InMemoryItemStore::seeded()));
    let (status, body) = send(&app, "GET", "/items/abc", None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("detail").is_some());
}

#[tokio::test]
async fn update_replaces_record_and_404s_when_absent() {
    let st = state(InMemoryItemStore::seeded());
    let app = app_with(&st);

    let replacement = json!({"id": 2, "name": "Two v2", "description": null});
    let (status, body) = send(&app, "PUT", "/items/2", Some(replacement.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, replacement);

    let (status, body) = send(&app, "PUT", "/items/42", Some(json!({"id": 42, "name": "ghost"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Item not found");
    assert_eq!(st.items.len().unwrap(), 3);
}

#[tokio::test]
async fn update_can_move_item_to_new_id() {
    let st = state(InMemoryItemStore::seeded());
    let app = app_with(&st);

    let (status, _) = send(&app, "PUT", "/items/3", Some(json!({"id": 30, "name": "Moved"}))).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(send(&app, "GET", "/items/3", None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, "GET", "/items/30", None).await.0, StatusCode::OK);
}

#[tokio::test]
async fn delete_missing_item_is_404() {
    let app = app_with(&state(InMemoryItemStore::new()));
    let (status, body) = send(&app, "DELETE", "/items/5", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Item not found");
}

#[tokio::test]
async fn filter_echoes_params_and_rejects_bad_ones() {
    let app = app_with(&state(InMemoryItemStore::new()));

    let (status, body) = send(&app, "GET", "/filter/?category=books&price_lt=12.5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"category": "books", "price_less_than": 12.5}));

    let (status, _) = send(&app, "GET", "/filter/?category=books", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/filter/?category=books&price_lt=cheap", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_returns_placeholder_results() {
    let app = app_with(&state(InMemoryItemStore::new()));

    let (status, body) = send(&app, "GET", "/search/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": [{"item_id": "123"}, {"item_id": "456"}]}));

    let (_, body) = send(&app, "GET", "/search/?q=lamp&skip=5&limit=2", None).await;
    assert_eq!(body["q"], "lamp");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_accepts_negative_paging_and_rejects_non_integers() {
    let app = app_with(&state(InMemoryItemStore::new()));

    let (status, _) = send(&app, "GET", "/search/?skip=-1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/search/?limit=-5&q=x", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["q"], "x");

    let (status, body) = send(&app, "GET", "/search/?skip=abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("detail").is_some());
}

#[tokio::test]
async fn predict_before_model_load_is_503() {
    let app = app_with(&state(InMemoryItemStore::new()));
    let features = json!({"feature1": 1.0, "feature2": 2.0, "feature3": 3.0});
    let (status, body) = send(&app, "POST", "/predict/", Some(features)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].as_str().unwrap().contains("not loaded"));

    // the process keeps serving after the failure
    assert_eq!(send(&app, "GET", "/healthz", None).await.0, StatusCode::OK);
}

#[tokio::test]
async fn predict_with_loaded_model() {
    let st = state(InMemoryItemStore::new());
    st.predictor
        .install(LinearModel::new(0.5, [2.0, 1.5, 0.5]))
        .unwrap();
    let app = app_with(&st);

    let features = json!({"feature1": 1.0, "feature2": 2.0, "feature3": 3.0});
    let (status, body) = send(&app, "POST", "/predict/", Some(features)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": 7.0}));
}

#[tokio::test]
async fn predict_with_invalid_input_is_400() {
    let st = state(InMemoryItemStore::new());
    st.predictor
        .install(LinearModel::new(0.0, [1.0, 1.0, 1.0]))
        .unwrap();
    let app = app_with(&st);

    let (status, body) = send(&app, "POST", "/predict/", Some(json!({"feature1": 1.0, "feature2": 2.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("detail").is_some());

    let bad_type = json!({"feature1": "one", "feature2": 2.0, "feature3": 3.0});
    assert_eq!(send(&app, "POST", "/predict/", Some(bad_type)).await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_overflow_is_500() {
    let st = state(InMemoryItemStore::new());
    st.predictor
        .install(LinearModel::new(0.0, [f64::MAX, f64::MAX, 0.0]))
        .unwrap();
    let app = app_with(&st);

    let features = json!({"feature1": 1e308, "feature2": 1e308, "feature3": 0.0});
    let (status, body) = send(&app, "POST", "/predict/", Some(features)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Prediction failed"));
}

#[tokio::test]
async fn readyz_reflects_model_state() {
    let st = state(InMemoryItemStore::new());
    let app = app_with(&st);

    let (_, body) = send(&app, "GET", "/readyz", None).await;
    assert_eq!(body["ready"], false);

    st.predictor
        .install(LinearModel::new(0.0, [1.0, 1.0, 1.0]))
        .unwrap();
    let (_, body) = send(&app, "GET", "/readyz", None).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["model"]["state"], "loaded");
}
