use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use navdeck_core::{CategoryPlacement, Site};
use navdeck_engine::{Directory, DirectoryError};
use navdeck_storage::StorageError;

use crate::title;

/// Shared state for the HTTP server. The directory sits behind a mutex
/// because rusqlite connections are single-threaded; transactions are a
/// handful of statements, so the hold times are short.
#[derive(Clone)]
pub struct AppState {
    directory: Arc<Mutex<Directory>>,
    client: reqwest::Client,
}

impl AppState {
    pub fn new(directory: Directory, client: reqwest::Client) -> Self {
        Self {
            directory: Arc::new(Mutex::new(directory)),
            client,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/categories",
            get(list_categories)
                .post(create_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/api/categories/order", put(bulk_reorder))
        .route(
            "/api/sites",
            get(list_sites)
                .post(create_site)
                .put(update_site)
                .delete(delete_site),
        )
        .route("/api/sites/title", get(site_title))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct IdParam {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct CreateCategoryRequest {
    name: String,
}

/// PUT /api/categories carries either a rename (`name`) or a single-slot
/// reorder (`order`); the presence of `order` decides.
#[derive(Debug, Deserialize)]
struct UpdateCategoryRequest {
    id: i64,
    name: Option<String>,
    order: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreateSiteRequest {
    name: String,
    url: String,
    category_id: Option<i64>,
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let directory = state.directory.lock().await;
    Ok(Json(directory.list_categories()?))
}

async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut directory = state.directory.lock().await;
    let category = directory.create_category(&req.name)?;
    tracing::info!(id = category.id, order = category.order_num, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut directory = state.directory.lock().await;
    match (req.order, req.name) {
        (Some(order), _) => {
            directory.reorder_category(req.id, order)?;
            Ok(Json(json!({ "message": "category order updated" })))
        }
        (None, Some(name)) => {
            directory.rename_category(req.id, &name)?;
            Ok(Json(json!({ "message": "category updated" })))
        }
        (None, None) => Err(ApiError::bad_request("either name or order is required")),
    }
}

async fn delete_category(
    State(state): State<AppState>,
    Query(params): Query<IdParam>,
) -> Result<impl IntoResponse, ApiError> {
    let mut directory = state.directory.lock().await;
    directory.delete_category(params.id)?;
    tracing::info!(id = params.id, "category deleted");
    Ok(Json(json!({ "message": "category deleted" })))
}

async fn bulk_reorder(
    State(state): State<AppState>,
    Json(placements): Json<Vec<CategoryPlacement>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut directory = state.directory.lock().await;
    directory.bulk_reorder_categories(&placements)?;
    Ok(Json(json!({ "message": "category order updated" })))
}

async fn list_sites(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let directory = state.directory.lock().await;
    Ok(Json(directory.list_sites()?))
}

async fn create_site(
    State(state): State<AppState>,
    Json(req): Json<CreateSiteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut directory = state.directory.lock().await;
    let site = directory.create_site(&req.name, &req.url, req.category_id)?;
    Ok((StatusCode::CREATED, Json(site)))
}

async fn update_site(
    State(state): State<AppState>,
    Json(site): Json<Site>,
) -> Result<impl IntoResponse, ApiError> {
    let mut directory = state.directory.lock().await;
    directory.update_site(&site)?;
    Ok(Json(json!({ "message": "site updated" })))
}

async fn delete_site(
    State(state): State<AppState>,
    Query(params): Query<IdParam>,
) -> Result<impl IntoResponse, ApiError> {
    let mut directory = state.directory.lock().await;
    directory.delete_site(params.id)?;
    Ok(Json(json!({ "message": "site deleted" })))
}

async fn site_title(
    State(state): State<AppState>,
    Query(params): Query<IdParam>,
) -> Result<impl IntoResponse, ApiError> {
    let url = {
        let directory = state.directory.lock().await;
        directory
            .get_site(params.id)?
            .ok_or_else(|| ApiError::not_found(format!("site {}", params.id)))?
            .url
    };

    match title::fetch_title(&state.client, &url).await {
        Ok(title) => Ok(Json(json!({ "title": title }))),
        Err(e) => {
            tracing::warn!(%url, error = %e, "title fetch failed");
            Err(ApiError::new(StatusCode::BAD_GATEWAY, "title fetch failed"))
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        let status = match &e {
            _ if e.is_validation() => StatusCode::BAD_REQUEST,
            DirectoryError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            DirectoryError::Storage(StorageError::Conflict(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %e, "request failed");
        }
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
