//! HTTP routes for the item API
//!
//! Handlers only extract input and wrap results; all item semantics live in
//! [`crate::service::ItemService`].

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    health,
    models::Item,
    query::ItemStats,
    responses::ApiResponse,
    state::AppState,
};

/// Base path of the versioned API
pub const API_BASE: &str = "/api/v1";

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .route("/api", get(api_index))
        .nest(API_BASE, item_routes())
        .fallback(route_not_found)
        .with_state(state)
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        // Static segment is matched ahead of the `{id}` capture
        .route("/items/stats", get(item_stats))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

fn item_location(item: &Item) -> String {
    format!("{API_BASE}/items/{}", item.id)
}

async fn create_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<Item>> {
    let Json(raw) = payload?;
    let item = state.items().create(&raw)?;
    let location = item_location(&item);

    Ok(ApiResponse::created(item)
        .with_location(location)
        .with_message("Item created successfully"))
}

async fn list_items(
    State(state): State<AppState>,
    params: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<ApiResponse<Vec<Item>>> {
    let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
    let page = state.items().list(&params)?;
    let message = format!("Retrieved {} items successfully", page.items.len());

    Ok(ApiResponse::ok(page.items)
        .with_pagination(page.pagination)
        .with_message(message))
}

async fn item_stats(State(state): State<AppState>) -> Result<ApiResponse<ItemStats>> {
    let stats = state.items().stats()?;
    Ok(ApiResponse::ok(stats).with_message("Statistics retrieved successfully"))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Item>> {
    let item = state.items().get(&id)?;
    Ok(ApiResponse::ok(item).with_message("Item retrieved successfully"))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<Item>> {
    let Json(raw) = payload?;
    let item = state.items().update(&id, &raw)?;
    Ok(ApiResponse::ok(item).with_message("Item updated successfully"))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Item>> {
    let item = state.items().delete(&id)?;
    Ok(ApiResponse::ok(item).with_message("Item deleted successfully"))
}

#[derive(Debug, Serialize)]
struct Endpoint {
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiIndex {
    name: String,
    version: &'static str,
    endpoints: Vec<Endpoint>,
}

const ENDPOINTS: [Endpoint; 8] = [
    Endpoint {
        method: "GET",
        path: "/api/v1/items",
        description: "List items with filtering, search, sorting and pagination",
    },
    Endpoint {
        method: "POST",
        path: "/api/v1/items",
        description: "Create an item",
    },
    Endpoint {
        method: "GET",
        path: "/api/v1/items/stats",
        description: "Aggregate item statistics",
    },
    Endpoint {
        method: "GET",
        path: "/api/v1/items/{id}",
        description: "Fetch an item",
    },
    Endpoint {
        method: "PUT",
        path: "/api/v1/items/{id}",
        description: "Partially update an item",
    },
    Endpoint {
        method: "DELETE",
        path: "/api/v1/items/{id}",
        description: "Delete an item",
    },
    Endpoint {
        method: "GET",
        path: "/health",
        description: "Liveness probe",
    },
    Endpoint {
        method: "GET",
        path: "/ready",
        description: "Readiness probe",
    },
];

async fn api_index(State(state): State<AppState>) -> ApiResponse<ApiIndex> {
    ApiResponse::ok(ApiIndex {
        name: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS.into(),
    })
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> Error {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    tracing::warn!(uri = %target, "Route not found");
    Error::NotFound(format!("Route not found - {target}"))
}
