//! Success envelope for HTTP responses
//!
//! Every successful response body has the shape
//! `{ "success": true, "data": ..., "pagination"?: ..., "message"?: ... }`.
//! Failures use [`crate::error::ErrorResponse`] instead.
//!
//! ```rust,ignore
//! use item_service::responses::ApiResponse;
//!
//! async fn create() -> ApiResponse<Item> {
//!     ApiResponse::created(item)
//!         .with_location(format!("/api/v1/items/{}", item.id))
//!         .with_message("Item created successfully")
//! }
//! ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::query::PaginationInfo;

/// Success envelope with its HTTP status
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PaginationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip)]
    status: StatusCode,
    #[serde(skip)]
    location: Option<String>,
}

impl<T> ApiResponse<T> {
    fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            message: None,
            status,
            location: None,
        }
    }

    /// 200 OK
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    /// Add an optional success message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Add a Location header pointing to the created resource
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        let location = self.location.clone();
        let mut response = (status, Json(self)).into_response();

        if let Some(location) = location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let response = ApiResponse::ok(json!({ "id": 1 })).with_message("Item retrieved successfully");
        assert_eq!(response.status(), StatusCode::OK);

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": { "id": 1 },
                "message": "Item retrieved successfully"
            })
        );
    }

    #[test]
    fn test_pagination_is_included_when_set() {
        let response = ApiResponse::ok(Vec::<u32>::new())
            .with_pagination(PaginationInfo::new(1, 10, 0));

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["pagination"]["pages"], 0);
        assert_eq!(body["pagination"]["hasNext"], false);
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_created_sets_status_and_location() {
        let response = ApiResponse::created("x")
            .with_location("/api/v1/items/item_01h455vb4pex5vsknk084sn02q")
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/v1/items/item_01h455vb4pex5vsknk084sn02q"
        );
    }
}
