//! # item-service
//!
//! CRUD HTTP API for catalogue items held in an in-memory store.
//!
//! ## Features
//!
//! - **Validation**: exhaustive schema checks for create, update and list queries
//! - **Store**: insertion-ordered arena behind a single `RwLock`, TypeID item ids
//! - **Queries**: filter, search, sort and paginate, plus collection statistics
//! - **Middleware stack**: request tracking, panic recovery, body size limits, CORS, compression
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use item_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let items = ItemService::new(ItemStore::new());
//!     items.seed_sample_data()?;
//!
//!     let app = router(AppState::new(config.clone(), items));
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod query;
pub mod responses;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;

/// Common imports
pub mod prelude {
    pub use crate::config::{Config, ItemsConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::health::{health, readiness};
    pub use crate::ids::{IdError, ItemId, MakeTypedRequestId, RequestId};
    pub use crate::models::{Item, ItemPatch, NewItem, QueryOptions, SortBy, SortOrder};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::query::{ItemStats, PaginationInfo, QueryEngine, QueryPage};
    pub use crate::responses::ApiResponse;
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::service::ItemService;
    pub use crate::state::AppState;
    pub use crate::store::{ItemStore, StoreError};
    pub use crate::validation::{
        validate_create, validate_query, validate_update, FieldError, ValidationError,
    };
}
