//! # catchmap
//!
//! Exception handler registry for axum applications.
//!
//! Handlers are registered per error type and looked up by the exact runtime
//! type of the error a request failed with. There is no supertype matching: a
//! handler for an error enum does not catch the errors it wraps.
//!
//! ## Features
//!
//! - **Exact-type registry**: `TypeId`-keyed, last registration wins
//! - **Thrown errors**: return `Result<T, Thrown>` from handlers and use `?`
//! - **Tower layer**: `ExceptionLayer` renders errors through the registry
//! - **Default instance**: `ExceptionMapper::global()` for process-wide setup
//! - **Handler macros**: register methods with `#[exception_handlers]`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catchmap::prelude::*;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("user {0} not found")]
//! struct UserNotFound(String);
//!
//! async fn get_user(Path(id): Path<String>) -> Result<String, Thrown> {
//!     Err(UserNotFound(id).into())
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mapper = ExceptionMapperBuilder::new()
//!         .register::<UserNotFound, _>(|e: &UserNotFound, _: &ExceptionContext| {
//!             (StatusCode::NOT_FOUND, e.to_string())
//!         })
//!         .build();
//!
//!     let app: Router = Router::new()
//!         .route("/users/{id}", axum::routing::get(get_user))
//!         .layer(ExceptionLayer::new(mapper));
//!
//!     // Serve your app...
//! }
//! ```

extern crate self as catchmap;

pub mod config;
pub mod error;
pub mod exception;

// Re-export core types
pub use config::{ConfigService, ExceptionConfig};
pub use error::{CatchError, Result};
pub use exception::{
    DefaultExceptionFilter, ExceptionContext, ExceptionFilter, ExceptionHandler, ExceptionLayer,
    ExceptionMapper, ExceptionMapperBuilder, Handler, RegisterHandlers, Thrown,
};

// Re-export macros
pub use catchmap_macro::{exception_handlers, handle};

pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use catchmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, ExceptionConfig};
    pub use crate::error::CatchError;
    pub use crate::exception::{
        DefaultExceptionFilter, ExceptionContext, ExceptionFilter, ExceptionHandler,
        ExceptionLayer, ExceptionMapper, ExceptionMapperBuilder, Handler, RegisterHandlers, Thrown,
    };
    pub use crate::{exception_handlers, handle};
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
