use axum::response::Response;
use std::error::Error;
use std::sync::Arc;

mod builder;
mod context;
mod handler;
pub mod http;
mod layer;
mod mapper;
mod thrown;

pub use builder::ExceptionMapperBuilder;
pub use context::ExceptionContext;
pub use handler::{ExceptionHandler, Handler};
pub use http::DefaultExceptionFilter;
pub use layer::{ExceptionLayer, ExceptionMiddleware};
pub use mapper::ExceptionMapper;
pub use thrown::Thrown;

/// The ExceptionFilter trait
///
/// Filters render any error, whatever its type. The [`ExceptionLayer`] uses
/// one when the mapper has no handler for an error.
/// They must return a valid Response.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an exception and return a response
    fn catch(
        &self,
        error: &(dyn Error + Send + Sync + 'static),
        context: &ExceptionContext,
    ) -> Response;
}

/// Types whose methods register themselves as exception handlers
///
/// This trait is typically implemented by the `#[exception_handlers]` macro.
///
/// # Example
/// ```
/// use catchmap::prelude::*;
/// use std::io;
///
/// struct ApiErrors {
///     service_name: &'static str,
/// }
///
/// #[exception_handlers]
/// impl ApiErrors {
///     #[handle]
///     fn on_io(&self, e: &io::Error, _context: &ExceptionContext) -> (StatusCode, String) {
///         (StatusCode::BAD_GATEWAY, format!("{}: {}", self.service_name, e))
///     }
/// }
///
/// let mapper = ExceptionMapperBuilder::new()
///     .handlers(ApiErrors { service_name: "billing" })
///     .build();
/// assert!(mapper.contains::<io::Error>());
/// ```
pub trait RegisterHandlers: Send + Sync + 'static {
    fn register_handlers(self: Arc<Self>, mapper: &ExceptionMapper);
}
