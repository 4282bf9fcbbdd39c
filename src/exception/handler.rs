use crate::error::{CatchError, Result};
use crate::exception::{ExceptionContext, Thrown};
use axum::response::{IntoResponse, Response};
use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Renders a response for one exception type
///
/// Closures of the form `Fn(&E, &ExceptionContext) -> impl IntoResponse` are
/// handlers too.
///
/// # Example
/// ```
/// use catchmap::prelude::*;
/// use std::io;
///
/// struct IoHandler;
///
/// impl ExceptionHandler<io::Error> for IoHandler {
///     fn catch(&self, exception: &io::Error, _context: &ExceptionContext) -> Response {
///         (StatusCode::SERVICE_UNAVAILABLE, exception.to_string()).into_response()
///     }
/// }
/// ```
pub trait ExceptionHandler<E>: Send + Sync + 'static {
    fn catch(&self, exception: &E, context: &ExceptionContext) -> Response;
}

impl<E, F, R> ExceptionHandler<E> for F
where
    F: Fn(&E, &ExceptionContext) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn catch(&self, exception: &E, context: &ExceptionContext) -> Response {
        self(exception, context).into_response()
    }
}

trait ErasedHandler: Send + Sync {
    fn accepts(&self, error: &(dyn Error + Send + Sync + 'static)) -> bool;

    fn handle(
        &self,
        error: &(dyn Error + Send + Sync + 'static),
        context: &ExceptionContext,
    ) -> Option<Response>;
}

struct Typed<E, H> {
    handler: H,
    _exception: PhantomData<fn(&E)>,
}

impl<E, H> ErasedHandler for Typed<E, H>
where
    E: Error + Send + Sync + 'static,
    H: ExceptionHandler<E>,
{
    fn accepts(&self, error: &(dyn Error + Send + Sync + 'static)) -> bool {
        error.is::<E>()
    }

    fn handle(
        &self,
        error: &(dyn Error + Send + Sync + 'static),
        context: &ExceptionContext,
    ) -> Option<Response> {
        error
            .downcast_ref::<E>()
            .map(|exception| self.handler.catch(exception, context))
    }
}

/// A registered handler with its exception type erased
///
/// Cloning is cheap and clones refer to the same handler.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<dyn ErasedHandler>,
    exception_type: &'static str,
}

impl Handler {
    pub(crate) fn new<E, H>(handler: H) -> Self
    where
        E: Error + Send + Sync + 'static,
        H: ExceptionHandler<E>,
    {
        Self {
            inner: Arc::new(Typed {
                handler,
                _exception: PhantomData,
            }),
            exception_type: type_name::<E>(),
        }
    }

    /// Name of the exception type this handler was registered for
    pub fn exception_type(&self) -> &'static str {
        self.exception_type
    }

    /// True if `error` is exactly the type this handler was registered for
    pub fn accepts(&self, error: &(dyn Error + Send + Sync + 'static)) -> bool {
        self.inner.accepts(error)
    }

    /// Run the handler against a type-erased error
    ///
    /// # Errors
    /// Returns [`CatchError::HandlerMismatch`] if `error` is not of the
    /// handler's exception type.
    pub fn handle(
        &self,
        error: &(dyn Error + Send + Sync + 'static),
        context: &ExceptionContext,
    ) -> Result<Response> {
        self.inner
            .handle(error, context)
            .ok_or_else(|| CatchError::HandlerMismatch {
                expected: self.exception_type,
                actual: error.to_string(),
            })
    }

    pub fn handle_thrown(&self, thrown: &Thrown, context: &ExceptionContext) -> Result<Response> {
        self.handle(thrown.error(), context)
    }

    /// True if both values refer to the same registered handler
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("exception_type", &self.exception_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    struct QuotaHandler;

    impl ExceptionHandler<QuotaExceeded> for QuotaHandler {
        fn catch(&self, _exception: &QuotaExceeded, _context: &ExceptionContext) -> Response {
            StatusCode::TOO_MANY_REQUESTS.into_response()
        }
    }

    #[test]
    fn test_struct_handler() {
        let handler = Handler::new::<QuotaExceeded, _>(QuotaHandler);
        let response = handler
            .handle(&QuotaExceeded, &ExceptionContext::default())
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(handler.exception_type().ends_with("QuotaExceeded"));
    }

    #[test]
    fn test_closure_handler() {
        let handler = Handler::new::<io::Error, _>(|e: &io::Error, _: &ExceptionContext| {
            (StatusCode::BAD_GATEWAY, e.to_string())
        });
        let thrown = Thrown::from(io::Error::other("upstream"));
        let response = handler
            .handle_thrown(&thrown, &ExceptionContext::default())
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_mismatched_error_is_rejected() {
        let handler = Handler::new::<QuotaExceeded, _>(QuotaHandler);
        let err = io::Error::other("nope");
        assert!(!handler.accepts(&err));

        let result = handler.handle(&err, &ExceptionContext::default());
        assert!(matches!(result, Err(CatchError::HandlerMismatch { .. })));
    }

    #[test]
    fn test_clones_share_identity() {
        let a = Handler::new::<QuotaExceeded, _>(QuotaHandler);
        let b = Handler::new::<QuotaExceeded, _>(QuotaHandler);
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
