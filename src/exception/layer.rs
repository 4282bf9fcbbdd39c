use crate::config::ExceptionConfig;
use crate::exception::{
    DefaultExceptionFilter, ExceptionContext, ExceptionFilter, ExceptionMapper, Thrown,
};
use axum::{BoxError, http::Request, response::Response};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

/// Tower Layer that renders errors through an [`ExceptionMapper`]
///
/// Errors reach the layer either as the inner service's `Err` or as a
/// [`Thrown`] returned from a handler. Errors with no registered handler are
/// rendered by the fallback filter.
///
/// # Example
/// ```
/// use catchmap::prelude::*;
/// use std::io;
///
/// let mapper = ExceptionMapper::new();
/// mapper.register::<io::Error, _>(|e: &io::Error, _: &ExceptionContext| {
///     (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
/// });
///
/// let app: Router = Router::new()
///     .route("/", axum::routing::get(|| async { Err::<(), Thrown>(io::Error::other("down").into()) }))
///     .layer(ExceptionLayer::new(mapper));
/// ```
#[derive(Clone)]
pub struct ExceptionLayer {
    mapper: ExceptionMapper,
    fallback: Arc<dyn ExceptionFilter>,
}

impl ExceptionLayer {
    pub fn new(mapper: ExceptionMapper) -> Self {
        Self {
            mapper,
            fallback: Arc::new(DefaultExceptionFilter::default()),
        }
    }

    /// A layer backed by [`ExceptionMapper::global`]
    pub fn global() -> Self {
        Self::new(ExceptionMapper::global().clone())
    }

    /// Use a [`DefaultExceptionFilter`] built from `config` as the fallback
    pub fn with_config(self, config: ExceptionConfig) -> Self {
        self.with_fallback(DefaultExceptionFilter::new(config))
    }

    /// Replace the filter used when no handler matches
    pub fn with_fallback<F: ExceptionFilter>(mut self, fallback: F) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }
}

impl<S> Layer<S> for ExceptionLayer {
    type Service = ExceptionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionMiddleware {
            inner,
            mapper: self.mapper.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionMiddleware<S> {
    inner: S,
    mapper: ExceptionMapper,
    fallback: Arc<dyn ExceptionFilter>,
}

impl<S, B> Service<Request<B>> for ExceptionMiddleware<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError>,
    B: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    // Readiness is driven by `oneshot` in `call` so inner errors can be rendered.
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let context = ExceptionContext::from_request(&request);
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let mapper = self.mapper.clone();
        let fallback = self.fallback.clone();

        Box::pin(async move {
            let thrown = match inner.oneshot(request).await {
                Ok(mut response) => match Thrown::take_from(&mut response) {
                    Some(thrown) => thrown,
                    None => return Ok(response),
                },
                Err(error) => Thrown::from_boxed(error.into()),
            };
            Ok(render(&mapper, fallback.as_ref(), &thrown, &context))
        })
    }
}

fn render(
    mapper: &ExceptionMapper,
    fallback: &dyn ExceptionFilter,
    thrown: &Thrown,
    context: &ExceptionContext,
) -> Response {
    if let Some(response) = mapper.handle(thrown, context) {
        return response;
    }
    tracing::warn!(
        "No exception handler for {} on {} {}, using fallback",
        thrown.type_name().unwrap_or("<boxed error>"),
        context.method(),
        context.path()
    );
    fallback.catch(thrown.error(), context)
}
