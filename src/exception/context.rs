use axum::http::{Method, Request, Uri};

/// Request details available to exception handlers
///
/// The request itself has already been consumed by the time an error is
/// handled, so only the parts needed to render a response are kept.
#[derive(Debug, Clone, Default)]
pub struct ExceptionContext {
    method: Method,
    uri: Uri,
}

impl ExceptionContext {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self { method, uri }
    }

    /// Capture the context of an incoming request
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_from_request_keeps_method_and_uri() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/users/7?force=true")
            .body(Body::empty())
            .unwrap();

        let context = ExceptionContext::from_request(&request);
        assert_eq!(*context.method(), Method::DELETE);
        assert_eq!(context.path(), "/users/7");
        assert_eq!(context.uri().query(), Some("force=true"));
    }
}
