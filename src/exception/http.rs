use crate::config::ExceptionConfig;
use crate::exception::{ExceptionContext, ExceptionFilter};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::error::Error;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
    error_id: Uuid,
    path: String,
    timestamp: String,
}

/// Fallback filter for errors with no registered handler
///
/// Renders a JSON 500. The error message is only included when
/// [`ExceptionConfig::expose_details`] is set.
#[derive(Debug, Clone, Default)]
pub struct DefaultExceptionFilter {
    config: ExceptionConfig,
}

impl DefaultExceptionFilter {
    pub fn new(config: ExceptionConfig) -> Self {
        Self { config }
    }
}

impl ExceptionFilter for DefaultExceptionFilter {
    fn catch(
        &self,
        error: &(dyn Error + Send + Sync + 'static),
        context: &ExceptionContext,
    ) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let error_id = Uuid::new_v4();

        if self.config.log_unhandled {
            tracing::error!(
                %error_id,
                method = %context.method(),
                path = context.path(),
                "Unhandled exception: {}",
                error
            );
        }

        let message = if self.config.expose_details {
            error.to_string()
        } else {
            "Internal Server Error".to_string()
        };

        (
            status,
            Json(ErrorBody {
                status_code: status.as_u16(),
                message,
                error_id,
                path: context.path().to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Uri};
    use std::io;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn context() -> ExceptionContext {
        ExceptionContext::new(Method::GET, Uri::from_static("/reports/9"))
    }

    #[tokio::test]
    async fn test_hides_details_by_default() {
        let filter = DefaultExceptionFilter::default();
        let response = filter.catch(&io::Error::other("secret path /etc"), &context());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], "Internal Server Error");
        assert_eq!(body["path"], "/reports/9");
        assert!(body["errorId"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_exposes_details_when_configured() {
        let filter = DefaultExceptionFilter::new(ExceptionConfig {
            expose_details: true,
            log_unhandled: false,
        });
        let response = filter.catch(&io::Error::other("disk full"), &context());

        let body = body_json(response).await;
        assert_eq!(body["message"], "disk full");
    }
}
