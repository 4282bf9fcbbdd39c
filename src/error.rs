use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatchError>;

#[derive(Debug, Error)]
pub enum CatchError {
    #[error("Handler for {expected} cannot handle error: {actual}")]
    HandlerMismatch {
        expected: &'static str,
        actual: String,
    },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
}

impl axum::response::IntoResponse for CatchError {
    fn into_response(self) -> axum::response::Response {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            self.to_string(),
        )
            .into_response()
    }
}
