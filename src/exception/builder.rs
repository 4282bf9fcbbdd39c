use crate::exception::{ExceptionHandler, ExceptionMapper, RegisterHandlers};
use std::error::Error;
use std::sync::Arc;

/// Builder for an independent exception mapper
///
/// Collects registrations during setup and hands back the finished mapper.
///
/// # Example
/// ```
/// use catchmap::prelude::*;
/// use std::io;
///
/// let mapper = ExceptionMapperBuilder::new()
///     .register::<io::Error, _>(|_: &io::Error, _: &ExceptionContext| StatusCode::BAD_GATEWAY)
///     .build();
/// assert!(mapper.contains::<io::Error>());
/// ```
pub struct ExceptionMapperBuilder {
    mapper: ExceptionMapper,
}

impl ExceptionMapperBuilder {
    /// Create a new mapper builder
    pub fn new() -> Self {
        Self {
            mapper: ExceptionMapper::new(),
        }
    }

    /// Register a handler for exception type `E`
    pub fn register<E, H>(self, handler: H) -> Self
    where
        E: Error + Send + Sync + 'static,
        H: ExceptionHandler<E>,
    {
        self.mapper.register::<E, H>(handler);
        self
    }

    /// Register every handler method of a `#[exception_handlers]` type
    pub fn handlers<T: RegisterHandlers>(self, handlers: T) -> Self {
        Arc::new(handlers).register_handlers(&self.mapper);
        self
    }

    /// Build the mapper
    pub fn build(self) -> ExceptionMapper {
        self.mapper
    }
}

impl Default for ExceptionMapperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::{ExceptionContext, Thrown};
    use axum::http::StatusCode;
    use std::io;

    #[test]
    fn test_builder_registers_handlers() {
        let mapper = ExceptionMapperBuilder::new()
            .register::<io::Error, _>(|_: &io::Error, _: &ExceptionContext| StatusCode::BAD_GATEWAY)
            .register::<std::fmt::Error, _>(|_: &std::fmt::Error, _: &ExceptionContext| {
                StatusCode::UNPROCESSABLE_ENTITY
            })
            .build();

        assert_eq!(mapper.len(), 2);
        assert!(mapper.contains::<io::Error>());
        assert!(mapper.contains::<std::fmt::Error>());
    }

    #[derive(Debug, thiserror::Error)]
    #[error("payment declined: {0}")]
    struct PaymentDeclined(String);

    struct BillingErrors {
        io_status: StatusCode,
    }

    #[crate::exception_handlers]
    impl BillingErrors {
        #[handle]
        fn on_io(&self, _e: &io::Error, _context: &ExceptionContext) -> StatusCode {
            self.io_status
        }

        #[handle(PaymentDeclined)]
        fn on_declined(
            &self,
            e: &PaymentDeclined,
            _context: &ExceptionContext,
        ) -> (StatusCode, String) {
            (StatusCode::PAYMENT_REQUIRED, e.0.clone())
        }

        fn unrelated(&self) -> StatusCode {
            self.io_status
        }
    }

    #[test]
    fn test_handler_methods_are_registered() {
        let errors = BillingErrors {
            io_status: StatusCode::BAD_GATEWAY,
        };
        assert_eq!(errors.unrelated(), StatusCode::BAD_GATEWAY);

        let mapper = ExceptionMapperBuilder::new().handlers(errors).build();
        assert_eq!(mapper.len(), 2);

        let context = ExceptionContext::default();
        let response = mapper
            .handle(&Thrown::from(io::Error::other("socket")), &context)
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = mapper
            .handle(&Thrown::from(PaymentDeclined("card expired".into())), &context)
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_builds_independent_mappers() {
        let first = ExceptionMapperBuilder::default()
            .register::<io::Error, _>(|_: &io::Error, _: &ExceptionContext| StatusCode::BAD_GATEWAY)
            .build();
        let second = ExceptionMapperBuilder::default().build();

        assert!(first.contains::<io::Error>());
        assert!(second.is_empty());
    }
}
