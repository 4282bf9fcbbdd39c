use axum::{
    BoxError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::{TypeId, type_name};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// An error raised while processing a request
///
/// `Thrown` remembers the concrete type of the error it was built from, so the
/// [`ExceptionMapper`](crate::exception::ExceptionMapper) can find the handler
/// registered for exactly that type. Any `Error + Send + Sync + 'static`
/// converts into it, which lets axum handlers return `Result<T, Thrown>` and
/// use `?`.
///
/// # Example
/// ```
/// use catchmap::Thrown;
///
/// async fn read_config() -> Result<String, Thrown> {
///     let text = std::fs::read_to_string("app.toml")?;
///     Ok(text)
/// }
/// ```
#[derive(Clone)]
pub struct Thrown {
    error: Arc<dyn Error + Send + Sync>,
    exception_type: Option<(TypeId, &'static str)>,
}

impl Thrown {
    /// Wrap an already type-erased error
    ///
    /// The concrete type is not known statically here, so resolution falls
    /// back to probing the registered types.
    pub fn from_boxed(error: BoxError) -> Self {
        Self {
            error: Arc::from(error),
            exception_type: None,
        }
    }

    /// `TypeId` of the concrete error, when it was known at construction
    pub fn type_id(&self) -> Option<TypeId> {
        self.exception_type.map(|(id, _)| id)
    }

    pub fn type_name(&self) -> Option<&'static str> {
        self.exception_type.map(|(_, name)| name)
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.error
    }

    pub fn is<E: Error + 'static>(&self) -> bool {
        self.error.is::<E>()
    }

    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    /// Remove a `Thrown` stashed in a response by [`IntoResponse`]
    pub fn take_from(response: &mut Response) -> Option<Self> {
        response.extensions_mut().remove::<Self>()
    }
}

impl<E> From<E> for Thrown
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self {
            error: Arc::new(error),
            exception_type: Some((TypeId::of::<E>(), type_name::<E>())),
        }
    }
}

impl fmt::Debug for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thrown")
            .field("type", &self.type_name().unwrap_or("<boxed>"))
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Renders a bare 500 and stashes the error in the response extensions.
/// An `ExceptionLayer` further out replaces it with the mapped response.
impl IntoResponse for Thrown {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}
