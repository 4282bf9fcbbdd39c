use crate::exception::{ExceptionContext, ExceptionHandler, Handler, Thrown};
use axum::response::Response;
use dashmap::DashMap;
use std::any::{TypeId, type_name};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock};

static DEFAULT_MAPPER: OnceLock<ExceptionMapper> = OnceLock::new();

/// Thread-safe registry mapping exception types to handlers.
///
/// Lookups match the exact runtime type of an error. A handler registered for
/// an error enum is not used for the errors it wraps, and the other way round.
///
/// Clones share the same table. Use [`ExceptionMapper::new`] for an
/// independent registry or [`ExceptionMapper::global`] for the process-wide one.
#[derive(Clone, Default)]
pub struct ExceptionMapper {
    handlers: Arc<DashMap<TypeId, Handler>>,
}

impl ExceptionMapper {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
        }
    }

    /// The process-wide default mapper, created on first access
    pub fn global() -> &'static ExceptionMapper {
        DEFAULT_MAPPER.get_or_init(ExceptionMapper::new)
    }

    /// Map `handler` to exception type `E`, replacing any previous handler for `E`
    pub fn register<E, H>(&self, handler: H) -> &Self
    where
        E: Error + Send + Sync + 'static,
        H: ExceptionHandler<E>,
    {
        let previous = self
            .handlers
            .insert(TypeId::of::<E>(), Handler::new::<E, H>(handler));

        if previous.is_some() {
            tracing::debug!("Replaced exception handler for {}", type_name::<E>());
        } else {
            tracing::debug!("Registered exception handler for {}", type_name::<E>());
        }
        self
    }

    pub fn resolve<E: 'static>(&self) -> Option<Handler> {
        self.resolve_type(TypeId::of::<E>())
    }

    pub fn resolve_type(&self, type_id: TypeId) -> Option<Handler> {
        let handler = self.handlers.get(&type_id).map(|entry| entry.value().clone());
        if handler.is_none() {
            tracing::trace!("No exception handler for {:?}", type_id);
        }
        handler
    }

    /// Resolve the handler for the runtime type of a thrown error
    pub fn resolve_thrown(&self, thrown: &Thrown) -> Option<Handler> {
        match thrown.type_id() {
            Some(type_id) => self.resolve_type(type_id),
            None => self.resolve_error(thrown.error()),
        }
    }

    /// Resolve the handler for the runtime type of a type-erased error
    ///
    /// The concrete type of a `dyn Error` is not observable directly, so each
    /// registered type is checked with an exact `is` test. At most one can match.
    pub fn resolve_error(&self, error: &(dyn Error + Send + Sync + 'static)) -> Option<Handler> {
        let handler = self
            .handlers
            .iter()
            .find(|entry| entry.value().accepts(error))
            .map(|entry| entry.value().clone());
        if handler.is_none() {
            tracing::trace!("No exception handler for error: {}", error);
        }
        handler
    }

    /// Resolve and run the handler for `thrown`
    ///
    /// Returns `None` when no handler is registered for its type.
    pub fn handle(&self, thrown: &Thrown, context: &ExceptionContext) -> Option<Response> {
        self.resolve_thrown(thrown)
            .and_then(|handler| handler.handle_thrown(thrown, context).ok())
    }

    pub fn contains<E: 'static>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<E>())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ExceptionMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.handlers.iter().map(|entry| entry.value().exception_type()))
            .finish()
    }
}
