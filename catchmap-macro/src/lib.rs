use proc_macro::TokenStream;

mod exception;

/// Attribute macro registering the `#[handle]` methods of an impl block as
/// exception handlers
///
/// Each handler method takes `&self`, the exception by reference and the
/// `ExceptionContext`, and returns anything implementing `IntoResponse`.
/// The exception type is read from the second parameter, or given
/// explicitly with `#[handle(Type)]`.
///
/// # Example
/// ```ignore
/// #[exception_handlers]
/// impl ApiErrors {
///     #[handle]
///     fn on_io(&self, e: &std::io::Error, _context: &ExceptionContext) -> StatusCode {
///         StatusCode::BAD_GATEWAY
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn exception_handlers(attr: TokenStream, item: TokenStream) -> TokenStream {
    exception::exception_handlers_attribute(attr, item)
}

/// Marks a handler method inside an `#[exception_handlers]` impl block
#[proc_macro_attribute]
pub fn handle(attr: TokenStream, item: TokenStream) -> TokenStream {
    exception::handle_attribute(attr, item)
}
