use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, FnArg, ImplItem, ImplItemFn, ItemImpl, Type};

pub fn exception_handlers_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(item as ItemImpl);

    match generate_register_impl(&mut input) {
        Ok(register_impl) => quote! {
            #input
            #register_impl
        }
        .into(),
        Err(err) => err.to_compile_error().into(),
    }
}

pub fn handle_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = TokenStream2::from(item);
    syn::Error::new(
        item.span(),
        "#[handle] must be used on a method inside an #[exception_handlers] impl block",
    )
    .to_compile_error()
    .into()
}

fn generate_register_impl(input: &mut ItemImpl) -> syn::Result<TokenStream2> {
    let self_ty = input.self_ty.clone();
    let mut registrations = Vec::new();
    for item in input.items.iter_mut() {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let Some(position) = method
            .attrs
            .iter()
            .position(|attr| attr.path().is_ident("handle"))
        else {
            continue;
        };

        // Handler attributes are consumed here; they are not real macros on their own.
        let attr = method.attrs.remove(position);
        let exception_type = match &attr.meta {
            syn::Meta::Path(_) => exception_type_of(method)?,
            _ => attr.parse_args::<Type>()?,
        };
        let method_name = &method.sig.ident;

        registrations.push(quote! {
            {
                let this = ::std::sync::Arc::clone(&self);
                mapper.register::<#exception_type, _>(
                    move |exception: &#exception_type, context: &::catchmap::ExceptionContext| {
                        this.#method_name(exception, context)
                    },
                );
            }
        });
    }

    if registrations.is_empty() {
        return Err(syn::Error::new(
            input.self_ty.span(),
            "#[exception_handlers] requires at least one #[handle] method",
        ));
    }

    let (impl_generics, _, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::catchmap::RegisterHandlers for #self_ty #where_clause {
            fn register_handlers(
                self: ::std::sync::Arc<Self>,
                mapper: &::catchmap::ExceptionMapper,
            ) {
                #(#registrations)*
            }
        }
    })
}

/// Extract `E` from a handler signature `fn(&self, &E, &ExceptionContext)`
fn exception_type_of(method: &ImplItemFn) -> syn::Result<Type> {
    let mut inputs = method.sig.inputs.iter();

    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => {}
        _ => {
            return Err(syn::Error::new(
                method.sig.span(),
                "exception handler methods must take &self",
            ))
        }
    }

    match inputs.next() {
        Some(FnArg::Typed(arg)) => match arg.ty.as_ref() {
            Type::Reference(reference) => Ok((*reference.elem).clone()),
            other => Err(syn::Error::new(
                other.span(),
                "the exception parameter must be a reference, e.g. `&MyError`",
            )),
        },
        _ => Err(syn::Error::new(
            method.sig.span(),
            "exception handler methods take the exception and an ExceptionContext",
        )),
    }
}
