use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse2, spanned::Spanned, Data, DeriveInput, Result, Type};

pub fn derive_store(input: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let Data::Struct(data) = &input.data else {
        bail!(
            input.ident.span(),
            "`#[derive(Store)]` is supported only for structs"
        );
    };
    let mut core_field = None;
    for (index, field) in data.fields.iter().enumerate() {
        if !is_store_core(&field.ty) {
            continue;
        }
        if core_field.is_some() {
            bail!(
                field.span(),
                "`#[derive(Store)]` requires exactly one `StoreCore` field, found more than one"
            );
        }
        core_field = Some(match &field.ident {
            Some(ident) => quote!(#ident),
            None => {
                let index = syn::Index::from(index);
                quote!(#index)
            }
        });
    }
    let Some(core_field) = core_field else {
        bail!(
            input.ident.span(),
            "`#[derive(Store)]` requires a field of type `StoreCore`"
        );
    };
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::fluxion::Store for #name #ty_generics #where_clause {
            fn core(&self) -> &::fluxion::StoreCore {
                &self.#core_field
            }
        }
    })
}

fn is_store_core(ty: &Type) -> bool {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            return segment.ident == "StoreCore" && segment.arguments.is_none();
        }
    }
    false
}
