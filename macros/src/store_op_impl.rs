use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse2, Data, DeriveInput, Fields, Result};

pub fn derive_store_op(input: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let Data::Enum(data) = &input.data else {
        bail!(
            input.ident.span(),
            "`#[derive(StoreOp)]` is supported only for enums"
        );
    };
    if data.variants.is_empty() {
        bail!(
            input.ident.span(),
            "`#[derive(StoreOp)]` requires at least one operation variant"
        );
    }
    let name = &input.ident;
    let mut id_arms = Vec::new();
    let mut args_arms = Vec::new();
    for variant in &data.variants {
        let variant_ident = &variant.ident;
        let op_name = to_snake_case(&variant_ident.to_string());
        match &variant.fields {
            Fields::Unit => {
                id_arms.push(quote! {
                    #name::#variant_ident => ::fluxion::OpId::new(#op_name),
                });
                args_arms.push(quote! {
                    #name::#variant_ident => ::std::vec::Vec::new(),
                });
            }
            Fields::Named(fields) => {
                let idents: Vec<_> = fields
                    .named
                    .iter()
                    .map(|f| f.ident.clone().expect("named field"))
                    .collect();
                id_arms.push(quote! {
                    #name::#variant_ident { .. } => ::fluxion::OpId::new(#op_name),
                });
                args_arms.push(quote! {
                    #name::#variant_ident { #(#idents),* } => ::std::vec![
                        #(::fluxion::ArgValue::new(::std::clone::Clone::clone(#idents))),*
                    ],
                });
            }
            Fields::Unnamed(fields) => {
                let binds: Vec<_> = (0..fields.unnamed.len())
                    .map(|i| format_ident!("field_{}", i))
                    .collect();
                id_arms.push(quote! {
                    #name::#variant_ident(..) => ::fluxion::OpId::new(#op_name),
                });
                args_arms.push(quote! {
                    #name::#variant_ident(#(#binds),*) => ::std::vec![
                        #(::fluxion::ArgValue::new(::std::clone::Clone::clone(#binds))),*
                    ],
                });
            }
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::fluxion::StoreOp for #name #ty_generics #where_clause {
            fn id(&self) -> ::fluxion::OpId {
                match self {
                    #(#id_arms)*
                }
            }
            fn arguments(&self) -> ::std::vec::Vec<::fluxion::ArgValue> {
                match self {
                    #(#args_arms)*
                }
            }
        }
    })
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::new();
    let mut prev_upper = true;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !prev_upper {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_upper = true;
        } else {
            out.push(c);
            prev_upper = false;
        }
    }
    out
}
