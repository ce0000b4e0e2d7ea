//! Derive macro for `tabula_core::Record`.
//!
//! `#[derive(Record)]` generates the field table of a struct with named
//! fields: one entry per visible (`pub`, `pub(crate)`, ...) field, in
//! declaration order, whose getter converts the field with
//! `tabula_core::ToValue`.
//!
//! Field attributes:
//! - `#[record(rename = "Name")]` exposes the field under another name.
//! - `#[record(skip)]` leaves a visible field out of the table.
//! - `#[record(include)]` adds a private field to the table.
//!
//! Container attribute:
//! - `#[record(mappable)]` routes every lookup through the type's
//!   `tabula_core::Mappable` implementation.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Error, Fields, LitStr,
    Visibility,
};

/// Implement `tabula_core::Record` for a struct with named fields.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[derive(Default)]
struct FieldOptions {
    rename: Option<LitStr>,
    skip: bool,
    include: bool,
}

fn field_options(attrs: &[Attribute]) -> Result<FieldOptions, Error> {
    let mut options = FieldOptions::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                options.rename = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("include") {
                options.include = true;
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute, expected `rename`, `skip` or `include`"))
            }
        })?;
    }
    if options.skip && (options.include || options.rename.is_some()) {
        return Err(Error::new(
            attrs[0].span(),
            "`skip` cannot be combined with `rename` or `include`",
        ));
    }
    Ok(options)
}

fn is_mappable(attrs: &[Attribute]) -> Result<bool, Error> {
    let mut mappable = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("mappable") {
                mappable = true;
                Ok(())
            } else {
                Err(meta.error("unsupported container attribute, expected `mappable`"))
            }
        })?;
    }
    Ok(mappable)
}

fn expand_record(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new(
                    other.span(),
                    "#[derive(Record)] requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.ident.span(),
                "#[derive(Record)] only supports structs",
            ))
        }
    };

    let mut descriptors = Vec::new();
    for field in fields {
        let options = field_options(&field.attrs)?;
        let visible = !matches!(field.vis, Visibility::Inherited);
        if options.skip || !(visible || options.include) {
            continue;
        }

        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected a named field"))?;
        let name = match options.rename {
            Some(lit) => lit.value(),
            None => ident.to_string().trim_start_matches("r#").to_string(),
        };

        descriptors.push(quote! {
            ::tabula_core::FieldDescriptor::new(
                #name,
                |record: &Self| ::tabula_core::ToValue::to_value(&record.#ident),
            )
        });
    }

    let mapping = if is_mappable(&input.attrs)? {
        quote! {
            fn as_mappable(&self) -> ::core::option::Option<&dyn ::tabula_core::Mappable> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tabula_core::Record for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::tabula_core::FieldDescriptor<Self>> {
                ::std::vec![#(#descriptors),*]
            }

            #mapping
        }
    })
}
