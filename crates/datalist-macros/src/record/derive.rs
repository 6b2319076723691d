//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates an implementation of the `Record` trait, a static
//! field schema, the declared column catalog and field name constants.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_field_attrs, ColumnAttr};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;
    let entity = container
        .entity
        .unwrap_or_else(|| struct_name.to_string());

    let mut field_defs: Vec<TokenStream> = Vec::new();
    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut columns: Vec<TokenStream> = Vec::new();
    let mut key_span = None;

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;

        // Skip if marked with #[datalist(skip)]
        if attrs.skip {
            continue;
        }

        if attrs.key {
            if key_span.is_some() {
                return Err(Error::new(
                    field.span(),
                    "only one field can be marked #[datalist(key)]",
                ));
            }
            key_span = Some(field.span());
        }

        // Determine the record field name
        let ident = field_name.to_string();
        let ident = ident.trim_start_matches("r#");
        let record_name = match (attrs.rename, container.rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply(ident),
            (None, None) => ident.to_string(),
        };

        let const_name = format_ident!("{}", to_screaming_snake_case(&record_name));
        field_constants.push(quote! {
            /// Field name constant for requests and catalogs.
            pub const #const_name: &'static str = #record_name;
        });

        let ty = &field.ty;
        let key = attrs.key;
        field_defs.push(quote! {
            ::datalist::FieldDef {
                name: #record_name,
                kind: <#ty as ::datalist::FieldType>::KIND,
                key: #key,
            },
        });

        field_matches.push(quote! {
            #record_name => ::datalist::FieldType::to_value(&self.#field_name),
        });

        if let Some(column) = &attrs.column {
            columns.push(column_expr(&record_name, column));
        }
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::datalist::Record for #struct_name {
            fn entity_name() -> &'static str {
                #entity
            }

            fn fields() -> &'static [::datalist::FieldDef] {
                const FIELDS: &[::datalist::FieldDef] = &[
                    #(#field_defs)*
                ];
                FIELDS
            }

            fn field_value(&self, field: &str) -> ::datalist::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::datalist::Value::None,
                }
            }

            fn columns() -> ::std::vec::Vec<::datalist::Column> {
                ::std::vec![
                    #(#columns),*
                ]
            }
        }
    };

    Ok(expanded)
}

fn column_expr(key: &str, column: &ColumnAttr) -> TokenStream {
    let mut expr = quote! { ::datalist::Column::new(#key) };

    if let Some(header) = &column.header {
        expr = quote! { #expr.header(#header) };
    }
    if column.hidden {
        expr = quote! { #expr.hidden(true) };
    }
    if !column.filterable {
        expr = quote! { #expr.filterable(false) };
    }
    if let Some(css_class) = &column.css_class {
        expr = quote! { #expr.css_class(#css_class) };
    }
    if let Some(format) = &column.format {
        expr = quote! { #expr.format(#format) };
    }
    if column.position != 0 {
        let position = column.position;
        expr = quote! { #expr.position(#position) };
    }

    expr
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
