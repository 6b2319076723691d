//! Attribute parsing for the Record derive macro.
//!
//! This module provides parsers for the `#[datalist(...)]` container and
//! field attributes used by the `Record` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, ExprUnary, Lit, Meta, Result, Token, UnOp,
};

/// Case conversion applied to field names without an explicit rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `parent_id` becomes `ParentId`.
    PascalCase,
    /// `parent_id` becomes `parentId`.
    CamelCase,
    /// Field names are kept as written.
    SnakeCase,
}

impl RenameRule {
    pub fn from_str(s: &str, span: Span) -> Result<Self> {
        match s {
            "PascalCase" => Ok(RenameRule::PascalCase),
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" => Ok(RenameRule::SnakeCase),
            other => Err(Error::new(
                span,
                format!(
                    "unknown rename rule: '{}'. Expected one of: PascalCase, camelCase, snake_case",
                    other
                ),
            )),
        }
    }

    pub fn apply(self, field: &str) -> String {
        match self {
            RenameRule::SnakeCase => field.to_string(),
            RenameRule::PascalCase => to_pascal_case(field),
            RenameRule::CamelCase => {
                let pascal = to_pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
        }
    }
}

fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Container-level attributes from `#[datalist(...)]` on the struct.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    /// Entity name used in error messages (default: struct name).
    pub entity: Option<String>,
    pub rename_all: Option<RenameRule>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("entity") => {
                    attr.entity = Some(lit_str(&nv.value, "entity")?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                    let rule = lit_str(&nv.value, "rename_all")?;
                    attr.rename_all = Some(RenameRule::from_str(&rule, nv.value.span())?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown datalist container attribute. Expected: entity = \"...\" or rename_all = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Column options from `#[datalist(column(...))]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAttr {
    pub position: i32,
    pub header: Option<String>,
    pub hidden: bool,
    pub filterable: bool,
    pub css_class: Option<String>,
    pub format: Option<String>,
}

impl Default for ColumnAttr {
    fn default() -> Self {
        ColumnAttr {
            position: 0,
            header: None,
            hidden: false,
            filterable: true,
            css_class: None,
            format: None,
        }
    }
}

impl ColumnAttr {
    fn parse_list(metas: Punctuated<Meta, Token![,]>) -> Result<Self> {
        let mut column = ColumnAttr::default();

        for meta in metas {
            match &meta {
                Meta::Path(p) if p.is_ident("hidden") => column.hidden = true,
                Meta::Path(p) if p.is_ident("filterable") => column.filterable = true,
                Meta::NameValue(nv) => {
                    let value = &nv.value;
                    if nv.path.is_ident("position") {
                        column.position = lit_i32(value)?;
                    } else if nv.path.is_ident("header") {
                        column.header = Some(lit_str(value, "header")?);
                    } else if nv.path.is_ident("hidden") {
                        column.hidden = lit_bool(value, "hidden")?;
                    } else if nv.path.is_ident("filterable") {
                        column.filterable = lit_bool(value, "filterable")?;
                    } else if nv.path.is_ident("css_class") {
                        column.css_class = Some(lit_str(value, "css_class")?);
                    } else if nv.path.is_ident("format") {
                        column.format = Some(lit_str(value, "format")?);
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown column option. Expected: position, header, hidden, filterable, css_class or format",
                        ));
                    }
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown column option. Expected: position = N, header = \"...\", hidden, filterable = bool, css_class = \"...\" or format = \"...\"",
                    ));
                }
            }
        }

        Ok(column)
    }
}

/// Field-level attributes from `#[datalist(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    /// Designates the record key.
    pub key: bool,
    /// Leave this field out of the schema.
    pub skip: bool,
    /// Custom field name (default: field name after `rename_all`).
    pub rename: Option<String>,
    /// Present when the field is a catalog column.
    pub column: Option<ColumnAttr>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            key: false,
            skip: false,
            rename: None,
            column: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr {
            span: input.span(),
            ..FieldAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("key") => attr.key = true,
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("column") => attr.column = Some(ColumnAttr::default()),
                Meta::List(list) if list.path.is_ident("column") => {
                    let metas = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
                    attr.column = Some(ColumnAttr::parse_list(metas)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(lit_str(&nv.value, "rename")?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown datalist attribute. Expected: key, skip, rename = \"...\", column or column(...)",
                    ));
                }
            }
        }

        if attr.skip && (attr.key || attr.column.is_some()) {
            return Err(Error::new(
                attr.span,
                "a skipped field cannot be a key or a column",
            ));
        }

        Ok(attr)
    }
}

fn lit_str(expr: &Expr, name: &str) -> Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        _ => Err(Error::new(
            expr.span(),
            format!("{} must be a string literal", name),
        )),
    }
}

fn lit_bool(expr: &Expr, name: &str) -> Result<bool> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Bool(b), ..
        }) => Ok(b.value),
        _ => Err(Error::new(
            expr.span(),
            format!("{} must be true or false", name),
        )),
    }
}

fn lit_i32(expr: &Expr) -> Result<i32> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(i), ..
        }) => i.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => lit_i32(expr).map(|n| -n),
        _ => Err(Error::new(
            expr.span(),
            "position must be an integer literal",
        )),
    }
}

/// Extract `#[datalist(...)]` attributes from the struct's attributes.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("datalist") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}

/// Extract `#[datalist(...)]` attributes from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("datalist") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_field(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    fn parse_container(tokens: &str) -> Result<ContainerAttr> {
        syn::parse_str::<ContainerAttr>(tokens)
    }

    #[test]
    fn test_key_and_rename() {
        let attr = parse_field(r#"key, rename = "Code""#).unwrap();
        assert!(attr.key);
        assert_eq!(attr.rename, Some("Code".to_string()));
        assert!(attr.column.is_none());
    }

    #[test]
    fn test_skip() {
        let attr = parse_field("skip").unwrap();
        assert!(attr.skip);
    }

    #[test]
    fn test_bare_column() {
        let attr = parse_field("column").unwrap();
        assert_eq!(attr.column, Some(ColumnAttr::default()));
    }

    #[test]
    fn test_column_options() {
        let attr = parse_field(
            r#"column(position = 8, header = "Value", filterable = false, css_class = "num", format = "{:.2}")"#,
        )
        .unwrap();
        let column = attr.column.unwrap();
        assert_eq!(column.position, 8);
        assert_eq!(column.header, Some("Value".to_string()));
        assert!(!column.filterable);
        assert!(!column.hidden);
        assert_eq!(column.css_class, Some("num".to_string()));
        assert_eq!(column.format, Some("{:.2}".to_string()));
    }

    #[test]
    fn test_column_hidden_and_negative_position() {
        let column = parse_field("column(hidden, position = -1)")
            .unwrap()
            .column
            .unwrap();
        assert!(column.hidden);
        assert_eq!(column.position, -1);
    }

    #[test]
    fn test_invalid_column_option() {
        let result = parse_field("column(width = 3)");
        assert!(result.unwrap_err().to_string().contains("unknown column option"));
    }

    #[test]
    fn test_skip_conflicts_with_key() {
        assert!(parse_field("skip, key").is_err());
    }

    #[test]
    fn test_invalid_field_attr() {
        let result = parse_field("searchable");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown datalist attribute"));
    }

    #[test]
    fn test_container_attrs() {
        let attr = parse_container(r#"entity = "TestModel", rename_all = "PascalCase""#).unwrap();
        assert_eq!(attr.entity, Some("TestModel".to_string()));
        assert_eq!(attr.rename_all, Some(RenameRule::PascalCase));
        assert!(parse_container(r#"rename_all = "kebab-case""#).is_err());
    }

    #[test]
    fn test_rename_rules() {
        assert_eq!(RenameRule::PascalCase.apply("parent_id"), "ParentId");
        assert_eq!(RenameRule::PascalCase.apply("id"), "Id");
        assert_eq!(RenameRule::CamelCase.apply("parent_id"), "parentId");
        assert_eq!(RenameRule::SnakeCase.apply("parent_id"), "parent_id");
    }
}
