//! Column format templates.
//!
//! A template is literal text with placeholders: `{}` renders the value in
//! its default text form, `{:spec}` applies a spec. `{{` and `}}` escape
//! braces.
//!
//! | Value | Spec | Example |
//! |-------|------|---------|
//! | Date, DateTime | chrono strftime | `{:%d/%m/%Y}` |
//! | Number, Decimal | `.N` fixed precision | `{:.2}` |
//!
//! Values of other types ignore the spec. A null value renders the
//! placeholder as empty text.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::RoundingStrategy;

use crate::value::{Number, Value};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{(?::([^{}]*))?\}|[{}]").expect("format token pattern is valid")
});

/// A parsed column format template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Literal(String),
    Value(Spec),
}

#[derive(Debug, Clone, PartialEq)]
enum Spec {
    Default,
    Strftime(String),
    Precision(usize),
}

impl Template {
    /// Parses a template, returning a short reason on failure.
    pub fn parse(source: &str) -> Result<Self, &'static str> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(source) {
            let Some(token) = caps.get(0) else { continue };
            literal.push_str(&source[last..token.start()]);
            last = token.end();

            match token.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                "{" | "}" => return Err("unbalanced brace"),
                _ => {
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    let spec = match caps.get(1) {
                        Some(spec) => parse_spec(spec.as_str())?,
                        None => Spec::Default,
                    };
                    parts.push(Part::Value(spec));
                }
            }
        }

        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Template {
            source: source.to_string(),
            parts,
        })
    }

    /// Returns the template text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders a value through the template.
    pub fn render(&self, value: &Value<'_>) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Value(spec) => render_value(&mut out, spec, value),
            }
        }
        out
    }
}

fn parse_spec(spec: &str) -> Result<Spec, &'static str> {
    if spec.is_empty() {
        return Ok(Spec::Default);
    }

    if let Some(digits) = spec.strip_prefix('.') {
        return digits
            .parse::<usize>()
            .map(Spec::Precision)
            .map_err(|_| "precision must be a number");
    }

    if spec.contains('%') {
        if StrftimeItems::new(spec).any(|item| matches!(item, Item::Error)) {
            return Err("invalid date format specifier");
        }
        return Ok(Spec::Strftime(spec.to_string()));
    }

    Err("unsupported format spec")
}

fn render_value(out: &mut String, spec: &Spec, value: &Value<'_>) {
    let start = out.len();
    let written = match (spec, value) {
        (_, Value::None) => Ok(()),
        (Spec::Strftime(fmt), Value::Date(d)) => write!(out, "{}", d.format(fmt)),
        (Spec::Strftime(fmt), Value::DateTime(dt)) => write!(out, "{}", dt.format(fmt)),
        (Spec::Precision(p), Value::Number(Number::F64(n))) => write!(out, "{:.*}", *p, n),
        (Spec::Precision(p), Value::Number(n)) => write!(out, "{:.*}", *p, n.to_f64()),
        (Spec::Precision(p), Value::Decimal(d)) => {
            let rounded =
                d.round_dp_with_strategy(*p as u32, RoundingStrategy::MidpointAwayFromZero);
            write!(out, "{:.*}", *p, rounded)
        }
        (_, other) => write!(out, "{}", other.to_text().unwrap_or_default()),
    };

    // Time specifiers applied to a plain date fail to format.
    if written.is_err() {
        out.truncate(start);
        out.push_str(&value.to_text().unwrap_or_default());
    }
}
