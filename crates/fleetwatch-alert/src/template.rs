//! Message templates with `{name}` placeholders.
//!
//! A placeholder resolves, in order, against the numbers a rule supplies,
//! the counters of the current snapshot, then the texts it supplies. An
//! optional format suffix controls rendering of numbers:
//!
//! | placeholder      | output                              |
//! |------------------|-------------------------------------|
//! | `{x}`            | whole numbers bare, else 2 decimals |
//! | `{x:.1}`         | fixed decimals                      |
//! | `{x:grouped}`    | thousands separators                |
//! | `{x:int}`        | rounded to an integer               |
//! | `{s}`            | `"s"` unless the plural value is 1  |
//!
//! Unresolved placeholders are left in the output unchanged.

use fleetwatch_common::format::{format_fixed, format_grouped, format_int, format_plain};
use fleetwatch_common::types::MetricsSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, vars: &Vars<'_>) -> String {
        let src = self.0.as_str();
        let mut out = String::with_capacity(src.len() + 16);
        let mut rest = src;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            let token = &after[..close];
            match vars.resolve(token) {
                Some(text) => out.push_str(&text),
                None => {
                    out.push('{');
                    out.push_str(token);
                    out.push('}');
                }
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Values available to a template while rendering.
#[derive(Debug, Clone, Default)]
pub struct Vars<'a> {
    numbers: Vec<(String, f64)>,
    texts: Vec<(String, String)>,
    snapshot: Option<&'a MetricsSnapshot>,
    plural_on: Option<f64>,
}

impl<'a> Vars<'a> {
    pub fn new(snapshot: &'a MetricsSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn number(mut self, name: &str, value: f64) -> Self {
        self.numbers.push((name.to_string(), value));
        self
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.texts.push((name.to_string(), value.into()));
        self
    }

    /// Sets the quantity `{s}` pluralizes against.
    pub fn plural_on(mut self, value: f64) -> Self {
        self.plural_on = Some(value);
        self
    }

    fn lookup_number(&self, name: &str) -> Option<f64> {
        self.numbers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .or_else(|| self.snapshot.and_then(|s| s.counter(name)))
    }

    fn resolve(&self, token: &str) -> Option<String> {
        let (name, style) = match token.split_once(':') {
            Some((name, style)) => (name, Some(style)),
            None => (token, None),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }

        if name == "s" && style.is_none() {
            let n = self.plural_on?;
            return Some(if n == 1.0 { String::new() } else { "s".to_string() });
        }

        if let Some(value) = self.lookup_number(name) {
            return format_number(value, style);
        }

        if style.is_none() {
            return self
                .texts
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone());
        }
        None
    }
}

fn format_number(value: f64, style: Option<&str>) -> Option<String> {
    match style {
        None => Some(format_plain(value)),
        Some("grouped") => Some(format_grouped(value)),
        Some("int") => Some(format_int(value)),
        Some(style) => {
            let decimals: usize = style.strip_prefix('.')?.parse().ok()?;
            Some(format_fixed(value, decimals))
        }
    }
}
