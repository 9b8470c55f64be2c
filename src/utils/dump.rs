//! Display formatting for RDF resources and literals.

use htmlescape::encode_minimal;

use super::namespace::{self, Namespaces};

// == Literal ==
/// A literal value with optional language tag or datatype.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Literal {
    pub value: String,
    pub lang: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// == Dump Resource ==
/// Formats a resource URI for display.
///
/// Plain mode returns the `prefix:local` form when one exists, otherwise the
/// URI. HTML mode wraps it in a coloured link; blank nodes (`_:` URIs) link
/// to an in-page anchor.
pub fn dump_resource_value(uri: &str, html: bool, color: &str) -> String {
    dump_resource_value_with(namespace::default_namespaces(), uri, html, color)
}

/// [`dump_resource_value`] against a caller-supplied prefix table.
pub fn dump_resource_value_with(
    namespaces: &Namespaces,
    uri: &str,
    html: bool,
    color: &str,
) -> String {
    let short = namespaces.shorten(uri);
    if !html {
        return short.unwrap_or_else(|| uri.to_string());
    }

    let escaped = encode_minimal(uri);
    let href = if uri.starts_with("_:") {
        format!("#{}", escaped)
    } else {
        escaped.clone()
    };
    let text = short.unwrap_or(escaped);
    format!(
        "<a href='{}' style='text-decoration:none;color:{}'>{}</a>",
        href, color, text
    )
}

// == Dump Literal ==
/// Formats a literal as `"value"@lang^^datatype`.
///
/// The datatype is shortened when a prefix matches. HTML mode escapes the
/// text and wraps it in a coloured span. Apostrophes are escaped too, since
/// attributes are single-quoted; non-ASCII text is left as UTF-8.
pub fn dump_literal_value(literal: &Literal, html: bool, color: &str) -> String {
    let mut text = format!("\"{}\"", literal.value);
    if let Some(lang) = &literal.lang {
        text.push('@');
        text.push_str(lang);
    }
    if let Some(datatype) = &literal.datatype {
        text.push_str("^^");
        text.push_str(&namespace::shorten(datatype).unwrap_or_else(|| datatype.clone()));
    }

    if html {
        format!("<span style='color:{}'>{}</span>", color, encode_minimal(&text))
    } else {
        text
    }
}
