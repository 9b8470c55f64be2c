//! MIME type parsing.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_]+)\s*=\s*(.+?)\s*$").expect("parameter pattern is valid")
});

// == Parse Mime Type ==
/// Splits a MIME type into its lower-cased type and its parameters.
///
/// Parameters that do not look like `name=value` are skipped; a repeated
/// name keeps the last value.
///
/// ```
/// use kvstash::utils::parse_mime_type;
///
/// let (mime, params) = parse_mime_type("Text/HTML; charset=UTF-8");
/// assert_eq!(mime, "text/html");
/// assert_eq!(params["charset"], "utf-8");
/// ```
pub fn parse_mime_type(input: &str) -> (String, BTreeMap<String, String>) {
    let lower = input.to_lowercase();
    let mut parts = lower.split(';');
    let mime = parts.next().unwrap_or_default().trim().to_string();

    let params = parts
        .filter_map(|part| PARAMETER.captures(part))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();

    (mime, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_type() {
        let (mime, params) = parse_mime_type("application/rdf+xml");
        assert_eq!(mime, "application/rdf+xml");
        assert!(params.is_empty());
    }

    #[test]
    fn test_type_with_parameters() {
        let (mime, params) = parse_mime_type(" Text/Turtle ;Charset = UTF-8; q=0.9 ");
        assert_eq!(mime, "text/turtle");
        assert_eq!(params.len(), 2);
        assert_eq!(params["charset"], "utf-8");
        assert_eq!(params["q"], "0.9");
    }

    #[test]
    fn test_malformed_parameters_are_skipped() {
        let (mime, params) = parse_mime_type("text/plain; novalue; =x; ok=1");
        assert_eq!(mime, "text/plain");
        assert_eq!(params.len(), 1);
        assert_eq!(params["ok"], "1");
    }

    #[test]
    fn test_repeated_parameter_last_wins() {
        let (_, params) = parse_mime_type("text/plain; a=1; A=2");
        assert_eq!(params["a"], "2");
    }

    #[test]
    fn test_empty_input() {
        let (mime, params) = parse_mime_type("");
        assert_eq!(mime, "");
        assert!(params.is_empty());
    }
}
