//! String casing helpers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Runs of anything that is not an ASCII letter or digit (underscore included)
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern is valid")
});

// == Camelise ==
/// Converts a string into CamelCase.
///
/// Every run of non-alphanumeric characters starts a new word; each word is
/// lower-cased and then given an upper-case first letter.
///
/// ```
/// use kvstash::utils::camelise;
///
/// assert_eq!(camelise("hello world"), "HelloWorld");
/// assert_eq!(camelise("rss-tag-soup"), "RssTagSoup");
/// assert_eq!(camelise("FOO//BAR"), "FooBar");
/// ```
pub fn camelise(input: &str) -> String {
    SEPARATORS
        .split(input)
        .map(capitalise)
        .collect()
}

fn capitalise(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

// == Is Associative ==
/// Checks whether a JSON value is a keyed map rather than a list.
///
/// Only the first key is inspected: an object whose first key is `"0"` is
/// treated as a list that happened to be encoded as an object.
pub fn is_associative(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.keys().next().map_or(true, |key| key != "0"),
        _ => false,
    }
}
