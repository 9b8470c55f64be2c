//! Prefix table for compacting RDF URIs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// A local name that can follow `prefix:`
static LOCAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][\-A-Za-z0-9_]*$").expect("local name pattern is valid")
});

static DEFAULT_NAMESPACES: LazyLock<Namespaces> = LazyLock::new(Namespaces::default);

const WELL_KNOWN: &[(&str, &str)] = &[
    ("bibo", "http://purl.org/ontology/bibo/"),
    ("cc", "http://creativecommons.org/ns#"),
    ("dc", "http://purl.org/dc/terms/"),
    ("dc11", "http://purl.org/dc/elements/1.1/"),
    ("doap", "http://usefulinc.com/ns/doap#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("geo", "http://www.w3.org/2003/01/geo/wgs84_pos#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("rss", "http://purl.org/rss/1.0/"),
    ("sioc", "http://rdfs.org/sioc/ns#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("xhtml", "http://www.w3.org/1999/xhtml/vocab#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

// == Namespaces ==
/// Prefix -> namespace URI table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    prefixes: BTreeMap<String, String>,
}

impl Namespaces {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) a prefix. Prefixes are lower-cased.
    pub fn add(&mut self, prefix: &str, uri: impl Into<String>) {
        self.prefixes.insert(prefix.to_lowercase(), uri.into());
    }

    /// Namespace URI for `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(&prefix.to_lowercase()).map(String::as_str)
    }

    // == Shorten ==
    /// Compacts `uri` to `prefix:local`.
    ///
    /// The longest matching namespace is used. Returns `None` when no
    /// namespace matches or the remainder is not a valid local name.
    pub fn shorten(&self, uri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter_map(|(prefix, ns)| uri.strip_prefix(ns.as_str()).map(|local| (prefix, ns, local)))
            .max_by_key(|(_, ns, _)| ns.len())
            .filter(|(_, _, local)| LOCAL_NAME.is_match(local))
            .map(|(prefix, _, local)| format!("{}:{}", prefix, local))
    }

    /// Expands `prefix:local` back to a full URI.
    pub fn expand(&self, short: &str) -> Option<String> {
        let (prefix, local) = short.split_once(':')?;
        self.get(prefix).map(|ns| format!("{}{}", ns, local))
    }
}

impl Default for Namespaces {
    /// The well-known RDF vocabularies.
    fn default() -> Self {
        let mut namespaces = Self::empty();
        for (prefix, uri) in WELL_KNOWN {
            namespaces.add(prefix, *uri);
        }
        namespaces
    }
}

/// The shared table of well-known prefixes.
pub fn default_namespaces() -> &'static Namespaces {
    &DEFAULT_NAMESPACES
}

/// Shortens `uri` using the default prefix table.
pub fn shorten(uri: &str) -> Option<String> {
    DEFAULT_NAMESPACES.shorten(uri)
}
