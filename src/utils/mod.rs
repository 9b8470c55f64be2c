//! Utilities Module
//!
//! Stateless string helpers: CamelCase conversion, JSON map detection,
//! MIME-type parsing and display formatting for RDF terms.

mod casing;
mod dump;
mod mime;
mod namespace;

pub use casing::{camelise, is_associative};
pub use dump::{dump_literal_value, dump_resource_value, dump_resource_value_with, Literal};
pub use mime::parse_mime_type;
pub use namespace::{default_namespaces, shorten, Namespaces};
