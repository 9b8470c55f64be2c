//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    /// Backend-specific key rules are checked by the backend itself.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

/// Query string for GET /get and GET /contains
///
/// `max_age` is in seconds; 0 (the default) accepts any age.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MaxAgeQuery {
    #[serde(default)]
    pub max_age: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: "test".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "graphs/foaf.rdf".to_string(),
            value: "test".to_string(),
        };
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_max_age_defaults_to_zero() {
        let query: MaxAgeQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.max_age, 0);

        let query: MaxAgeQuery = serde_json::from_str(r#"{"max_age": 30}"#).unwrap();
        assert_eq!(query.max_age, 30);
    }
}
