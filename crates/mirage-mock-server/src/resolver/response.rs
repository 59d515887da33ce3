//! Response value returned by the mock server.

use serde::{Deserialize, Serialize};

/// Immutable status/body pair sent back for a resolved request.
///
/// Equality is by value, so tests can assert directly against the response
/// they configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body; empty by default.
    #[serde(default)]
    pub body: String,
}

impl MockResponse {
    /// Response with the given status and an empty body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    /// Response with the given status and body.
    pub fn with_body(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
