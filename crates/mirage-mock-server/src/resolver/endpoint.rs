//! A configured path pattern and the methods mocked at that path.

use regex::Regex;

use super::error::ResolveError;
use super::method::MockMethod;
use super::request::MockRequest;
use super::response::MockResponse;

/// Path pattern bound to an ordered list of methods.
pub struct MockEndpoint {
    path: Regex,
    methods: Vec<MockMethod>,
}

impl MockEndpoint {
    /// Endpoint matching the given path pattern.
    ///
    /// The pattern is anchored on both ends, so the whole query-stripped
    /// request path must satisfy it: `ping` does not match `/ping`, and
    /// `^/items/[0-9]+$` behaves the same whether or not the author wrote
    /// the anchors.
    pub fn new(path: Regex, methods: Vec<MockMethod>) -> Self {
        // Wrapping a valid pattern in a non-capturing group stays valid, so
        // the fallback arm is unreachable in practice.
        let anchored =
            Regex::new(&format!(r"\A(?:{})\z", path.as_str())).unwrap_or(path);
        Self {
            path: anchored,
            methods,
        }
    }

    /// Whether this endpoint's pattern matches the whole stripped path.
    pub fn matches_path(&self, path: &str) -> bool {
        self.path.is_match(path)
    }

    /// Look up the method whose name exactly equals the request's verb and
    /// delegate to it.
    pub fn resolve(&self, request: &MockRequest) -> Result<MockResponse, ResolveError> {
        let method = self
            .methods
            .iter()
            .find(|method| method.name() == request.method())
            .ok_or_else(|| ResolveError::NoMethodMatched(request.method().to_string()))?;
        method.resolve(request)
    }
}
