//! Rules: the atomic unit of mocked behavior.
//!
//! A rule pairs a predicate over the inbound request with the response to
//! return when the predicate accepts. Endpoint authors compose arbitrary
//! mock behavior by ordering rules; the dispatch pipeline never needs to
//! know what a predicate looks at.

use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::request::MockRequest;
use super::response::MockResponse;

/// Predicate/response pair evaluated by [`super::MockMethod::resolve`].
///
/// Implementations must be safe to call concurrently: the server evaluates
/// rules from multiple connection tasks with no serialization guarantee.
/// Stateless rules return the same response on every call; rules that keep
/// internal state (like [`SequenceRule`]) own their own synchronization and
/// may advance it in [`Rule::response`].
pub trait Rule: Send + Sync {
    /// Whether this rule should handle the request.
    fn applies(&self, request: &MockRequest) -> bool;

    /// The response this rule returns for a request it accepted.
    fn response(&self) -> MockResponse;
}

/// Rule that accepts every request. Typically declared last as a catch-all.
pub struct AlwaysRule {
    response: MockResponse,
}

impl AlwaysRule {
    pub fn new(response: MockResponse) -> Self {
        Self { response }
    }
}

impl Rule for AlwaysRule {
    fn applies(&self, _request: &MockRequest) -> bool {
        true
    }

    fn response(&self) -> MockResponse {
        self.response.clone()
    }
}

/// Shorthand for the common "always return this" rule, boxed for direct use
/// in a method's rule list.
pub fn respond_with(response: MockResponse) -> Box<dyn Rule> {
    Box::new(AlwaysRule::new(response))
}

/// Rule driven by an arbitrary caller-supplied predicate closure.
pub struct PredicateRule {
    predicate: Box<dyn Fn(&MockRequest) -> bool + Send + Sync>,
    response: MockResponse,
}

impl PredicateRule {
    pub fn new(
        predicate: impl Fn(&MockRequest) -> bool + Send + Sync + 'static,
        response: MockResponse,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            response,
        }
    }
}

impl Rule for PredicateRule {
    fn applies(&self, request: &MockRequest) -> bool {
        (self.predicate)(request)
    }

    fn response(&self) -> MockResponse {
        self.response.clone()
    }
}

/// Rule that accepts when a header equals the expected value. Header name
/// lookup is case-insensitive; the value comparison is exact.
pub struct HeaderRule {
    name: String,
    value: String,
    response: MockResponse,
}

impl HeaderRule {
    pub fn new(name: impl Into<String>, value: impl Into<String>, response: MockResponse) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            response,
        }
    }
}

impl Rule for HeaderRule {
    fn applies(&self, request: &MockRequest) -> bool {
        request.header(&self.name) == Some(self.value.as_str())
    }

    fn response(&self) -> MockResponse {
        self.response.clone()
    }
}

/// Rule that accepts when a (decoded) query parameter equals the expected
/// value.
pub struct QueryParamRule {
    name: String,
    value: String,
    response: MockResponse,
}

impl QueryParamRule {
    pub fn new(name: impl Into<String>, value: impl Into<String>, response: MockResponse) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            response,
        }
    }
}

impl Rule for QueryParamRule {
    fn applies(&self, request: &MockRequest) -> bool {
        request.query_param(&self.name) == Some(self.value.as_str())
    }

    fn response(&self) -> MockResponse {
        self.response.clone()
    }
}

/// Rule that accepts when the request body matches a regular expression.
pub struct BodyMatchesRule {
    pattern: Regex,
    response: MockResponse,
}

impl BodyMatchesRule {
    pub fn new(pattern: Regex, response: MockResponse) -> Self {
        Self { pattern, response }
    }
}

impl Rule for BodyMatchesRule {
    fn applies(&self, request: &MockRequest) -> bool {
        self.pattern.is_match(request.body())
    }

    fn response(&self) -> MockResponse {
        self.response.clone()
    }
}

/// Rule that accepts when the request body parses as JSON structurally equal
/// to the expected value (key order and whitespace do not matter).
pub struct JsonBodyRule {
    expected: serde_json::Value,
    response: MockResponse,
}

impl JsonBodyRule {
    pub fn new(expected: serde_json::Value, response: MockResponse) -> Self {
        Self { expected, response }
    }
}

impl Rule for JsonBodyRule {
    fn applies(&self, request: &MockRequest) -> bool {
        serde_json::from_str::<serde_json::Value>(request.body())
            .map(|parsed| parsed == self.expected)
            .unwrap_or(false)
    }

    fn response(&self) -> MockResponse {
        self.response.clone()
    }
}

/// Call-counter rule: returns its responses in declaration order, one per
/// resolved request, then repeats the last one forever. Useful for "first
/// call returns X, subsequent calls return Y" scenarios.
///
/// The counter is atomic, so concurrent requests each consume a distinct
/// position in the sequence.
pub struct SequenceRule {
    responses: Vec<MockResponse>,
    cursor: AtomicUsize,
}

impl SequenceRule {
    /// Sequence starting with `first`; chain [`SequenceRule::then`] to add
    /// later responses.
    pub fn new(first: MockResponse) -> Self {
        Self {
            responses: vec![first],
            cursor: AtomicUsize::new(0),
        }
    }

    /// Append the response returned after the ones already declared.
    pub fn then(mut self, next: MockResponse) -> Self {
        self.responses.push(next);
        self
    }
}

impl Rule for SequenceRule {
    fn applies(&self, _request: &MockRequest) -> bool {
        true
    }

    fn response(&self) -> MockResponse {
        // `responses` is non-empty by construction.
        let position = self.cursor.fetch_add(1, Ordering::SeqCst);
        let index = position.min(self.responses.len() - 1);
        self.responses[index].clone()
    }
}
