//! A mocked HTTP verb and its ordered rule list.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::error::ResolveError;
use super::request::MockRequest;
use super::response::MockResponse;
use super::rule::Rule;

/// HTTP verb bound to an ordered list of rules.
///
/// Order is significant: the first rule whose predicate accepts the request
/// wins, ties broken by declaration order rather than specificity.
pub struct MockMethod {
    name: String,
    rules: Vec<Box<dyn Rule>>,
}

impl MockMethod {
    /// Method with an arbitrary verb name. Matching against the request
    /// method token is exact and case-sensitive.
    pub fn new(name: impl Into<String>, rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn get(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("GET", rules)
    }

    pub fn post(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("POST", rules)
    }

    pub fn put(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("PUT", rules)
    }

    pub fn delete(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("DELETE", rules)
    }

    pub fn patch(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("PATCH", rules)
    }

    pub fn head(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("HEAD", rules)
    }

    pub fn options(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("OPTIONS", rules)
    }

    pub fn trace(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new("TRACE", rules)
    }

    /// Verb name this method answers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scan the rules in order and return the first accepting rule's
    /// response. A panic inside a caller-supplied predicate is contained
    /// here and reported as [`ResolveError::PredicateFailure`] so one broken
    /// rule cannot take down the connection task.
    pub fn resolve(&self, request: &MockRequest) -> Result<MockResponse, ResolveError> {
        for rule in &self.rules {
            match catch_unwind(AssertUnwindSafe(|| rule.applies(request))) {
                Ok(true) => return Ok(rule.response()),
                Ok(false) => continue,
                Err(_) => return Err(ResolveError::PredicateFailure(self.name.clone())),
            }
        }
        Err(ResolveError::NoRuleMatched(self.name.clone()))
    }
}
