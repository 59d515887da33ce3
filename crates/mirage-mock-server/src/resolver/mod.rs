//! The request-resolution core.
//!
//! Resolution is a pure, synchronous walk over the static configuration
//! graph: match the query-stripped path against each endpoint pattern in
//! declaration order, look up the request's verb on the matched endpoint,
//! then scan that method's rules until one accepts. Every stage reports a
//! typed [`ResolveError`]; [`ServerConfig::resolve`] is the single point
//! that converts any of them into the configured default response.

mod config;
mod endpoint;
mod error;
mod method;
mod request;
mod response;
mod rule;

#[cfg(test)]
mod tests;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use endpoint::MockEndpoint;
pub use error::ResolveError;
pub use method::MockMethod;
pub use request::MockRequest;
pub use response::MockResponse;
pub use rule::{
    respond_with, AlwaysRule, BodyMatchesRule, HeaderRule, JsonBodyRule, PredicateRule,
    QueryParamRule, Rule, SequenceRule,
};
