//! Typed resolution failures.

/// Why a resolution stage failed to produce a response.
///
/// All variants are converted to the configured default response at the
/// single top-level entry point ([`super::ServerConfig::resolve`]); callers
/// of the server never observe them on the wire.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no endpoint pattern matches path '{0}'")]
    NoEndpointMatched(String),
    #[error("matched endpoint has no method named '{0}'")]
    NoMethodMatched(String),
    #[error("no rule applies on method '{0}'")]
    NoRuleMatched(String),
    #[error("rule predicate panicked on method '{0}'")]
    PredicateFailure(String),
}
