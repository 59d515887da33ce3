//! Mirage: a ruled HTTP mock server for deterministic client tests.
//!
//! This crate provides:
//! - A declarative configuration model: endpoints (path patterns) group
//!   methods (HTTP verbs), which group ordered rules (predicate/response
//!   pairs).
//! - A resolution pipeline that walks endpoint -> method -> rule for each
//!   inbound request and degrades to a single default response whenever
//!   any stage fails to match.
//! - An embedded hyper server that runs the pipeline on a local port, with
//!   optional TLS, so test suites can point real HTTP clients at it.
//!
//! The configuration graph is built once, is immutable for the lifetime of
//! the server, and is safe to resolve against concurrently. The only mutable
//! state lives inside rules that opt into it (such as [`SequenceRule`]), and
//! each such rule owns its own synchronization.

pub mod resolver;
pub mod server;

pub use resolver::{
    respond_with, AlwaysRule, BodyMatchesRule, HeaderRule, JsonBodyRule, MockEndpoint, MockMethod,
    MockRequest, MockResponse, PredicateRule, QueryParamRule, ResolveError, Rule, SequenceRule,
    ServerConfig, DEFAULT_PORT,
};
pub use server::{LifecycleError, MockServer, TlsContext};
