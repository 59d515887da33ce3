//! Tests for the resolution pipeline.
//!
//! Covers:
//! - Fallback to the default response at every resolution stage
//! - First-match-wins ordering over endpoints, methods, and rules
//! - Query stripping and whole-string path matching
//! - Built-in rule variants, including counter-based sequences
//! - Containment of panicking predicates

use super::*;
use regex::Regex;
use std::collections::HashMap;

fn request(method: &str, path_and_query: &str) -> MockRequest {
    MockRequest::new(method, path_and_query, HashMap::new(), "")
}

fn request_with_header(method: &str, path: &str, name: &str, value: &str) -> MockRequest {
    let mut headers = HashMap::new();
    headers.insert(name.to_string(), value.to_string());
    MockRequest::new(method, path, headers, "")
}

fn request_with_body(method: &str, path: &str, body: &str) -> MockRequest {
    MockRequest::new(method, path, HashMap::new(), body)
}

fn pattern(p: &str) -> Regex {
    Regex::new(p).unwrap()
}

/// The scenario from the ping smoke test: one endpoint, one GET rule.
fn ping_config() -> ServerConfig {
    ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/ping$"),
        vec![MockMethod::get(vec![respond_with(MockResponse::with_body(
            200, "pong",
        ))])],
    )])
}

#[test]
fn resolves_configured_rule() {
    let config = ping_config();
    let resolved = config.resolve(&request("GET", "/ping"));
    assert_eq!(resolved, MockResponse::with_body(200, "pong"));
}

#[test]
fn unmatched_path_falls_back_to_default() {
    let config = ping_config();
    assert_eq!(config.resolve(&request("GET", "/missing")), MockResponse::new(502));
}

#[test]
fn unmatched_method_falls_back_to_default() {
    let config = ping_config();
    assert_eq!(config.resolve(&request("POST", "/ping")), MockResponse::new(502));
}

#[test]
fn unmatched_rule_falls_back_to_default() {
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/gated$"),
        vec![MockMethod::get(vec![Box::new(HeaderRule::new(
            "Authorization",
            "token",
            MockResponse::new(200),
        ))])],
    )]);
    assert_eq!(config.resolve(&request("GET", "/gated")), MockResponse::new(502));
}

#[test]
fn typed_errors_name_the_failing_stage() {
    let config = ping_config();
    assert!(matches!(
        config.try_resolve(&request("GET", "/missing")),
        Err(ResolveError::NoEndpointMatched(_))
    ));
    assert!(matches!(
        config.try_resolve(&request("POST", "/ping")),
        Err(ResolveError::NoMethodMatched(_))
    ));

    let gated = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/gated$"),
        vec![MockMethod::get(vec![Box::new(PredicateRule::new(
            |_| false,
            MockResponse::new(200),
        ))])],
    )]);
    assert!(matches!(
        gated.try_resolve(&request("GET", "/gated")),
        Err(ResolveError::NoRuleMatched(_))
    ));
}

#[test]
fn custom_default_response_is_returned_verbatim() {
    let config = ServerConfig::new(Vec::new())
        .with_default_response(MockResponse::with_body(599, "nothing here"));
    assert_eq!(
        config.resolve(&request("GET", "/anything")),
        MockResponse::with_body(599, "nothing here")
    );
}

#[test]
fn first_matching_rule_wins() {
    // Both rules accept every request; declaration order must decide.
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/dup$"),
        vec![MockMethod::get(vec![
            respond_with(MockResponse::with_body(200, "first")),
            respond_with(MockResponse::with_body(200, "second")),
        ])],
    )]);
    assert_eq!(
        config.resolve(&request("GET", "/dup")),
        MockResponse::with_body(200, "first")
    );
}

#[test]
fn first_matching_endpoint_wins() {
    let config = ServerConfig::new(vec![
        MockEndpoint::new(
            pattern("^/items/[0-9]+$"),
            vec![MockMethod::get(vec![respond_with(MockResponse::with_body(
                200, "numeric",
            ))])],
        ),
        MockEndpoint::new(
            pattern("^/items/.*$"),
            vec![MockMethod::get(vec![respond_with(MockResponse::with_body(
                200, "any",
            ))])],
        ),
    ]);
    assert_eq!(
        config.resolve(&request("GET", "/items/5")),
        MockResponse::with_body(200, "numeric")
    );
    assert_eq!(
        config.resolve(&request("GET", "/items/abc")),
        MockResponse::with_body(200, "any")
    );
}

#[test]
fn query_string_never_affects_path_matching() {
    let config = ping_config();
    assert_eq!(
        config.resolve(&request("GET", "/ping?id=1&verbose=true")),
        MockResponse::with_body(200, "pong")
    );
    assert_eq!(
        config.resolve(&request("GET", "/ping")),
        config.resolve(&request("GET", "/ping?id=1"))
    );
}

#[test]
fn path_patterns_require_a_whole_string_match() {
    // Without explicit anchors the pattern still has to cover the whole
    // stripped path, mirroring Regex.matches semantics.
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("ping"),
        vec![MockMethod::get(vec![respond_with(MockResponse::new(200))])],
    )]);
    assert_eq!(config.resolve(&request("GET", "/ping")), MockResponse::new(502));
    assert_eq!(config.resolve(&request("GET", "ping")), MockResponse::new(200));
}

#[test]
fn method_lookup_is_case_sensitive() {
    let config = ping_config();
    assert_eq!(config.resolve(&request("get", "/ping")), MockResponse::new(502));
}

#[test]
fn repeated_requests_are_idempotent_over_stateless_rules() {
    let config = ping_config();
    let first = config.resolve(&request("GET", "/ping"));
    for _ in 0..10 {
        assert_eq!(config.resolve(&request("GET", "/ping")), first);
    }
}

#[test]
fn header_rule_dispatches_on_header_value() {
    // Endpoint ^/items/[0-9]+$ with a header-gated rule and a catch-all.
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/items/[0-9]+$"),
        vec![MockMethod::get(vec![
            Box::new(HeaderRule::new(
                "X-Test",
                "A",
                MockResponse::with_body(200, "A"),
            )),
            respond_with(MockResponse::with_body(200, "default")),
        ])],
    )]);

    assert_eq!(
        config.resolve(&request_with_header("GET", "/items/5", "X-Test", "A")),
        MockResponse::with_body(200, "A")
    );
    assert_eq!(
        config.resolve(&request("GET", "/items/5")),
        MockResponse::with_body(200, "default")
    );
}

#[test]
fn header_lookup_is_case_insensitive_on_name() {
    let req = request_with_header("GET", "/", "x-test", "A");
    assert_eq!(req.header("X-Test"), Some("A"));
    assert_eq!(req.header("X-TEST"), Some("A"));
}

#[test]
fn query_param_rule_sees_decoded_values() {
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/search$"),
        vec![MockMethod::get(vec![
            Box::new(QueryParamRule::new(
                "tags",
                "a,b",
                MockResponse::with_body(200, "tagged"),
            )),
            respond_with(MockResponse::with_body(200, "plain")),
        ])],
    )]);

    // %2C decodes to a comma before comparison.
    assert_eq!(
        config.resolve(&request("GET", "/search?tags=a%2Cb")),
        MockResponse::with_body(200, "tagged")
    );
    assert_eq!(
        config.resolve(&request("GET", "/search?tags=other")),
        MockResponse::with_body(200, "plain")
    );
}

#[test]
fn body_matches_rule_uses_regex_over_the_body() {
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/orders$"),
        vec![MockMethod::post(vec![Box::new(BodyMatchesRule::new(
            pattern(r#""sku":\s*"[A-Z]+-[0-9]+""#),
            MockResponse::with_body(201, "created"),
        ))])],
    )]);

    assert_eq!(
        config.resolve(&request_with_body("POST", "/orders", r#"{"sku": "AB-42"}"#)),
        MockResponse::with_body(201, "created")
    );
    assert_eq!(
        config.resolve(&request_with_body("POST", "/orders", r#"{"sku": 42}"#)),
        MockResponse::new(502)
    );
}

#[test]
fn json_body_rule_ignores_key_order_and_whitespace() {
    let rule = JsonBodyRule::new(
        serde_json::json!({"name": "alice", "age": 30}),
        MockResponse::new(200),
    );
    assert!(rule.applies(&request_with_body(
        "POST",
        "/",
        "{ \"age\": 30, \"name\": \"alice\" }"
    )));
    assert!(!rule.applies(&request_with_body("POST", "/", r#"{"name": "bob"}"#)));
    assert!(!rule.applies(&request_with_body("POST", "/", "not json")));
}

#[test]
fn sequence_rule_returns_responses_in_declaration_order() {
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/flaky$"),
        vec![MockMethod::get(vec![Box::new(
            SequenceRule::new(MockResponse::with_body(503, "warming up"))
                .then(MockResponse::with_body(200, "ready")),
        )])],
    )]);

    assert_eq!(
        config.resolve(&request("GET", "/flaky")),
        MockResponse::with_body(503, "warming up")
    );
    // The last response repeats forever.
    for _ in 0..3 {
        assert_eq!(
            config.resolve(&request("GET", "/flaky")),
            MockResponse::with_body(200, "ready")
        );
    }
}

#[test]
fn panicking_predicate_degrades_to_default_response() {
    let config = ServerConfig::new(vec![MockEndpoint::new(
        pattern("^/broken$"),
        vec![MockMethod::get(vec![
            Box::new(PredicateRule::new(
                |_| panic!("user predicate exploded"),
                MockResponse::new(200),
            )),
            // A later catch-all must NOT rescue the request: a failing
            // predicate aborts resolution for the whole request.
            respond_with(MockResponse::with_body(200, "unreachable")),
        ])],
    )]);

    assert_eq!(config.resolve(&request("GET", "/broken")), MockResponse::new(502));
    assert!(matches!(
        config.try_resolve(&request("GET", "/broken")),
        Err(ResolveError::PredicateFailure(_))
    ));
}

#[test]
fn default_config_values() {
    let config = ServerConfig::default();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.port, 8080);
    assert!(config.endpoints.is_empty());
    assert_eq!(config.default_response, MockResponse::new(502));
}

#[test]
fn response_equality_is_by_value() {
    assert_eq!(
        MockResponse::with_body(200, "pong"),
        MockResponse::with_body(200, "pong")
    );
    assert_ne!(MockResponse::new(200), MockResponse::new(201));
    assert_eq!(MockResponse::new(204).body, "");
}

#[test]
fn request_parses_query_parameters() {
    let req = request("GET", "/search?name=alice&age=30");
    assert_eq!(req.path(), "/search");
    assert_eq!(req.query_param("name"), Some("alice"));
    assert_eq!(req.query_param("age"), Some("30"));
    assert_eq!(req.query_param("missing"), None);
}

#[test]
fn method_convenience_constructors_use_canonical_verbs() {
    assert_eq!(MockMethod::get(Vec::new()).name(), "GET");
    assert_eq!(MockMethod::post(Vec::new()).name(), "POST");
    assert_eq!(MockMethod::put(Vec::new()).name(), "PUT");
    assert_eq!(MockMethod::delete(Vec::new()).name(), "DELETE");
    assert_eq!(MockMethod::patch(Vec::new()).name(), "PATCH");
    assert_eq!(MockMethod::head(Vec::new()).name(), "HEAD");
    assert_eq!(MockMethod::options(Vec::new()).name(), "OPTIONS");
    assert_eq!(MockMethod::trace(Vec::new()).name(), "TRACE");
}
