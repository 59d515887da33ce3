//! Top-level server configuration and the resolution entry point.

use super::endpoint::MockEndpoint;
use super::error::ResolveError;
use super::request::MockRequest;
use super::response::MockResponse;

/// Port the server binds when the configuration does not override it.
pub const DEFAULT_PORT: u16 = 8080;

/// Status of the default fallback response: 502 signals "the mock could not
/// resolve this request", distinct from any 4xx/5xx a test configures
/// explicitly.
const DEFAULT_FALLBACK_STATUS: u16 = 502;

/// Everything the mock server needs: a listening port, the ordered endpoint
/// list, and the fallback response returned whenever resolution fails.
///
/// The configuration is read-only for the lifetime of a server instance;
/// [`ServerConfig::resolve`] is safe to call concurrently from any number of
/// connection tasks.
pub struct ServerConfig {
    /// Listening port; 0 asks the OS for an ephemeral port.
    pub port: u16,
    /// Endpoints, scanned in declaration order; first path match wins.
    pub endpoints: Vec<MockEndpoint>,
    /// Returned whenever no endpoint, method, or rule resolves the request.
    pub default_response: MockResponse,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            endpoints: Vec::new(),
            default_response: MockResponse::new(DEFAULT_FALLBACK_STATUS),
        }
    }
}

impl ServerConfig {
    /// Configuration with the given endpoints and default port/fallback.
    pub fn new(endpoints: Vec<MockEndpoint>) -> Self {
        Self {
            endpoints,
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Resolve a request to the response to write. Never fails: any
    /// resolution-stage error degrades to a clone of `default_response`.
    /// This is the only place that conversion happens, so partial failure at
    /// any lookup stage yields exactly one uniform answer.
    pub fn resolve(&self, request: &MockRequest) -> MockResponse {
        self.try_resolve(request)
            .unwrap_or_else(|_| self.default_response.clone())
    }

    /// Typed resolution: first endpoint whose pattern matches the whole
    /// query-stripped path, then exact method lookup, then first accepting
    /// rule. Errors from the inner stages propagate unchanged.
    pub fn try_resolve(&self, request: &MockRequest) -> Result<MockResponse, ResolveError> {
        let endpoint = self
            .endpoints
            .iter()
            .find(|endpoint| endpoint.matches_path(request.path()))
            .ok_or_else(|| ResolveError::NoEndpointMatched(request.path().to_string()))?;
        endpoint.resolve(request)
    }
}
