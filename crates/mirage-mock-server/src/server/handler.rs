//! Per-request glue: hyper request in, resolved mock response out.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use tracing::debug;

use crate::resolver::{MockRequest, MockResponse, ServerConfig};

/// Normalize the hyper request, run it through the resolution pipeline, and
/// translate the result to the wire. Infallible: resolution always produces
/// a response, and response building falls back rather than erroring.
pub(super) async fn handle_request(
    req: Request<Incoming>,
    config: Arc<ServerConfig>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().to_string();
    let uri = req.uri().clone();
    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let body = match req.into_body().collect().await {
        Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).to_string(),
        Err(_) => String::new(),
    };

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let request = MockRequest::new(method, path_and_query, headers, body);

    let resolved = config.resolve(&request);
    debug!(
        method = %request.method(),
        path = %request.path(),
        status = resolved.status,
        "resolved mock response"
    );

    Ok(build_response(&resolved))
}

/// Translate a resolved response to hyper's wire representation. A status
/// outside the valid HTTP range maps to the fallback semantics of 502.
fn build_response(resolved: &MockResponse) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(resolved.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(resolved.body.clone())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
