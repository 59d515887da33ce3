//! Normalized view of an inbound HTTP request.

use std::collections::HashMap;

/// Request data the resolution pipeline and rule predicates operate on.
///
/// Built once per inbound request by the server glue. The query string is
/// split off the path at construction time, so path matching never sees it.
#[derive(Debug, Clone)]
pub struct MockRequest {
    method: String,
    path: String,
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
    body: String,
}

impl MockRequest {
    /// Build a request view from raw parts. `path_and_query` may carry a
    /// query string (`/users?id=1`); it is stripped off and parsed into the
    /// decoded parameter map.
    pub fn new(
        method: impl Into<String>,
        path_and_query: &str,
        headers: HashMap<String, String>,
        body: impl Into<String>,
    ) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path_and_query, ""),
        };

        Self {
            method: method.into(),
            path: path.to_string(),
            query: parse_query_string(query),
            headers,
            body: body.into(),
        }
    }

    /// HTTP method token, as received.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path with any query string already stripped.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Header value by name (case-insensitive, per RFC 9110).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All headers, as received.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Decoded query parameter value by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Request body as a string (empty if the request had none).
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Parse a query string into a map, URL-decoding both keys and values so
/// encoded characters like `%2C` compare as `,`.
pub(crate) fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let decoded_key = urlencoding::decode(key).unwrap_or_default().into_owned();
            let decoded_value = urlencoding::decode(value).unwrap_or_default().into_owned();
            Some((decoded_key, decoded_value))
        })
        .collect()
}
