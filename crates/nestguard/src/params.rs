//! Read-only request parameter source.

use axum::{body::Body, http::Request};
use std::collections::HashMap;

/// Per-request parameter map the loader resolves identifiers against.
///
/// The hosting application attaches one as a request extension with the
/// identifiers its router matched (e.g. `group_id` from
/// `/groups/:group_id/notes`). When no extension is present, the loader
/// falls back to the request URI's query string.
#[derive(Clone, Debug, Default)]
pub struct RequestParams {
    values: HashMap<String, String>,
}

impl RequestParams {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Resolve the parameter source for a request: an attached
    /// `RequestParams` extension wins, otherwise the query string.
    pub(crate) fn for_request(req: &Request<Body>) -> Self {
        if let Some(params) = req.extensions().get::<RequestParams>() {
            return params.clone();
        }

        match req.uri().query() {
            Some(query) => Self::from_pairs(url::form_urlencoded::parse(query.as_bytes())),
            None => Self::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_wins_over_query() {
        let mut req = Request::builder()
            .uri("/notes?group_id=9")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(RequestParams::from_pairs([("group_id", "1")]));

        let params = RequestParams::for_request(&req);
        assert_eq!(params.get("group_id"), Some("1"));
    }

    #[test]
    fn test_query_string_fallback() {
        let req = Request::builder()
            .uri("/notes?group_id=1&person_id=2")
            .body(Body::empty())
            .unwrap();

        let params = RequestParams::for_request(&req);
        assert_eq!(params.get("group_id"), Some("1"));
        assert_eq!(params.get("person_id"), Some("2"));
        assert_eq!(params.get("note_id"), None);
    }

    #[test]
    fn test_no_source_yields_empty() {
        let req = Request::builder().uri("/notes").body(Body::empty()).unwrap();
        let params = RequestParams::for_request(&req);
        assert_eq!(params.get("group_id"), None);
    }
}
