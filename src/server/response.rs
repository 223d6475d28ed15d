use anyhow::Context;
use serde_json::{json, Value};
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline response headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 8;

/// Stack-allocated response header storage. Names are lowercase.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Response produced by an action, the introspector or the error translator.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    pub status: u16,
    pub headers: HeaderVec,
    /// JSON payload; `None` means an empty body
    pub body: Option<Value>,
}

impl RestResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Option<Value>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, HeaderVec::new(), Some(body))
    }

    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, HeaderVec::new(), None)
    }

    /// `{"error": message}` with the given status.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    /// Get a header by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rfind(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value.
    pub fn set_header(&mut self, name: &str, value: String) {
        let name = name.to_ascii_lowercase();
        self.headers.retain(|(k, _)| &**k != name);
        self.headers.push((Arc::from(name.as_str()), value));
    }

    /// Convert into an `http::Response` with a serialized JSON body.
    pub fn into_http(self) -> anyhow::Result<http::Response<Vec<u8>>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(&**name, value.as_str());
        }
        let body = match &self.body {
            Some(value) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                serde_json::to_vec(value).context("failed to serialize response body")?
            }
            None => Vec::new(),
        };
        builder
            .body(body)
            .with_context(|| format!("invalid response (status {})", self.status))
    }
}
