use http::{Method, Uri};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::ids::RequestId;
use crate::model::Query;
use crate::router::ParamVec;

/// Cooperative abort flag shared between the transport and the dispatching task.
///
/// The nested chain checks it before loading a parent and before every hop; in-flight
/// collaborator calls are never interrupted.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-request state threaded through matching, actions and nested forwarding.
///
/// Owned by the task handling the request and never shared between requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request ID for log correlation
    pub request_id: RequestId,
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Decoded query string; nested forwarding adds a `related` entry
    pub query: Query,
    /// Parsed JSON body (if present)
    pub body: Option<Value>,
    /// Path parameters captured so far (stack-allocated for ≤8 params)
    pub params: ParamVec,
    /// Parent instances loaded during nested forwarding, keyed by lowercased model name
    pub related: Map<String, Value>,
    pub abort: AbortSignal,
}

impl RequestContext {
    /// Build a context from a method and a request target such as `/users?limit=10`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (target, Query::new()),
        };
        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            query,
            body: None,
            params: ParamVec::new(),
            related: Map::new(),
            abort: AbortSignal::new(),
        }
    }

    /// Build a context from the head of an `http::Request`.
    ///
    /// An incoming `x-request-id` header is reused when it is a valid ULID.
    pub fn from_parts(parts: &http::request::Parts, body: Option<Value>) -> Self {
        let mut ctx = Self::new(parts.method.clone(), target_of(&parts.uri));
        let header = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok());
        ctx.request_id = RequestId::from_header_or_new(header);
        ctx.body = body;
        debug!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            query_params = ctx.query.len(),
            "Request context created"
        );
        ctx
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = abort;
        self
    }

    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics, so a nested child's own `id` shadows the parent's.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a path parameter, replacing any earlier value of the same name.
    pub fn set_param(&mut self, name: &str, value: &str) {
        self.params.retain(|(k, _)| &**k != name);
        self.params.push((Arc::from(name), value.to_string()));
    }

    /// The parent instance recorded for `model` during nested forwarding.
    #[must_use]
    pub fn related(&self, model: &str) -> Option<&Value> {
        self.related.get(&model.to_lowercase())
    }

    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }
}

fn target_of(uri: &Uri) -> &str {
    uri.path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str())
}

/// Decode a query string into string values. Repeated keys keep the last value.
fn parse_query(query: &str) -> Query {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}
