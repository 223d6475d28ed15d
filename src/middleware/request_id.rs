use std::time::Duration;

use super::Middleware;
use crate::server::{RequestContext, RestResponse};

/// Response header carrying the request's ULID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Echoes the request id on every response so clients can correlate logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn after(&self, ctx: &RequestContext, res: &mut RestResponse, _latency: Duration) {
        res.set_header(REQUEST_ID_HEADER, ctx.request_id.to_string());
    }
}
