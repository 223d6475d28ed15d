use std::time::Duration;

use crate::server::{RequestContext, RestResponse};

/// Hooks run by [`RestService`](crate::server::RestService) around every request.
///
/// `before` may short-circuit dispatch by returning a response; `after` sees the final
/// response (including translated errors and 404s) together with the request latency.
pub trait Middleware: Send + Sync {
    fn before(&self, _ctx: &RequestContext) -> Option<RestResponse> {
        None
    }
    fn after(&self, _ctx: &RequestContext, _res: &mut RestResponse, _latency: Duration) {}
}
