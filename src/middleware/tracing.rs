use std::time::Duration;

use tracing::{info, warn};

use super::Middleware;
use crate::server::{RequestContext, RestResponse};

/// Emits one structured event when a request starts and one when it completes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, ctx: &RequestContext) -> Option<RestResponse> {
        info!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            "Request started"
        );
        None
    }

    fn after(&self, ctx: &RequestContext, res: &mut RestResponse, latency: Duration) {
        let latency_ms = latency.as_millis() as u64;
        if res.status >= 500 {
            warn!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path,
                status = res.status,
                latency_ms,
                "Request failed"
            );
        } else {
            info!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path,
                status = res.status,
                latency_ms,
                "Request completed"
            );
        }
    }
}
