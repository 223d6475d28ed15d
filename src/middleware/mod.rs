//! Request middleware run by [`RestService`](crate::server::RestService) around dispatch.

mod core;
mod request_id;
mod tracing;

pub use core::Middleware;
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
pub use tracing::TracingMiddleware;
