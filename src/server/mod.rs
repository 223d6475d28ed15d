//! Request/response types and the outer pipeline that composes resources.
//!
//! The crate does not own a listener. Convert incoming `http` requests with
//! [`RequestContext::from_parts`], run them through [`RestService::handle`] and turn the
//! result back into an `http::Response` with [`RestResponse::into_http`].

mod request;
mod response;
mod service;

pub use request::{AbortSignal, RequestContext};
pub use response::{HeaderVec, RestResponse, MAX_INLINE_HEADERS};
pub use service::{error_response, not_found, RestService};
