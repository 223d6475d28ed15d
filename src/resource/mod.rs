//! # Resource Module
//!
//! A [`Resource`] wraps a [`Model`](crate::model::Model) with the route table derived from its
//! name, dispatches matched requests to the CRUD action set and forwards longer paths to
//! nested resources.
//!
//! ## Dispatch
//!
//! [`Resource::match_path`] returns an [`Outcome`]:
//!
//! - `Handled` - one of the resource's own actions answered
//! - `Forwarded` - a nested resource answered
//! - `NotFound` - nothing matched; the caller should try the next stage
//!
//! Collaborator failures are returned as [`ResourceError`](crate::error::ResourceError)
//! and never turned into responses here.
//!
//! ## Nesting
//!
//! ```rust,ignore
//! let forums = Resource::new(ForumModel::default())?
//!     .add(Resource::new(ThreadModel::default())?);
//! // GET /forums/3/threads loads forum 3, then lists threads with
//! // query["related"] set to the forum
//! ```
//!
//! During forwarding the parent id is recorded as path params `id` and `<model>_id`, and
//! the parent instance is stored in [`RequestContext::related`](crate::server::RequestContext)
//! under its lowercased model name.

mod actions;
mod core;
mod options;

pub use actions::{Action, ActionHandler};
pub use core::{Endpoint, Outcome, ParentLoader, Resource};
pub use options::{describe, ActionSpec, OptionsDescription, ParamSpec};
