//! # brrtrest
//!
//! **brrtrest** exposes model types as REST resources. Given a model's display name and
//! attribute metadata it derives a fixed route table, dispatches requests to a CRUD action
//! set, forwards deeper paths to nested resources and answers `OPTIONS` with a
//! machine-readable description of every bound method.
//!
//! ## Architecture
//!
//! - **[`model`]** - the persistence collaborator trait and attribute metadata
//! - **[`router`]** - route table derivation and regex path matching
//! - **[`resource`]** - the dispatcher, nested chain, CRUD actions and OPTIONS introspector
//! - **[`server`]** - per-request context, responses and the outer [`RestService`] pipeline
//! - **[`middleware`]** - `before`/`after` hooks (tracing, request ids)
//! - **[`config`]** / **[`logging`]** - YAML configuration and `tracing` setup
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Service as RestService
//!     participant Forums as Resource<Forum>
//!     participant Threads as Resource<Thread>
//!     participant Model as Model (collaborator)
//!
//!     Client->>Service: GET /forums/3/threads
//!     Service->>Forums: dispatch("/forums/3/threads")
//!     Forums->>Forums: item pattern, prefix match (id = 3)
//!     Forums->>Model: find("3")
//!     Model-->>Forums: forum
//!     Forums->>Threads: dispatch("/threads"), related = forum
//!     Threads->>Model: all({related: forum})
//!     Model-->>Threads: [thread, ...]
//!     Threads-->>Forums: Handled(200)
//!     Forums-->>Service: Forwarded(200)
//!     Service-->>Client: 200 [thread, ...]
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use brrtrest::{Resource, RestService, RequestContext, TracingMiddleware};
//! use std::sync::Arc;
//!
//! let mut service = RestService::new();
//! service
//!     .mount(Resource::new(UserModel::default())?)
//!     .add_middleware(Arc::new(TracingMiddleware));
//!
//! let ctx = RequestContext::new(http::Method::GET, "/users/count");
//! let response = service.handle(ctx).await;
//! assert_eq!(response.status, 200);
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | `GET` | `/users` | index |
//! | `POST` | `/users` | create |
//! | `GET` | `/users/count` | count |
//! | `GET` | `/users/:id` | show |
//! | `PUT` | `/users/:id` | update |
//! | `DELETE` | `/users/:id` | destroy |
//! | `OPTIONS` | any of the above | description of the pattern's methods |
//!
//! ## Error Handling
//!
//! Collaborator failures surface as [`ResourceError`] with the collaborator's message
//! intact. A path no resource recognizes is not an error: it yields
//! [`Outcome::NotFound`] so an outer pipeline can try something else.
//! [`RestService::handle`] translates both into JSON responses.

pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod resource;
pub mod router;
pub mod server;

pub use config::{CreateResponse, ResourceConfig, RestConfig};
pub use error::ResourceError;
pub use ids::RequestId;
pub use middleware::{Middleware, RequestIdMiddleware, TracingMiddleware};
pub use model::{Attribute, AttributeType, Model, ModelSchema, Query};
pub use resource::{Action, ActionHandler, Endpoint, Outcome, ParentLoader, Resource};
pub use router::{base_path, RouteTable};
pub use server::{AbortSignal, RequestContext, RestResponse, RestService};
