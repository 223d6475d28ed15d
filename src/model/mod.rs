//! # Model Module
//!
//! The model module defines the contract between brrtrest and the persistence layer it
//! exposes over HTTP. brrtrest never stores data itself: every action delegates to exactly one
//! call on a [`Model`] implementation supplied by the application.
//!
//! ## Overview
//!
//! A model provides two things:
//!
//! - **Metadata** - a [`ModelSchema`] with the display name, the primary key and the declared
//!   attributes (type, example value, description). Route tables and OPTIONS descriptions are
//!   derived from it.
//! - **Operations** - `all`, `count`, `find`, `construct`, `set`, `save`, `remove` and `url`.
//!   The asynchronous ones are the suspension points of a request.
//!
//! ## Example
//!
//! ```rust,ignore
//! use brrtrest::model::{Attribute, AttributeType, ModelSchema};
//!
//! let schema = ModelSchema::new("User")
//!     .attr("id", Attribute::new(AttributeType::Number))
//!     .attr("name", Attribute::new(AttributeType::String).example("bob"));
//! ```
//!
//! Schemas can also be loaded from YAML:
//!
//! ```yaml
//! name: User
//! primary_key: id
//! attributes:
//!   id: { type: Number }
//!   name: { type: String, example: bob, description: Display name }
//! ```

mod core;
mod schema;

pub use core::{Model, Query};
pub use schema::{Attribute, AttributeType, ModelSchema};
