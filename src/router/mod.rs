//! # Router Module
//!
//! The router module derives the route table of a resource from its model name and matches
//! request paths against it.
//!
//! ## Overview
//!
//! Every resource gets exactly three patterns, built once and never modified:
//!
//! | Pattern | Example | Bindings |
//! |---|---|---|
//! | collection | `/users` | `GET` → index, `POST` → create |
//! | count | `/users/count` | `GET` → count |
//! | item | `/users/:id` | `GET` → show, `PUT` → update, `DELETE` → destroy |
//!
//! The base path is `/` followed by the lowercased plural of the model name
//! (`User` → `/users`, `Category` → `/categories`).
//!
//! ## Matching
//!
//! Patterns are compiled to regexes and tested in the order above. Order matters: the count
//! pattern must be tried before the item pattern, otherwise `count` would be captured as an id.
//!
//! The item pattern is anchored only at the start. A path such as `/forums/3/threads/7`
//! therefore produces a [`MatchKind::Prefix`] match on `/forums/3`, whose
//! [`remainder`](RouteMatch::remainder) (`/threads/7`) can be forwarded to nested resources.
//!
//! ```rust
//! use brrtrest::router::{MatchKind, RouteTable};
//!
//! let table = RouteTable::for_model("Forum").unwrap();
//! let m = table.matches("/forums/3/threads/7").next().unwrap();
//! assert_eq!(m.kind, MatchKind::Prefix);
//! assert_eq!(m.id, Some("3"));
//! assert_eq!(m.remainder("/forums/3/threads/7"), "/threads/7");
//! ```

mod core;
mod inflect;

pub use core::{
    base_path, Bindings, MatchKind, ParamVec, PatternKind, RouteMatch, RoutePattern, RouteTable,
    RouteTableError, MAX_INLINE_PARAMS,
};
pub use inflect::pluralize;
