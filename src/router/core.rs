//! Route table core - derived once per resource, read-only afterwards.

use http::Method;
use regex::Regex;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::inflect::pluralize;
use crate::resource::Action;

/// Maximum number of path parameters before heap allocation.
/// Nested chains rarely go deeper than three resources, each contributing two params.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the request path.
///
/// Param names use `Arc<str>` since they repeat across requests; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Method to action bindings of a single pattern. At most three per shape.
pub type Bindings = SmallVec<[(Method, Action); 3]>;

/// Derive the canonical base path of a model: `/` + lowercased plural name.
///
/// ```
/// assert_eq!(brrtrest::router::base_path("User"), "/users");
/// assert_eq!(brrtrest::router::base_path("Category"), "/categories");
/// ```
#[must_use]
pub fn base_path(model_name: &str) -> String {
    format!("/{}", pluralize(model_name).to_lowercase())
}

/// The three canonical pattern shapes, in matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `/things`
    Collection,
    /// `/things/count`
    Count,
    /// `/things/<id>`, also matching any longer path that starts with an id segment
    Item,
}

/// How much of the request path a pattern consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The pattern matched the whole path.
    Exact,
    /// Only a leading `/things/<id>` was matched; the rest belongs to a nested resource.
    Prefix,
}

/// A compiled path pattern plus its method bindings. Immutable once built.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    kind: PatternKind,
    template: String,
    regex: Regex,
    bindings: Bindings,
}

impl RoutePattern {
    fn new(kind: PatternKind, base: &str, bindings: Bindings) -> Result<Self, regex::Error> {
        let escaped = regex::escape(base);
        let (template, pattern) = match kind {
            PatternKind::Collection => (base.to_string(), format!("^{escaped}$")),
            PatternKind::Count => (format!("{base}/count"), format!("^{escaped}/count$")),
            // Unanchored at the end: longer paths are prefix matches.
            PatternKind::Item => (format!("{base}/:id"), format!("^{escaped}/([^/]+)")),
        };
        Ok(Self {
            kind,
            template,
            regex: Regex::new(&pattern)?,
            bindings,
        })
    }

    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Human readable template, e.g. `/users/:id`.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn bindings(&self) -> &[(Method, Action)] {
        &self.bindings
    }

    /// The action bound to `method` on this pattern, if any.
    #[must_use]
    pub fn action_for(&self, method: &Method) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, action)| *action)
    }

    /// Methods bound on this pattern, in binding order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.bindings.iter().map(|(m, _)| m)
    }

    /// Test `path` against this pattern.
    #[must_use]
    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        let captures = self.regex.captures(path)?;
        let whole = captures.get(0)?;
        let consumed = whole.end();
        let kind = if consumed == path.len() {
            MatchKind::Exact
        } else {
            MatchKind::Prefix
        };
        Some(RouteMatch {
            pattern: self,
            id: captures.get(1).map(|m| m.as_str()),
            kind,
            consumed,
        })
    }
}

/// Result of testing a request path against one [`RoutePattern`].
///
/// Transient: lives for one probe of one request.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub pattern: &'a RoutePattern,
    /// The captured `<id>` segment for item matches.
    pub id: Option<&'a str>,
    pub kind: MatchKind,
    /// Byte length of the matched prefix.
    pub consumed: usize,
}

impl<'a> RouteMatch<'a> {
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.kind == MatchKind::Exact
    }

    /// The unmatched tail of `path`, handed to nested resources on a prefix match.
    #[must_use]
    pub fn remainder<'p>(&self, path: &'p str) -> &'p str {
        path.get(self.consumed..).unwrap_or("")
    }
}

/// Errors raised while building a route table from model metadata.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("model name must not be empty")]
    EmptyModelName,
    #[error("failed to compile route pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The fixed route table of one resource: collection, count, item - in that order.
///
/// The count pattern precedes the item pattern so `/things/count` is never read as an id.
#[derive(Debug, Clone)]
pub struct RouteTable {
    base: String,
    patterns: [RoutePattern; 3],
}

impl RouteTable {
    /// Build the route table for a model display name.
    pub fn for_model(model_name: &str) -> Result<Self, RouteTableError> {
        if model_name.trim().is_empty() {
            return Err(RouteTableError::EmptyModelName);
        }
        let base = base_path(model_name);
        let patterns = [
            RoutePattern::new(
                PatternKind::Collection,
                &base,
                smallvec![(Method::GET, Action::Index), (Method::POST, Action::Create)],
            )?,
            RoutePattern::new(
                PatternKind::Count,
                &base,
                smallvec![(Method::GET, Action::Count)],
            )?,
            RoutePattern::new(
                PatternKind::Item,
                &base,
                smallvec![
                    (Method::GET, Action::Show),
                    (Method::PUT, Action::Update),
                    (Method::DELETE, Action::Destroy)
                ],
            )?,
        ];

        let table = Self { base, patterns };
        info!(
            model = %model_name,
            base = %table.base,
            routes_summary = ?table.summary(),
            "Route table built"
        );
        Ok(table)
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Patterns in matching order.
    #[must_use]
    pub fn patterns(&self) -> &[RoutePattern] {
        &self.patterns
    }

    #[must_use]
    pub fn pattern(&self, kind: PatternKind) -> &RoutePattern {
        match kind {
            PatternKind::Collection => &self.patterns[0],
            PatternKind::Count => &self.patterns[1],
            PatternKind::Item => &self.patterns[2],
        }
    }

    /// Every pattern matching `path`, in priority order.
    pub fn matches<'a>(&'a self, path: &'a str) -> impl Iterator<Item = RouteMatch<'a>> + 'a {
        self.patterns.iter().filter_map(move |pattern| {
            let m = pattern.match_path(path);
            debug!(
                path = %path,
                pattern = %pattern.template,
                matched = m.is_some(),
                "Route pattern probe"
            );
            m
        })
    }

    /// `METHOD template -> action` lines, for logs and debugging.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        self.patterns
            .iter()
            .flat_map(|p| {
                p.bindings
                    .iter()
                    .map(move |(method, action)| format!("{method} {} -> {action}", p.template))
            })
            .collect()
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.summary() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
