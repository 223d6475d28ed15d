use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::actions::{self, Action, ActionHandler};
use super::options::{self, OptionsDescription};
use crate::config::ResourceConfig;
use crate::error::ResourceError;
use crate::model::Model;
use crate::router::{PatternKind, RoutePattern, RouteTable, RouteTableError};
use crate::server::{RequestContext, RestResponse};

/// Result of offering a request to a resource.
#[derive(Debug)]
pub enum Outcome {
    /// One of this resource's own actions produced the response.
    Handled(RestResponse),
    /// A nested resource produced the response.
    Forwarded(RestResponse),
    /// No pattern matched; the next stage of the outer pipeline should try.
    NotFound,
}

impl Outcome {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    #[must_use]
    pub fn response(&self) -> Option<&RestResponse> {
        match self {
            Outcome::Handled(r) | Outcome::Forwarded(r) => Some(r),
            Outcome::NotFound => None,
        }
    }

    #[must_use]
    pub fn into_response(self) -> Option<RestResponse> {
        match self {
            Outcome::Handled(r) | Outcome::Forwarded(r) => Some(r),
            Outcome::NotFound => None,
        }
    }
}

/// Anything a request path can be offered to: a resource, or a custom stage composed
/// into a nested chain or a [`RestService`](crate::server::RestService).
///
/// `dispatch` receives the path to match separately from the context because nested
/// resources only see the unmatched suffix of the request path.
pub trait Endpoint: Send + Sync {
    /// Display name used for logging and registry lookups.
    fn name(&self) -> &str;

    /// Base path of the endpoint's route table, e.g. `/users`.
    fn base(&self) -> &str;

    fn dispatch<'a>(
        &'a self,
        path: &'a str,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<Outcome, ResourceError>>;
}

/// Replacement for [`Model::find`] when nested forwarding loads the parent instance.
#[async_trait]
pub trait ParentLoader<M: Model>: Send + Sync {
    async fn load(&self, model: &M, id: &str) -> anyhow::Result<M::Instance>;
}

/// A model exposed over HTTP: its route table, action bindings and nested children.
///
/// Built once, then shared read-only across concurrent requests. All per-request state
/// (captured ids, the loaded parent, the chain position) lives in the [`RequestContext`]
/// or on the stack of the dispatching task.
pub struct Resource<M: Model> {
    model: Arc<M>,
    routes: RouteTable,
    nested: Vec<Arc<dyn Endpoint>>,
    overrides: HashMap<Action, Arc<dyn ActionHandler<M>>>,
    loader: Option<Arc<dyn ParentLoader<M>>>,
    config: ResourceConfig,
}

impl<M: Model> Resource<M> {
    /// Derive the route table from the model's schema.
    ///
    /// Fails when the model has no display name.
    pub fn new(model: M) -> Result<Self, RouteTableError> {
        Self::from_arc(Arc::new(model))
    }

    pub fn from_arc(model: Arc<M>) -> Result<Self, RouteTableError> {
        let routes = RouteTable::for_model(&model.schema().name)?;
        Ok(Self {
            model,
            routes,
            nested: Vec::new(),
            overrides: HashMap::new(),
            loader: None,
            config: ResourceConfig::default(),
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: ResourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the behaviour bound to `action`. The route table does not change.
    #[must_use]
    pub fn with_action<H>(mut self, action: Action, handler: H) -> Self
    where
        H: ActionHandler<M> + 'static,
    {
        self.overrides.insert(action, Arc::new(handler));
        self
    }

    /// Replace the parent lookup used while forwarding to nested resources.
    #[must_use]
    pub fn with_loader<L>(mut self, loader: L) -> Self
    where
        L: ParentLoader<M> + 'static,
    {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Append a nested resource. Children are tried in insertion order.
    #[must_use]
    pub fn add<E: Endpoint + 'static>(self, child: E) -> Self {
        self.add_shared(Arc::new(child))
    }

    /// Append an already shared nested endpoint.
    #[must_use]
    pub fn add_shared(mut self, child: Arc<dyn Endpoint>) -> Self {
        debug!(
            parent = %self.model.schema().name,
            child = %child.name(),
            position = self.nested.len(),
            "Nested resource added"
        );
        self.nested.push(child);
        self
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn nested(&self) -> &[Arc<dyn Endpoint>] {
        &self.nested
    }

    #[must_use]
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// OPTIONS description of one of this resource's patterns.
    #[must_use]
    pub fn describe(&self, kind: PatternKind) -> OptionsDescription {
        options::describe(self.routes.pattern(kind), self.model.schema(), &self.config)
    }

    /// Match the context's own path.
    pub async fn handle(&self, ctx: &mut RequestContext) -> Result<Outcome, ResourceError> {
        let path = ctx.path.clone();
        self.match_path(&path, ctx).await
    }

    /// Load the instance identified by `id`, using the configured loader if any.
    pub async fn load(&self, id: &str) -> anyhow::Result<M::Instance> {
        match &self.loader {
            Some(loader) => loader.load(&self.model, id).await,
            None => self.model.find(id).await,
        }
    }

    /// Offer `path` to this resource.
    ///
    /// Patterns are tried in table order. An exact match runs the bound action (or the
    /// introspector for `OPTIONS`); an item prefix match forwards the suffix to the nested
    /// chain. Without children, `OPTIONS` on an item prefix describes the item pattern.
    /// An exact match whose method is unbound falls through to the next pattern.
    pub async fn match_path(
        &self,
        path: &str,
        ctx: &mut RequestContext,
    ) -> Result<Outcome, ResourceError> {
        for m in self.routes.matches(path) {
            if m.is_exact() {
                if let Some(action) = m.pattern.action_for(&ctx.method) {
                    info!(
                        request_id = %ctx.request_id,
                        method = %ctx.method,
                        path = %path,
                        route = %m.pattern.template(),
                        action = ?action,
                        "Route matched"
                    );
                    if let Some(id) = m.id {
                        ctx.set_param("id", id);
                    }
                    let response = self
                        .run_action(action, m.pattern, m.id.unwrap_or_default(), ctx)
                        .await?;
                    return Ok(Outcome::Handled(response));
                }
                if ctx.method == Method::OPTIONS {
                    let response = self.run_action(Action::Options, m.pattern, "", ctx).await?;
                    return Ok(Outcome::Handled(response));
                }
                debug!(
                    method = %ctx.method,
                    route = %m.pattern.template(),
                    "Method not bound on pattern, trying next"
                );
                continue;
            }

            if let (Some(id), false) = (m.id, self.nested.is_empty()) {
                return self.forward(id, m.remainder(path), ctx).await;
            }
            if ctx.method == Method::OPTIONS {
                let response = self.run_action(Action::Options, m.pattern, "", ctx).await?;
                return Ok(Outcome::Handled(response));
            }
        }

        debug!(
            model = %self.model.schema().name,
            method = %ctx.method,
            path = %path,
            "No route matched"
        );
        Ok(Outcome::NotFound)
    }

    async fn run_action(
        &self,
        action: Action,
        pattern: &RoutePattern,
        id: &str,
        ctx: &mut RequestContext,
    ) -> Result<RestResponse, ResourceError> {
        let start = Instant::now();
        let model = self.model.as_ref();
        let result = match self.overrides.get(&action) {
            Some(handler) => handler.handle(model, ctx).await,
            None => match action {
                Action::Index => actions::index(model, ctx).await,
                Action::Count => actions::count(model, ctx).await,
                Action::Show => actions::show(model, id).await,
                Action::Create => actions::create(model, ctx, &self.config).await,
                Action::Update => actions::update(model, ctx, id).await,
                Action::Destroy => actions::destroy(model, id).await,
                Action::Options => {
                    options::describe(pattern, model.schema(), &self.config)
                        .into_response()
                        .map_err(ResourceError::from)
                }
            },
        };

        let duration_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(response) => info!(
                request_id = %ctx.request_id,
                model = %model.schema().name,
                action = ?action,
                status = response.status,
                duration_us,
                "Action completed"
            ),
            Err(e) => warn!(
                request_id = %ctx.request_id,
                model = %model.schema().name,
                action = ?action,
                error = %e,
                duration_us,
                "Action failed"
            ),
        }
        result
    }

    /// Load the parent `id`, attach it to the context and offer `suffix` to each child in
    /// order. The first child that does not fall through ends the chain.
    async fn forward(
        &self,
        id: &str,
        suffix: &str,
        ctx: &mut RequestContext,
    ) -> Result<Outcome, ResourceError> {
        let name = &self.model.schema().name;
        if ctx.is_aborted() {
            return Err(ResourceError::Aborted {
                model: name.clone(),
            });
        }

        let key = name.to_lowercase();
        ctx.set_param("id", id);
        ctx.set_param(&format!("{key}_id"), id);

        let parent = self.load(id).await.map_err(|source| {
            warn!(
                request_id = %ctx.request_id,
                model = %name,
                id = %id,
                error = %source,
                "Parent lookup failed, aborting nested chain"
            );
            ResourceError::Lookup {
                model: name.clone(),
                id: id.to_string(),
                source,
            }
        })?;
        let parent = serde_json::to_value(&parent)?;
        ctx.query.insert("related".to_string(), parent.clone());
        ctx.related.insert(key, parent);

        for (hop, child) in self.nested.iter().enumerate() {
            if ctx.is_aborted() {
                return Err(ResourceError::Aborted {
                    model: name.clone(),
                });
            }
            debug!(
                request_id = %ctx.request_id,
                parent = %name,
                child = %child.name(),
                hop,
                suffix = %suffix,
                "Forwarding to nested resource"
            );
            match child.dispatch(suffix, ctx).await? {
                Outcome::NotFound => continue,
                Outcome::Handled(response) | Outcome::Forwarded(response) => {
                    return Ok(Outcome::Forwarded(response));
                }
            }
        }

        debug!(parent = %name, suffix = %suffix, "Nested chain exhausted");
        Ok(Outcome::NotFound)
    }
}

impl<M: Model> Endpoint for Resource<M> {
    fn name(&self) -> &str {
        &self.model.schema().name
    }

    fn base(&self) -> &str {
        self.routes.base()
    }

    fn dispatch<'a>(
        &'a self,
        path: &'a str,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<Outcome, ResourceError>> {
        Box::pin(self.match_path(path, ctx))
    }
}
