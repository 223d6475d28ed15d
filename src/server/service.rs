use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::{RequestContext, RestResponse};
use crate::error::ResourceError;
use crate::middleware::Middleware;
use crate::resource::{Endpoint, Outcome};

/// The outer pipeline: mounted resources tried in order, wrapped in middleware, with
/// default translation of fallthrough and errors into HTTP responses.
///
/// Resources are registered by model name so they can be looked up later with
/// [`RestService::resource`].
#[derive(Default, Clone)]
pub struct RestService {
    endpoints: Vec<Arc<dyn Endpoint>>,
    registry: HashMap<String, Arc<dyn Endpoint>>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl RestService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a top-level resource.
    pub fn mount<E: Endpoint + 'static>(&mut self, endpoint: E) -> &mut Self {
        self.mount_shared(Arc::new(endpoint))
    }

    /// Mount an already shared endpoint.
    ///
    /// Mounting a second endpoint under the same name replaces the first.
    pub fn mount_shared(&mut self, endpoint: Arc<dyn Endpoint>) -> &mut Self {
        let name = endpoint.name().to_string();
        if let Some(previous) = self.registry.insert(name.clone(), Arc::clone(&endpoint)) {
            warn!(
                model = %name,
                base = %previous.base(),
                "Resource already mounted, replacing"
            );
            self.endpoints.retain(|e| !Arc::ptr_eq(e, &previous));
        }
        info!(model = %name, base = %endpoint.base(), "Resource mounted");
        self.endpoints.push(endpoint);
        self
    }

    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// The endpoint mounted for `model_name`, if any.
    #[must_use]
    pub fn resource(&self, model_name: &str) -> Option<Arc<dyn Endpoint>> {
        self.registry.get(model_name).cloned()
    }

    /// Mounted endpoints in dispatch order.
    #[must_use]
    pub fn endpoints(&self) -> &[Arc<dyn Endpoint>] {
        &self.endpoints
    }

    /// Offer the request to every mounted endpoint in order, without middleware or
    /// error translation.
    pub async fn dispatch(&self, ctx: &mut RequestContext) -> Result<Outcome, ResourceError> {
        let path = ctx.path.clone();
        for endpoint in &self.endpoints {
            match endpoint.dispatch(&path, ctx).await? {
                Outcome::NotFound => {
                    debug!(model = %endpoint.name(), path = %path, "Endpoint fell through");
                }
                outcome => return Ok(outcome),
            }
        }
        Ok(Outcome::NotFound)
    }

    /// Run the full pipeline and always produce a response.
    pub async fn handle(&self, mut ctx: RequestContext) -> RestResponse {
        let start = Instant::now();

        let mut response = None;
        for mw in &self.middlewares {
            if let Some(early) = mw.before(&ctx) {
                response = Some(early);
                break;
            }
        }

        let mut response = match response {
            Some(early) => early,
            None => match self.dispatch(&mut ctx).await {
                Ok(Outcome::Handled(res) | Outcome::Forwarded(res)) => res,
                Ok(Outcome::NotFound) => not_found(),
                Err(e) => {
                    error!(
                        request_id = %ctx.request_id,
                        method = %ctx.method,
                        path = %ctx.path,
                        error = %e,
                        "Request failed"
                    );
                    error_response(&e)
                }
            },
        };

        let latency = start.elapsed();
        for mw in &self.middlewares {
            mw.after(&ctx, &mut response, latency);
        }
        response
    }
}

/// `404 {"error": "Not Found"}`, the translation of [`Outcome::NotFound`].
#[must_use]
pub fn not_found() -> RestResponse {
    RestResponse::error(404, "Not Found")
}

/// Default translation of a [`ResourceError`]: `{"error": message}`, plus `"model"` when
/// the error carries an instance.
#[must_use]
pub fn error_response(err: &ResourceError) -> RestResponse {
    let mut body = json!({ "error": err.to_string() });
    if let (Some(instance), Some(fields)) = (err.instance(), body.as_object_mut()) {
        fields.insert("model".to_string(), instance.clone());
    }
    RestResponse::json(err.status(), body)
}
