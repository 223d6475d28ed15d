//! The CRUD action set. Each action delegates to exactly one model operation.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::debug;

use crate::config::{CreateResponse, ResourceConfig};
use crate::error::ResourceError;
use crate::model::{Model, ModelSchema};
use crate::router::ParamVec;
use crate::server::{RequestContext, RestResponse};

/// The fixed set of behaviours a route can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Index,
    Count,
    Show,
    Create,
    Update,
    Destroy,
    Options,
}

impl Action {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Count => "count",
            Action::Show => "show",
            Action::Create => "create",
            Action::Update => "update",
            Action::Destroy => "destroy",
            Action::Options => "options",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user supplied replacement for one of a resource's actions.
///
/// Registered with [`Resource::with_action`](super::Resource::with_action). The route table
/// is unaffected; only the behaviour behind the binding changes. Path variables are
/// available through [`RequestContext::get_param`].
#[async_trait]
pub trait ActionHandler<M: Model>: Send + Sync {
    async fn handle(&self, model: &M, ctx: &mut RequestContext)
        -> Result<RestResponse, ResourceError>;
}

fn snapshot<T: Serialize>(instance: &T) -> Option<Value> {
    serde_json::to_value(instance).ok()
}

pub(crate) async fn index<M: Model>(
    model: &M,
    ctx: &RequestContext,
) -> Result<RestResponse, ResourceError> {
    let collection = model
        .all(&ctx.query)
        .await
        .map_err(|e| ResourceError::model(Action::Index, e))?;
    Ok(RestResponse::json(200, serde_json::to_value(&collection)?))
}

pub(crate) async fn count<M: Model>(
    model: &M,
    ctx: &RequestContext,
) -> Result<RestResponse, ResourceError> {
    let count = model
        .count(&ctx.query)
        .await
        .map_err(|e| ResourceError::model(Action::Count, e))?;
    Ok(RestResponse::json(200, json!({ "count": count })))
}

pub(crate) async fn show<M: Model>(model: &M, id: &str) -> Result<RestResponse, ResourceError> {
    let instance = model
        .find(id)
        .await
        .map_err(|e| ResourceError::model(Action::Show, e))?;
    Ok(RestResponse::json(200, serde_json::to_value(&instance)?))
}

pub(crate) async fn create<M: Model>(
    model: &M,
    ctx: &RequestContext,
    config: &ResourceConfig,
) -> Result<RestResponse, ResourceError> {
    let mut body = ctx.body.clone().unwrap_or_else(|| Value::Object(Map::new()));
    if config.merge_path_params {
        merge_path_params(&mut body, &ctx.params, model.schema());
    }

    let mut instance = model.construct(body);
    if let Err(e) = model.save(&mut instance).await {
        return Err(ResourceError::model_with_instance(
            Action::Create,
            e,
            snapshot(&instance),
        ));
    }

    let location = model.url(&instance);
    let response = match config.create_response {
        CreateResponse::Json => {
            let mut response = RestResponse::json(200, serde_json::to_value(&instance)?);
            response.set_header("location", location);
            response
        }
        CreateResponse::Minimal => {
            let mut response = RestResponse::empty(201);
            response.set_header("location", location);
            response
        }
    };
    Ok(response)
}

pub(crate) async fn update<M: Model>(
    model: &M,
    ctx: &RequestContext,
    id: &str,
) -> Result<RestResponse, ResourceError> {
    let mut instance = model
        .find(id)
        .await
        .map_err(|e| ResourceError::model(Action::Update, e))?;

    let body = ctx.body.clone().unwrap_or_else(|| Value::Object(Map::new()));
    model.set(&mut instance, body);
    if let Err(e) = model.save(&mut instance).await {
        return Err(ResourceError::model_with_instance(
            Action::Update,
            e,
            snapshot(&instance),
        ));
    }
    Ok(RestResponse::json(200, serde_json::to_value(&instance)?))
}

pub(crate) async fn destroy<M: Model>(model: &M, id: &str) -> Result<RestResponse, ResourceError> {
    let instance = model
        .find(id)
        .await
        .map_err(|e| ResourceError::model(Action::Destroy, e))?;
    if let Err(e) = model.remove(&instance).await {
        return Err(ResourceError::model_with_instance(
            Action::Destroy,
            e,
            snapshot(&instance),
        ));
    }
    Ok(RestResponse::empty(204))
}

/// Merge URL-derived params that name declared, non primary key attributes into `body`.
///
/// Path values win over body values: the URL fixes the parent relation.
pub(crate) fn merge_path_params(body: &mut Value, params: &ParamVec, schema: &ModelSchema) {
    let Value::Object(fields) = body else {
        return;
    };
    for (name, raw) in params {
        let name: &str = name;
        if name == schema.primary_key || !schema.has_attribute(name) {
            continue;
        }
        debug!(param = %name, value = %raw, "Merging path param into create body");
        fields.insert(name.to_string(), coerce(raw));
    }
}

/// All-digit values become JSON numbers; anything else stays a string.
fn coerce(raw: &str) -> Value {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = raw.parse::<u64>() {
            return Value::from(n);
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeType};
    use std::sync::Arc;

    fn thread_schema() -> ModelSchema {
        ModelSchema::new("Thread")
            .attr("id", Attribute::new(AttributeType::Number))
            .attr("forum_id", Attribute::new(AttributeType::Number))
            .attr("title", Attribute::new(AttributeType::String))
    }

    fn params(pairs: &[(&str, &str)]) -> ParamVec {
        pairs
            .iter()
            .map(|(k, v)| (Arc::from(*k), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_declared_params_with_coercion() {
        let mut body = json!({ "title": "hello" });
        merge_path_params(
            &mut body,
            &params(&[("id", "3"), ("forum_id", "3"), ("unknown", "x")]),
            &thread_schema(),
        );
        assert_eq!(body, json!({ "title": "hello", "forum_id": 3 }));
    }

    #[test]
    fn test_merge_keeps_non_numeric_values_as_strings() {
        let mut body = json!({});
        merge_path_params(
            &mut body,
            &params(&[("forum_id", "general"), ("title", "12a")]),
            &thread_schema(),
        );
        assert_eq!(body, json!({ "forum_id": "general", "title": "12a" }));
    }

    #[test]
    fn test_merge_ignores_non_object_bodies() {
        let mut body = json!([1, 2]);
        merge_path_params(&mut body, &params(&[("forum_id", "3")]), &thread_schema());
        assert_eq!(body, json!([1, 2]));
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("42"), json!(42));
        assert_eq!(coerce("-1"), json!("-1"));
        assert_eq!(coerce(""), json!(""));
        assert_eq!(coerce("99999999999999999999999"), json!("99999999999999999999999"));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Destroy.to_string(), "destroy");
        assert_eq!(serde_json::to_value(Action::Index).unwrap(), json!("index"));
    }
}
