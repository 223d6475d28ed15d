//! Error taxonomy for resource dispatch.
//!
//! "No route matched" is deliberately absent here: it is a pass-through signal
//! ([`Outcome::NotFound`](crate::resource::Outcome::NotFound)), not a failure.
//! Everything below is surfaced to the outermost caller unchanged; the core
//! never retries or swallows a collaborator error.

use serde_json::Value;

use crate::resource::Action;

/// Failure raised while dispatching a request to a resource.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A collaborator call (`all`, `count`, `find`, `save`, `remove`) failed.
    ///
    /// `instance` holds the attempted or found model instance when one exists,
    /// so callers can report field-level detail (e.g. validation failures on create).
    #[error("{source}")]
    Model {
        action: Action,
        #[source]
        source: anyhow::Error,
        instance: Option<Value>,
    },
    /// Nested forwarding could not resolve the parent instance; the chain was aborted.
    #[error("failed to load {model} '{id}': {source}")]
    Lookup {
        model: String,
        id: String,
        #[source]
        source: anyhow::Error,
    },
    /// The request was aborted by the transport while the nested chain was in flight.
    #[error("request aborted while forwarding from {model}")]
    Aborted { model: String },
    /// A model instance could not be rendered as JSON.
    #[error("failed to serialize model instance: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ResourceError {
    pub(crate) fn model(action: Action, source: anyhow::Error) -> Self {
        ResourceError::Model {
            action,
            source,
            instance: None,
        }
    }

    pub(crate) fn model_with_instance(
        action: Action,
        source: anyhow::Error,
        instance: Option<Value>,
    ) -> Self {
        ResourceError::Model {
            action,
            source,
            instance,
        }
    }

    /// HTTP status the default translator renders for this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        500
    }

    /// The model instance the error is tagged with, if any.
    #[must_use]
    pub fn instance(&self) -> Option<&Value> {
        match self {
            ResourceError::Model { instance, .. } => instance.as_ref(),
            _ => None,
        }
    }

    /// The action that was running when the collaborator failed.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        match self {
            ResourceError::Model { action, .. } => Some(*action),
            _ => None,
        }
    }
}
