use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::ModelSchema;

/// Query/filter map handed to `all` and `count`.
///
/// Populated from the request's query string; nested forwarding adds a `related` entry
/// holding the parent instance.
pub type Query = Map<String, Value>;

/// Persistence collaborator exposed by a [`Resource`](crate::resource::Resource).
///
/// Implementations own validation and primary-key semantics. Errors are returned as
/// `anyhow::Error` and are propagated to the caller verbatim.
#[async_trait]
pub trait Model: Send + Sync + 'static {
    /// A single persisted (or about to be persisted) record.
    type Instance: Serialize + Send + Sync;

    /// Attribute metadata, display name and primary key.
    fn schema(&self) -> &ModelSchema;

    /// List every instance matching `query`.
    async fn all(&self, query: &Query) -> anyhow::Result<Vec<Self::Instance>>;

    /// Count the instances matching `query`.
    async fn count(&self, query: &Query) -> anyhow::Result<u64>;

    /// Look up a single instance by its primary key.
    async fn find(&self, id: &str) -> anyhow::Result<Self::Instance>;

    /// Build a new, unsaved instance from a request body.
    fn construct(&self, body: Value) -> Self::Instance;

    /// Apply a request body to an existing instance.
    fn set(&self, instance: &mut Self::Instance, body: Value);

    /// Persist `instance`. May assign server-side fields such as the primary key.
    async fn save(&self, instance: &mut Self::Instance) -> anyhow::Result<()>;

    /// Delete `instance`.
    async fn remove(&self, instance: &Self::Instance) -> anyhow::Result<()>;

    /// Canonical URL of `instance`, used for the `Location` header on create.
    fn url(&self, instance: &Self::Instance) -> String;
}
