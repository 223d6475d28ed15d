#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use brrtrest::model::{Attribute, AttributeType, Model, ModelSchema, Query};
use brrtrest::router::base_path;
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// In-memory model storing JSON records, with per-operation failure injection and a call log.
pub struct MemoryModel {
    schema: ModelSchema,
    /// Attribute linking records to a parent, e.g. `forum_id`
    parent_key: Option<String>,
    records: RwLock<Vec<Value>>,
    next_id: RwLock<u64>,
    failures: RwLock<HashMap<&'static str, String>>,
    calls: RwLock<Vec<String>>,
}

impl MemoryModel {
    pub fn new(schema: ModelSchema) -> Self {
        Self {
            schema,
            parent_key: None,
            records: RwLock::new(Vec::new()),
            next_id: RwLock::new(1),
            failures: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    pub fn with_parent_key(mut self, key: &str) -> Self {
        self.parent_key = Some(key.to_string());
        self
    }

    /// Insert a record, assigning an id when it has none.
    pub fn seed(&self, record: Value) -> Value {
        let mut record = record;
        self.assign_id(&mut record);
        if let Some(id) = record.get(&self.schema.primary_key).and_then(Value::as_u64) {
            let mut next = self.next_id.write();
            *next = (*next).max(id + 1);
        }
        self.records.write().push(record.clone());
        record
    }

    /// Make every later call to `op` fail with `message`.
    pub fn fail(&self, op: &'static str, message: &str) {
        self.failures.write().insert(op, message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.read().clone()
    }

    fn enter(&self, op: &'static str) -> anyhow::Result<()> {
        self.calls.write().push(op.to_string());
        match self.failures.read().get(op) {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(()),
        }
    }

    fn assign_id(&self, record: &mut Value) {
        let key = self.schema.primary_key.clone();
        if record.get(&key).map_or(true, Value::is_null) {
            let mut next = self.next_id.write();
            record[key.as_str()] = json!(*next);
            *next += 1;
        }
    }

    fn id_of(&self, record: &Value) -> String {
        match record.get(&self.schema.primary_key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    fn matches(&self, record: &Value, query: &Query) -> bool {
        query.iter().all(|(key, expected)| {
            if key == "related" {
                let (Some(parent_key), Some(parent_id)) =
                    (&self.parent_key, expected.get("id"))
                else {
                    return true;
                };
                return record.get(parent_key) == Some(parent_id);
            }
            match (record.get(key), expected) {
                (Some(Value::String(actual)), Value::String(wanted)) => actual == wanted,
                (Some(actual), Value::String(wanted)) => actual.to_string() == *wanted,
                (Some(actual), wanted) => actual == wanted,
                (None, _) => false,
            }
        })
    }
}

#[async_trait]
impl Model for MemoryModel {
    type Instance = Value;

    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    async fn all(&self, query: &Query) -> anyhow::Result<Vec<Value>> {
        self.enter("all")?;
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| self.matches(r, query))
            .cloned()
            .collect())
    }

    async fn count(&self, query: &Query) -> anyhow::Result<u64> {
        self.enter("count")?;
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| self.matches(r, query))
            .count() as u64)
    }

    async fn find(&self, id: &str) -> anyhow::Result<Value> {
        self.enter("find")?;
        self.records
            .read()
            .iter()
            .find(|r| self.id_of(r) == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{} {id} not found", self.schema.name))
    }

    fn construct(&self, body: Value) -> Value {
        match body {
            Value::Object(_) => body,
            _ => Value::Object(Map::new()),
        }
    }

    fn set(&self, instance: &mut Value, body: Value) {
        if let (Some(target), Value::Object(fields)) = (instance.as_object_mut(), body) {
            for (key, value) in fields {
                if key != self.schema.primary_key {
                    target.insert(key, value);
                }
            }
        }
    }

    async fn save(&self, instance: &mut Value) -> anyhow::Result<()> {
        self.enter("save")?;
        self.assign_id(instance);
        let id = self.id_of(instance);
        let mut records = self.records.write();
        match records.iter_mut().find(|r| self.id_of(r) == id) {
            Some(existing) => *existing = instance.clone(),
            None => records.push(instance.clone()),
        }
        Ok(())
    }

    async fn remove(&self, instance: &Value) -> anyhow::Result<()> {
        self.enter("remove")?;
        let id = self.id_of(instance);
        self.records.write().retain(|r| self.id_of(r) != id);
        Ok(())
    }

    fn url(&self, instance: &Value) -> String {
        format!("{}/{}", base_path(&self.schema.name), self.id_of(instance))
    }
}

pub fn user_schema() -> ModelSchema {
    ModelSchema::new("User")
        .attr("id", Attribute::new(AttributeType::Number))
        .attr(
            "name",
            Attribute::new(AttributeType::String)
                .example("bob")
                .description("Display name"),
        )
}

pub fn forum_schema() -> ModelSchema {
    ModelSchema::new("Forum")
        .attr("id", Attribute::new(AttributeType::Number))
        .attr("title", Attribute::new(AttributeType::String))
}

pub fn thread_schema() -> ModelSchema {
    ModelSchema::new("Thread")
        .attr("id", Attribute::new(AttributeType::Number))
        .attr("forum_id", Attribute::new(AttributeType::Number))
        .attr("subject", Attribute::new(AttributeType::String).example("hello"))
}

pub fn post_schema() -> ModelSchema {
    ModelSchema::new("Post")
        .attr("id", Attribute::new(AttributeType::Number))
        .attr("thread_id", Attribute::new(AttributeType::Number))
        .attr("body", Attribute::new(AttributeType::String))
}
