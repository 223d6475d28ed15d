//! OPTIONS introspection: a machine-readable description of every method bound on a route,
//! synthesized from model attribute metadata.
//!
//! The output is a pure function of the matched pattern, the schema and the resource config;
//! maps are ordered, so repeated calls produce byte-identical bodies.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use super::Action;
use crate::config::{CreateResponse, ResourceConfig};
use crate::model::ModelSchema;
use crate::router::{pluralize, RoutePattern};
use crate::server::RestResponse;

/// Type (and optional description) of one accepted parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Description of the behaviour of one HTTP method on a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSpec {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, ParamSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Map<String, Value>>,
}

impl ActionSpec {
    /// Describe `action` for a model.
    #[must_use]
    pub fn for_action(action: Action, schema: &ModelSchema, config: &ResourceConfig) -> Self {
        let name = &schema.name;
        match action {
            Action::Index | Action::Count => {
                let verb = if action == Action::Index { "Find" } else { "Count" };
                Self {
                    description: format!("{verb} {}.", pluralize(name)),
                    parameters: Some(parameters(schema, false)),
                    example: None,
                }
            }
            Action::Create => {
                let mut example = example(schema);
                // server-assigned
                example.remove(&schema.primary_key);
                let description = match config.create_response {
                    CreateResponse::Json => format!("Create new {name}."),
                    CreateResponse::Minimal => {
                        format!("Create new {name}. Responds 201 with a Location header.")
                    }
                };
                Self {
                    description,
                    parameters: Some(parameters(schema, false)),
                    example: Some(example),
                }
            }
            Action::Show => Self::described(format!("Find {name} by id.")),
            Action::Update => Self {
                description: format!("Update {name}."),
                parameters: Some(parameters(schema, true)),
                example: Some(example(schema)),
            },
            Action::Destroy => Self::described(format!("Delete {name} by id.")),
            Action::Options => Self::described(format!("Describe {name} actions.")),
        }
    }

    fn described(description: String) -> Self {
        Self {
            description,
            parameters: None,
            example: None,
        }
    }
}

/// One parameter per attribute. The primary key is always present when `include_primary_key`
/// is set (typed `string` if undeclared) and always absent otherwise.
fn parameters(schema: &ModelSchema, include_primary_key: bool) -> BTreeMap<String, ParamSpec> {
    let mut params: BTreeMap<String, ParamSpec> = schema
        .attributes
        .iter()
        .map(|(name, attr)| {
            (
                name.clone(),
                ParamSpec {
                    kind: attr.param_type(),
                    description: attr.description.clone(),
                },
            )
        })
        .collect();

    if include_primary_key {
        params
            .entry(schema.primary_key.clone())
            .or_insert(ParamSpec {
                kind: "string",
                description: None,
            });
    } else {
        params.remove(&schema.primary_key);
    }
    params
}

/// Example payload from declared example values; the primary key defaults to `1`.
fn example(schema: &ModelSchema) -> Map<String, Value> {
    let mut example: Map<String, Value> = schema
        .attributes
        .iter()
        .filter_map(|(name, attr)| match &attr.example {
            Some(value) if !value.is_null() => Some((name.clone(), value.clone())),
            _ => None,
        })
        .collect();

    if example
        .get(&schema.primary_key)
        .map_or(true, Value::is_null)
    {
        example.insert(schema.primary_key.clone(), json!(1));
    }
    example
}

/// The assembled OPTIONS answer for one matched pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsDescription {
    /// Comma separated methods bound on the pattern, in binding order.
    pub allow: String,
    /// One [`ActionSpec`] per bound method, keyed by method name.
    pub body: BTreeMap<String, ActionSpec>,
}

impl OptionsDescription {
    /// Render as a `200` JSON response with the `Allow` header set.
    pub fn into_response(self) -> Result<RestResponse, serde_json::Error> {
        let mut response = RestResponse::json(200, serde_json::to_value(&self.body)?);
        response.set_header("allow", self.allow);
        Ok(response)
    }
}

/// Describe every method bound on `pattern`.
#[must_use]
pub fn describe(
    pattern: &RoutePattern,
    schema: &ModelSchema,
    config: &ResourceConfig,
) -> OptionsDescription {
    let allow = pattern
        .methods()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let body = pattern
        .bindings()
        .iter()
        .map(|(method, action)| {
            (
                method.as_str().to_string(),
                ActionSpec::for_action(*action, schema, config),
            )
        })
        .collect();
    OptionsDescription { allow, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeType};
    use crate::router::{PatternKind, RouteTable};

    fn user_schema() -> ModelSchema {
        ModelSchema::new("User")
            .attr("id", Attribute::new(AttributeType::Number))
            .attr(
                "name",
                Attribute::new(AttributeType::String)
                    .example("bob")
                    .description("Display name"),
            )
            .attr("born", Attribute::new(AttributeType::Date))
            .attr("admin", Attribute::new(AttributeType::Boolean).example(false))
            .attr("tags", Attribute::new(AttributeType::Array))
            .attr("misc", Attribute::untyped().example(Value::Null))
    }

    #[test]
    fn test_index_spec_excludes_primary_key() {
        let spec = ActionSpec::for_action(Action::Index, &user_schema(), &ResourceConfig::default());
        assert_eq!(spec.description, "Find Users.");
        let params = spec.parameters.unwrap();
        assert!(!params.contains_key("id"));
        assert_eq!(params["name"].kind, "string");
        assert_eq!(params["name"].description.as_deref(), Some("Display name"));
        assert_eq!(params["born"].kind, "integer");
        assert_eq!(params["admin"].kind, "boolean");
        assert_eq!(params["tags"].kind, "array");
        assert_eq!(params["misc"].kind, "string");
        assert!(spec.example.is_none());
    }

    #[test]
    fn test_count_spec() {
        let spec = ActionSpec::for_action(Action::Count, &user_schema(), &ResourceConfig::default());
        assert_eq!(spec.description, "Count Users.");
        assert!(!spec.parameters.unwrap().contains_key("id"));
    }

    #[test]
    fn test_create_spec_never_includes_primary_key() {
        let schema = user_schema().attr("id", Attribute::new(AttributeType::Number).example(7));
        let spec = ActionSpec::for_action(Action::Create, &schema, &ResourceConfig::default());
        assert_eq!(spec.description, "Create new User.");
        assert!(!spec.parameters.unwrap().contains_key("id"));
        let example = spec.example.unwrap();
        assert!(!example.contains_key("id"));
        assert_eq!(example["name"], json!("bob"));
        assert_eq!(example["admin"], json!(false));
        assert!(!example.contains_key("misc"));
    }

    #[test]
    fn test_create_spec_documents_minimal_shape() {
        let config = ResourceConfig {
            create_response: CreateResponse::Minimal,
            ..ResourceConfig::default()
        };
        let spec = ActionSpec::for_action(Action::Create, &user_schema(), &config);
        assert_eq!(
            spec.description,
            "Create new User. Responds 201 with a Location header."
        );
    }

    #[test]
    fn test_update_spec_always_includes_primary_key() {
        let spec = ActionSpec::for_action(Action::Update, &user_schema(), &ResourceConfig::default());
        assert_eq!(spec.description, "Update User.");
        assert_eq!(spec.parameters.unwrap()["id"].kind, "integer");
        assert_eq!(spec.example.unwrap()["id"], json!(1));

        // even when the primary key is not a declared attribute
        let bare = ModelSchema::new("Tag").attr("label", Attribute::new(AttributeType::String));
        let spec = ActionSpec::for_action(Action::Update, &bare, &ResourceConfig::default());
        assert_eq!(spec.parameters.unwrap()["id"].kind, "string");
        assert_eq!(spec.example.unwrap()["id"], json!(1));
    }

    #[test]
    fn test_update_example_keeps_declared_primary_key_example() {
        let schema = user_schema().attr("id", Attribute::new(AttributeType::Number).example(7));
        let spec = ActionSpec::for_action(Action::Update, &schema, &ResourceConfig::default());
        assert_eq!(spec.example.unwrap()["id"], json!(7));
    }

    #[test]
    fn test_show_and_destroy_have_description_only() {
        let config = ResourceConfig::default();
        let show = ActionSpec::for_action(Action::Show, &user_schema(), &config);
        assert_eq!(show.description, "Find User by id.");
        assert!(show.parameters.is_none() && show.example.is_none());
        let destroy = ActionSpec::for_action(Action::Destroy, &user_schema(), &config);
        assert_eq!(destroy.description, "Delete User by id.");
        assert_eq!(
            serde_json::to_value(&destroy).unwrap(),
            json!({ "description": "Delete User by id." })
        );
    }

    #[test]
    fn test_describe_collection_pattern() {
        let table = RouteTable::for_model("User").unwrap();
        let description = describe(
            table.pattern(PatternKind::Collection),
            &user_schema(),
            &ResourceConfig::default(),
        );
        assert_eq!(description.allow, "GET, POST");
        let keys: Vec<_> = description.body.keys().cloned().collect();
        assert_eq!(keys, vec!["GET", "POST"]);

        let response = description.into_response().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.get_header("Allow"), Some("GET, POST"));
    }

    #[test]
    fn test_describe_item_pattern() {
        let table = RouteTable::for_model("User").unwrap();
        let description = describe(
            table.pattern(PatternKind::Item),
            &user_schema(),
            &ResourceConfig::default(),
        );
        assert_eq!(description.allow, "GET, PUT, DELETE");
        assert_eq!(description.body.len(), 3);
    }

    #[test]
    fn test_describe_is_idempotent() {
        let table = RouteTable::for_model("User").unwrap();
        let render = || {
            let description = describe(
                table.pattern(PatternKind::Collection),
                &user_schema(),
                &ResourceConfig::default(),
            );
            serde_json::to_vec(&description.into_response().unwrap().body).unwrap()
        };
        assert_eq!(render(), render());
    }
}
