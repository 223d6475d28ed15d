#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use brrtrest::resource::{Outcome, Resource};
use brrtrest::router::PatternKind;
use brrtrest::{CreateResponse, RequestContext, ResourceConfig, RestResponse};
use common::{forum_schema, thread_schema, user_schema, MemoryModel};
use http::Method;
use serde_json::json;

async fn options(resource: &Resource<MemoryModel>, path: &str) -> RestResponse {
    let mut ctx = RequestContext::new(Method::OPTIONS, path);
    match resource.handle(&mut ctx).await.unwrap() {
        Outcome::Handled(res) => res,
        other => panic!("expected Handled, got {other:?}"),
    }
}

#[tokio::test]
async fn test_options_on_collection() {
    let resource = Resource::new(MemoryModel::new(user_schema())).unwrap();
    let res = options(&resource, "/users").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.get_header("Allow"), Some("GET, POST"));
    assert_eq!(
        res.body,
        Some(json!({
            "GET": {
                "description": "Find Users.",
                "parameters": {
                    "name": { "type": "string", "description": "Display name" }
                }
            },
            "POST": {
                "description": "Create new User.",
                "parameters": {
                    "name": { "type": "string", "description": "Display name" }
                },
                "example": { "name": "bob" }
            }
        }))
    );
}

#[tokio::test]
async fn test_options_on_count() {
    let resource = Resource::new(MemoryModel::new(user_schema())).unwrap();
    let res = options(&resource, "/users/count").await;

    assert_eq!(res.get_header("allow"), Some("GET"));
    assert_eq!(res.body.unwrap()["GET"]["description"], "Count Users.");
}

#[tokio::test]
async fn test_options_on_item() {
    let resource = Resource::new(MemoryModel::new(user_schema())).unwrap();
    let res = options(&resource, "/users/5").await;

    assert_eq!(res.get_header("allow"), Some("GET, PUT, DELETE"));
    let body = res.body.unwrap();
    assert_eq!(body.as_object().unwrap().len(), 3);
    assert_eq!(body["GET"], json!({ "description": "Find User by id." }));
    assert_eq!(body["DELETE"], json!({ "description": "Delete User by id." }));
    assert_eq!(body["PUT"]["description"], "Update User.");
    assert_eq!(body["PUT"]["parameters"]["id"]["type"], "integer");
    assert_eq!(body["PUT"]["example"], json!({ "id": 1, "name": "bob" }));
}

#[tokio::test]
async fn test_options_does_not_touch_the_model() {
    let model = std::sync::Arc::new(MemoryModel::new(user_schema()));
    let resource = Resource::from_arc(std::sync::Arc::clone(&model)).unwrap();

    options(&resource, "/users/5").await;
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn test_options_is_byte_identical_across_calls() {
    let resource = Resource::new(MemoryModel::new(user_schema())).unwrap();
    let first = options(&resource, "/users").await.into_http().unwrap();
    let second = options(&resource, "/users").await.into_http().unwrap();
    assert_eq!(first.body(), second.body());
}

#[tokio::test]
async fn test_options_reflects_minimal_create_shape() {
    let resource = Resource::new(MemoryModel::new(user_schema()))
        .unwrap()
        .with_config(ResourceConfig {
            create_response: CreateResponse::Minimal,
            ..ResourceConfig::default()
        });
    let description = resource.describe(PatternKind::Collection);
    assert_eq!(
        description.body["POST"].description,
        "Create new User. Responds 201 with a Location header."
    );
}

#[tokio::test]
async fn test_options_on_item_prefix_describes_item() {
    let model = std::sync::Arc::new(MemoryModel::new(user_schema()));
    let resource = Resource::from_arc(std::sync::Arc::clone(&model)).unwrap();
    let res = options(&resource, "/users/42/extra").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.get_header("allow"), Some("GET, PUT, DELETE"));
    assert_eq!(res.body, options(&resource, "/users/42").await.body);
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn test_options_on_item_prefix_forwards_to_children() {
    let forums = MemoryModel::new(forum_schema());
    forums.seed(json!({ "id": 3, "title": "general" }));
    let threads = MemoryModel::new(thread_schema()).with_parent_key("forum_id");
    let resource = Resource::new(forums)
        .unwrap()
        .add(Resource::new(threads).unwrap());

    let mut ctx = RequestContext::new(Method::OPTIONS, "/forums/3/threads");
    let res = match resource.handle(&mut ctx).await.unwrap() {
        Outcome::Forwarded(res) => res,
        other => panic!("expected Forwarded, got {other:?}"),
    };
    assert_eq!(res.get_header("allow"), Some("GET, POST"));
    assert_eq!(res.body.unwrap()["GET"]["description"], "Find Threads.");
}
