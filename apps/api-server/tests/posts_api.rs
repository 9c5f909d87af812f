//! Route-level tests for the blog post resource.

use std::collections::BTreeSet;
use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use uuid::Uuid;

use api_server::AppState;
use api_server::startup::configure_app;
use scribe_core::DomainError;
use scribe_core::domain::{Author, NewPost, Post, PostPatch};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(App::new().configure(configure_app(web::Data::new($state.clone()))))
            .await
    };
}

async fn seeded_state(n: usize) -> AppState {
    let state = AppState::in_memory();
    for i in 0..n {
        state
            .posts
            .create(NewPost {
                author: Author::new(format!("First{i}"), format!("Last{i}")),
                title: format!("Company {i}"),
                content: format!("Lorem ipsum {i}."),
                created: None,
            })
            .await
            .unwrap();
    }
    state
}

/// Repository whose backend is always unreachable.
struct UnreachableRepository;

fn refused<T>() -> Result<T, RepoError> {
    Err(RepoError::Connection("connection refused by 10.0.0.5:5432".to_string()))
}

#[async_trait]
impl BaseRepository<Post, Uuid> for UnreachableRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        refused()
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
        refused()
    }

    async fn insert(&self, _entity: Post) -> Result<Post, RepoError> {
        refused()
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        refused()
    }

    async fn count(&self) -> Result<u64, RepoError> {
        refused()
    }
}

#[async_trait]
impl PostRepository for UnreachableRepository {
    async fn update_fields(&self, _id: Uuid, _patch: &PostPatch) -> Result<Option<Post>, RepoError> {
        refused()
    }
}

fn keys(value: &Value) -> BTreeSet<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

fn is_json(resp: &actix_web::dev::ServiceResponse) -> bool {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[actix_web::test]
async fn test_list_returns_every_post() {
    let state = seeded_state(9).await;
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(is_json(&resp));

    let body: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(body.len(), 9);
    assert_eq!(body.len() as u64, state.posts.count().await.unwrap());
}

#[actix_web::test]
async fn test_list_fields_match_the_store() {
    let state = seeded_state(3).await;
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request()).await;
    let body: Vec<Value> = test::read_body_json(resp).await;

    let expected: BTreeSet<String> = ["id", "author", "content", "title", "created"]
        .into_iter()
        .map(String::from)
        .collect();
    for post in &body {
        assert_eq!(keys(post), expected);
    }

    let first = &body[0];
    let id: Uuid = first["id"].as_str().unwrap().parse().unwrap();
    let stored = state.posts.get(id).await.unwrap();
    assert_eq!(first["author"], stored.author_name());
    assert_eq!(first["content"], stored.content);
    assert_eq!(first["title"], stored.title);
}

#[actix_web::test]
async fn test_list_empty_store() {
    let app = init_app!(AppState::in_memory());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Vec<Value> = test::read_body_json(resp).await;
    assert!(body.is_empty());
}

#[actix_web::test]
async fn test_create_post() {
    let state = seeded_state(2).await;
    let app = init_app!(state);

    let new_post = json!({
        "author": { "firstName": "Grace", "lastName": "Hopper" },
        "title": "Compilers",
        "content": "On the A-0 system."
    });
    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(&new_post)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(is_json(&resp));

    let body: Value = test::read_body_json(resp).await;
    for key in ["id", "author", "content", "title", "created"] {
        assert!(body.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(body["authorName"], "Grace Hopper");
    assert_eq!(body["author"]["firstName"], "Grace");
    assert_eq!(body["content"], "On the A-0 system.");
    assert_eq!(body["title"], "Compilers");

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    let stored = state.posts.get(id).await.unwrap();
    assert_eq!(stored.author.first_name, "Grace");
    assert_eq!(stored.author.last_name, "Hopper");
    assert_eq!(stored.content, "On the A-0 system.");
    assert_eq!(stored.title, "Compilers");
    assert_eq!(state.posts.count().await.unwrap(), 3);
}

#[actix_web::test]
async fn test_create_keeps_supplied_created() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({
            "author": { "firstName": "A", "lastName": "B" },
            "title": "T",
            "content": "C",
            "created": "2019-05-06T07:08:09Z"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["created"], "2019-05-06T07:08:09Z");
}

#[actix_web::test]
async fn test_create_missing_field_is_rejected() {
    let state = AppState::in_memory();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({
            "author": { "firstName": "Ada" },
            "content": "C"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("author.lastName"));
    assert!(detail.contains("title"));

    assert_eq!(state.posts.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_create_malformed_body_is_rejected() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
}

#[actix_web::test]
async fn test_get_post_by_id() {
    let state = seeded_state(1).await;
    let app = init_app!(state);
    let post = state.posts.list_all().await.unwrap().remove(0);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], post.id.to_string());
    assert_eq!(body["author"], post.author_name());

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_post() {
    let state = seeded_state(3).await;
    let app = init_app!(state);
    let post = state.posts.list_all().await.unwrap().remove(0);

    let update = json!({
        "id": post.id,
        "content": "Nice",
        "title": "a title",
        "author": { "firstName": "Not", "lastName": "Applied" }
    });
    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .set_json(&update)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let stored = state.posts.get(post.id).await.unwrap();
    assert_eq!(stored.content, "Nice");
    assert_eq!(stored.title, "a title");
    assert_eq!(stored.author, post.author);
    assert_eq!(stored.created, post.created);
}

#[actix_web::test]
async fn test_update_unknown_post() {
    let app = init_app!(seeded_state(1).await);

    for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let req = test::TestRequest::put()
            .uri(&format!("/posts/{id}"))
            .set_json(json!({ "title": "T" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "id {id}");
    }
}

#[actix_web::test]
async fn test_update_with_blank_title_is_rejected() {
    let state = seeded_state(1).await;
    let app = init_app!(state);
    let post = state.posts.list_all().await.unwrap().remove(0);

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .set_json(json!({ "title": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.posts.get(post.id).await.unwrap().title, post.title);
}

#[actix_web::test]
async fn test_update_with_empty_body_changes_nothing() {
    let state = seeded_state(1).await;
    let app = init_app!(state);
    let post = state.posts.list_all().await.unwrap().remove(0);

    for body in [json!({}), json!({ "title": null })] {
        let req = test::TestRequest::put()
            .uri(&format!("/posts/{}", post.id))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT, "body {body}");
    }

    let stored = state.posts.get(post.id).await.unwrap();
    assert_eq!(stored, post);
}

#[actix_web::test]
async fn test_store_failure_hides_the_cause() {
    let app = init_app!(AppState::with_repository(Arc::new(UnreachableRepository)));

    let requests = [
        test::TestRequest::get().uri("/posts").to_request(),
        test::TestRequest::delete()
            .uri(&format!("/posts/{}", Uuid::new_v4()))
            .to_request(),
    ];
    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(is_json(&resp));

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 500);
        assert_eq!(body["title"], "Internal Server Error");
        assert!(body.get("detail").is_none());
        assert!(!body.to_string().contains("10.0.0.5"));
    }
}

#[actix_web::test]
async fn test_unsupported_method_on_posts() {
    let state = seeded_state(1).await;
    let app = init_app!(state);
    let post = state.posts.list_all().await.unwrap().remove(0);

    let req = test::TestRequest::patch().uri("/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::patch()
        .uri(&format!("/posts/{}", post.id))
        .set_json(json!({ "title": "T" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(state.posts.get(post.id).await.unwrap().title, post.title);
}

#[actix_web::test]
async fn test_delete_post() {
    let state = seeded_state(3).await;
    let app = init_app!(state);
    let post = state.posts.list_all().await.unwrap().remove(0);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    assert!(matches!(
        state.posts.get(post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert_eq!(state.posts.count().await.unwrap(), 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_update_delete_scenario() {
    let state = AppState::in_memory();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({
            "author": { "firstName": "Ada", "lastName": "Lovelace" },
            "title": "T",
            "content": "C"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["authorName"], "Ada Lovelace");
    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{id}"))
        .set_json(json!({ "title": "T2" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
    let stored = state.posts.get(id).await.unwrap();
    assert_eq!(stored.title, "T2");
    assert_eq!(stored.content, "C");

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
    assert!(matches!(
        state.posts.get(id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[actix_web::test]
async fn test_health_check() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
