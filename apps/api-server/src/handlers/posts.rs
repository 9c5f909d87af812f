//! Blog post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::{Author, NewPost, Post, PostPatch};
use scribe_shared::dto::{
    AuthorResponse, CreatePostRequest, CreatedPostResponse, PostResponse, UpdatePostRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all().await?;
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(new_post(body.into_inner())).await?;

    tracing::info!(post_id = %post.id, "Post created");

    Ok(HttpResponse::Created().json(created_response(&post)))
}

/// PUT /posts/{id}
///
/// Only `title` and `content` are applied; anything else in the body is ignored.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let req = body.into_inner();
    let patch = PostPatch {
        title: req.title,
        content: req.content,
    };

    state.posts.update(id, patch).await?;

    tracing::info!(post_id = %id, "Post updated");

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    state.posts.remove(id).await?;

    tracing::info!(post_id = %id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// A malformed id cannot name any post, so it is reported as not found.
fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Post with id {} not found", raw)))
}

/// Missing fields become empty strings and are rejected by validation.
fn new_post(req: CreatePostRequest) -> NewPost {
    let author = req.author.unwrap_or_default();
    NewPost {
        author: Author::new(
            author.first_name.unwrap_or_default(),
            author.last_name.unwrap_or_default(),
        ),
        title: req.title.unwrap_or_default(),
        content: req.content.unwrap_or_default(),
        created: req.created,
    }
}

fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author: post.author_name(),
        content: post.content.clone(),
        title: post.title.clone(),
        created: post.created,
    }
}

fn created_response(post: &Post) -> CreatedPostResponse {
    CreatedPostResponse {
        id: post.id,
        author: AuthorResponse {
            first_name: post.author.first_name.clone(),
            last_name: post.author.last_name.clone(),
        },
        author_name: post.author_name(),
        content: post.content.clone(),
        title: post.title.clone(),
        created: post.created,
    }
}
