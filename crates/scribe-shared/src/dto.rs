//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author as sent and received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request to create a post. Presence is checked by the server, not by serde,
/// so a missing field yields a descriptive 400 instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author: Option<AuthorPayload>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// Request to update a post. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A post as returned by the list and get endpoints.
/// `author` is the author's full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    pub title: String,
    pub created: DateTime<Utc>,
}

/// Author object in a create response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub first_name: String,
    pub last_name: String,
}

/// A freshly created post: the structured author plus the derived name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostResponse {
    pub id: Uuid,
    pub author: AuthorResponse,
    pub author_name: String,
    pub content: String,
    pub title: String,
    pub created: DateTime<Utc>,
}
