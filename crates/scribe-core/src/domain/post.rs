use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// The author embedded in every post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Post entity - a blog post with an embedded author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
}

impl Post {
    /// Create a post from an already validated draft, assigning a fresh id.
    pub fn new(draft: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: draft.author,
            title: draft.title,
            content: draft.content,
            created: draft.created.unwrap_or_else(Utc::now),
        }
    }

    /// Derived from `author`; never stored.
    pub fn author_name(&self) -> String {
        self.author.full_name()
    }

    /// Apply the revisable fields of `patch`, leaving everything else untouched.
    pub fn apply(&mut self, patch: &PostPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
    }
}

/// Client-supplied payload for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created: Option<DateTime<Utc>>,
}

impl NewPost {
    /// Every required field must be present and non-blank.
    ///
    /// All missing fields are reported at once, in declaration order.
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("author.firstName", &self.author.first_name),
            ("author.lastName", &self.author.last_name),
            ("title", &self.title),
            ("content", &self.content),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Partial update. Only `title` and `content` are revisable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Supplied fields may not be blank; omitted fields are fine.
    pub fn validate(&self) -> Result<(), DomainError> {
        let blank: Vec<&str> = [("title", &self.title), ("content", &self.content)]
            .into_iter()
            .filter_map(|(name, value)| match value {
                Some(v) if v.trim().is_empty() => Some(name),
                _ => None,
            })
            .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "Field(s) may not be empty: {}",
                blank.join(", ")
            )))
        }
    }
}
