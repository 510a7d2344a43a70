use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct QuoteRow {
    pub id: i64,
    pub text: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

/// Row shape shared by the `stories` and `blogs` tables.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct ForumPostRow {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct ContactMessageRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuoteInput {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ForumPostInput {
    pub name: String,
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Stories and blogs live in separate tables with identical columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArticleKind {
    Story,
    Blog,
}

impl ArticleKind {
    pub fn table(self) -> &'static str {
        match self {
            ArticleKind::Story => "stories",
            ArticleKind::Blog => "blogs",
        }
    }

    /// Key under which a single record is returned in mutation responses.
    pub fn key(self) -> &'static str {
        match self {
            ArticleKind::Story => "story",
            ArticleKind::Blog => "blog",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            ArticleKind::Story => "Story not found",
            ArticleKind::Blog => "Blog not found",
        }
    }
}
