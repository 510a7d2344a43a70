use chrono::Utc;
use sqlx::SqlitePool;

use super::models::{
    ArticleInput, ArticleKind, ArticleRow, ContactInput, ContactMessageRow, ForumPostInput,
    ForumPostRow, QuoteInput, QuoteRow,
};

const QUOTE_COLUMNS: &str = "id, text, author, image_url";
const ARTICLE_COLUMNS: &str = "id, title, content, image_url, created_at";
const FORUM_COLUMNS: &str = "id, name, message, created_at";
const CONTACT_COLUMNS: &str = "id, name, email, message, created_at";

pub async fn fetch_quotes(pool: &SqlitePool) -> sqlx::Result<Vec<QuoteRow>> {
    sqlx::query_as::<_, QuoteRow>(&format!("SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub async fn fetch_quote(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<QuoteRow>> {
    sqlx::query_as::<_, QuoteRow>(&format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_quote(pool: &SqlitePool, input: &QuoteInput) -> sqlx::Result<QuoteRow> {
    sqlx::query_as::<_, QuoteRow>(&format!(
        "INSERT INTO quotes (text, author, image_url) VALUES (?, ?, ?) RETURNING {QUOTE_COLUMNS}"
    ))
    .bind(&input.text)
    .bind(input.author.as_deref())
    .bind(input.image_url.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn update_quote(
    pool: &SqlitePool,
    id: i64,
    input: &QuoteInput,
) -> sqlx::Result<Option<QuoteRow>> {
    sqlx::query_as::<_, QuoteRow>(&format!(
        "UPDATE quotes SET text = ?, author = ?, image_url = ? WHERE id = ? RETURNING {QUOTE_COLUMNS}"
    ))
    .bind(&input.text)
    .bind(input.author.as_deref())
    .bind(input.image_url.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_articles(pool: &SqlitePool, kind: ArticleKind) -> sqlx::Result<Vec<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM {} ORDER BY created_at DESC, id DESC",
        kind.table()
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_article(
    pool: &SqlitePool,
    kind: ArticleKind,
    id: i64,
) -> sqlx::Result<Option<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM {} WHERE id = ?",
        kind.table()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_article(
    pool: &SqlitePool,
    kind: ArticleKind,
    input: &ArticleInput,
) -> sqlx::Result<ArticleRow> {
    sqlx::query_as::<_, ArticleRow>(&format!(
        "INSERT INTO {} (title, content, image_url, created_at) VALUES (?, ?, ?, ?) RETURNING {ARTICLE_COLUMNS}",
        kind.table()
    ))
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.image_url.as_deref())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Replaces the editable fields; `created_at` is left untouched.
pub async fn update_article(
    pool: &SqlitePool,
    kind: ArticleKind,
    id: i64,
    input: &ArticleInput,
) -> sqlx::Result<Option<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(&format!(
        "UPDATE {} SET title = ?, content = ?, image_url = ? WHERE id = ? RETURNING {ARTICLE_COLUMNS}",
        kind.table()
    ))
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.image_url.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_forum_posts(pool: &SqlitePool) -> sqlx::Result<Vec<ForumPostRow>> {
    sqlx::query_as::<_, ForumPostRow>(&format!(
        "SELECT {FORUM_COLUMNS} FROM forum_posts ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn insert_forum_post(
    pool: &SqlitePool,
    input: &ForumPostInput,
) -> sqlx::Result<ForumPostRow> {
    sqlx::query_as::<_, ForumPostRow>(&format!(
        "INSERT INTO forum_posts (name, message, created_at) VALUES (?, ?, ?) RETURNING {FORUM_COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.message)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn fetch_contact_messages(pool: &SqlitePool) -> sqlx::Result<Vec<ContactMessageRow>> {
    sqlx::query_as::<_, ContactMessageRow>(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contact_messages ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn insert_contact_message(
    pool: &SqlitePool,
    input: &ContactInput,
) -> sqlx::Result<ContactMessageRow> {
    sqlx::query_as::<_, ContactMessageRow>(&format!(
        "INSERT INTO contact_messages (name, email, message, created_at) VALUES (?, ?, ?, ?) RETURNING {CONTACT_COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.message)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Deletes a row by id from one of the content tables. Returns whether a row was removed.
pub async fn delete_row(pool: &SqlitePool, table: &'static str, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
