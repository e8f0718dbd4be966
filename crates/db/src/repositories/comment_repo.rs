//! Repository for the `comments` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use biograph_core::comment::Comment;

use crate::models::comment::CreateComment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, entry_id, body, commenter, commenter_id, posted_at";

fn comment_from_row(row: PgRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        entry_id: row.try_get("entry_id")?,
        body: row.try_get("body")?,
        commenter: row.try_get("commenter")?,
        commenter_id: row.try_get("commenter_id")?,
        posted_at: row.try_get("posted_at")?,
    })
}

/// Provides read and insert operations for comments. Comments are never
/// edited or deleted.
pub struct CommentRepo;

impl CommentRepo {
    /// List all comments in insertion order (id order matches creation
    /// order, which is chronological).
    pub async fn list(pool: &PgPool) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments ORDER BY id");
        sqlx::query(&query)
            .try_map(comment_from_row)
            .fetch_all(pool)
            .await
    }

    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (entry_id, body, commenter, commenter_id, posted_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query(&query)
            .bind(input.entry_id)
            .bind(&input.body)
            .bind(&input.commenter)
            .bind(&input.commenter_id)
            .bind(&input.posted_at)
            .try_map(comment_from_row)
            .fetch_one(pool)
            .await
    }
}
