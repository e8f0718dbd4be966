//! Repository for the `entries` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use biograph_core::entry::Entry;
use biograph_core::types::DbId;

use crate::models::entry::{AssignEntries, CreateEntry, UnassignEntries};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, given_names, family_name, birth, death, \
    short_description, link, status, assigned_to, assigned_id";

fn entry_from_row(row: PgRow) -> Result<Entry, sqlx::Error> {
    Ok(Entry {
        id: row.try_get("id")?,
        given_names: row.try_get("given_names")?,
        family_name: row.try_get("family_name")?,
        birth: row.try_get("birth")?,
        death: row.try_get("death")?,
        short_description: row.try_get("short_description")?,
        link: row.try_get("link")?,
        status: row.try_get("status")?,
        assigned_to: row.try_get("assigned_to")?,
        assigned_id: row.try_get("assigned_id")?,
    })
}

/// Provides CRUD and batch-assignment operations for entries.
pub struct EntryRepo;

impl EntryRepo {
    /// List all entries in id order. The table is read whole; pagination
    /// and filtering happen client-side.
    pub async fn list(pool: &PgPool) -> Result<Vec<Entry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM entries ORDER BY id");
        sqlx::query(&query)
            .try_map(entry_from_row)
            .fetch_all(pool)
            .await
    }

    /// Insert a new entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEntry) -> Result<Entry, sqlx::Error> {
        let query = format!(
            "INSERT INTO entries
                (given_names, family_name, birth, death, short_description, link, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query(&query)
            .bind(&input.given_names)
            .bind(&input.family_name)
            .bind(&input.birth)
            .bind(&input.death)
            .bind(&input.short_description)
            .bind(&input.link)
            .bind(&input.status)
            .try_map(entry_from_row)
            .fetch_one(pool)
            .await
    }

    /// Set both assignment fields on every selected entry in one statement.
    ///
    /// Returns the number of rows updated. Re-assigning an already assigned
    /// entry simply overwrites both fields (idempotent for equal values).
    pub async fn assign(pool: &PgPool, input: &AssignEntries) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE entries SET assigned_to = $1, assigned_id = $2 WHERE id = ANY($3)",
        )
        .bind(&input.assigned_to)
        .bind(&input.assigned_id)
        .bind(&input.entry_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear both assignment fields on every selected entry.
    ///
    /// Clearing an unassigned entry is a no-op at the row level.
    pub async fn unassign(pool: &PgPool, input: &UnassignEntries) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE entries SET assigned_to = NULL, assigned_id = NULL WHERE id = ANY($1)",
        )
        .bind(&input.entry_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Update a single entry's review status, returning the updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Entry>, sqlx::Error> {
        let query = format!(
            "UPDATE entries SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query(&query)
            .bind(id)
            .bind(status)
            .try_map(entry_from_row)
            .fetch_optional(pool)
            .await
    }
}
