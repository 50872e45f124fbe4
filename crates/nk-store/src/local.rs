//! libSQL note backend.
//!
//! One `notes` table in a local file, or `:memory:` for tests. Mirrors the
//! hosted store's semantics: provider-style random ids, owner filter, newest
//! first, and update of a missing note fails.

use libsql::Builder;
use nk_core::{Note, NoteFields};

use crate::error::StoreError;
use crate::helpers::{format_timestamp, get_opt_string, now, parse_datetime, parse_optional_datetime};
use crate::record::NoteRecord;
use crate::store::NoteStore;

const SELECT_COLUMNS: &str = "SELECT id, user_id, title, content, created_at, updated_at FROM notes";

fn row_to_record(row: &libsql::Row) -> Result<NoteRecord, StoreError> {
    Ok(NoteRecord {
        id: row.get::<String>(0)?,
        user_id: get_opt_string(row, 1)?,
        title: get_opt_string(row, 2)?,
        content: get_opt_string(row, 3)?,
        created_at: Some(parse_datetime(&row.get::<String>(4)?)?),
        updated_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
    })
}

/// Notes kept in a local libSQL database.
pub struct LocalStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LocalStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::Migration(format!("create {}: {e}", parent.display()))
                    })?;
                }
            }
        }
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(path, "local note store opened");
        Ok(store)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a document id: 20 lowercase hex characters.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or returns no rows.
    pub async fn generate_id(&self) -> Result<String, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT lower(hex(randomblob(10)))", ())
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| StoreError::Parse("id generation returned no row".into()))?;
        Ok(row.get::<String>(0)?)
    }
}

impl NoteStore for LocalStore {
    async fn insert(&self, owner_id: &str, fields: &NoteFields) -> Result<Note, StoreError> {
        let id = self.generate_id().await?;
        let created_at = now();
        self.conn
            .execute(
                "INSERT INTO notes (id, user_id, title, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    owner_id,
                    fields.title.as_str(),
                    fields.content.as_str(),
                    format_timestamp(&created_at)
                ],
            )
            .await?;

        Note::try_from(NoteRecord {
            id,
            user_id: Some(owner_id.to_string()),
            title: Some(fields.title.clone()),
            content: Some(fields.content.clone()),
            created_at: Some(created_at),
            updated_at: None,
        })
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Note>, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC"),
                [owner_id],
            )
            .await?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next().await? {
            match row_to_record(&row).and_then(Note::try_from) {
                Ok(note) => notes.push(note),
                Err(error) => {
                    let id = row.get::<String>(0).unwrap_or_default();
                    tracing::warn!(%error, id = %id, "skipping unreadable note");
                }
            }
        }
        Ok(notes)
    }

    async fn update(&self, note_id: &str, fields: &NoteFields) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE notes SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
                libsql::params![
                    fields.title.as_str(),
                    fields.content.as_str(),
                    format_timestamp(&now()),
                    note_id
                ],
            )
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                id: note_id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, note_id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM notes WHERE id = ?1", [note_id])
            .await?;
        Ok(())
    }
}
