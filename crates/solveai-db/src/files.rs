//! Context file repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, Transaction};
use tracing::debug;
use uuid::Uuid;

use solveai_core::{new_v7, ContextFile, Error, FileRepository, NewContextFile, Result};

/// SQLite implementation of FileRepository.
#[derive(Clone)]
pub struct SqliteFileRepository {
    pool: Pool<Sqlite>,
}

impl SqliteFileRepository {
    /// Create a new SqliteFileRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn row_to_file(r: &SqliteRow) -> ContextFile {
    ContextFile {
        id: r.get("id"),
        folder_id: r.get("folder_id"),
        name: r.get("name"),
        mime_type: r.get("mime_type"),
        size: r.get("size"),
        data: r.get("data"),
        extracted_text: r.get("extracted_text"),
        created_at: r.get("created_at"),
    }
}

/// Map a foreign key violation on insert to a missing folder.
fn map_insert_error(err: sqlx::Error, folder_id: Uuid) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.message().contains("FOREIGN KEY constraint failed") {
            return Error::FolderNotFound(folder_id);
        }
    }
    Error::Database(err)
}

#[async_trait]
impl FileRepository for SqliteFileRepository {
    async fn add(&self, file: NewContextFile) -> Result<ContextFile> {
        let record = ContextFile {
            id: new_v7(),
            folder_id: file.folder_id,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size,
            data: file.data,
            extracted_text: file.extracted_text,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO context_file
                (id, folder_id, name, mime_type, size, data, extracted_text, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(record.folder_id)
        .bind(&record.name)
        .bind(&record.mime_type)
        .bind(record.size)
        .bind(&record.data)
        .bind(&record.extracted_text)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, record.folder_id))?;

        debug!(
            subsystem = "database",
            component = "files",
            op = "add",
            file_id = %record.id,
            folder_id = %record.folder_id,
            size = record.size,
            "Stored context file"
        );
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ContextFile>> {
        let row = sqlx::query(
            "SELECT id, folder_id, name, mime_type, size, data, extracted_text, created_at
             FROM context_file WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_file))
    }

    async fn list_by_folder(&self, folder_id: Uuid) -> Result<Vec<ContextFile>> {
        let rows = sqlx::query(
            "SELECT id, folder_id, name, mime_type, size, data, extracted_text, created_at
             FROM context_file INDEXED BY idx_context_file_folder_id
             WHERE folder_id = ?
             ORDER BY created_at, id",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(row_to_file).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM context_file WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn set_extracted_text(&self, id: Uuid, text: &str) -> Result<()> {
        let result = sqlx::query("UPDATE context_file SET extracted_text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("File {} not found", id)));
        }
        Ok(())
    }

    async fn count_by_folder(&self, folder_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM context_file INDEXED BY idx_context_file_folder_id
             WHERE folder_id = ?",
        )
        .bind(folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(count)
    }
}

/// Transaction-aware variants used by the folder cascade.
impl SqliteFileRepository {
    /// List the ids of a folder's files within an existing transaction.
    pub async fn list_ids_by_folder_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        folder_id: Uuid,
    ) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            "SELECT id FROM context_file INDEXED BY idx_context_file_folder_id
             WHERE folder_id = ?",
        )
        .bind(folder_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(|r| r.get("id")).collect())
    }

    /// Delete one file within an existing transaction.
    pub async fn delete_tx(&self, tx: &mut Transaction<'_, Sqlite>, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM context_file WHERE id = ?")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
