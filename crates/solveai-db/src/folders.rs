//! Folder repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};
use uuid::Uuid;

use solveai_core::{new_v7, Error, Folder, FolderPatch, FolderRepository, Result};

use crate::files::SqliteFileRepository;

/// SQLite implementation of FolderRepository.
///
/// Holds a file repository so deletion can cascade through it.
#[derive(Clone)]
pub struct SqliteFolderRepository {
    pool: Pool<Sqlite>,
    files: SqliteFileRepository,
}

impl SqliteFolderRepository {
    /// Create a new SqliteFolderRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        let files = SqliteFileRepository::new(pool.clone());
        Self { pool, files }
    }
}

fn row_to_folder(r: &SqliteRow) -> Folder {
    Folder {
        id: r.get("id"),
        name: r.get("name"),
        book_reference: r.get("book_reference"),
        notes: r.get("notes"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl FolderRepository for SqliteFolderRepository {
    async fn create(&self, name: &str) -> Result<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Folder name is required".to_string()));
        }

        let folder = Folder {
            id: new_v7(),
            name: name.to_string(),
            book_reference: None,
            notes: None,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO folder (id, name, created_at) VALUES (?, ?, ?)")
            .bind(folder.id)
            .bind(&folder.name)
            .bind(folder.created_at)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "folders",
            op = "create",
            folder_id = %folder.id,
            "Created folder"
        );
        Ok(folder)
    }

    async fn list(&self) -> Result<Vec<Folder>> {
        let rows = sqlx::query(
            "SELECT id, name, book_reference, notes, created_at
             FROM folder
             ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(row_to_folder).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Folder>> {
        let row = sqlx::query(
            "SELECT id, name, book_reference, notes, created_at FROM folder WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_folder))
    }

    async fn update(&self, id: Uuid, patch: FolderPatch) -> Result<Folder> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query(
            "SELECT id, name, book_reference, notes, created_at FROM folder WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let mut folder = row
            .as_ref()
            .map(row_to_folder)
            .ok_or(Error::FolderNotFound(id))?;
        patch.apply(&mut folder);

        sqlx::query("UPDATE folder SET book_reference = ?, notes = ? WHERE id = ?")
            .bind(&folder.book_reference)
            .bind(&folder.notes)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "folders",
            op = "update",
            folder_id = %id,
            "Updated folder metadata"
        );
        Ok(folder)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Files go first so no file ever points at a missing folder.
        let file_ids = self.files.list_ids_by_folder_tx(&mut tx, id).await?;
        for file_id in &file_ids {
            self.files.delete_tx(&mut tx, *file_id).await?;
        }

        sqlx::query("DELETE FROM folder WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "folders",
            op = "delete",
            folder_id = %id,
            files_deleted = file_ids.len(),
            "Deleted folder"
        );
        Ok(())
    }
}
