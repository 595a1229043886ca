//! # solveai-db
//!
//! SQLite local catalog for SolveAI.
//!
//! This crate provides:
//! - Connection pool management
//! - Folder and context file repositories
//! - Cascading folder deletion
//! - A process-wide shared handle
//!
//! ## Example
//!
//! ```rust,ignore
//! use solveai_db::{Database, FolderRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite::memory:").await?;
//!     db.migrate().await?;
//!
//!     let folder = db.folders.create("Física I").await?;
//!     println!("Created folder: {}", folder.id);
//!     Ok(())
//! }
//! ```
pub mod files;
pub mod folders;
pub mod pool;

// Re-export core types
pub use solveai_core::*;

pub use files::SqliteFileRepository;
pub use folders::SqliteFolderRepository;
pub use pool::{create_pool, create_pool_with_config, is_memory_url, PoolConfig};

#[cfg(feature = "migrations")]
static SHARED: tokio::sync::OnceCell<Database> = tokio::sync::OnceCell::const_new();

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Sqlite>,
    /// Folder repository.
    pub folders: SqliteFolderRepository,
    /// Context file repository.
    pub files: SqliteFileRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        Self {
            folders: SqliteFolderRepository::new(pool.clone()),
            files: SqliteFileRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Process-wide catalog handle, opened and migrated on first use.
    ///
    /// Concurrent first callers share one initialization. Later calls return
    /// the same instance and ignore `url`.
    #[cfg(feature = "migrations")]
    pub async fn shared(url: &str) -> Result<&'static Database> {
        SHARED
            .get_or_try_init(|| async {
                let db = Database::connect(url).await?;
                db.migrate().await?;
                Ok::<_, Error>(db)
            })
            .await
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }
}
