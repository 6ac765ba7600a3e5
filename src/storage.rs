//! Local persistence for templates, the working draft, courses, and stations.
//!
//! Everything lives in one `SQLite` database:
//!
//! ```text
//! ~/.drill/drill.sqlite
//!   slot       # key/value documents: "templates", "draft"
//!   course     # append-only saved courses
//!   station    # the station roster, seeded on first open
//! ```

mod course;
mod slot;
mod station;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("course not found: {0}")]
    CourseNotFound(Uuid),

    #[error("station not found: {0}")]
    StationNotFound(String),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS slot (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS course (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        created_at TEXT NOT NULL,
        status TEXT NOT NULL,
        total_time_minutes INTEGER NOT NULL,
        total_exercise_count INTEGER NOT NULL,
        exercises TEXT NOT NULL,
        assigned_stations TEXT NOT NULL,
        schedule_start TEXT,
        schedule_end TEXT
    );
    CREATE TABLE IF NOT EXISTS station (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        status TEXT NOT NULL,
        location TEXT NOT NULL,
        assigned_course_id TEXT
    );
";

/// `SQLite`-backed storage for everything drill persists.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the database at `path` and ensures the schema.
    ///
    /// Parent directories are created if they don't exist. A fresh database
    /// gets the default station roster.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        let storage = Self { conn };
        storage.seed_stations()?;
        Ok(storage)
    }

    /// Returns the default database path: `~/.drill/drill.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".drill").join("drill.sqlite"))
    }
}

#[cfg(test)]
pub(crate) fn test_storage() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::TempDir::new().unwrap();
    let storage = Storage::open(dir.path().join("drill").join("drill.sqlite")).unwrap();
    (dir, storage)
}
