//! Grid store lifecycle: opening the database and ensuring the schema.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::DbError;

/// Default path for the grid database.
pub const DEFAULT_DB_PATH: &str = "data/climate_grid.db";

/// Opens (or creates) the grid `SQLite` database at the given path and
/// ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database file cannot be created or the
/// schema DDL fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Database(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Opens an in-memory grid database with the schema applied.
///
/// Used by tests and short-lived tooling that doesn't need persistence.
///
/// # Errors
///
/// Returns [`DbError`] if the schema DDL fails.
pub async fn open_in_memory() -> Result<Box<dyn Database>, DbError> {
    let db = init_sqlite_rusqlite(None).map_err(|e| DbError::Database(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Creates the grid table and its indexes if they don't already exist.
///
/// The unique index enforces the six-column row key; the secondary index
/// serves the bounding-box prefilter used by the spatial query engine.
async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS climate_grid_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source TEXT NOT NULL,
            indicator_id TEXT NOT NULL,
            scenario TEXT NOT NULL,
            time_period TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            value REAL NOT NULL,
            unit TEXT NOT NULL,
            model TEXT,
            percentile INTEGER,
            data_source TEXT,
            updated_at TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_grid_row_key
         ON climate_grid_data (source, indicator_id, scenario, time_period, latitude, longitude)",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_grid_cell
         ON climate_grid_data (source, scenario, time_period, latitude, longitude)",
    )
    .await?;

    Ok(())
}
