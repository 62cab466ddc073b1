//! Database schema migrations.
//!
//! Applies the `environmental_data` and forum schemas and records applied
//! versions in `schema_migrations`.

use rusqlite::Connection;
use tracing::info;

use ecobot_core::error::EcobotError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), EcobotError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| EcobotError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| EcobotError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: environmental_data");
    }

    if current_version < 2 {
        apply_v2(conn)?;
        info!("Applied migration v2: forum");
    }

    Ok(())
}

/// Version 1: environmental measurements.
fn apply_v1(conn: &Connection) -> Result<(), EcobotError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS environmental_data (
            id              TEXT PRIMARY KEY NOT NULL,
            type            TEXT NOT NULL
                            CHECK (type IN ('air', 'water', 'temperature')),
            value           REAL NOT NULL,
            unit            TEXT NOT NULL DEFAULT '',
            location        TEXT NOT NULL DEFAULT '',
            status          TEXT NOT NULL
                            CHECK (status IN ('good', 'moderate', 'poor', 'hazardous')),
            recorded_at     INTEGER NOT NULL,
            dia_da_semana   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_environmental_data_recorded_at
            ON environmental_data (recorded_at DESC);

        CREATE INDEX IF NOT EXISTS idx_environmental_data_type
            ON environmental_data (type, recorded_at DESC);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'environmental_data');
        ",
    )
    .map_err(|e| EcobotError::Storage(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}

/// Version 2: forum posts and comments.
fn apply_v2(conn: &Connection) -> Result<(), EcobotError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS forum_posts (
            id              TEXT PRIMARY KEY NOT NULL,
            title           TEXT NOT NULL,
            content         TEXT NOT NULL,
            author_id       TEXT NOT NULL,
            author_name     TEXT NOT NULL,
            author_avatar   TEXT,
            created_at      INTEGER NOT NULL,
            updated_at      INTEGER NOT NULL,
            likes           INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
            tags            TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_forum_posts_created_at
            ON forum_posts (created_at DESC);

        CREATE TABLE IF NOT EXISTS forum_comments (
            id              TEXT PRIMARY KEY NOT NULL,
            post_id         TEXT NOT NULL REFERENCES forum_posts (id) ON DELETE CASCADE,
            content         TEXT NOT NULL,
            author_id       TEXT NOT NULL,
            author_name     TEXT NOT NULL,
            author_avatar   TEXT,
            created_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_forum_comments_post
            ON forum_comments (post_id, created_at);

        INSERT INTO schema_migrations (version, name) VALUES (2, 'forum');
        ",
    )
    .map_err(|e| EcobotError::Storage(format!("Migration v2 failed: {}", e)))?;

    Ok(())
}
