//! # cf-db-sqlite Implementation
//!
//! This crate implements the data mapping between the SQLite relational
//! model and the `cf-core` domain models, and owns every transactional
//! section the negotiation engine relies on.
//!
//! SQLite permits a single writer at a time. We run the pool with one
//! connection, so the pool itself serializes conflicting writes and each
//! multi-statement section below executes without interleaving. That is the
//! concurrency model the capacity and quota invariants assume.

mod interests;
mod projects;
mod users;


use cf_core::error::AppError;
use cf_core::models::Skill;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use uuid::Uuid;

/// Repository handle implementing `UserRepo`, `ProjectRepo` and
/// `InterestRepo` against one SQLite database.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Opens (creating if missing) the database at `url`, applies the schema
    /// and seeds the read-only skill catalog.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect_with(opts)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;
        log::info!("sqlite repository ready at {url}");
        Ok(repo)
    }

    async fn init_schema(&self) -> anyhow::Result<()> {
        // Raw (unprepared) execution: the schema is a multi-statement batch.
        use sqlx::Executor;
        self.pool.execute(SCHEMA).await?;

        // The catalog is seeded once and treated as read-only afterwards;
        // user_skills rows reference it for integrity only.
        for skill in Skill::ALL {
            sqlx::query("INSERT OR IGNORE INTO skills (name) VALUES (?)")
                .bind(skill.code())
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Test-only escape hatch for inspecting raw state.
    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            BLOB PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    first_name    TEXT NOT NULL DEFAULT '',
    last_name     TEXT NOT NULL DEFAULT '',
    age           INTEGER,
    country       TEXT NOT NULL DEFAULT '',
    residence     TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS skills (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS user_skills (
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    skill   TEXT NOT NULL REFERENCES skills(name) ON DELETE CASCADE,
    level   TEXT NOT NULL,
    UNIQUE (user_id, skill)
);

CREATE TABLE IF NOT EXISTS projects (
    id                    BLOB PRIMARY KEY,
    name                  TEXT NOT NULL,
    description           TEXT NOT NULL DEFAULT '',
    owner_id              BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    maximum_collaborators INTEGER NOT NULL DEFAULT 1,
    completed             INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS project_contributors (
    project_id BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    user_id    BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    UNIQUE (project_id, user_id)
);

CREATE TABLE IF NOT EXISTS project_interests (
    id           BLOB PRIMARY KEY,
    project_id   BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    user_id      BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    status       TEXT NOT NULL DEFAULT 'pending',
    expressed_at TEXT NOT NULL,
    UNIQUE (project_id, user_id)
);

CREATE TABLE IF NOT EXISTS auth_tokens (
    key        TEXT PRIMARY KEY,
    user_id    BLOB NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);
"#;

// Helpers for UUID conversion
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

/// Wraps an infrastructure-level sqlx failure.
pub(crate) fn db_err(err: sqlx::Error) -> AppError {
    AppError::Internal(format!("database error: {err}"))
}

/// True when the error is a UNIQUE constraint violation. Races that slip
/// past a pre-check land here and must be re-surfaced as business errors.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}
