//! `ProjectRepo` implementation: project records, rosters, and the derived
//! statistics counts.

use crate::{blob_to_uuid, db_err, uuid_to_blob, SqliteRepo};
use async_trait::async_trait;
use cf_core::error::{AppError, Result};
use cf_core::models::{NewProject, Project, ProjectPatch, UserStats};
use cf_core::traits::ProjectRepo;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

fn project_from_row(row: &SqliteRow, contributors: Vec<Uuid>) -> Project {
    Project {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        description: row.get("description"),
        owner_id: blob_to_uuid(row.get::<Vec<u8>, _>("owner_id").as_slice()),
        maximum_collaborators: row.get::<i64, _>("maximum_collaborators") as u32,
        contributors,
        completed: row.get("completed"),
        created_at: row.get("created_at"),
    }
}

impl SqliteRepo {
    async fn contributors_of(&self, project_id: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query("SELECT user_id FROM project_contributors WHERE project_id = ?")
            .bind(uuid_to_blob(project_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows
            .iter()
            .map(|r| blob_to_uuid(r.get::<Vec<u8>, _>("user_id").as_slice()))
            .collect())
    }

    /// Hydrates a batch of project rows with their rosters in one extra
    /// query instead of one per project.
    async fn hydrate(&self, rows: Vec<SqliteRow>) -> Result<Vec<Project>> {
        let all = sqlx::query("SELECT project_id, user_id FROM project_contributors")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        let mut rosters: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in &all {
            rosters
                .entry(blob_to_uuid(row.get::<Vec<u8>, _>("project_id").as_slice()))
                .or_default()
                .push(blob_to_uuid(row.get::<Vec<u8>, _>("user_id").as_slice()));
        }
        Ok(rows
            .iter()
            .map(|row| {
                let id = blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice());
                project_from_row(row, rosters.remove(&id).unwrap_or_default())
            })
            .collect())
    }
}

#[async_trait]
impl ProjectRepo for SqliteRepo {
    async fn create(&self, new: NewProject, seed_contributors: &[Uuid]) -> Result<Project> {
        let id = Uuid::now_v7();
        let created_at = Utc::now();

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query(
            "INSERT INTO projects (id, name, description, owner_id, maximum_collaborators, completed, created_at) \
             VALUES (?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(uuid_to_blob(id))
        .bind(&new.name)
        .bind(&new.description)
        .bind(uuid_to_blob(new.owner_id))
        .bind(new.maximum_collaborators as i64)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        // Owner-seeded direct adds bypass negotiation entirely. OR IGNORE
        // dedupes a handle listed twice.
        for user_id in seed_contributors {
            sqlx::query("INSERT OR IGNORE INTO project_contributors (project_id, user_id) VALUES (?, ?)")
                .bind(uuid_to_blob(id))
                .bind(uuid_to_blob(*user_id))
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;

        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal("project vanished after insert".into()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        match row {
            Some(row) => {
                let contributors = self.contributors_of(id).await?;
                Ok(Some(project_from_row(&row, contributors)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        self.hydrate(rows).await
    }

    async fn list_open(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT p.* FROM projects p \
             WHERE p.completed = 0 \
               AND (SELECT COUNT(*) FROM project_contributors c WHERE c.project_id = p.id) \
                   < p.maximum_collaborators \
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        self.hydrate(rows).await
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query("SELECT name, description, maximum_collaborators FROM projects WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound("project".into()))?;

        let name = patch.name.unwrap_or_else(|| row.get("name"));
        let description = patch.description.unwrap_or_else(|| row.get("description"));
        let maximum = patch
            .maximum_collaborators
            .map(|m| m as i64)
            .unwrap_or_else(|| row.get("maximum_collaborators"));

        sqlx::query("UPDATE projects SET name = ?, description = ?, maximum_collaborators = ? WHERE id = ?")
            .bind(&name)
            .bind(&description)
            .bind(maximum)
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        self.get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("project".into()))
    }

    async fn mark_completed(&self, id: Uuid) -> Result<()> {
        // Idempotent: rewriting completed=1 on a completed project is a
        // no-op success, not an error.
        let done = sqlx::query("UPDATE projects SET completed = 1 WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound("project".into()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // Interests and roster rows go with it via ON DELETE CASCADE.
        let done = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound("project".into()));
        }
        Ok(())
    }

    async fn stats_for(&self, user_id: Uuid) -> Result<UserStats> {
        let created: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE owner_id = ?")
            .bind(uuid_to_blob(user_id))
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        let contributed: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_contributors WHERE user_id = ?")
                .bind(uuid_to_blob(user_id))
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(UserStats {
            projects_created: created as u64,
            projects_contributed: contributed as u64,
        })
    }
}
