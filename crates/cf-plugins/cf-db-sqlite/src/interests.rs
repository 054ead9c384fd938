//! `InterestRepo` implementation: the negotiation state machine's
//! transactional sections.
//!
//! Every transition runs its guards and its effects inside one transaction,
//! so capacity re-checks cannot interleave with roster growth. Two accepts
//! racing for the last seat serialize at the pool; the loser re-reads a full
//! roster and fails `ProjectFull` with no partial effect.

use crate::{blob_to_uuid, db_err, is_unique_violation, uuid_to_blob, SqliteRepo};
use async_trait::async_trait;
use cf_core::error::{AppError, Result};
use cf_core::models::{InterestStatus, ProjectInterest};
use cf_core::traits::InterestRepo;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use std::str::FromStr;
use uuid::Uuid;

fn interest_from_row(row: &SqliteRow) -> Result<ProjectInterest> {
    let status: String = row.get("status");
    Ok(ProjectInterest {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        user_id: blob_to_uuid(row.get::<Vec<u8>, _>("user_id").as_slice()),
        project_id: blob_to_uuid(row.get::<Vec<u8>, _>("project_id").as_slice()),
        status: InterestStatus::from_str(&status)
            .map_err(|_| AppError::Internal(format!("unknown interest status in storage: {status}")))?,
        expressed_at: row.get("expressed_at"),
    })
}

/// Reads capacity state under the current transaction and fails
/// `ProjectFull` unless a seat is genuinely free right now.
async fn check_available_seats(tx: &mut Transaction<'_, Sqlite>, project_id: Uuid) -> Result<()> {
    let row = sqlx::query("SELECT maximum_collaborators, completed FROM projects WHERE id = ?")
        .bind(uuid_to_blob(project_id))
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_err)?
        .ok_or_else(|| AppError::NotFound("project".into()))?;
    let capacity: i64 = row.get("maximum_collaborators");
    let completed: bool = row.get("completed");

    let roster: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM project_contributors WHERE project_id = ?")
            .bind(uuid_to_blob(project_id))
            .fetch_one(&mut **tx)
            .await
            .map_err(db_err)?;

    if completed || roster >= capacity {
        return Err(AppError::ProjectFull);
    }
    Ok(())
}

#[async_trait]
impl InterestRepo for SqliteRepo {
    async fn express(&self, user_id: Uuid, project_id: Uuid) -> Result<ProjectInterest> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Any prior record for the pair blocks a fresh expression,
        // terminal states included.
        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM project_interests WHERE user_id = ? AND project_id = ?",
        )
        .bind(uuid_to_blob(user_id))
        .bind(uuid_to_blob(project_id))
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;
        if existing > 0 {
            return Err(AppError::DuplicateInterest);
        }

        check_available_seats(&mut tx, project_id).await?;

        let interest = ProjectInterest {
            id: Uuid::now_v7(),
            user_id,
            project_id,
            status: InterestStatus::Pending,
            expressed_at: Utc::now(),
        };
        let res = sqlx::query(
            "INSERT INTO project_interests (id, project_id, user_id, status, expressed_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(interest.id))
        .bind(uuid_to_blob(project_id))
        .bind(uuid_to_blob(user_id))
        .bind(interest.status.code())
        .bind(interest.expressed_at)
        .execute(&mut *tx)
        .await;
        match res {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(AppError::DuplicateInterest),
            Err(e) => return Err(db_err(e)),
        }

        tx.commit().await.map_err(db_err)?;
        Ok(interest)
    }

    async fn get_for_project(
        &self,
        project_id: Uuid,
        interest_id: Uuid,
    ) -> Result<Option<ProjectInterest>> {
        let row = sqlx::query("SELECT * FROM project_interests WHERE id = ? AND project_id = ?")
            .bind(uuid_to_blob(interest_id))
            .bind(uuid_to_blob(project_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(interest_from_row).transpose()
    }

    async fn pending_for_project(&self, project_id: Uuid) -> Result<Vec<ProjectInterest>> {
        let rows = sqlx::query(
            "SELECT * FROM project_interests WHERE project_id = ? AND status = 'pending' \
             ORDER BY expressed_at ASC, id ASC",
        )
        .bind(uuid_to_blob(project_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(interest_from_row).collect()
    }

    async fn accept(&self, interest_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query("SELECT * FROM project_interests WHERE id = ?")
            .bind(uuid_to_blob(interest_id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound("interest".into()))?;
        let interest = interest_from_row(&row)?;
        if !interest.can_be_handled() {
            return Err(AppError::AlreadyHandled);
        }

        // Capacity is re-validated here, not only at expression time:
        // more applicants than seats may be pending, and acceptance is
        // first-come-first-served among the owner's decisions.
        check_available_seats(&mut tx, interest.project_id).await?;

        sqlx::query("UPDATE project_interests SET status = 'accepted' WHERE id = ?")
            .bind(uuid_to_blob(interest_id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        sqlx::query(
            "INSERT OR IGNORE INTO project_contributors (project_id, user_id) VALUES (?, ?)",
        )
        .bind(uuid_to_blob(interest.project_id))
        .bind(uuid_to_blob(interest.user_id))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn decline(&self, interest_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query("SELECT * FROM project_interests WHERE id = ?")
            .bind(uuid_to_blob(interest_id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound("interest".into()))?;
        if !interest_from_row(&row)?.can_be_handled() {
            return Err(AppError::AlreadyHandled);
        }

        sqlx::query("UPDATE project_interests SET status = 'declined' WHERE id = ?")
            .bind(uuid_to_blob(interest_id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}
