//! `UserRepo` implementation: accounts, the skill catalog, and auth tokens.

use crate::{blob_to_uuid, db_err, is_unique_violation, uuid_to_blob, SqliteRepo};
use async_trait::async_trait;
use cf_core::error::{AppError, Result, MAX_SKILLS_PER_USER};
use cf_core::models::{NewUser, Skill, SkillLevel, User, UserSkill};
use cf_core::traits::UserRepo;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

pub(crate) fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        age: row.get::<Option<i64>, _>("age").map(|a| a as u32),
        country: row.get("country"),
        residence: row.get("residence"),
        created_at: row.get("created_at"),
    }
}

fn skill_from_row(row: &SqliteRow) -> Result<UserSkill> {
    let code: String = row.get("skill");
    let level: String = row.get("level");
    Ok(UserSkill {
        user_id: blob_to_uuid(row.get::<Vec<u8>, _>("user_id").as_slice()),
        skill: Skill::from_str(&code)
            .map_err(|_| AppError::Internal(format!("unknown skill code in storage: {code}")))?,
        level: SkillLevel::from_str(&level)
            .map_err(|_| AppError::Internal(format!("unknown skill level in storage: {level}")))?,
    })
}

#[async_trait]
impl UserRepo for SqliteRepo {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::now_v7(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            age: new.age,
            country: new.country,
            residence: new.residence,
            created_at: Utc::now(),
        };

        let res = sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, first_name, last_name, age, country, residence, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(user.id))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.age.map(|a| a as i64))
        .bind(&user.country)
        .bind(&user.residence)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AppError::Validation(
                "a user with that username already exists".into(),
            )),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// Emails are not unique; ids are v7 and therefore time-ordered, so
    /// `ORDER BY id` picks the oldest account, matching reset semantics.
    async fn find_by_email_oldest(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ? ORDER BY id LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        let done = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(uuid_to_blob(user_id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound("user".into()));
        }
        Ok(())
    }

    async fn resolve_usernames(&self, usernames: &[String]) -> Result<Vec<User>> {
        if usernames.is_empty() {
            return Ok(vec![]);
        }
        // One query for the whole set; unknown handles simply don't match.
        let placeholders = vec!["?"; usernames.len()].join(", ");
        let sql = format!("SELECT * FROM users WHERE username IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for username in usernames {
            query = query.bind(username);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Quota count and insert share one transaction so two concurrent adds
    /// cannot both observe count=2 and end up at four skills.
    async fn add_skill(&self, user_id: Uuid, skill: Skill, level: SkillLevel) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_skills WHERE user_id = ?")
            .bind(uuid_to_blob(user_id))
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;
        if count as usize >= MAX_SKILLS_PER_USER {
            return Err(AppError::QuotaExceeded);
        }

        let res = sqlx::query("INSERT INTO user_skills (user_id, skill, level) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(user_id))
            .bind(skill.code())
            .bind(level.code())
            .execute(&mut *tx)
            .await;
        match res {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(AppError::DuplicateSkill),
            Err(e) => return Err(db_err(e)),
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn remove_skill(&self, user_id: Uuid, skill: Skill) -> Result<()> {
        let done = sqlx::query("DELETE FROM user_skills WHERE user_id = ? AND skill = ?")
            .bind(uuid_to_blob(user_id))
            .bind(skill.code())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "this skill is not associated with your profile".into(),
            ));
        }
        Ok(())
    }

    async fn skills_for(&self, user_id: Uuid) -> Result<Vec<UserSkill>> {
        let rows = sqlx::query("SELECT * FROM user_skills WHERE user_id = ? ORDER BY skill")
            .bind(uuid_to_blob(user_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(skill_from_row).collect()
    }

    async fn get_or_create_token(&self, user_id: Uuid, candidate_key: &str) -> Result<String> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT key FROM auth_tokens WHERE user_id = ?")
                .bind(uuid_to_blob(user_id))
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        if let Some(key) = existing {
            return Ok(key);
        }

        sqlx::query("INSERT INTO auth_tokens (key, user_id, created_at) VALUES (?, ?, ?)")
            .bind(candidate_key)
            .bind(uuid_to_blob(user_id))
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(candidate_key.to_string())
    }

    async fn user_for_token(&self, key: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT u.* FROM users u JOIN auth_tokens t ON t.user_id = u.id WHERE t.key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.as_ref().map(user_from_row))
    }
}
