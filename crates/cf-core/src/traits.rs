//! # Core Traits (Ports)
//!
//! Any storage or auth plugin must implement these traits to be used by the
//! binary. All methods return the domain `Result` so business failures
//! (capacity, uniqueness, terminal states) cross the port typed, not as raw
//! storage errors.

use crate::error::Result;
use crate::models::{
    NewProject, NewUser, Project, ProjectInterest, ProjectPatch, Skill, SkillLevel, User,
    UserSkill, UserStats,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence contract for accounts, tokens, and the skill catalog.
#[async_trait]
pub trait UserRepo: Send + Sync {
    // Account operations
    async fn create_user(&self, new: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Oldest account with this email; emails are not unique.
    async fn find_by_email_oldest(&self, email: &str) -> Result<Option<User>>;
    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<()>;
    /// Existing users for the given handles; non-matches silently dropped.
    async fn resolve_usernames(&self, usernames: &[String]) -> Result<Vec<User>>;

    // Skill catalog operations
    /// Inserts a (user, skill, level) row. The 3-skill quota count and the
    /// insert run in one transaction; a uniqueness race surfaces as
    /// `DuplicateSkill`, never as a raw constraint error.
    async fn add_skill(&self, user_id: Uuid, skill: Skill, level: SkillLevel) -> Result<()>;
    /// Deletes exactly one row, or fails `NotFound` when the user never
    /// added the skill.
    async fn remove_skill(&self, user_id: Uuid, skill: Skill) -> Result<()>;
    async fn skills_for(&self, user_id: Uuid) -> Result<Vec<UserSkill>>;

    // Token operations
    /// Returns the user's existing token key, or stores `candidate_key` and
    /// returns it. One token per user.
    async fn get_or_create_token(&self, user_id: Uuid, candidate_key: &str) -> Result<String>;
    async fn user_for_token(&self, key: &str) -> Result<Option<User>>;
}

/// Persistence contract for projects and their rosters.
#[async_trait]
pub trait ProjectRepo: Send + Sync {
    /// Creates a project with the roster seeded from `seed_contributors`
    /// (owner-side direct adds; no negotiation). Duplicates are ignored.
    async fn create(&self, new: NewProject, seed_contributors: &[Uuid]) -> Result<Project>;
    async fn get(&self, id: Uuid) -> Result<Option<Project>>;
    /// All projects, newest first.
    async fn list(&self) -> Result<Vec<Project>>;
    /// Non-completed projects with at least one free seat, newest first.
    async fn list_open(&self) -> Result<Vec<Project>>;
    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project>;
    /// Idempotent: completing an already-completed project is a no-op success.
    async fn mark_completed(&self, id: Uuid) -> Result<()>;
    /// Cascades to interests and roster rows.
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Owned-project and roster-membership counts for one user.
    async fn stats_for(&self, user_id: Uuid) -> Result<UserStats>;
}

/// Persistence contract for the interest negotiation state machine.
///
/// The guards of each transition run inside the same transaction as its
/// effects; see the sqlite plugin for the authoritative sections.
#[async_trait]
pub trait InterestRepo: Send + Sync {
    /// (none) -> pending. Fails `DuplicateInterest` if any record exists for
    /// the pair, `ProjectFull` if the project is full or completed.
    async fn express(&self, user_id: Uuid, project_id: Uuid) -> Result<ProjectInterest>;
    /// Interest scoped to its project, mirroring the URL shape.
    async fn get_for_project(
        &self,
        project_id: Uuid,
        interest_id: Uuid,
    ) -> Result<Option<ProjectInterest>>;
    /// Pending interests for a project, oldest first.
    async fn pending_for_project(&self, project_id: Uuid) -> Result<Vec<ProjectInterest>>;
    /// pending -> accepted, re-validating capacity and adding the applicant
    /// to the roster atomically. Fails `AlreadyHandled` on terminal states,
    /// `ProjectFull` when the last seat went to someone else.
    async fn accept(&self, interest_id: Uuid) -> Result<()>;
    /// pending -> declined. No side effect beyond the status flip.
    async fn decline(&self, interest_id: Uuid) -> Result<()>;
}

/// Identity contract: password hashing and token key generation.
pub trait AuthProvider: Send + Sync {
    /// Hashes a password for storage.
    fn hash_password(&self, password: &str) -> Result<String>;
    /// Verifies a password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
    /// Generates a fresh opaque token key.
    fn generate_token_key(&self) -> String;
}
