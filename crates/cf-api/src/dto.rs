//! Wire-level request and response shapes.
//!
//! Response DTOs are explicit rather than serializing domain models
//! directly, so privacy trims (applicant listings) and field naming stay a
//! deliberate choice of this layer.

use cf_core::models::{Project, ProjectInterest, User, UserSkill};
use cf_services::PendingInterest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub residence: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillAddRequest {
    pub skill: String,
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillRemoveRequest {
    pub skill: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectCreateRequest {
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub maximum_collaborators: Option<u32>,
    /// Usernames to seed onto the roster; unknown names are ignored.
    #[serde(default)]
    pub collaborators: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProjectUpdateRequest {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub maximum_collaborators: Option<u32>,
}

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<u32>,
    pub country: String,
    pub residence: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            age: user.age,
            country: user.country.clone(),
            residence: user.residence.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub project_name: String,
    pub description: String,
    pub owner: UserResponse,
    pub maximum_collaborators: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl ProjectResponse {
    pub fn from_parts(project: &Project, owner: &User) -> Self {
        Self {
            id: project.id,
            project_name: project.name.clone(),
            description: project.description.clone(),
            owner: owner.into(),
            maximum_collaborators: project.maximum_collaborators,
            completed: project.completed,
            created_at: project.created_at,
        }
    }
}

/// One (skill, level) pair of an applicant.
#[derive(Debug, Serialize)]
pub struct ApplicantSkillResponse {
    pub skill: &'static str,
    pub level: &'static str,
}

impl From<&UserSkill> for ApplicantSkillResponse {
    fn from(s: &UserSkill) -> Self {
        Self {
            skill: s.skill.code(),
            level: s.level.code(),
        }
    }
}

/// Privacy-trimmed applicant data for owner review: handle, email, and
/// skills only. Age, country, and residence are deliberately absent.
#[derive(Debug, Serialize)]
pub struct ApplicantResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub skills: Vec<ApplicantSkillResponse>,
}

#[derive(Debug, Serialize)]
pub struct InterestResponse {
    pub id: Uuid,
    pub user: ApplicantResponse,
    pub project: Uuid,
    pub expressed_at: DateTime<Utc>,
    pub status: &'static str,
}

impl From<&PendingInterest> for InterestResponse {
    fn from(p: &PendingInterest) -> Self {
        Self {
            id: p.interest.id,
            user: ApplicantResponse {
                id: p.applicant.id,
                username: p.applicant.username.clone(),
                email: p.applicant.email.clone(),
                skills: p.skills.iter().map(Into::into).collect(),
            },
            project: p.interest.project_id,
            expressed_at: p.interest.expressed_at,
            status: p.interest.status.code(),
        }
    }
}

/// Minimal acknowledgement for a freshly expressed interest.
#[derive(Debug, Serialize)]
pub struct ExpressedResponse {
    pub id: Uuid,
    pub project: Uuid,
    pub status: &'static str,
    pub detail: &'static str,
}

impl From<&ProjectInterest> for ExpressedResponse {
    fn from(i: &ProjectInterest) -> Self {
        Self {
            id: i.id,
            project: i.project_id,
            status: i.status.code(),
            detail: "Interest registered successfully",
        }
    }
}
