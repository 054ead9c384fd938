//! # Domain Models
//!
//! These structs represent the core entities of Crewfinder.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A registered account. Owns projects, holds skills, expresses interests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique handle used for login and collaborator seeding.
    pub username: String,
    /// Not required to be unique; password reset picks the oldest match.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u32>,
    pub country: String,
    pub residence: String,
    pub created_at: DateTime<Utc>,
}

/// Input for user creation. The password is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u32>,
    pub country: String,
    pub residence: String,
}

/// The closed catalog of programming-language skills.
///
/// Exactly these 8 languages are supported. Modeling the catalog as an enum
/// (rather than free-form rows created on first reference) makes an
/// out-of-catalog identifier unrepresentable past the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Cpp,
    Js,
    Py,
    Java,
    Lua,
    Rust,
    Go,
    Julia,
}

impl Skill {
    pub const ALL: [Skill; 8] = [
        Skill::Cpp,
        Skill::Js,
        Skill::Py,
        Skill::Java,
        Skill::Lua,
        Skill::Rust,
        Skill::Go,
        Skill::Julia,
    ];

    /// The wire/storage code (e.g. "py").
    pub fn code(&self) -> &'static str {
        match self {
            Skill::Cpp => "cpp",
            Skill::Js => "js",
            Skill::Py => "py",
            Skill::Java => "java",
            Skill::Lua => "lua",
            Skill::Rust => "rust",
            Skill::Go => "go",
            Skill::Julia => "julia",
        }
    }

    /// Human-readable language name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Skill::Cpp => "C++",
            Skill::Js => "Javascript",
            Skill::Py => "Python",
            Skill::Java => "Java",
            Skill::Lua => "Lua",
            Skill::Rust => "Rust",
            Skill::Go => "Go",
            Skill::Julia => "Julia",
        }
    }
}

impl FromStr for Skill {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpp" => Ok(Skill::Cpp),
            "js" => Ok(Skill::Js),
            "py" => Ok(Skill::Py),
            "java" => Ok(Skill::Java),
            "lua" => Ok(Skill::Lua),
            "rust" => Ok(Skill::Rust),
            "go" => Ok(Skill::Go),
            "julia" => Ok(Skill::Julia),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Proficiency attached to a user/skill association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Experienced,
    Expert,
}

impl SkillLevel {
    pub fn code(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Experienced => "experienced",
            SkillLevel::Expert => "expert",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "experienced" => Ok(SkillLevel::Experienced),
            "expert" => Ok(SkillLevel::Expert),
            _ => Err(()),
        }
    }
}

/// Ternary fact: this user knows this language at this level.
/// At most one row per (user, skill); at most 3 per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSkill {
    pub user_id: Uuid,
    pub skill: Skill,
    pub level: SkillLevel,
}

/// A project looking for collaborators.
///
/// The roster (`contributors`) never includes the owner implicitly; owners
/// join their own roster only by seeding it at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    /// Total seats. Positive; defaults to 1.
    pub maximum_collaborators: u32,
    /// Materialized roster membership (user ids).
    pub contributors: Vec<Uuid>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Roster has reached capacity.
    pub fn is_full(&self) -> bool {
        self.contributors.len() as u32 >= self.maximum_collaborators
    }

    /// A seat can still be taken: not full and not completed.
    pub fn has_available_seats(&self) -> bool {
        !self.is_full() && !self.completed
    }

    /// Remaining seats, never negative.
    pub fn available_seats(&self) -> u32 {
        self.maximum_collaborators
            .saturating_sub(self.contributors.len() as u32)
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Input for project creation.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub maximum_collaborators: u32,
}

/// Owner-editable project fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub maximum_collaborators: Option<u32>,
}

/// Lifecycle of one applicant-to-project negotiation.
///
/// `Pending` is the only live state; `Accepted` and `Declined` are terminal
/// and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestStatus {
    Pending,
    Accepted,
    Declined,
}

impl InterestStatus {
    pub fn code(&self) -> &'static str {
        match self {
            InterestStatus::Pending => "pending",
            InterestStatus::Accepted => "accepted",
            InterestStatus::Declined => "declined",
        }
    }
}

impl FromStr for InterestStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InterestStatus::Pending),
            "accepted" => Ok(InterestStatus::Accepted),
            "declined" => Ok(InterestStatus::Declined),
            _ => Err(()),
        }
    }
}

/// One applicant's bid for a seat on a project.
/// At most one record per (user, project) pair, for the lifetime of the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInterest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub status: InterestStatus,
    pub expressed_at: DateTime<Utc>,
}

impl ProjectInterest {
    pub fn is_pending(&self) -> bool {
        self.status == InterestStatus::Pending
    }

    /// Only pending interests may be accepted or declined.
    pub fn can_be_handled(&self) -> bool {
        self.is_pending()
    }
}

/// Per-user aggregate counts derived from the project registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserStats {
    /// Projects owned, any status (including completed).
    pub projects_created: u64,
    /// Projects where the user sits on the roster. Pending or declined
    /// interests never count.
    pub projects_contributed: u64,
}
