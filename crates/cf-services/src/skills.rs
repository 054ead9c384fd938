//! Skill catalog operations.
//!
//! The closed 8-language set is enforced here, at the entry boundary, by
//! parsing into the `Skill` enum; nothing downstream can create an
//! out-of-catalog association.

use cf_core::error::{AppError, Result};
use cf_core::models::{Skill, SkillLevel, User, UserSkill};
use cf_core::policy;
use cf_core::traits::UserRepo;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Clone)]
pub struct SkillService {
    users: Arc<dyn UserRepo>,
}

impl SkillService {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    fn supported_list() -> String {
        Skill::ALL
            .iter()
            .map(|s| s.code())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Adds a skill to the caller's profile. Quota and uniqueness are
    /// enforced inside the repository transaction.
    pub async fn add_skill(
        &self,
        principal: Option<&User>,
        skill_code: &str,
        level_code: &str,
    ) -> Result<()> {
        let user = policy::require_authenticated(principal)?;
        let skill = Skill::from_str(skill_code).map_err(|_| {
            AppError::Validation(format!(
                "invalid skill; supported languages: {}",
                Self::supported_list()
            ))
        })?;
        let level = SkillLevel::from_str(level_code).map_err(|_| {
            AppError::Validation(
                "invalid level; expected beginner, experienced or expert".into(),
            )
        })?;
        self.users.add_skill(user.id, skill, level).await
    }

    /// Removes a skill. An identifier outside the catalog reports
    /// `NotFound`, same as a catalog skill the user never added.
    pub async fn remove_skill(&self, principal: Option<&User>, skill_code: &str) -> Result<()> {
        let user = policy::require_authenticated(principal)?;
        let skill =
            Skill::from_str(skill_code).map_err(|_| AppError::NotFound("skill".into()))?;
        self.users.remove_skill(user.id, skill).await
    }

    pub async fn skills_of(&self, user_id: uuid::Uuid) -> Result<Vec<UserSkill>> {
        self.users.skills_for(user_id).await
    }
}
