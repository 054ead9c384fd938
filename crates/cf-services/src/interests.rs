//! Negotiation entry points: expression by applicants, accept/decline by
//! owners, pending listings for owners.
//!
//! Existence is checked before authorization (a wrong project id is a 404
//! for everyone); the transition guards themselves live in the repository's
//! transactional sections.

use cf_core::error::{AppError, Result};
use cf_core::models::{ProjectInterest, User, UserSkill};
use cf_core::policy;
use cf_core::traits::{InterestRepo, ProjectRepo, UserRepo};
use std::sync::Arc;
use uuid::Uuid;

/// A pending interest joined with privacy-trimmed applicant data for the
/// owner's review listing.
#[derive(Debug, Clone)]
pub struct PendingInterest {
    pub interest: ProjectInterest,
    pub applicant: User,
    pub skills: Vec<UserSkill>,
}

#[derive(Clone)]
pub struct InterestService {
    users: Arc<dyn UserRepo>,
    projects: Arc<dyn ProjectRepo>,
    interests: Arc<dyn InterestRepo>,
}

impl InterestService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        interests: Arc<dyn InterestRepo>,
    ) -> Self {
        Self {
            users,
            projects,
            interests,
        }
    }

    async fn project_or_404(&self, project_id: Uuid) -> Result<cf_core::models::Project> {
        self.projects
            .get(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("project".into()))
    }

    /// Any authenticated user may bid for a seat.
    pub async fn express(
        &self,
        principal: Option<&User>,
        project_id: Uuid,
    ) -> Result<ProjectInterest> {
        let user = policy::require_authenticated(principal)?;
        let project = self.project_or_404(project_id).await?;
        let interest = self.interests.express(user.id, project.id).await?;
        log::debug!(
            "user {} expressed interest in project {}",
            user.username,
            project.id
        );
        Ok(interest)
    }

    /// Owner-only review listing, oldest bids first.
    pub async fn pending_interests(
        &self,
        principal: Option<&User>,
        project_id: Uuid,
    ) -> Result<Vec<PendingInterest>> {
        let project = self.project_or_404(project_id).await?;
        policy::require_project_owner(principal, &project)?;

        let pending = self.interests.pending_for_project(project.id).await?;
        let mut out = Vec::with_capacity(pending.len());
        for interest in pending {
            let applicant = self
                .users
                .find_by_id(interest.user_id)
                .await?
                .ok_or_else(|| AppError::Internal("applicant row missing".into()))?;
            let skills = self.users.skills_for(applicant.id).await?;
            out.push(PendingInterest {
                interest,
                applicant,
                skills,
            });
        }
        Ok(out)
    }

    pub async fn accept(
        &self,
        principal: Option<&User>,
        project_id: Uuid,
        interest_id: Uuid,
    ) -> Result<()> {
        let project = self.project_or_404(project_id).await?;
        let interest = self
            .interests
            .get_for_project(project.id, interest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("interest".into()))?;
        policy::require_project_owner(principal, &project)?;
        self.interests.accept(interest.id).await?;
        log::info!(
            "interest {} accepted on project {}",
            interest.id,
            project.id
        );
        Ok(())
    }

    pub async fn decline(
        &self,
        principal: Option<&User>,
        project_id: Uuid,
        interest_id: Uuid,
    ) -> Result<()> {
        let project = self.project_or_404(project_id).await?;
        let interest = self
            .interests
            .get_for_project(project.id, interest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("interest".into()))?;
        policy::require_project_owner(principal, &project)?;
        self.interests.decline(interest.id).await
    }
}
