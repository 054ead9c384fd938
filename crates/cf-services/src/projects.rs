//! Project registry operations: creation with owner-seeded rosters, public
//! reads, and owner-gated mutation.

use cf_core::error::{AppError, Result};
use cf_core::models::{NewProject, Project, ProjectPatch, User};
use cf_core::policy;
use cf_core::traits::{ProjectRepo, UserRepo};
use std::sync::Arc;
use uuid::Uuid;

/// Input for project creation.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    /// Defaults to 1 when absent.
    pub maximum_collaborators: Option<u32>,
    /// Handles to seed onto the roster; unknown handles are silently dropped.
    pub collaborators: Vec<String>,
}

#[derive(Clone)]
pub struct ProjectService {
    users: Arc<dyn UserRepo>,
    projects: Arc<dyn ProjectRepo>,
}

impl ProjectService {
    pub fn new(users: Arc<dyn UserRepo>, projects: Arc<dyn ProjectRepo>) -> Self {
        Self { users, projects }
    }

    pub async fn create(&self, principal: Option<&User>, input: CreateProject) -> Result<Project> {
        let owner = policy::require_authenticated(principal)?;
        if input.name.trim().is_empty() {
            return Err(AppError::Validation("project name must not be empty".into()));
        }
        let maximum_collaborators = input.maximum_collaborators.unwrap_or(1);
        if maximum_collaborators == 0 {
            return Err(AppError::Validation(
                "maximum_collaborators must be a positive integer".into(),
            ));
        }

        // Owner-seeded direct adds: one resolution query, non-matches
        // dropped without error.
        let seeded = self.users.resolve_usernames(&input.collaborators).await?;
        let seed_ids: Vec<Uuid> = seeded.iter().map(|u| u.id).collect();

        let project = self
            .projects
            .create(
                NewProject {
                    name: input.name,
                    description: input.description,
                    owner_id: owner.id,
                    maximum_collaborators,
                },
                &seed_ids,
            )
            .await?;
        log::info!(
            "user {} created project {} with {} seeded contributor(s)",
            owner.username,
            project.id,
            seed_ids.len()
        );
        Ok(project)
    }

    // Reads are public.

    pub async fn get(&self, id: Uuid) -> Result<Project> {
        self.projects
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("project".into()))
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        self.projects.list().await
    }

    pub async fn list_open(&self) -> Result<Vec<Project>> {
        self.projects.list_open().await
    }

    // Mutations are owner-only.

    pub async fn update(
        &self,
        principal: Option<&User>,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project> {
        let project = self.get(id).await?;
        policy::require_project_owner(principal, &project)?;
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("project name must not be empty".into()));
            }
        }
        if patch.maximum_collaborators == Some(0) {
            return Err(AppError::Validation(
                "maximum_collaborators must be a positive integer".into(),
            ));
        }
        self.projects.update(id, patch).await
    }

    pub async fn complete(&self, principal: Option<&User>, id: Uuid) -> Result<()> {
        let project = self.get(id).await?;
        policy::require_project_owner(principal, &project)?;
        self.projects.mark_completed(id).await
    }

    pub async fn delete(&self, principal: Option<&User>, id: Uuid) -> Result<()> {
        let project = self.get(id).await?;
        policy::require_project_owner(principal, &project)?;
        self.projects.delete(id).await?;
        log::info!("project {} deleted by its owner", id);
        Ok(())
    }
}
