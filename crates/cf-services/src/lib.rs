//! crewfinder/crates/cf-services/src/lib.rs
//!
//! Business-logic layer: each service orchestrates the core ports and the
//! access control policy for one slice of the API. Services decide and
//! delegate; the transactional enforcement of invariants lives behind the
//! repository ports.

pub mod auth;
pub mod interests;
pub mod projects;
pub mod skills;
pub mod stats;

pub use auth::{AuthService, Registration};
pub use interests::{InterestService, PendingInterest};
pub use projects::{CreateProject, ProjectService};
pub use skills::SkillService;
pub use stats::StatsService;

#[cfg(test)]
mod tests {
    use super::*;
    use cf_auth_simple::SimpleAuthProvider;
    use cf_core::error::AppError;
    use cf_core::models::{ProjectPatch, User};
    use cf_db_sqlite::SqliteRepo;
    use std::sync::Arc;

    struct Fixture {
        auth: AuthService,
        skills: SkillService,
        projects: ProjectService,
        interests: InterestService,
        stats: StatsService,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(SqliteRepo::new("sqlite::memory:").await.unwrap());
        let provider = Arc::new(SimpleAuthProvider::new());
        Fixture {
            auth: AuthService::new(repo.clone(), provider),
            skills: SkillService::new(repo.clone()),
            projects: ProjectService::new(repo.clone(), repo.clone()),
            interests: InterestService::new(repo.clone(), repo.clone(), repo.clone()),
            stats: StatsService::new(repo),
        }
    }

    async fn register(fx: &Fixture, name: &str) -> User {
        let (user, _token) = fx
            .auth
            .register(Registration {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password: "s3cret".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                age: None,
                country: String::new(),
                residence: String::new(),
            })
            .await
            .unwrap();
        user
    }

    fn create_input(name: &str, seats: u32, collaborators: Vec<String>) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            description: String::new(),
            maximum_collaborators: Some(seats),
            collaborators,
        }
    }

    #[tokio::test]
    async fn register_login_reset_flow() {
        let fx = fixture().await;
        let user = register(&fx, "alice").await;

        let token = fx.auth.login("alice", "s3cret").await.unwrap();
        let principal = fx.auth.principal_for_token(&token).await.unwrap().unwrap();
        assert_eq!(principal.id, user.id);

        assert!(matches!(
            fx.auth.login("alice", "wrong").await,
            Err(AppError::Validation(_))
        ));

        fx.auth
            .reset_password("alice@example.com", "n3w-pass")
            .await
            .unwrap();
        fx.auth.login("alice", "n3w-pass").await.unwrap();
        assert!(matches!(
            fx.auth.reset_password("ghost@example.com", "x").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn out_of_catalog_skill_codes_are_rejected_at_the_boundary() {
        let fx = fixture().await;
        let user = register(&fx, "alice").await;

        assert!(matches!(
            fx.skills.add_skill(Some(&user), "cobol", "beginner").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            fx.skills.add_skill(Some(&user), "py", "grandmaster").await,
            Err(AppError::Validation(_))
        ));
        // Removal of an unknown identifier is a 404, not a validation error.
        assert!(matches!(
            fx.skills.remove_skill(Some(&user), "cobol").await,
            Err(AppError::NotFound(_))
        ));

        fx.skills.add_skill(Some(&user), "py", "expert").await.unwrap();
        assert_eq!(fx.skills.skills_of(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mutations_distinguish_anonymous_from_non_owner() {
        // Scenario: non-owner gets Forbidden, anonymous gets Unauthenticated,
        // across accept/decline/complete/delete/update.
        let fx = fixture().await;
        let owner = register(&fx, "owner").await;
        let stranger = register(&fx, "stranger").await;
        let applicant = register(&fx, "applicant").await;

        let project = fx
            .projects
            .create(Some(&owner), create_input("rover", 2, vec![]))
            .await
            .unwrap();
        let interest = fx
            .interests
            .express(Some(&applicant), project.id)
            .await
            .unwrap();

        let forbidden = [
            fx.interests.accept(Some(&stranger), project.id, interest.id).await,
            fx.interests.decline(Some(&stranger), project.id, interest.id).await,
            fx.projects.complete(Some(&stranger), project.id).await,
            fx.projects.delete(Some(&stranger), project.id).await,
            fx.projects
                .update(Some(&stranger), project.id, ProjectPatch::default())
                .await
                .map(|_| ()),
            fx.interests
                .pending_interests(Some(&stranger), project.id)
                .await
                .map(|_| ()),
        ];
        for res in forbidden {
            assert!(matches!(res, Err(AppError::Forbidden)));
        }

        let anonymous = [
            fx.interests.accept(None, project.id, interest.id).await,
            fx.interests.decline(None, project.id, interest.id).await,
            fx.projects.complete(None, project.id).await,
            fx.projects.delete(None, project.id).await,
        ];
        for res in anonymous {
            assert!(matches!(res, Err(AppError::Unauthenticated)));
        }

        // The owner still can.
        fx.interests
            .accept(Some(&owner), project.id, interest.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn seeding_ignores_unknown_handles() {
        // Scenario: one valid handle, one nonexistent, no error raised.
        let fx = fixture().await;
        let owner = register(&fx, "owner").await;
        let friend = register(&fx, "friend").await;

        let project = fx
            .projects
            .create(
                Some(&owner),
                create_input(
                    "seeded",
                    2,
                    vec!["friend".to_string(), "nobody".to_string()],
                ),
            )
            .await
            .unwrap();
        assert_eq!(project.contributors, vec![friend.id]);
    }

    #[tokio::test]
    async fn expressing_interest_in_unknown_project_is_404() {
        let fx = fixture().await;
        let user = register(&fx, "alice").await;
        assert!(matches!(
            fx.interests.express(Some(&user), uuid::Uuid::now_v7()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn pending_listing_carries_applicant_skills_only_for_owner() {
        let fx = fixture().await;
        let owner = register(&fx, "owner").await;
        let applicant = register(&fx, "applicant").await;
        fx.skills
            .add_skill(Some(&applicant), "rust", "expert")
            .await
            .unwrap();

        let project = fx
            .projects
            .create(Some(&owner), create_input("rover", 1, vec![]))
            .await
            .unwrap();
        fx.interests
            .express(Some(&applicant), project.id)
            .await
            .unwrap();

        let pending = fx
            .interests
            .pending_interests(Some(&owner), project.id)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].applicant.id, applicant.id);
        assert_eq!(pending[0].skills.len(), 1);
    }

    #[tokio::test]
    async fn stats_require_authentication() {
        let fx = fixture().await;
        assert!(matches!(
            fx.stats.stats(None).await,
            Err(AppError::Unauthenticated)
        ));

        let owner = register(&fx, "owner").await;
        fx.projects
            .create(Some(&owner), create_input("one", 1, vec![]))
            .await
            .unwrap();
        let stats = fx.stats.stats(Some(&owner)).await.unwrap();
        assert_eq!(stats.projects_created, 1);
        assert_eq!(stats.projects_contributed, 0);
    }

    #[tokio::test]
    async fn project_validation_rules() {
        let fx = fixture().await;
        let owner = register(&fx, "owner").await;

        assert!(matches!(
            fx.projects
                .create(Some(&owner), create_input("  ", 1, vec![]))
                .await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            fx.projects
                .create(Some(&owner), create_input("rover", 0, vec![]))
                .await,
            Err(AppError::Validation(_))
        ));

        let project = fx
            .projects
            .create(Some(&owner), create_input("rover", 1, vec![]))
            .await
            .unwrap();
        let updated = fx
            .projects
            .update(
                Some(&owner),
                project.id,
                ProjectPatch {
                    description: Some("now with wheels".to_string()),
                    maximum_collaborators: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "rover");
        assert_eq!(updated.description, "now with wheels");
        assert_eq!(updated.maximum_collaborators, 4);
    }
}
