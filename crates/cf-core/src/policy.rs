//! # Access Control Policy
//!
//! Pure authorization checks consulted by every mutating service operation.
//! Policy checks never have side effects; they only decide.
//!
//! The 401/403 distinction is deliberate: `Unauthenticated` means "no
//! principal at all", `Forbidden` means "principal known, ownership missing",
//! and the API layer maps them to different status codes.

use crate::error::{AppError, Result};
use crate::models::{Project, User};

/// Requires any authenticated principal.
pub fn require_authenticated(principal: Option<&User>) -> Result<&User> {
    principal.ok_or(AppError::Unauthenticated)
}

/// Owner-only policy: permitted iff the caller is authenticated and owns
/// the project.
pub fn require_project_owner<'a>(principal: Option<&'a User>, project: &Project) -> Result<&'a User> {
    let user = require_authenticated(principal)?;
    if !project.is_owner(user.id) {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(id: Uuid) -> User {
        User {
            id,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "x".into(),
            first_name: String::new(),
            last_name: String::new(),
            age: None,
            country: String::new(),
            residence: String::new(),
            created_at: Utc::now(),
        }
    }

    fn project(owner_id: Uuid) -> Project {
        Project {
            id: Uuid::now_v7(),
            name: "demo".into(),
            description: String::new(),
            owner_id,
            maximum_collaborators: 1,
            contributors: vec![],
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn anonymous_caller_is_unauthenticated() {
        let p = project(Uuid::now_v7());
        assert!(matches!(
            require_project_owner(None, &p),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn non_owner_is_forbidden() {
        let caller = user(Uuid::now_v7());
        let p = project(Uuid::now_v7());
        assert!(matches!(
            require_project_owner(Some(&caller), &p),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn owner_passes() {
        let caller = user(Uuid::now_v7());
        let p = project(caller.id);
        assert!(require_project_owner(Some(&caller), &p).is_ok());
    }
}
