//! crewfinder/crates/cf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Crewfinder.

pub mod error;
pub mod models;
pub mod policy;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn project_with(capacity: u32, contributors: usize, completed: bool) -> Project {
        Project {
            id: Uuid::now_v7(),
            name: "rover".to_string(),
            description: "an off-road rover".to_string(),
            owner_id: Uuid::now_v7(),
            maximum_collaborators: capacity,
            contributors: (0..contributors).map(|_| Uuid::now_v7()).collect(),
            completed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn seat_predicates_derive_from_roster_size() {
        let p = project_with(2, 1, false);
        assert!(!p.is_full());
        assert!(p.has_available_seats());
        assert_eq!(p.available_seats(), 1);

        let full = project_with(2, 2, false);
        assert!(full.is_full());
        assert!(!full.has_available_seats());
        assert_eq!(full.available_seats(), 0);
    }

    #[test]
    fn completed_project_has_no_available_seats() {
        let p = project_with(3, 0, true);
        assert!(!p.is_full());
        assert!(!p.has_available_seats());
    }

    #[test]
    fn available_seats_never_goes_negative() {
        // Roster can exceed capacity if the owner shrinks the limit after
        // seats were taken; the derived count clamps at zero.
        let p = project_with(1, 3, false);
        assert_eq!(p.available_seats(), 0);
        assert!(p.is_full());
    }

    #[test]
    fn skill_catalog_is_closed() {
        assert_eq!(Skill::ALL.len(), 8);
        for skill in Skill::ALL {
            assert_eq!(Skill::from_str(skill.code()), Ok(skill));
        }
        assert!(Skill::from_str("cobol").is_err());
        assert!(Skill::from_str("PY").is_err());
    }

    #[test]
    fn only_pending_interests_can_be_handled() {
        let mut interest = ProjectInterest {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            project_id: Uuid::now_v7(),
            status: InterestStatus::Pending,
            expressed_at: Utc::now(),
        };
        assert!(interest.can_be_handled());

        interest.status = InterestStatus::Accepted;
        assert!(!interest.can_be_handled());
        interest.status = InterestStatus::Declined;
        assert!(!interest.can_be_handled());
    }
}
