//! Per-user statistics derived from the project registry.

use cf_core::error::Result;
use cf_core::models::{User, UserStats};
use cf_core::policy;
use cf_core::traits::ProjectRepo;
use std::sync::Arc;

#[derive(Clone)]
pub struct StatsService {
    projects: Arc<dyn ProjectRepo>,
}

impl StatsService {
    pub fn new(projects: Arc<dyn ProjectRepo>) -> Self {
        Self { projects }
    }

    /// Counts for the authenticated caller. Only materialized roster
    /// membership counts as a contribution; pending or declined interests
    /// never do.
    pub async fn stats(&self, principal: Option<&User>) -> Result<UserStats> {
        let user = policy::require_authenticated(principal)?;
        self.projects.stats_for(user.id).await
    }
}
