//! # cf-api
//!
//! The web routing and orchestration layer for Crewfinder.

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

#[cfg(test)]
mod tests;

use actix_web::web;
use cf_core::traits::{AuthProvider, InterestRepo, ProjectRepo, UserRepo};
use cf_services::{AuthService, InterestService, ProjectService, SkillService, StatsService};
use std::sync::Arc;

/// State shared across all Actix-web workers.
pub struct AppState {
    /// Direct user lookups for response shaping (owner embedding).
    pub users: Arc<dyn UserRepo>,
    pub auth: AuthService,
    pub skills: SkillService,
    pub projects: ProjectService,
    pub interests: InterestService,
    pub stats: StatsService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        interests: Arc<dyn InterestRepo>,
        provider: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), provider),
            skills: SkillService::new(users.clone()),
            projects: ProjectService::new(users.clone(), projects.clone()),
            interests: InterestService::new(users.clone(), projects.clone(), interests),
            stats: StatsService::new(projects),
            users,
        }
    }
}

/// Configures the API routes.
///
/// Scoped configuration so the binary can mount everything under a
/// different prefix if it ever needs to. `/projects/open` is registered
/// before `/projects/{id}` so the literal segment wins.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Authentication
            .route("/auth/register", web::post().to(handlers::register))
            .route("/auth/login", web::post().to(handlers::login))
            .route("/auth/reset-password", web::post().to(handlers::reset_password))
            // Skill management
            .route("/skills/add", web::post().to(handlers::add_skill))
            .route("/skills/remove", web::post().to(handlers::remove_skill))
            // Statistics
            .route("/users/me/stats", web::get().to(handlers::user_stats))
            // Projects
            .route("/projects", web::get().to(handlers::list_projects))
            .route("/projects", web::post().to(handlers::create_project))
            .route("/projects/open", web::get().to(handlers::open_projects))
            .route("/projects/{id}", web::get().to(handlers::get_project))
            .route("/projects/{id}", web::put().to(handlers::update_project))
            .route("/projects/{id}", web::patch().to(handlers::update_project))
            .route("/projects/{id}", web::delete().to(handlers::delete_project))
            .route("/projects/{id}/complete", web::post().to(handlers::complete_project))
            // Interest negotiation
            .route("/projects/{id}/interest", web::post().to(handlers::express_interest))
            .route(
                "/projects/{id}/pending_interests",
                web::get().to(handlers::pending_interests),
            )
            .route(
                "/projects/{id}/interest/{interest_id}/accept",
                web::post().to(handlers::accept_interest),
            )
            .route(
                "/projects/{id}/interest/{interest_id}/decline",
                web::post().to(handlers::decline_interest),
            ),
    );
}
