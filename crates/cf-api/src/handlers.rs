//! # cf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the service
//! layer. Handlers stay thin: extract the principal, hand off to a service,
//! shape the response. Authorization decisions never happen here.

use crate::auth::current_principal;
use crate::dto::{
    DetailResponse, ExpressedResponse, InterestResponse, LoginRequest, ProjectCreateRequest,
    ProjectResponse, ProjectUpdateRequest, RegisterRequest, RegisterResponse, ResetPasswordRequest,
    SkillAddRequest, SkillRemoveRequest, TokenResponse, UserResponse,
};
use crate::error::ApiError;
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use cf_core::error::AppError;
use cf_core::models::{Project, ProjectPatch};
use cf_services::{CreateProject, Registration};
use uuid::Uuid;

async fn project_json(state: &AppState, project: &Project) -> Result<ProjectResponse, ApiError> {
    let owner = state
        .users
        .find_by_id(project.owner_id)
        .await?
        .ok_or_else(|| AppError::Internal("owner row missing".into()))?;
    Ok(ProjectResponse::from_parts(project, &owner))
}

async fn projects_json(
    state: &AppState,
    projects: &[Project],
) -> Result<Vec<ProjectResponse>, ApiError> {
    let mut out = Vec::with_capacity(projects.len());
    for project in projects {
        out.push(project_json(state, project).await?);
    }
    Ok(out)
}

// ── Authentication ──────────────────────────────────────────────────────────

pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let (user, token) = state
        .auth
        .register(Registration {
            username: body.username,
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            age: body.age,
            country: body.country,
            residence: body.residence,
        })
        .await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        user: UserResponse::from(&user),
        token,
    }))
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let token = state.auth.login(&body.username, &body.password).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .auth
        .reset_password(&body.email, &body.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(DetailResponse {
        detail: "Password reset successful",
    }))
}

// ── Skills ──────────────────────────────────────────────────────────────────

pub async fn add_skill(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SkillAddRequest>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    state
        .skills
        .add_skill(principal.as_ref(), &body.skill, &body.level)
        .await?;
    Ok(HttpResponse::Created().json(DetailResponse {
        detail: "Skill added successfully",
    }))
}

pub async fn remove_skill(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SkillRemoveRequest>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    state
        .skills
        .remove_skill(principal.as_ref(), &body.skill)
        .await?;
    Ok(HttpResponse::Ok().json(DetailResponse {
        detail: "Skill removed successfully",
    }))
}

// ── Projects ────────────────────────────────────────────────────────────────

pub async fn list_projects(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let projects = state.projects.list().await?;
    Ok(HttpResponse::Ok().json(projects_json(&state, &projects).await?))
}

pub async fn open_projects(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let projects = state.projects.list_open().await?;
    Ok(HttpResponse::Ok().json(projects_json(&state, &projects).await?))
}

pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let project = state.projects.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project_json(&state, &project).await?))
}

pub async fn create_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ProjectCreateRequest>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    let body = body.into_inner();
    let project = state
        .projects
        .create(
            principal.as_ref(),
            CreateProject {
                name: body.project_name,
                description: body.description,
                maximum_collaborators: body.maximum_collaborators,
                collaborators: body.collaborators,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(project_json(&state, &project).await?))
}

pub async fn update_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ProjectUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    let body = body.into_inner();
    let project = state
        .projects
        .update(
            principal.as_ref(),
            path.into_inner(),
            ProjectPatch {
                name: body.project_name,
                description: body.description,
                maximum_collaborators: body.maximum_collaborators,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(project_json(&state, &project).await?))
}

pub async fn delete_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    state
        .projects
        .delete(principal.as_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn complete_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    state
        .projects
        .complete(principal.as_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(DetailResponse {
        detail: "Project marked as completed",
    }))
}

// ── Interests ───────────────────────────────────────────────────────────────

pub async fn express_interest(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    let interest = state
        .interests
        .express(principal.as_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ExpressedResponse::from(&interest)))
}

pub async fn pending_interests(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    let pending = state
        .interests
        .pending_interests(principal.as_ref(), path.into_inner())
        .await?;
    let body: Vec<InterestResponse> = pending.iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn accept_interest(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    let (project_id, interest_id) = path.into_inner();
    state
        .interests
        .accept(principal.as_ref(), project_id, interest_id)
        .await?;
    Ok(HttpResponse::Ok().json(DetailResponse {
        detail: "Interest accepted successfully",
    }))
}

pub async fn decline_interest(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    let (project_id, interest_id) = path.into_inner();
    state
        .interests
        .decline(principal.as_ref(), project_id, interest_id)
        .await?;
    Ok(HttpResponse::Ok().json(DetailResponse {
        detail: "Interest declined successfully",
    }))
}

// ── Statistics ──────────────────────────────────────────────────────────────

pub async fn user_stats(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let principal = current_principal(&req, &state).await?;
    let stats = state.stats.stats(principal.as_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
