//! Endpoint tests: fixtures are built through the service layer, assertions
//! go through the HTTP surface so the status and error-code mapping is what
//! gets exercised.

use crate::{configure_routes, AppState};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use cf_auth_simple::SimpleAuthProvider;
use cf_core::models::User;
use cf_db_sqlite::SqliteRepo;
use cf_services::{CreateProject, Registration};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

async fn state() -> web::Data<AppState> {
    let repo = Arc::new(SqliteRepo::new("sqlite::memory:").await.unwrap());
    let provider = Arc::new(SimpleAuthProvider::new());
    web::Data::new(AppState::new(repo.clone(), repo.clone(), repo, provider))
}

async fn register(state: &AppState, name: &str) -> (User, String) {
    state
        .auth
        .register(Registration {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "pw".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            age: None,
            country: "Iceland".to_string(),
            residence: String::new(),
        })
        .await
        .unwrap()
}

async fn create_project(state: &AppState, owner: &User, seats: u32) -> Uuid {
    state
        .projects
        .create(
            Some(owner),
            CreateProject {
                name: "rover".to_string(),
                description: String::new(),
                maximum_collaborators: Some(seats),
                collaborators: vec![],
            },
        )
        .await
        .unwrap()
        .id
}

fn token_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Token {token}"))
}

#[actix_web::test]
async fn register_and_login_round_trip() {
    let state = state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "s3cret",
            "age": 30
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert!(body["token"].as_str().unwrap().len() == 40);
    assert!(body.get("password").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "s3cret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn one_seat_negotiation_over_http() {
    let state = state().await;
    let app = app!(state);
    let (owner, owner_token) = register(&state, "owner").await;
    let (_, alice_token) = register(&state, "alice").await;
    let (_, bob_token) = register(&state, "bob").await;
    let project_id = create_project(&state, &owner, 1).await;

    let mut interest_ids = vec![];
    for token in [&alice_token, &bob_token] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/projects/{project_id}/interest"))
            .insert_header(token_header(token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        interest_ids.push(body["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/projects/{project_id}/interest/{}/accept",
            interest_ids[0]
        ))
        .insert_header(token_header(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/projects/{project_id}/interest/{}/accept",
            interest_ids[1]
        ))
        .insert_header(token_header(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "project_full");
}

#[actix_web::test]
async fn duplicate_interest_surfaces_its_error_code() {
    let state = state().await;
    let app = app!(state);
    let (owner, _) = register(&state, "owner").await;
    let (_, token) = register(&state, "alice").await;
    let project_id = create_project(&state, &owner, 2).await;

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/projects/{project_id}/interest"))
            .insert_header(token_header(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn owner_gate_distinguishes_401_from_403() {
    let state = state().await;
    let app = app!(state);
    let (owner, owner_token) = register(&state, "owner").await;
    let (_, stranger_token) = register(&state, "stranger").await;
    let project_id = create_project(&state, &owner, 1).await;
    let uri = format!("/api/projects/{project_id}/complete");

    let resp = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(token_header(&stranger_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "permission_denied");

    // Owner succeeds, and completion is idempotent over HTTP too.
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(token_header(&owner_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("Authorization", "Token bogus"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn skill_quota_over_http() {
    let state = state().await;
    let app = app!(state);
    let (_, token) = register(&state, "dana").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/skills/add")
            .set_json(json!({"skill": "py", "level": "expert"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    for skill in ["py", "js", "cpp"] {
        let req = test::TestRequest::post()
            .uri("/api/skills/add")
            .insert_header(token_header(&token))
            .set_json(json!({"skill": skill, "level": "beginner"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }
    let req = test::TestRequest::post()
        .uri("/api/skills/add")
        .insert_header(token_header(&token))
        .set_json(json!({"skill": "java", "level": "expert"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "max_skills_exceeded");

    let req = test::TestRequest::post()
        .uri("/api/skills/remove")
        .insert_header(token_header(&token))
        .set_json(json!({"skill": "py"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn pending_listing_trims_applicant_fields() {
    let state = state().await;
    let app = app!(state);
    let (owner, owner_token) = register(&state, "owner").await;
    let (applicant, applicant_token) = register(&state, "applicant").await;
    let project_id = create_project(&state, &owner, 1).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/projects/{project_id}/interest"))
        .insert_header(token_header(&applicant_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/projects/{project_id}/pending_interests"))
        .insert_header(token_header(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let user = &body[0]["user"];
    assert_eq!(user["username"], "applicant");
    assert_eq!(user["id"], applicant.id.to_string());
    // Privacy trim: profile fields are absent from applicant listings.
    assert!(user.get("country").is_none());
    assert!(user.get("age").is_none());
}

#[actix_web::test]
async fn public_reads_and_stats() {
    let state = state().await;
    let app = app!(state);
    let (owner, token) = register(&state, "owner").await;
    create_project(&state, &owner, 1).await;

    // Listing is public.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/open").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["owner"]["username"], "owner");

    // Unknown project is a 404.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/projects/{}", Uuid::now_v7()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/users/me/stats")
        .insert_header(token_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["projects_created"], 1);
    assert_eq!(body["projects_contributed"], 0);
}
