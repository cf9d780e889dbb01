//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::auth::{AuthResponse, LoginRequest};
use crate::web::state::AppState;
use axum::{extract::State, response::Json};
use coach_core::domain::Mistake;
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        session_handler,
        mistakes_handler,
        settings_handler,
    ),
    components(
        schemas(LoginRequest, AuthResponse, SessionView, UserView, MistakeView, SettingsView)
    ),
    tags(
        (name = "Speaking Coach API", description = "API endpoints for the AI speaking-practice coach.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A read-only view of the current session snapshot.
#[derive(Serialize, ToSchema)]
pub struct SessionView {
    pub points: i64,
    pub mistake_count: usize,
    pub user: Option<UserView>,
    pub is_authenticated: bool,
}

#[derive(Serialize, ToSchema)]
pub struct UserView {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

/// One entry of the mistake journal as rendered by the history view.
#[derive(Serialize, ToSchema)]
pub struct MistakeView {
    pub id: String,
    pub original: String,
    pub corrected: String,
    pub reason: String,
    pub points_deducted: i64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl From<&Mistake> for MistakeView {
    fn from(m: &Mistake) -> Self {
        Self {
            id: m.id.clone(),
            original: m.original.clone(),
            corrected: m.corrected.clone(),
            reason: m.reason.clone(),
            points_deducted: m.points_deducted,
            timestamp: m.timestamp,
        }
    }
}

/// Static display values for the settings screen. Nothing here is persisted.
#[derive(Serialize, ToSchema)]
pub struct SettingsView {
    pub daily_goal_minutes: u32,
    pub voice: String,
    pub notifications_enabled: bool,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Get the current session state.
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "The current session snapshot", body = SessionView)
    )
)]
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let store = state.store.lock().await;
    let snapshot = store.snapshot();
    Json(SessionView {
        points: snapshot.points,
        mistake_count: snapshot.mistakes.len(),
        user: snapshot.user.as_ref().map(|u| UserView {
            name: u.name.clone(),
            email: u.email.clone(),
            photo: u.photo.clone(),
        }),
        is_authenticated: snapshot.is_authenticated,
    })
}

/// List the mistake journal, most recent first.
#[utoipa::path(
    get,
    path = "/mistakes",
    responses(
        (status = 200, description = "Recorded mistakes, most recent first", body = [MistakeView])
    )
)]
pub async fn mistakes_handler(State(state): State<Arc<AppState>>) -> Json<Vec<MistakeView>> {
    let store = state.store.lock().await;
    let mistakes = store
        .snapshot()
        .mistakes
        .iter()
        .rev()
        .map(MistakeView::from)
        .collect();
    Json(mistakes)
}

/// Get the settings screen contents.
#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Static settings display values", body = SettingsView)
    )
)]
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsView> {
    Json(SettingsView {
        daily_goal_minutes: 30,
        voice: state.config.tts_voice.clone(),
        notifications_enabled: true,
    })
}
