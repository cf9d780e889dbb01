//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for the mocked login and logout. There is no
//! real identity provider: logging in simply installs a user profile in the
//! session snapshot and sets the authenticated flag.

use crate::web::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use coach_core::domain::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub is_authenticated: bool,
}

/// The profile used when the client sends no body: a stand-in for the
/// "Sign in with Google" flow this core deliberately mocks.
fn demo_profile() -> User {
    User {
        name: "Jordan Lee".to_string(),
        email: "jordan.lee@example.com".to_string(),
        photo: Some("https://picsum.photos/seed/jordan/100/100".to_string()),
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Sign in with a mock profile
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginRequest, description = "Optional profile; a demo profile is used when omitted."),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let user = match body {
        Some(Json(req)) => User {
            name: req.name,
            email: req.email,
            photo: req.photo,
        },
        None => demo_profile(),
    };

    let mut store = state.store.lock().await;
    if let Err(e) = store.login(user.clone()).await {
        // The in-memory session is signed in either way; only durability
        // suffered.
        warn!("Failed to persist snapshot after login: {e}");
    }

    (
        StatusCode::OK,
        Json(AuthResponse {
            name: user.name,
            email: user.email,
            photo: user.photo,
            is_authenticated: true,
        }),
    )
}

/// POST /auth/logout - Sign out and clear the user from the session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut store = state.store.lock().await;
    if let Err(e) = store.logout().await {
        warn!("Failed to persist snapshot after logout: {e}");
    }
    StatusCode::OK
}
