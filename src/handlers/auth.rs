use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies, cookie::SameSite, cookie::time::Duration};

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::SESSION_COOKIE,
    models::user::PublicUser,
    services::{auth as auth_service, sessions},
    state::AppState,
    validation::auth::{validate_login, validate_signup},
};

/// The request payload for signup. Field presence is checked by the
/// validation layer so that all failures report per field.
#[derive(Deserialize, Debug)]
pub struct SignupRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The request payload for login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Builds the `sid` session cookie carrying a signed token.
fn session_cookie(token: String, max_age_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(Duration::days(max_age_days));
    cookie.set_path("/");
    cookie
}

fn clear_session_cookie(cookies: &Cookies) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Handles account creation.
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|_| AppError::InvalidJson)?;
    tracing::info!("📝 Signup attempt: {:?}", payload.email);

    validate_signup(
        payload.fullname.as_deref(),
        payload.email.as_deref(),
        payload.password.as_deref(),
    )?;

    let user = auth_service::signup(
        &state,
        payload.fullname.as_deref().unwrap_or_default(),
        payload.email.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
    )
    .await?;

    let response = UserResponse {
        message: "New user created successfully".to_string(),
        user: PublicUser::from(user),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles login: verifies credentials, opens a session, and hands the
/// signed token back as the `sid` cookie.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|_| AppError::InvalidJson)?;
    tracing::info!("🔐 Login attempt: {:?}", payload.email);

    validate_login(payload.email.as_deref(), payload.password.as_deref())?;

    let (user, token) = auth_service::login(
        &state,
        payload.email.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
    )
    .await?;

    cookies.add(session_cookie(token, state.config.session_duration_days));
    tracing::info!("✅ User logged in: {}", user.id);

    let response = UserResponse {
        message: "Login successful".to_string(),
        user,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles logout.
///
/// Without a session cookie this is a no-op success. A cookie that fails
/// signature verification is a 400; a verified cookie has its session
/// destroyed (idempotently) and the cookie cleared.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        let session_id = state
            .tokens
            .verify(cookie.value())
            .ok_or_else(|| AppError::BadRequest("Invalid session cookie".to_string()))?;

        sessions::destroy_session(&state, session_id).await?;
        clear_session_cookie(&cookies);
        tracing::info!("👋 Session destroyed: {}", session_id);
    }

    let response = MessageResponse {
        message: "Logged out successfully".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the authenticated user.
#[axum::debug_handler]
pub async fn me(Extension(user): Extension<PublicUser>) -> Result<Response> {
    Ok((StatusCode::OK, Json(MeResponse { user })).into_response())
}
