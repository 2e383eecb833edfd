use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{error::AppError, models::user::PublicUser, state::AppState};

/// The name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Extracts and verifies the session token from the request cookies,
/// yielding the session id it carries.
fn extract_session_id(state: &AppState, cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.tokens.verify(cookie.value()))
}

/// A middleware that requires a valid session to be present.
///
/// Missing cookie, bad signature, dead session, and orphaned session all
/// collapse to the same 401 response; nothing about the failing step leaks
/// to the caller. On success the hash-stripped user is inserted as a
/// request extension for handlers to pick up.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = extract_session_id(&state, &cookies).ok_or(AppError::Unauthenticated)?;

    let session = state
        .store
        .find_session(session_id)
        .await
        .map_err(|_| AppError::Unauthenticated)?
        .ok_or(AppError::Unauthenticated)?;

    let user = state
        .store
        .find_user_by_id(session.user_id)
        .await
        .map_err(|_| AppError::Unauthenticated)?
        .ok_or(AppError::Unauthenticated)?;

    tracing::debug!("✅ User authenticated: {}", user.id);

    request.extensions_mut().insert(PublicUser::from(user));

    Ok(next.run(request).await)
}
