use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use http::{Method, header};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, services::sessions, state::AppState};

/// Requests are JSON payloads of a few fields; anything larger is noise.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// How often the background sweep reclaims expired session rows.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Assembles the application router.
///
/// Signup, login, and logout are public (logout handles a missing cookie
/// itself); everything else sits behind the authentication gate.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/todos",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        .route(
            "/todos/{id}",
            get(handlers::todos::get_todo)
                .patch(handlers::todos::update_todo)
                .delete(handlers::todos::delete_todo),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors())
}

/// Spawns the hourly sweep of expired session rows.
///
/// Lookups already hide expired sessions, so the sweep only reclaims
/// storage; a missed tick changes nothing observable.
pub fn spawn_session_sweeper(state: AppState) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(SESSION_SWEEP_INTERVAL).await;
            match sessions::purge_expired(&state).await {
                Ok(0) => {}
                Ok(purged) => {
                    tracing::info!("🧹 Purged {} expired sessions", purged);
                }
                Err(e) => {
                    tracing::error!("❌ Session sweep failed: {}", e);
                }
            }
        }
    });
}
