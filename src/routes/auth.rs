// Session guard middleware and the login/logout handlers

use axum::{
    Form, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::session;

fn session_token<'a>(headers: &'a HeaderMap, secret: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|h| session::token_from_cookie_header(h, secret))
}

async fn is_logged_in(state: &AppState, headers: &HeaderMap) -> bool {
    match session_token(headers, &state.config.auth.session_secret) {
        Some(token) => state.sessions.is_authenticated(token).await,
        None => false,
    }
}

/// Guard for `/api/*`: 401 JSON without an authenticated session.
pub(super) async fn require_api_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_logged_in(&state, request.headers()).await {
        next.run(request).await
    } else {
        unauthorized_response()
    }
}

/// Guard for pages: redirect to the login page without an authenticated session.
pub(super) async fn require_page_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_logged_in(&state, request.headers()).await {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Unauthorized: Please log in to access this resource."
        })),
    )
        .into_response()
}

/// Missing fields read as empty and fail the credential check like any other mismatch.
#[derive(Deserialize)]
pub(super) struct LoginForm {
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    user_pass: String,
}

/// POST /login — success and failure both redirect to `/`; failure lands back on the login page.
pub(super) async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = &state.config.auth;
    if form.user_name != auth.username || form.user_pass != auth.password {
        tracing::warn!(user = %form.user_name, "login rejected");
        return Redirect::to("/").into_response();
    }

    if let Some(old) = session_token(&headers, &auth.session_secret) {
        state.sessions.destroy(old).await;
    }
    let token = state.sessions.create().await;
    tracing::info!(user = %form.user_name, "login accepted");
    let cookie = session::set_cookie(&auth.session_secret, &token, state.sessions.ttl());
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

/// GET /logout — drop the session and its cookie.
pub(super) async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers, &state.config.auth.session_secret) {
        state.sessions.destroy(token).await;
    }
    (
        [(header::SET_COOKIE, session::clear_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}
