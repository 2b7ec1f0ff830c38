//! Admin session handling: the `require_admin_user` gate plus login and logout.

use axum::{
    body::Body,
    extract::{Form, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    application::{auth::AdminAuthError, error::HttpError},
    presentation::views::{LoginTemplate, render_template_response},
};

use super::{ADMIN_INDEX_PATH, LOGIN_PATH, admin::AdminState, wants_html};

pub const ADMIN_SESSION_COOKIE: &str = "postdesk_admin";

/// Reject requests without admin credentials before any handler runs.
///
/// Browsers are sent to the login form; every other client gets a 401.
pub async fn require_admin_user(
    State(state): State<AdminState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let headers = request.headers();
    let bearer = extract_token(headers.get(AUTHORIZATION));
    let jar = CookieJar::from_headers(headers);
    let session = jar.get(ADMIN_SESSION_COOKIE).map(|cookie| cookie.value());

    let principal = match state.gate.authenticate(bearer.as_deref(), session) {
        Ok(principal) => principal,
        Err(err) => return unauthorized(headers, err),
    };

    request.extensions_mut().insert(principal);
    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

fn unauthorized(headers: &HeaderMap, err: AdminAuthError) -> Response {
    if wants_html(headers) && err != AdminAuthError::NotConfigured {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    HttpError::from_error(
        "infra::http::auth::require_admin_user",
        StatusCode::UNAUTHORIZED,
        "Unauthorized",
        &err,
    )
    .into_response()
}

fn extract_token(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.trim().to_string())
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    pub(crate) token: String,
}

pub(crate) async fn login_form() -> Response {
    render_template_response(LoginTemplate { error: None }, StatusCode::OK)
}

pub(crate) async fn login(
    State(state): State<AdminState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let verified = state
        .gate
        .verify_token(Some(form.token.trim()))
        .and_then(|()| state.gate.session_value());

    match verified {
        Ok(session) => {
            info!(target = "postdesk::http::auth", "admin signed in");
            let cookie = Cookie::build((ADMIN_SESSION_COOKIE, session))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.cookie_secure);
            (jar.add(cookie), Redirect::to(ADMIN_INDEX_PATH)).into_response()
        }
        Err(err) => {
            warn!(target = "postdesk::http::auth", error = %err, "admin sign-in rejected");
            let message = match err {
                AdminAuthError::NotConfigured => "Admin access is not configured",
                AdminAuthError::Missing | AdminAuthError::Invalid => "Invalid admin token",
            };
            render_template_response(
                LoginTemplate {
                    error: Some(message),
                },
                StatusCode::UNAUTHORIZED,
            )
        }
    }
}

pub(crate) async fn logout(jar: CookieJar) -> Response {
    let cookie = Cookie::build(ADMIN_SESSION_COOKIE).path("/");
    (jar.remove(cookie), Redirect::to(LOGIN_PATH)).into_response()
}
