mod admin;
mod auth;
mod middleware;
mod public;

pub use admin::AdminState;
pub use auth::ADMIN_SESSION_COOKIE;
pub use public::HttpState;

use crate::application::error::ErrorReport;
use crate::application::error::HttpError;
use crate::application::repos::RepoError;
use axum::{
    Router,
    extract::FromRef,
    http::{HeaderMap, StatusCode, header::ACCEPT},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use self::middleware::{log_responses, set_request_context};

pub const ADMIN_INDEX_PATH: &str = "/posts/admin";
pub const LOGIN_PATH: &str = "/login";

#[derive(Clone)]
pub struct RouterState {
    pub http: HttpState,
    pub admin: AdminState,
}

impl FromRef<RouterState> for HttpState {
    fn from_ref(state: &RouterState) -> Self {
        state.http.clone()
    }
}

impl FromRef<RouterState> for AdminState {
    fn from_ref(state: &RouterState) -> Self {
        state.admin.clone()
    }
}

pub fn build_router(state: RouterState) -> Router {
    let admin_routes = Router::new()
        .route(ADMIN_INDEX_PATH, get(admin::admin_posts))
        .route(
            "/posts/admin/{slug}",
            get(admin::admin_post_loader).post(admin::admin_post_action),
        )
        .route_layer(from_fn_with_state(
            state.admin.clone(),
            auth::require_admin_user,
        ));

    Router::new()
        .route("/posts", get(public::posts_index))
        .route("/posts/{slug}", get(public::post_detail))
        .route(LOGIN_PATH, get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/_health/db", get(public::db_health))
        .merge(admin_routes)
        .fallback(public::not_found)
        .with_state(state)
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to an HTTP error that keeps the raw error text.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    let (status, public_message) = match &err {
        RepoError::Duplicate { .. } => (StatusCode::CONFLICT, "Duplicate record"),
        RepoError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
        RepoError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "Invalid input"),
        RepoError::Integrity { .. } => (StatusCode::CONFLICT, "Integrity constraint violated"),
        RepoError::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "Database timeout"),
        RepoError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Persistence error"),
    };
    HttpError::from_error(source, status, public_message, &err)
}

/// True when the client asked for JSON rather than a rendered page.
fn wants_json(headers: &HeaderMap) -> bool {
    accept_contains(headers, "application/json")
}

fn wants_html(headers: &HeaderMap) -> bool {
    accept_contains(headers, "text/html")
}

fn accept_contains(headers: &HeaderMap, media_type: &str) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|entry| {
            entry
                .split(';')
                .next()
                .is_some_and(|candidate| candidate.trim().eq_ignore_ascii_case(media_type))
        })
}
