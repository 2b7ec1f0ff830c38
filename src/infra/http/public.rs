use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    application::{
        error::HttpError,
        posts::{PostQueryError, PostService},
        repos::HealthRepo,
    },
    presentation::views::{PostTemplate, PostsTemplate, render_template_response},
};

use super::{db_health_response, repo_error_to_http};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub health: Arc<dyn HealthRepo>,
}

pub(crate) async fn posts_index(State(state): State<HttpState>) -> Response {
    match state.posts.list_summaries().await {
        Ok(posts) => render_template_response(PostsTemplate::from_listings(posts), StatusCode::OK),
        Err(err) => post_query_error("infra::http::posts_index", err).into_response(),
    }
}

pub(crate) async fn post_detail(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Response {
    match state.posts.load_detail(&slug).await {
        Ok(Some(post)) => render_template_response(PostTemplate { post }, StatusCode::OK),
        Ok(None) => HttpError::new(
            "infra::http::post_detail",
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("post `{slug}` not found"),
        )
        .into_response(),
        Err(err) => post_query_error("infra::http::post_detail", err).into_response(),
    }
}

pub(crate) async fn db_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.health_check().await)
}

pub(crate) async fn not_found() -> Response {
    HttpError::new(
        "infra::http::not_found",
        StatusCode::NOT_FOUND,
        "Page not found",
        "no route matches this path",
    )
    .into_response()
}

fn post_query_error(source: &'static str, err: PostQueryError) -> HttpError {
    match err {
        PostQueryError::Repo(repo) => repo_error_to_http(source, repo),
    }
}
