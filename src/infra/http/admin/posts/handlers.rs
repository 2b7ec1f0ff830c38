use axum::{
    Json,
    extract::{Form, Path, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

use tracing::debug;

use crate::{
    application::{
        admin::posts::SubmissionOutcome,
        error::HttpError,
    },
    domain::posts::{PostSubmission, RouteSlug},
    infra::http::{ADMIN_INDEX_PATH, admin::AdminState, wants_json},
    presentation::{admin::views as admin_views, views::render_template_response},
};

use super::{errors::admin_post_error, forms::AdminPostForm};

pub(crate) async fn admin_posts(State(state): State<AdminState>) -> Response {
    match state.posts.list().await {
        Ok(posts) => {
            let view = admin_views::AdminPostListView::from_listings(posts);
            render_template_response(admin_views::AdminPostsTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_post_error("infra::http::admin_posts", err).into_response(),
    }
}

pub(crate) async fn admin_post_loader(
    State(state): State<AdminState>,
    Path(slug): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_post_loader";

    let route = match RouteSlug::parse(&slug) {
        Ok(route) => route,
        Err(err) => return admin_post_error(SOURCE, err.into()).into_response(),
    };

    let editor = match state.posts.load_editor(&route).await {
        Ok(editor) => editor,
        Err(err) => return admin_post_error(SOURCE, err).into_response(),
    };

    match admin_views::AdminPostEditorView::from_editor(&route, editor) {
        Some(view) => {
            render_template_response(admin_views::AdminPostEditTemplate { view }, StatusCode::OK)
        }
        None => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("post `{route}` not found"),
        )
        .into_response(),
    }
}

pub(crate) async fn admin_post_action(
    State(state): State<AdminState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    form: Result<Form<AdminPostForm>, FormRejection>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_post_action";

    let route = match RouteSlug::parse(&slug) {
        Ok(route) => route,
        Err(err) => return admin_post_error(SOURCE, err.into()).into_response(),
    };

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            return HttpError::new(
                SOURCE,
                StatusCode::BAD_REQUEST,
                "Post request could not be processed",
                rejection.body_text(),
            )
            .into_response();
        }
    };

    let (intent, draft) = form.into_parts();
    let submission = PostSubmission::resolve(&route, intent, draft);
    debug!(
        target = "postdesk::admin::posts",
        route = %route,
        intent = submission.intent().as_str(),
        "resolved submission"
    );

    match state.posts.submit(submission).await {
        Ok(
            SubmissionOutcome::Created(_)
            | SubmissionOutcome::Updated(_)
            | SubmissionOutcome::Deleted { .. },
        ) => Redirect::to(ADMIN_INDEX_PATH).into_response(),
        Ok(SubmissionOutcome::Invalid { draft, errors }) => {
            if wants_json(&headers) {
                return (StatusCode::OK, Json(errors)).into_response();
            }
            let view = admin_views::AdminPostEditorView::from_draft(&route, draft, errors);
            render_template_response(admin_views::AdminPostEditTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_post_error(SOURCE, err).into_response(),
    }
}
