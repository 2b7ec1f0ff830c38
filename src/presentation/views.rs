use crate::application::error::HttpError;
use crate::application::posts::PostDetail;
use crate::domain::entities::PostListing;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render the error boundary page.
///
/// Falls back to plain text when the page itself cannot be rendered, so an
/// [`HttpError`] never recurses into another one.
pub fn render_error_boundary(status: StatusCode, public_message: &str, detail: &str) -> Response {
    let template = ErrorTemplate {
        view: ErrorPageView {
            status: status.as_u16(),
            title: public_message.to_string(),
            detail: detail.to_string(),
        },
    };

    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (
            status,
            format!("There was an error loading this post:\n\n{detail}"),
        )
            .into_response(),
    }
}

/// `{prefix}/{slug}`, with the slug percent-encoded as a single path segment.
pub fn slug_path(prefix: &str, slug: &str) -> String {
    format!("{prefix}/{}", urlencoding::encode(slug))
}

/// A listing entry ready to render as a link.
pub struct PostLinkView {
    pub title: String,
    pub href: String,
}

impl PostLinkView {
    pub fn new(prefix: &str, listing: PostListing) -> Self {
        Self {
            href: slug_path(prefix, &listing.slug),
            title: listing.title,
        }
    }
}

pub struct ErrorPageView {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: ErrorPageView,
}

#[derive(Template)]
#[template(path = "posts.html")]
pub struct PostsTemplate {
    pub posts: Vec<PostLinkView>,
}

impl PostsTemplate {
    pub fn from_listings(listings: Vec<PostListing>) -> Self {
        let posts = listings
            .into_iter()
            .map(|listing| PostLinkView::new("/posts", listing))
            .collect();
        Self { posts }
    }
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub post: PostDetail,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}
