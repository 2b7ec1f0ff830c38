use crate::application::admin::posts::PostEditor;
use crate::domain::entities::PostListing;
use crate::domain::posts::{PostDraft, PostFormErrors, RouteSlug};
use crate::presentation::views::{PostLinkView, slug_path};
use askama::Template;

const ADMIN_POSTS_PREFIX: &str = "/posts/admin";

pub struct AdminPostListView {
    pub posts: Vec<PostLinkView>,
}

impl AdminPostListView {
    pub fn from_listings(listings: Vec<PostListing>) -> Self {
        let posts = listings
            .into_iter()
            .map(|listing| PostLinkView::new(ADMIN_POSTS_PREFIX, listing))
            .collect();
        Self { posts }
    }
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub view: AdminPostListView,
}

/// Form state for `/posts/admin/{slug}`.
pub struct AdminPostEditorView {
    pub heading: String,
    pub action: String,
    pub is_new: bool,
    pub title: String,
    pub slug: String,
    pub markdown: String,
    pub errors: PostFormErrors,
}

impl AdminPostEditorView {
    /// Returns `None` for [`PostEditor::Missing`], which has no form to show.
    pub fn from_editor(route: &RouteSlug, editor: PostEditor) -> Option<Self> {
        match editor {
            PostEditor::New => Some(Self::blank(route)),
            PostEditor::Existing(post) => Some(Self {
                heading: format!("Edit {}", post.title),
                action: action_for(route),
                is_new: false,
                title: post.title,
                slug: post.slug,
                markdown: post.markdown,
                errors: PostFormErrors::default(),
            }),
            PostEditor::Missing { .. } => None,
        }
    }

    /// Re-render a rejected submission with the values the user typed.
    pub fn from_draft(route: &RouteSlug, draft: PostDraft, errors: PostFormErrors) -> Self {
        Self {
            heading: heading_for(route),
            action: action_for(route),
            is_new: route.is_new(),
            title: draft.title.unwrap_or_default(),
            slug: draft.slug.unwrap_or_default(),
            markdown: draft.markdown.unwrap_or_default(),
            errors,
        }
    }

    fn blank(route: &RouteSlug) -> Self {
        Self::from_draft(route, PostDraft::default(), PostFormErrors::default())
    }
}

fn heading_for(route: &RouteSlug) -> String {
    match route {
        RouteSlug::New => "New post".to_string(),
        RouteSlug::Existing(slug) => format!("Edit {slug}"),
    }
}

fn action_for(route: &RouteSlug) -> String {
    slug_path(ADMIN_POSTS_PREFIX, route.as_str())
}

#[derive(Template)]
#[template(path = "admin/post_edit.html")]
pub struct AdminPostEditTemplate {
    pub view: AdminPostEditorView,
}
