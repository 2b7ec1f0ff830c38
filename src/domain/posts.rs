//! Post editor rules: route slugs, submission intents and field validation.
//!
//! A form submission is resolved exactly once into a [`PostSubmission`]; code
//! downstream of that point never compares intent strings again.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Route segment that selects the creation form instead of an existing post.
pub const NEW_POST_SEGMENT: &str = "new";

/// The `{slug}` segment of `/posts/admin/{slug}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSlug {
    New,
    Existing(String),
}

impl RouteSlug {
    /// An empty segment is a routing contract violation, not user input.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::invariant("slug is required"));
        }
        if raw == NEW_POST_SEGMENT {
            return Ok(Self::New);
        }
        Ok(Self::Existing(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => NEW_POST_SEGMENT,
            Self::Existing(slug) => slug,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }
}

impl fmt::Display for RouteSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-supplied discriminator carried by the submit buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostIntent {
    Create,
    Update,
    Delete,
}

impl PostIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Field values exactly as submitted; each may be missing or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

/// A draft whose three fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub markdown: String,
}

/// One message per missing field, `None` for fields that were supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostFormErrors {
    pub title: Option<&'static str>,
    pub slug: Option<&'static str>,
    pub markdown: Option<&'static str>,
}

impl PostDraft {
    pub fn validate(&self) -> Result<PostInput, PostFormErrors> {
        let title = present(self.title.as_deref());
        let slug = present(self.slug.as_deref());
        let markdown = present(self.markdown.as_deref());

        let errors = PostFormErrors {
            title: title.is_none().then_some("Title is required"),
            slug: slug.is_none().then_some("Slug is required"),
            markdown: markdown.is_none().then_some("Markdown is required"),
        };

        match (title, slug, markdown) {
            (Some(title), Some(slug), Some(markdown)) => Ok(PostInput {
                title: title.to_string(),
                slug: slug.to_string(),
                markdown: markdown.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// What a single admin form submission asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSubmission {
    Create(PostDraft),
    Update { current_slug: String, draft: PostDraft },
    Delete { slug: String },
}

impl PostSubmission {
    /// Decide the write operation from the route and the optional intent.
    ///
    /// `delete` removes the post the route names. Any other submission is
    /// decided by the route alone: `new` creates, anything else updates.
    pub fn resolve(route: &RouteSlug, intent: Option<PostIntent>, draft: PostDraft) -> Self {
        match (route, intent) {
            (route, Some(PostIntent::Delete)) => Self::Delete {
                slug: route.as_str().to_string(),
            },
            (RouteSlug::New, _) => Self::Create(draft),
            (RouteSlug::Existing(slug), _) => Self::Update {
                current_slug: slug.clone(),
                draft,
            },
        }
    }

    pub fn intent(&self) -> PostIntent {
        match self {
            Self::Create(_) => PostIntent::Create,
            Self::Update { .. } => PostIntent::Update,
            Self::Delete { .. } => PostIntent::Delete,
        }
    }
}
