use thiserror::Error;

use crate::{
    application::repos::RepoError,
    domain::{
        entities::PostRecord,
        error::DomainError,
        posts::{PostDraft, PostFormErrors},
    },
};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Read-side state of the editor for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostEditor {
    New,
    Existing(PostRecord),
    Missing { slug: String },
}

/// Result of a write-side submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created(PostRecord),
    Updated(PostRecord),
    Deleted { slug: String },
    /// Nothing was persisted; the draft is echoed back for re-rendering.
    Invalid {
        draft: PostDraft,
        errors: PostFormErrors,
    },
}
