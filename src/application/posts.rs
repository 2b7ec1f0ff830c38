//! Read-only post queries backing the public listing and detail pages.

use std::sync::Arc;

use thiserror::Error;

use crate::application::markdown::render_markdown;
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::{PostListing, PostRecord};

#[derive(Debug, Error)]
pub enum PostQueryError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A post ready for display, with its markdown already rendered.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub slug: String,
    pub title: String,
    pub body_html: String,
}

impl From<PostRecord> for PostDetail {
    fn from(record: PostRecord) -> Self {
        let body_html = render_markdown(&record.markdown);
        Self {
            slug: record.slug,
            title: record.title,
            body_html,
        }
    }
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>) -> Self {
        Self { reader }
    }

    pub async fn list_summaries(&self) -> Result<Vec<PostListing>, PostQueryError> {
        Ok(self.reader.list_summaries().await?)
    }

    pub async fn list_all(&self) -> Result<Vec<PostRecord>, PostQueryError> {
        Ok(self.reader.list_all().await?)
    }

    pub async fn load_detail(&self, slug: &str) -> Result<Option<PostDetail>, PostQueryError> {
        let record = self.reader.find_by_slug(slug).await?;
        Ok(record.map(PostDetail::from))
    }
}
