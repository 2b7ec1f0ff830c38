use crate::domain::entities::PostListing;
use crate::domain::posts::RouteSlug;

use super::service::AdminPostService;
use super::types::{AdminPostError, PostEditor};

impl AdminPostService {
    pub async fn list(&self) -> Result<Vec<PostListing>, AdminPostError> {
        self.reader
            .list_summaries()
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn load_editor(&self, route: &RouteSlug) -> Result<PostEditor, AdminPostError> {
        let slug = match route {
            RouteSlug::New => return Ok(PostEditor::New),
            RouteSlug::Existing(slug) => slug,
        };

        let editor = match self.reader.find_by_slug(slug).await? {
            Some(post) => PostEditor::Existing(post),
            None => PostEditor::Missing { slug: slug.clone() },
        };
        Ok(editor)
    }
}
