use async_trait::async_trait;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::POST_COLUMNS;
use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            slug,
            title,
            markdown,
        } = params;

        let sql = format!(
            "INSERT INTO post (slug, title, markdown) VALUES ($1, $2, $3) RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .bind(title)
            .bind(markdown)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(
        &self,
        current_slug: &str,
        params: UpdatePostParams,
    ) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            slug,
            title,
            markdown,
        } = params;

        let sql = format!(
            "UPDATE post SET slug = $2, title = $3, markdown = $4, updated_at = now() \
             WHERE slug = $1 RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(current_slug)
            .bind(slug)
            .bind(title)
            .bind(markdown)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, slug: &str) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM post WHERE slug = $1")
            .bind(slug)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
