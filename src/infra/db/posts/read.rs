use async_trait::async_trait;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::{PostListing, PostRecord};
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::POST_COLUMNS;
use super::types::{PostListingRow, PostRow};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_summaries(&self) -> Result<Vec<PostListing>, RepoError> {
        let rows =
            sqlx::query_as::<_, PostListingRow>("SELECT title, slug FROM post ORDER BY slug")
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostListing::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM post ORDER BY slug");
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        if slug.is_empty() {
            return Err(RepoError::invalid_input("slug is required"));
        }

        let sql = format!("SELECT {POST_COLUMNS} FROM post WHERE slug = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }
}
