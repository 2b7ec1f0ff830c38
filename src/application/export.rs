//! Export of every stored post to a TOML archive.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    application::{error::AppError, posts::PostService},
    domain::entities::PostRecord,
    infra::error::InfraError,
};

const ARCHIVE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct PostArchive {
    pub version: u32,
    #[serde(default)]
    pub posts: Vec<PostRecord>,
}

impl PostArchive {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        Self {
            version: ARCHIVE_VERSION,
            posts,
        }
    }

    pub fn encode(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self)
            .map_err(|err| AppError::unexpected(format!("failed to encode archive: {err}")))
    }
}

/// Write all posts to `path`, returning how many were exported.
pub async fn export_posts(posts: &PostService, path: &Path) -> Result<usize, AppError> {
    let records = posts
        .list_all()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
    let count = records.len();
    let encoded = PostArchive::new(records).encode()?;
    tokio::fs::write(path, encoded)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;
    Ok(count)
}
