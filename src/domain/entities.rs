//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub slug: String,
    pub title: String,
    pub markdown: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Title and slug of a post; never carries the markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostListing {
    pub title: String,
    pub slug: String,
}

impl From<&PostRecord> for PostListing {
    fn from(record: &PostRecord) -> Self {
        Self {
            title: record.title.clone(),
            slug: record.slug.clone(),
        }
    }
}
