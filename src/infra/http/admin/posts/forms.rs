use serde::Deserialize;

use crate::domain::posts::{PostDraft, PostIntent};

/// Body of `POST /posts/admin/{slug}`; any other field is rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AdminPostForm {
    pub(crate) title: Option<String>,
    pub(crate) slug: Option<String>,
    pub(crate) markdown: Option<String>,
    pub(crate) intent: Option<PostIntent>,
}

impl AdminPostForm {
    pub(crate) fn into_parts(self) -> (Option<PostIntent>, PostDraft) {
        let draft = PostDraft {
            title: self.title,
            slug: self.slug,
            markdown: self.markdown,
        };
        (self.intent, draft)
    }
}
