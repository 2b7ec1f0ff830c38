use tracing::info;

use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::domain::posts::{PostDraft, PostInput, PostSubmission};

use super::service::AdminPostService;
use super::types::{AdminPostError, SubmissionOutcome};

impl AdminPostService {
    /// Apply one resolved submission; at most one repository write happens.
    pub async fn submit(
        &self,
        submission: PostSubmission,
    ) -> Result<SubmissionOutcome, AdminPostError> {
        match submission {
            PostSubmission::Delete { slug } => {
                self.writer.delete_post(&slug).await?;
                info!(target = "postdesk::admin::posts", slug = %slug, "deleted post");
                Ok(SubmissionOutcome::Deleted { slug })
            }
            PostSubmission::Create(draft) => {
                let input = match validated(draft) {
                    Ok(input) => input,
                    Err(invalid) => return Ok(invalid),
                };
                let post = self
                    .writer
                    .create_post(CreatePostParams {
                        slug: input.slug,
                        title: input.title,
                        markdown: input.markdown,
                    })
                    .await?;
                info!(target = "postdesk::admin::posts", slug = %post.slug, "created post");
                Ok(SubmissionOutcome::Created(post))
            }
            PostSubmission::Update {
                current_slug,
                draft,
            } => {
                let input = match validated(draft) {
                    Ok(input) => input,
                    Err(invalid) => return Ok(invalid),
                };
                let post = self
                    .writer
                    .update_post(
                        &current_slug,
                        UpdatePostParams {
                            slug: input.slug,
                            title: input.title,
                            markdown: input.markdown,
                        },
                    )
                    .await?;
                info!(
                    target = "postdesk::admin::posts",
                    previous_slug = %current_slug,
                    slug = %post.slug,
                    "updated post"
                );
                Ok(SubmissionOutcome::Updated(post))
            }
        }
    }
}

fn validated(draft: PostDraft) -> Result<PostInput, SubmissionOutcome> {
    draft
        .validate()
        .map_err(|errors| SubmissionOutcome::Invalid { draft, errors })
}
