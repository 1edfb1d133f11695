//! Submit Use Case

use crate::application::config::SubmissionConfig;
use crate::application::notify::Notifications;
use crate::domain::entity::submission::Submission;
use crate::domain::gateway::{HtmlSanitizer, Notifier};
use crate::domain::repository::SubmissionRepository;
use crate::domain::value_object::post_payload::PostPayload;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submitter_profile::{SubmitterDraft, SubmitterProfile};
use crate::error::SubmissionResult;
use chrono::Utc;
use kernel::id::AccountId;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SubmitInput {
    pub kind: SubmissionKind,
    /// `None` for anonymous submitters
    pub owner_id: Option<AccountId>,
    pub submitter: SubmitterDraft,
    pub post: PostPayload,
    pub client_ip: Option<String>,
}

pub struct SubmitUseCase<R, N>
where
    R: SubmissionRepository,
    N: Notifier,
{
    repo: Arc<R>,
    sanitizer: Arc<dyn HtmlSanitizer>,
    notifications: Notifications<N>,
    config: Arc<SubmissionConfig>,
}

impl<R, N> SubmitUseCase<R, N>
where
    R: SubmissionRepository,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(
        repo: Arc<R>,
        sanitizer: Arc<dyn HtmlSanitizer>,
        notifications: Notifications<N>,
        config: Arc<SubmissionConfig>,
    ) -> Self {
        Self {
            repo,
            sanitizer,
            notifications,
            config,
        }
    }

    pub async fn execute(&self, input: SubmitInput) -> SubmissionResult<Submission> {
        let policy = input.kind.policy();
        let submitter =
            SubmitterProfile::from_draft(input.submitter, policy, self.config.sponsored_min_budget)?;

        // Length rules apply to what will be stored
        let post = sanitize_payload(self.sanitizer.as_ref(), input.post.normalized()).normalized();
        post.validate(self.config.min_content_chars)?;

        let submission = Submission::new(
            input.kind,
            input.owner_id,
            submitter,
            post,
            input.client_ip,
            Utc::now(),
        );
        self.repo.insert_submission(&submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            kind = %submission.kind,
            anonymous = submission.owner_id.is_none(),
            "Submission received"
        );

        self.notifications.submission_received(&submission);
        Ok(submission)
    }
}

/// Rich text through the allowlist, short fields down to plain text
pub(crate) fn sanitize_payload(sanitizer: &dyn HtmlSanitizer, post: PostPayload) -> PostPayload {
    PostPayload {
        title: post.title.map(|_, t| sanitizer.plain_text(t)),
        excerpt: post.excerpt.map(|_, e| sanitizer.plain_text(e)),
        content: post.content.map(|_, c| sanitizer.clean(c)),
        category: sanitizer.plain_text(&post.category),
        tags: post.tags.iter().map(|t| sanitizer.plain_text(t)).collect(),
        featured_image: post.featured_image,
    }
}
