//! Publish Use Case
//!
//! Materializes an approved submission into a canonical post:
//! 1. content policy over every locale
//! 2. a unique slug per titled locale
//! 3. post insert and submission update committed together
//!
//! A retry after a half-finished publish finds the existing post by its
//! source submission and links it instead of creating a second one.

use crate::application::authorize::require_reviewer;
use crate::application::notify::Notifications;
use crate::domain::entity::{canonical_post::CanonicalPost, submission::Submission};
use crate::domain::gateway::Notifier;
use crate::domain::repository::{PostRepository, PublishRepository, SubmissionRepository};
use crate::domain::services::content_policy::ContentPolicy;
use crate::domain::value_object::credential::Credential;
use crate::domain::value_object::locale::{Locale, Localized};
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::Utc;
use kernel::id::SubmissionId;
use platform::slug::{slugify, with_suffix};
use std::sync::Arc;

/// Suffix attempts before falling back to an id-derived slug
const MAX_SLUG_ATTEMPTS: u32 = 50;

#[derive(Debug, Clone)]
pub struct PublishOutput {
    pub submission: Submission,
    pub post: CanonicalPost,
}

pub struct PublishUseCase<R, N>
where
    R: SubmissionRepository + PostRepository + PublishRepository,
    N: Notifier,
{
    repo: Arc<R>,
    policy: Arc<ContentPolicy>,
    notifications: Notifications<N>,
}

impl<R, N> PublishUseCase<R, N>
where
    R: SubmissionRepository + PostRepository + PublishRepository,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, policy: Arc<ContentPolicy>, notifications: Notifications<N>) -> Self {
        Self {
            repo,
            policy,
            notifications,
        }
    }

    pub async fn execute(
        &self,
        kind: SubmissionKind,
        submission_id: SubmissionId,
        credential: Option<&Credential>,
    ) -> SubmissionResult<PublishOutput> {
        let reviewer = require_reviewer(credential)?;

        let mut submission = self
            .repo
            .find_submission(submission_id)
            .await?
            .filter(|s| s.kind == kind)
            .ok_or_else(SubmissionError::not_found)?;

        match submission.status() {
            SubmissionStatus::Approved => {}
            SubmissionStatus::Published => {
                return Err(SubmissionError::Validation(
                    "Submission is already published".to_string(),
                ));
            }
            other => {
                return Err(SubmissionError::Validation(format!(
                    "Only approved submissions can be published (current status: '{other}')"
                )));
            }
        }

        let now = Utc::now();

        // An earlier attempt may have written the post without the back-reference
        if let Some(post) = self.repo.find_post_by_source(submission.id).await? {
            submission.mark_published(post.id, now)?;
            self.repo.link_publication(&submission).await?;
            tracing::warn!(
                submission_id = %submission.id,
                post_id = %post.id,
                "Linked submission to post from an earlier publish attempt"
            );
            return Ok(PublishOutput { submission, post });
        }

        let content = self
            .policy
            .apply_localized(&submission.post.content, submission.kind);
        let slug = self.unique_slugs(&submission).await?;
        let post = CanonicalPost::from_submission(&submission, content, slug, now);

        submission.mark_published(post.id, now)?;
        self.repo.commit_publication(&post, &submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            post_id = %post.id,
            kind = %submission.kind,
            reviewer = %reviewer,
            "Submission published"
        );

        self.notifications.submission_published(&submission, &post);
        Ok(PublishOutput { submission, post })
    }

    async fn unique_slugs(&self, submission: &Submission) -> SubmissionResult<Localized<String>> {
        let mut slugs = Localized::default();
        for (locale, title) in submission.post.title.iter() {
            slugs.set(locale, Some(self.unique_slug(locale, title, submission).await?));
        }
        Ok(slugs)
    }

    async fn unique_slug(
        &self,
        locale: Locale,
        title: &str,
        submission: &Submission,
    ) -> SubmissionResult<String> {
        let base = slugify(title);
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = with_suffix(&base, attempt);
            if !self.repo.slug_taken(locale, &candidate).await? {
                return Ok(candidate);
            }
        }
        let simple = submission.id.as_uuid().simple().to_string();
        Ok(format!("{}-{}", base, &simple[..8]))
    }
}
