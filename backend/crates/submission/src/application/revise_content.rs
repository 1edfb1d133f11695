//! Revise Content Use Case
//!
//! Content edits by a reviewer, the owning account, or an edit-token holder.
//! Revised text is sanitized, then validated like a fresh submission.

use crate::application::authorize::{Actor, authorize_revision};
use crate::application::config::SubmissionConfig;
use crate::application::edit_token::EditTokenService;
use crate::application::submit::sanitize_payload;
use crate::domain::entity::submission::Submission;
use crate::domain::gateway::HtmlSanitizer;
use crate::domain::repository::SubmissionRepository;
use crate::domain::value_object::credential::Credential;
use crate::domain::value_object::post_payload::ContentRevision;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::Utc;
use kernel::id::SubmissionId;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ReviseInput {
    pub kind: SubmissionKind,
    pub submission_id: SubmissionId,
    pub revision: ContentRevision,
}

pub struct ReviseContentUseCase<R>
where
    R: SubmissionRepository,
{
    repo: Arc<R>,
    tokens: Arc<EditTokenService>,
    sanitizer: Arc<dyn HtmlSanitizer>,
    config: Arc<SubmissionConfig>,
}

impl<R> ReviseContentUseCase<R>
where
    R: SubmissionRepository,
{
    pub fn new(
        repo: Arc<R>,
        tokens: Arc<EditTokenService>,
        sanitizer: Arc<dyn HtmlSanitizer>,
        config: Arc<SubmissionConfig>,
    ) -> Self {
        Self {
            repo,
            tokens,
            sanitizer,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: ReviseInput,
        credential: Option<&Credential>,
    ) -> SubmissionResult<Submission> {
        if input.revision.is_empty() {
            return Err(SubmissionError::Validation(
                "Revision must change at least one field".to_string(),
            ));
        }

        let mut submission = self
            .repo
            .find_submission(input.submission_id)
            .await?
            .filter(|s| s.kind == input.kind)
            .ok_or_else(SubmissionError::not_found)?;

        let now = Utc::now();
        let actor = authorize_revision(credential, &submission, &self.tokens, now)?;

        submission.revise(input.revision, now)?;
        submission.post = sanitize_payload(self.sanitizer.as_ref(), submission.post).normalized();
        submission.post.validate(self.config.min_content_chars)?;

        self.repo.save_submission(&submission).await?;

        let via = match actor {
            Actor::Reviewer(_) => "reviewer",
            Actor::Owner(_) => "owner",
            Actor::TokenHolder => "edit_token",
        };
        tracing::info!(
            submission_id = %submission.id,
            kind = %submission.kind,
            status = %submission.status(),
            via,
            "Submission content revised"
        );

        Ok(submission)
    }
}
