//! Transition Status Use Case
//!
//! Reviewer-driven status changes. Approval (and a revision request) mints
//! an edit token and mails the submitter a link carrying it.

use crate::application::authorize::require_reviewer;
use crate::application::config::SubmissionConfig;
use crate::application::edit_token::{EditTokenService, IssuedEditToken};
use crate::application::notify::Notifications;
use crate::domain::entity::submission::{Review, Submission};
use crate::domain::gateway::Notifier;
use crate::domain::repository::SubmissionRepository;
use crate::domain::value_object::credential::Credential;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::Utc;
use kernel::id::SubmissionId;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TransitionInput {
    pub kind: SubmissionKind,
    pub submission_id: SubmissionId,
    pub target: SubmissionStatus,
    pub notes: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransitionOutput {
    pub submission: Submission,
    /// Present after approval or a revision request
    pub edit_token: Option<IssuedEditToken>,
}

pub struct TransitionStatusUseCase<R, N>
where
    R: SubmissionRepository,
    N: Notifier,
{
    repo: Arc<R>,
    tokens: Arc<EditTokenService>,
    notifications: Notifications<N>,
    config: Arc<SubmissionConfig>,
}

impl<R, N> TransitionStatusUseCase<R, N>
where
    R: SubmissionRepository,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(
        repo: Arc<R>,
        tokens: Arc<EditTokenService>,
        notifications: Notifications<N>,
        config: Arc<SubmissionConfig>,
    ) -> Self {
        Self {
            repo,
            tokens,
            notifications,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: TransitionInput,
        credential: Option<&Credential>,
    ) -> SubmissionResult<TransitionOutput> {
        let reviewer = require_reviewer(credential)?;

        let mut submission = self
            .repo
            .find_submission(input.submission_id)
            .await?
            .filter(|s| s.kind == input.kind)
            .ok_or_else(SubmissionError::not_found)?;

        let from = submission.status();
        let reason = match input.target {
            SubmissionStatus::Rejected => input
                .reason
                .filter(|r| !r.trim().is_empty())
                .or_else(|| self.config.default_rejection_reason.clone()),
            _ => input.reason,
        };

        submission.review(
            Review {
                target: input.target,
                reviewer,
                notes: input.notes,
                reason,
            },
            Utc::now(),
        )?;

        let edit_token = match input.target {
            SubmissionStatus::Approved | SubmissionStatus::NeedsRevision => {
                Some(self.tokens.issue(submission.id, submission.kind)?)
            }
            _ => None,
        };

        self.repo.save_submission(&submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            kind = %submission.kind,
            from = %from,
            to = %submission.status(),
            reviewer = %reviewer,
            "Submission status changed"
        );

        match (submission.status(), &edit_token) {
            (SubmissionStatus::Approved, Some(token)) => {
                self.notifications.submission_approved(&submission, token)
            }
            (SubmissionStatus::NeedsRevision, Some(token)) => {
                self.notifications.revision_requested(&submission, token)
            }
            (SubmissionStatus::Rejected, _) => self.notifications.submission_rejected(&submission),
            _ => {}
        }

        Ok(TransitionOutput {
            submission,
            edit_token,
        })
    }
}
