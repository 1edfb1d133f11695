//! Reconcile Use Case
//!
//! Startup repair pass:
//! - approved submissions whose post already exists get their back-reference
//! - sponsored submissions left approved past the window become `expired`

use crate::application::config::SubmissionConfig;
use crate::domain::repository::{PublishRepository, SubmissionRepository};
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::SubmissionResult;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub relinked: usize,
    pub expired: usize,
}

pub struct ReconcileUseCase<R>
where
    R: SubmissionRepository + PublishRepository,
{
    repo: Arc<R>,
    config: Arc<SubmissionConfig>,
}

impl<R> ReconcileUseCase<R>
where
    R: SubmissionRepository + PublishRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<SubmissionConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self) -> SubmissionResult<ReconcileReport> {
        self.execute_at(Utc::now()).await
    }

    pub async fn execute_at(&self, now: DateTime<Utc>) -> SubmissionResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for (submission_id, post_id) in self.repo.find_unlinked_publications().await? {
            let Some(mut submission) = self.repo.find_submission(submission_id).await? else {
                continue;
            };
            if submission.status() != SubmissionStatus::Approved {
                tracing::warn!(
                    submission_id = %submission_id,
                    post_id = %post_id,
                    status = %submission.status(),
                    "Post references a submission that is not approved; leaving as is"
                );
                continue;
            }
            submission.mark_published(post_id, now)?;
            self.repo.link_publication(&submission).await?;
            tracing::info!(
                submission_id = %submission_id,
                post_id = %post_id,
                "Relinked published submission"
            );
            report.relinked += 1;
        }

        let window = chrono::Duration::from_std(self.config.sponsored_approval_window)
            .unwrap_or(chrono::Duration::MAX);
        let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        for mut submission in self
            .repo
            .list_approved_before(SubmissionKind::Sponsored, cutoff)
            .await?
        {
            submission.expire(now)?;
            self.repo.save_submission(&submission).await?;
            tracing::info!(submission_id = %submission.id, "Sponsored submission expired");
            report.expired += 1;
        }

        Ok(report)
    }
}
