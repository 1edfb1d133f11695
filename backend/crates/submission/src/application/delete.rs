//! Delete Submission Use Case

use crate::application::authorize::require_admin;
use crate::domain::repository::SubmissionRepository;
use crate::domain::value_object::credential::Credential;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::{SubmissionError, SubmissionResult};
use kernel::id::SubmissionId;
use std::sync::Arc;

pub struct DeleteSubmissionUseCase<R>
where
    R: SubmissionRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteSubmissionUseCase<R>
where
    R: SubmissionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Published submissions stay as the provenance of their post
    pub async fn execute(
        &self,
        kind: SubmissionKind,
        submission_id: SubmissionId,
        credential: Option<&Credential>,
    ) -> SubmissionResult<()> {
        let admin = require_admin(credential)?;

        let submission = self
            .repo
            .find_submission(submission_id)
            .await?
            .filter(|s| s.kind == kind)
            .ok_or_else(SubmissionError::not_found)?;

        if submission.status() == SubmissionStatus::Published {
            return Err(SubmissionError::Validation(
                "Published submissions cannot be deleted".to_string(),
            ));
        }

        if !self.repo.delete_submission(submission_id).await? {
            return Err(SubmissionError::not_found());
        }

        tracing::info!(
            submission_id = %submission_id,
            kind = %kind,
            admin = %admin,
            "Submission deleted"
        );
        Ok(())
    }
}
