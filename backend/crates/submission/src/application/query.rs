//! Read Use Cases
//!
//! Reviewer listing and single-submission lookup.

use crate::application::authorize::{authorize_access, require_reviewer};
use crate::application::config::SubmissionConfig;
use crate::application::edit_token::EditTokenService;
use crate::domain::entity::submission::Submission;
use crate::domain::repository::{SubmissionPage, SubmissionQuery, SubmissionRepository};
use crate::domain::value_object::credential::Credential;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::Utc;
use kernel::id::SubmissionId;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ListInput {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ListOutput {
    pub page: SubmissionPage,
    pub page_number: u32,
    pub limit: u32,
}

pub struct ListSubmissionsUseCase<R>
where
    R: SubmissionRepository,
{
    repo: Arc<R>,
    config: Arc<SubmissionConfig>,
}

impl<R> ListSubmissionsUseCase<R>
where
    R: SubmissionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<SubmissionConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        kind: SubmissionKind,
        input: ListInput,
        credential: Option<&Credential>,
    ) -> SubmissionResult<ListOutput> {
        require_reviewer(credential)?;

        let status = match input.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => {
                let status = SubmissionStatus::from_code(code)
                    .filter(|s| kind.policy().supports(*s))
                    .ok_or_else(|| {
                        SubmissionError::Validation(format!(
                            "Unknown status '{code}' for {kind} submissions"
                        ))
                    })?;
                Some(status)
            }
        };

        let query = SubmissionQuery {
            kind,
            status,
            search: input
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            page: input.page.unwrap_or(1).max(1),
            limit: self.config.page_size(input.limit),
        };

        let page = self.repo.list_submissions(&query).await?;
        Ok(ListOutput {
            page,
            page_number: query.page,
            limit: query.limit,
        })
    }
}

pub struct GetSubmissionUseCase<R>
where
    R: SubmissionRepository,
{
    repo: Arc<R>,
    tokens: Arc<EditTokenService>,
}

impl<R> GetSubmissionUseCase<R>
where
    R: SubmissionRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<EditTokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(
        &self,
        kind: SubmissionKind,
        submission_id: SubmissionId,
        credential: Option<&Credential>,
    ) -> SubmissionResult<Submission> {
        if credential.is_none() {
            return Err(SubmissionError::Unauthenticated(
                "Authentication required".to_string(),
            ));
        }

        let submission = self
            .repo
            .find_submission(submission_id)
            .await?
            .filter(|s| s.kind == kind)
            .ok_or_else(SubmissionError::not_found)?;

        authorize_access(credential, &submission, &self.tokens, Utc::now())?;
        Ok(submission)
    }
}
