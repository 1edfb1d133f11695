//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use crate::domain::entity::{canonical_post::CanonicalPost, submission::Submission};
use crate::domain::value_object::locale::Locale;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::SubmissionResult;
use chrono::{DateTime, Utc};
use kernel::id::{PostId, SubmissionId};

/// Reviewer listing filter
#[derive(Debug, Clone)]
pub struct SubmissionQuery {
    pub kind: SubmissionKind,
    pub status: Option<SubmissionStatus>,
    /// Matched against titles, submitter name and email
    pub search: Option<String>,
    /// 1-based
    pub page: u32,
    pub limit: u32,
}

impl SubmissionQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionPage {
    pub items: Vec<Submission>,
    pub total: u64,
}

/// Submission repository trait
#[trait_variant::make(SubmissionRepository: Send)]
pub trait LocalSubmissionRepository {
    /// Insert a new submission
    async fn insert_submission(&self, submission: &Submission) -> SubmissionResult<()>;

    async fn find_submission(&self, id: SubmissionId) -> SubmissionResult<Option<Submission>>;

    /// Overwrite an existing submission (last write wins)
    async fn save_submission(&self, submission: &Submission) -> SubmissionResult<()>;

    /// Returns false when nothing was deleted
    async fn delete_submission(&self, id: SubmissionId) -> SubmissionResult<bool>;

    /// Newest first
    async fn list_submissions(&self, query: &SubmissionQuery) -> SubmissionResult<SubmissionPage>;

    /// Approved submissions of a kind whose approval predates `cutoff`
    async fn list_approved_before(
        &self,
        kind: SubmissionKind,
        cutoff: DateTime<Utc>,
    ) -> SubmissionResult<Vec<Submission>>;
}

/// Canonical post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn find_post(&self, id: PostId) -> SubmissionResult<Option<CanonicalPost>>;

    /// The post materialized from a submission, if any
    async fn find_post_by_source(
        &self,
        submission_id: SubmissionId,
    ) -> SubmissionResult<Option<CanonicalPost>>;

    async fn slug_taken(&self, locale: Locale, slug: &str) -> SubmissionResult<bool>;
}

/// Writes spanning both stores
#[trait_variant::make(PublishRepository: Send)]
pub trait LocalPublishRepository {
    /// Insert the post and save the (already published) submission as one
    /// unit. Fails with a validation error, writing nothing, if the stored
    /// submission is no longer approved.
    async fn commit_publication(
        &self,
        post: &CanonicalPost,
        submission: &Submission,
    ) -> SubmissionResult<()>;

    /// Save a submission that now points at an existing post. Same guard as
    /// `commit_publication`.
    async fn link_publication(&self, submission: &Submission) -> SubmissionResult<()>;

    /// Posts whose source submission is not marked published
    async fn find_unlinked_publications(&self) -> SubmissionResult<Vec<(SubmissionId, PostId)>>;
}
