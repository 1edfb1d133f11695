//! In-memory store
//!
//! Implements every repository trait behind one mutex, so publication is
//! atomic in the same sense as the Postgres transaction. Used by tests and
//! local runs without a database.

use crate::domain::entity::{canonical_post::CanonicalPost, submission::Submission};
use crate::domain::repository::{
    PostRepository, PublishRepository, SubmissionPage, SubmissionQuery, SubmissionRepository,
};
use crate::domain::value_object::locale::Locale;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::{DateTime, Utc};
use kernel::id::{PostId, SubmissionId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    submissions: HashMap<SubmissionId, Submission>,
    posts: HashMap<PostId, CanonicalPost>,
}

impl MemoryState {
    fn ensure_still_approved(&self, id: SubmissionId) -> SubmissionResult<()> {
        match self.submissions.get(&id) {
            None => Err(SubmissionError::not_found()),
            Some(stored) if stored.status() != SubmissionStatus::Approved => Err(
                SubmissionError::Validation("Submission is no longer approved".to_string()),
            ),
            Some(_) => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a post directly, bypassing the workflow
    pub async fn insert_post(&self, post: CanonicalPost) {
        self.state.lock().await.posts.insert(post.id, post);
    }

    pub async fn post_count(&self) -> usize {
        self.state.lock().await.posts.len()
    }
}

fn matches_search(submission: &Submission, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let title = &submission.post.title;
    [
        Some(submission.submitter.name.as_str()),
        Some(submission.submitter.email.as_str()),
        title.text(Locale::En),
        title.text(Locale::Bn),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

impl SubmissionRepository for InMemoryStore {
    async fn insert_submission(&self, submission: &Submission) -> SubmissionResult<()> {
        let mut state = self.state.lock().await;
        if state.submissions.contains_key(&submission.id) {
            return Err(SubmissionError::Internal(format!(
                "duplicate submission id {}",
                submission.id
            )));
        }
        state.submissions.insert(submission.id, submission.clone());
        Ok(())
    }

    async fn find_submission(&self, id: SubmissionId) -> SubmissionResult<Option<Submission>> {
        Ok(self.state.lock().await.submissions.get(&id).cloned())
    }

    async fn save_submission(&self, submission: &Submission) -> SubmissionResult<()> {
        let mut state = self.state.lock().await;
        match state.submissions.get_mut(&submission.id) {
            Some(stored) => {
                *stored = submission.clone();
                Ok(())
            }
            None => Err(SubmissionError::not_found()),
        }
    }

    async fn delete_submission(&self, id: SubmissionId) -> SubmissionResult<bool> {
        Ok(self.state.lock().await.submissions.remove(&id).is_some())
    }

    async fn list_submissions(&self, query: &SubmissionQuery) -> SubmissionResult<SubmissionPage> {
        let state = self.state.lock().await;
        let mut items: Vec<Submission> = state
            .submissions
            .values()
            .filter(|s| s.kind == query.kind)
            .filter(|s| query.status.is_none_or(|status| s.status() == status))
            .filter(|s| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|needle| matches_search(s, needle))
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .collect();

        Ok(SubmissionPage { items, total })
    }

    async fn list_approved_before(
        &self,
        kind: SubmissionKind,
        cutoff: DateTime<Utc>,
    ) -> SubmissionResult<Vec<Submission>> {
        let state = self.state.lock().await;
        Ok(state
            .submissions
            .values()
            .filter(|s| s.kind == kind && s.status() == SubmissionStatus::Approved)
            .filter(|s| s.approved_at().is_some_and(|at| at < cutoff))
            .cloned()
            .collect())
    }
}

impl PostRepository for InMemoryStore {
    async fn find_post(&self, id: PostId) -> SubmissionResult<Option<CanonicalPost>> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }

    async fn find_post_by_source(
        &self,
        submission_id: SubmissionId,
    ) -> SubmissionResult<Option<CanonicalPost>> {
        let state = self.state.lock().await;
        Ok(state
            .posts
            .values()
            .find(|p| p.source_submission_id == Some(submission_id))
            .cloned())
    }

    async fn slug_taken(&self, locale: Locale, slug: &str) -> SubmissionResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .posts
            .values()
            .any(|p| p.slug.text(locale) == Some(slug)))
    }
}

impl PublishRepository for InMemoryStore {
    async fn commit_publication(
        &self,
        post: &CanonicalPost,
        submission: &Submission,
    ) -> SubmissionResult<()> {
        let mut state = self.state.lock().await;
        state.ensure_still_approved(submission.id)?;

        let collides = state.posts.values().any(|existing| {
            existing.source_submission_id == post.source_submission_id
                || Locale::ALL.into_iter().any(|locale| {
                    existing.slug.text(locale).is_some()
                        && existing.slug.text(locale) == post.slug.text(locale)
                })
        });
        if collides {
            return Err(SubmissionError::Validation(
                "A post with the same slug or source already exists; retry the publish"
                    .to_string(),
            ));
        }

        state.posts.insert(post.id, post.clone());
        state.submissions.insert(submission.id, submission.clone());
        Ok(())
    }

    async fn link_publication(&self, submission: &Submission) -> SubmissionResult<()> {
        let mut state = self.state.lock().await;
        state.ensure_still_approved(submission.id)?;
        state.submissions.insert(submission.id, submission.clone());
        Ok(())
    }

    async fn find_unlinked_publications(&self) -> SubmissionResult<Vec<(SubmissionId, PostId)>> {
        let state = self.state.lock().await;
        Ok(state
            .posts
            .values()
            .filter_map(|p| p.source_submission_id.map(|sid| (sid, p.id)))
            .filter(|(sid, _)| {
                state
                    .submissions
                    .get(sid)
                    .is_some_and(|s| s.status() != SubmissionStatus::Published)
            })
            .collect())
    }
}
