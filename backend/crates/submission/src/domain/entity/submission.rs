//! Submission Entity
//!
//! A guest or sponsored draft moving through editorial review. The status
//! field is private: it only changes through the transition methods below,
//! which enforce the workflow graph and the kind's status set.

use crate::domain::value_object::locale::Localized;
use crate::domain::value_object::post_payload::{ContentRevision, PostPayload};
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::domain::value_object::submitter_profile::SubmitterProfile;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PostId, SubmissionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub kind: SubmissionKind,
    pub owner_id: Option<AccountId>,
    pub submitter: SubmitterProfile,
    pub post: PostPayload,
    status: SubmissionStatus,
    pub assigned_reviewer: Option<AccountId>,
    pub admin_notes: Option<String>,
    rejection_reason: Option<String>,
    pub client_ip: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    approved_at: Option<DateTime<Utc>>,
    published_at: Option<DateTime<Utc>>,
    published_post_id: Option<PostId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reviewer's status request
#[derive(Debug, Clone)]
pub struct Review {
    pub target: SubmissionStatus,
    pub reviewer: AccountId,
    pub notes: Option<String>,
    pub reason: Option<String>,
}

impl Submission {
    /// New pending submission
    pub fn new(
        kind: SubmissionKind,
        owner_id: Option<AccountId>,
        submitter: SubmitterProfile,
        post: PostPayload,
        client_ip: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SubmissionId::new(),
            kind,
            owner_id,
            submitter,
            post,
            status: SubmissionStatus::Pending,
            assigned_reviewer: None,
            admin_notes: None,
            rejection_reason: None,
            client_ip,
            reviewed_at: None,
            approved_at: None,
            published_at: None,
            published_post_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn published_post_id(&self) -> Option<PostId> {
        self.published_post_id
    }

    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        self.owner_id == Some(account_id)
    }

    fn ensure_transition(&self, next: SubmissionStatus) -> SubmissionResult<()> {
        if !self.kind.policy().supports(next) {
            return Err(SubmissionError::Validation(format!(
                "{} submissions have no '{}' status",
                self.kind, next
            )));
        }
        if !self.status.can_transition_to(next) {
            return Err(SubmissionError::Validation(format!(
                "Cannot move submission from '{}' to '{}'",
                self.status, next
            )));
        }
        Ok(())
    }

    /// Apply a reviewer decision.
    ///
    /// Rejection needs a non-blank reason. Entering `under_review` the first
    /// time stamps `reviewed_at` and assigns the reviewer.
    pub fn review(&mut self, review: Review, now: DateTime<Utc>) -> SubmissionResult<()> {
        let Review {
            target,
            reviewer,
            notes,
            reason,
        } = review;

        if !target.is_review_target() {
            return Err(SubmissionError::Validation(format!(
                "'{target}' cannot be set through a status update"
            )));
        }
        self.ensure_transition(target)?;

        match target {
            SubmissionStatus::UnderReview => {
                if self.reviewed_at.is_none() {
                    self.reviewed_at = Some(now);
                }
                if self.assigned_reviewer.is_none() {
                    self.assigned_reviewer = Some(reviewer);
                }
            }
            SubmissionStatus::Approved => self.approved_at = Some(now),
            SubmissionStatus::Rejected => {
                let reason = reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        SubmissionError::Validation("A rejection reason is required".into())
                    })?;
                self.rejection_reason = Some(reason);
            }
            _ => {}
        }

        if let Some(notes) = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            self.admin_notes = Some(notes);
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    /// Replace content; validation and sanitizing are the caller's job
    pub fn revise(&mut self, revision: ContentRevision, now: DateTime<Utc>) -> SubmissionResult<()> {
        if !self.status.is_revisable() {
            return Err(SubmissionError::Validation(format!(
                "Content cannot be revised once the submission is '{}'",
                self.status
            )));
        }
        self.post.apply_revision(revision);
        self.updated_at = now;
        Ok(())
    }

    pub fn replace_content(&mut self, content: Localized<String>) {
        self.post.content = content;
    }

    pub fn mark_published(&mut self, post_id: PostId, now: DateTime<Utc>) -> SubmissionResult<()> {
        self.ensure_transition(SubmissionStatus::Published)?;
        self.status = SubmissionStatus::Published;
        self.published_post_id = Some(post_id);
        self.published_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn expire(&mut self, now: DateTime<Utc>) -> SubmissionResult<()> {
        self.ensure_transition(SubmissionStatus::Expired)?;
        self.status = SubmissionStatus::Expired;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::email::Email;

    fn submission(kind: SubmissionKind) -> Submission {
        let submitter = SubmitterProfile {
            name: "Nadia".to_string(),
            email: Email::new("nadia@example.com").unwrap(),
            bio: None,
            website: None,
            company: Some("Acme".to_string()),
            budget: Some(100),
        };
        Submission::new(kind, None, submitter, PostPayload::default(), None, Utc::now())
    }

    fn review(target: SubmissionStatus) -> Review {
        Review {
            target,
            reviewer: AccountId::new(),
            notes: None,
            reason: None,
        }
    }

    #[test]
    fn test_review_path_to_approved() {
        let mut s = submission(SubmissionKind::Guest);
        let now = Utc::now();
        s.review(review(SubmissionStatus::UnderReview), now).unwrap();
        assert_eq!(s.status(), SubmissionStatus::UnderReview);
        assert_eq!(s.reviewed_at(), Some(now));
        assert!(s.assigned_reviewer.is_some());

        s.review(review(SubmissionStatus::Approved), now).unwrap();
        assert_eq!(s.status(), SubmissionStatus::Approved);
        assert!(s.approved_at().is_some());
    }

    #[test]
    fn test_needs_revision_has_no_way_back() {
        let mut s = submission(SubmissionKind::Guest);
        let first = Utc::now();
        s.review(review(SubmissionStatus::UnderReview), first).unwrap();
        let later = first + chrono::Duration::hours(1);
        s.review(review(SubmissionStatus::NeedsRevision), later).unwrap();
        assert_eq!(s.reviewed_at(), Some(first));

        let err = s
            .review(review(SubmissionStatus::UnderReview), later)
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));
        assert_eq!(s.status(), SubmissionStatus::NeedsRevision);
    }

    #[test]
    fn test_publish_requires_approved() {
        let mut s = submission(SubmissionKind::Guest);
        let err = s.mark_published(PostId::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));
        assert_eq!(s.status(), SubmissionStatus::Pending);
        assert_eq!(s.published_post_id(), None);
    }

    #[test]
    fn test_published_through_review_target_is_rejected() {
        let mut s = submission(SubmissionKind::Guest);
        let err = s
            .review(review(SubmissionStatus::Published), Utc::now())
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));
    }

    #[test]
    fn test_rejection_requires_reason() {
        let mut s = submission(SubmissionKind::Guest);
        s.review(review(SubmissionStatus::UnderReview), Utc::now()).unwrap();

        let mut blank = review(SubmissionStatus::Rejected);
        blank.reason = Some("   ".to_string());
        assert!(s.review(blank, Utc::now()).is_err());

        let mut with_reason = review(SubmissionStatus::Rejected);
        with_reason.reason = Some("Off topic".to_string());
        s.review(with_reason, Utc::now()).unwrap();
        assert_eq!(s.rejection_reason(), Some("Off topic"));
        assert!(s.status().is_terminal());
    }

    #[test]
    fn test_sponsored_has_no_needs_revision() {
        let mut s = submission(SubmissionKind::Sponsored);
        s.review(review(SubmissionStatus::UnderReview), Utc::now()).unwrap();
        let err = s
            .review(review(SubmissionStatus::NeedsRevision), Utc::now())
            .unwrap_err();
        assert!(err.to_string().contains("needs_revision"));
    }

    #[test]
    fn test_only_sponsored_expires() {
        let now = Utc::now();
        let mut guest = submission(SubmissionKind::Guest);
        guest.review(review(SubmissionStatus::UnderReview), now).unwrap();
        guest.review(review(SubmissionStatus::Approved), now).unwrap();
        assert!(guest.expire(now).is_err());

        let mut sponsored = submission(SubmissionKind::Sponsored);
        sponsored.review(review(SubmissionStatus::UnderReview), now).unwrap();
        sponsored.review(review(SubmissionStatus::Approved), now).unwrap();
        sponsored.expire(now).unwrap();
        assert_eq!(sponsored.status(), SubmissionStatus::Expired);
        assert!(sponsored.mark_published(PostId::new(), now).is_err());
    }

    #[test]
    fn test_terminal_rejects_revision() {
        let now = Utc::now();
        let mut s = submission(SubmissionKind::Guest);
        s.review(review(SubmissionStatus::UnderReview), now).unwrap();
        s.review(review(SubmissionStatus::Approved), now).unwrap();
        s.mark_published(PostId::new(), now).unwrap();
        assert!(s.revise(ContentRevision::default(), now).is_err());
    }

    #[test]
    fn test_document_roundtrip_keeps_private_fields() {
        let now = Utc::now();
        let mut s = submission(SubmissionKind::Guest);
        s.review(review(SubmissionStatus::UnderReview), now).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["status"], "under_review");
        let back: Submission = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
