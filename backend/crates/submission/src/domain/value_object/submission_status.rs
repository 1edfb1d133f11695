//! Submission Status Value Object
//!
//! The workflow graph:
//!
//! ```text
//! pending -> under_review -> approved -> published
//!                         -> rejected
//!                         -> needs_revision -> under_review
//! approved -> expired          (sponsored only, by the reconciliation pass)
//! ```
//!
//! Which statuses a submission may use at all depends on its kind, see
//! [`KindPolicy`](super::submission_kind::KindPolicy).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
    NeedsRevision,
    Published,
    Expired,
}

impl SubmissionStatus {
    /// Targets a reviewer may request through a status update
    pub const REVIEW_TARGETS: [SubmissionStatus; 4] = [
        SubmissionStatus::UnderReview,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
        SubmissionStatus::NeedsRevision,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::NeedsRevision => "needs_revision",
            Self::Published => "published",
            Self::Expired => "expired",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(Self::Pending),
            "under_review" => Some(Self::UnderReview),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "needs_revision" => Some(Self::NeedsRevision),
            "published" => Some(Self::Published),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// No transition leaves these
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Published | Self::Expired)
    }

    #[inline]
    pub const fn is_review_target(&self) -> bool {
        matches!(
            self,
            Self::UnderReview | Self::Approved | Self::Rejected | Self::NeedsRevision
        )
    }

    /// Content may still change in these states
    #[inline]
    pub const fn is_revisable(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::UnderReview | Self::NeedsRevision | Self::Approved
        )
    }

    /// Edge check on the workflow graph, independent of kind
    pub const fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (*self, next),
            (Pending, UnderReview)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (UnderReview, NeedsRevision)
                | (Approved, Published)
                | (Approved, Expired)
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
