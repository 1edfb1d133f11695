//! Submission kinds and the policy each one follows
//!
//! Guest and sponsored submissions share one workflow. The differences are
//! data: required profile fields, allowed statuses, link treatment and the
//! post type they publish as.

use super::submission_status::SubmissionStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Guest,
    Sponsored,
}

/// Post type of a canonical post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Regular,
    Guest,
    Sponsored,
}

impl PostType {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            PostType::Regular => "regular",
            PostType::Guest => "guest",
            PostType::Sponsored => "sponsored",
        }
    }
}

#[derive(Debug)]
pub struct KindPolicy {
    pub kind: SubmissionKind,
    /// Purpose claim bound into edit tokens
    pub edit_purpose: &'static str,
    pub statuses: &'static [SubmissionStatus],
    pub requires_company: bool,
    pub requires_budget: bool,
    pub marks_sponsored_links: bool,
    pub post_type: PostType,
}

impl KindPolicy {
    pub fn supports(&self, status: SubmissionStatus) -> bool {
        self.statuses.contains(&status)
    }
}

static GUEST_POLICY: KindPolicy = KindPolicy {
    kind: SubmissionKind::Guest,
    edit_purpose: "guest_edit",
    statuses: &[
        SubmissionStatus::Pending,
        SubmissionStatus::UnderReview,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
        SubmissionStatus::NeedsRevision,
        SubmissionStatus::Published,
    ],
    requires_company: false,
    requires_budget: false,
    marks_sponsored_links: false,
    post_type: PostType::Guest,
};

static SPONSORED_POLICY: KindPolicy = KindPolicy {
    kind: SubmissionKind::Sponsored,
    edit_purpose: "sponsored_edit",
    statuses: &[
        SubmissionStatus::Pending,
        SubmissionStatus::UnderReview,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
        SubmissionStatus::Published,
        SubmissionStatus::Expired,
    ],
    requires_company: true,
    requires_budget: true,
    marks_sponsored_links: true,
    post_type: PostType::Sponsored,
};

impl SubmissionKind {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            SubmissionKind::Guest => "guest",
            SubmissionKind::Sponsored => "sponsored",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "guest" => Some(SubmissionKind::Guest),
            "sponsored" => Some(SubmissionKind::Sponsored),
            _ => None,
        }
    }

    pub fn policy(&self) -> &'static KindPolicy {
        match self {
            SubmissionKind::Guest => &GUEST_POLICY,
            SubmissionKind::Sponsored => &SPONSORED_POLICY,
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
