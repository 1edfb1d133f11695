//! Canonical Post Entity
//!
//! The published post. Author and sponsor data are copied from the
//! submission at publish time; later edits to either side never propagate.

use super::submission::Submission;
use crate::domain::value_object::locale::Localized;
use crate::domain::value_object::submission_kind::{PostType, SubmissionKind};
use chrono::{DateTime, Utc};
use kernel::id::{PostId, SubmissionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub name: String,
    pub bio: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorInfo {
    pub company: String,
    pub website: Option<String>,
    pub disclosure: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPost {
    pub id: PostId,
    pub post_type: PostType,
    pub title: Localized<String>,
    pub excerpt: Localized<String>,
    pub content: Localized<String>,
    pub slug: Localized<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub author: PostAuthor,
    pub sponsor: Option<SponsorInfo>,
    pub source_submission_id: Option<SubmissionId>,
    pub published_at: DateTime<Utc>,
}

pub fn sponsor_disclosure(company: &str) -> String {
    format!("Sponsored by {company}")
}

impl CanonicalPost {
    /// Snapshot a submission into a post.
    ///
    /// `content` is the policy-filtered body; `slug` holds one unique slug
    /// per locale that has a title.
    pub fn from_submission(
        submission: &Submission,
        content: Localized<String>,
        slug: Localized<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let profile = &submission.submitter;
        let sponsor = match submission.kind {
            SubmissionKind::Guest => None,
            SubmissionKind::Sponsored => {
                let company = profile
                    .company
                    .clone()
                    .unwrap_or_else(|| profile.name.clone());
                Some(SponsorInfo {
                    disclosure: sponsor_disclosure(&company),
                    company,
                    website: profile.website.clone(),
                })
            }
        };

        Self {
            id: PostId::new(),
            post_type: submission.kind.policy().post_type,
            title: submission.post.title.clone(),
            excerpt: submission.post.excerpt.clone(),
            content,
            slug,
            category: submission.post.category.clone(),
            tags: submission.post.tags.clone(),
            featured_image: submission.post.featured_image.clone(),
            author: PostAuthor {
                name: profile.name.clone(),
                bio: profile.bio.clone(),
                website: profile.website.clone(),
            },
            sponsor,
            source_submission_id: Some(submission.id),
            published_at: now,
        }
    }
}
