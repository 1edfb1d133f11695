//! API DTOs (Data Transfer Objects)

use crate::application::edit_token::IssuedEditToken;
use crate::application::query::ListOutput;
use crate::domain::entity::{canonical_post::CanonicalPost, submission::Submission};
use crate::domain::value_object::locale::Localized;
use crate::domain::value_object::post_payload::{ContentRevision, PostPayload};
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::domain::value_object::submitter_profile::{SubmitterDraft, SubmitterProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub submitter: SubmitterDraft,
    pub post: PostPayload,
}

/// Query for GET /
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Request for PATCH /{id}/status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request for PATCH /{id}/content
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviseRequest {
    #[serde(default)]
    pub title: Localized<String>,
    #[serde(default)]
    pub excerpt: Localized<String>,
    #[serde(default)]
    pub content: Localized<String>,
}

impl From<ReviseRequest> for ContentRevision {
    fn from(req: ReviseRequest) -> Self {
        ContentRevision {
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub kind: SubmissionKind,
    pub status: SubmissionStatus,
    pub owner_id: Option<Uuid>,
    pub submitter: SubmitterProfile,
    pub post: PostPayload,
    pub assigned_reviewer: Option<Uuid>,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub published_post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id.into_uuid(),
            kind: s.kind,
            status: s.status(),
            owner_id: s.owner_id.map(|id| id.into_uuid()),
            assigned_reviewer: s.assigned_reviewer.map(|id| id.into_uuid()),
            rejection_reason: s.rejection_reason().map(str::to_string),
            reviewed_at: s.reviewed_at(),
            approved_at: s.approved_at(),
            published_at: s.published_at(),
            published_post_id: s.published_post_id().map(|id| id.into_uuid()),
            created_at: s.created_at,
            updated_at: s.updated_at,
            admin_notes: s.admin_notes,
            submitter: s.submitter,
            post: s.post,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<SubmissionResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<ListOutput> for ListResponse {
    fn from(output: ListOutput) -> Self {
        Self {
            items: output
                .page
                .items
                .into_iter()
                .map(SubmissionResponse::from)
                .collect(),
            total: output.page.total,
            page: output.page_number,
            limit: output.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub edit_url: String,
}

impl EditTokenResponse {
    pub fn new(token: IssuedEditToken, edit_url: String) -> Self {
        Self {
            token: token.token,
            expires_at: token.expires_at,
            edit_url,
        }
    }
}

/// Response for PATCH /{id}/status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    pub submission: SubmissionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_token: Option<EditTokenResponse>,
}

/// Response for POST /{id}/publish
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub submission: SubmissionResponse,
    pub post: CanonicalPost,
}
