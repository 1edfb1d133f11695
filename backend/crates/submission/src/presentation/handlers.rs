//! HTTP Handlers
//!
//! One router per submission kind shares these handlers; the kind lives in
//! the state.

use crate::application::account_token::AccountTokenVerifier;
use crate::application::config::SubmissionConfig;
use crate::application::delete::DeleteSubmissionUseCase;
use crate::application::edit_token::EditTokenService;
use crate::application::notify::Notifications;
use crate::application::publish::PublishUseCase;
use crate::application::query::{GetSubmissionUseCase, ListInput, ListSubmissionsUseCase};
use crate::application::revise_content::{ReviseContentUseCase, ReviseInput};
use crate::application::submit::{SubmitInput, SubmitUseCase};
use crate::application::transition_status::{TransitionInput, TransitionStatusUseCase};
use crate::domain::gateway::{HtmlSanitizer, Notifier};
use crate::domain::repository::{PostRepository, PublishRepository, SubmissionRepository};
use crate::domain::services::content_policy::ContentPolicy;
use crate::domain::value_object::credential::Credential;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::{SubmissionError, SubmissionResult};
use crate::infra::sanitizer::AmmoniaSanitizer;
use crate::presentation::dto::{
    EditTokenResponse, ListQuery, ListResponse, PublishResponse, ReviseRequest,
    StatusUpdateRequest, StatusUpdateResponse, SubmissionResponse, SubmitRequest,
};
use crate::presentation::middleware::{ClientIp, RequestCredential};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kernel::id::SubmissionId;
use std::sync::Arc;
use uuid::Uuid;

/// Everything a store must provide to back the HTTP surface
pub trait SubmissionStore:
    SubmissionRepository + PostRepository + PublishRepository + Clone + Send + Sync + 'static
{
}

impl<T> SubmissionStore for T where
    T: SubmissionRepository + PostRepository + PublishRepository + Clone + Send + Sync + 'static
{
}

/// Shared state for submission handlers
pub struct SubmissionAppState<R, N> {
    pub kind: SubmissionKind,
    pub repo: Arc<R>,
    pub notifications: Notifications<N>,
    pub sanitizer: Arc<dyn HtmlSanitizer>,
    pub policy: Arc<ContentPolicy>,
    pub tokens: Arc<EditTokenService>,
    pub accounts: Arc<AccountTokenVerifier>,
    pub config: Arc<SubmissionConfig>,
}

impl<R, N> Clone for SubmissionAppState<R, N> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            repo: Arc::clone(&self.repo),
            notifications: self.notifications.clone(),
            sanitizer: Arc::clone(&self.sanitizer),
            policy: Arc::clone(&self.policy),
            tokens: Arc::clone(&self.tokens),
            accounts: Arc::clone(&self.accounts),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R, N> SubmissionAppState<R, N>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(kind: SubmissionKind, repo: R, notifier: N, config: SubmissionConfig) -> Self {
        let policy = ContentPolicy::new(&config.blocked_link_hosts);
        let tokens = EditTokenService::new(config.edit_token_secret, config.edit_token_ttl);
        let accounts = AccountTokenVerifier::new(config.account_token_secret);
        Self {
            kind,
            repo: Arc::new(repo),
            notifications: Notifications::new(Arc::new(notifier), config.site_url()),
            sanitizer: Arc::new(AmmoniaSanitizer::new()),
            policy: Arc::new(policy),
            tokens: Arc::new(tokens),
            accounts: Arc::new(accounts),
            config: Arc::new(config),
        }
    }
}

/// POST /
pub async fn submit<R, N>(
    State(state): State<SubmissionAppState<R, N>>,
    ClientIp(client_ip): ClientIp,
    RequestCredential(credential): RequestCredential,
    Json(req): Json<SubmitRequest>,
) -> SubmissionResult<(StatusCode, Json<SubmissionResponse>)>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let use_case = SubmitUseCase::new(
        state.repo.clone(),
        state.sanitizer.clone(),
        state.notifications.clone(),
        state.config.clone(),
    );

    let input = SubmitInput {
        kind: state.kind,
        owner_id: credential.as_ref().and_then(Credential::account).map(|(id, _)| id),
        submitter: req.submitter,
        post: req.post,
        client_ip: client_ip.map(|ip| ip.to_string()),
    };

    let submission = use_case.execute(input).await?;
    Ok((StatusCode::CREATED, Json(submission.into())))
}

/// GET /
pub async fn list<R, N>(
    State(state): State<SubmissionAppState<R, N>>,
    RequestCredential(credential): RequestCredential,
    Query(query): Query<ListQuery>,
) -> SubmissionResult<Json<ListResponse>>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let use_case = ListSubmissionsUseCase::new(state.repo.clone(), state.config.clone());

    let input = ListInput {
        status: query.status,
        search: query.q,
        page: query.page,
        limit: query.limit,
    };

    let output = use_case
        .execute(state.kind, input, credential.as_ref())
        .await?;
    Ok(Json(output.into()))
}

/// GET /{id}
pub async fn get<R, N>(
    State(state): State<SubmissionAppState<R, N>>,
    RequestCredential(credential): RequestCredential,
    Path(id): Path<Uuid>,
) -> SubmissionResult<Json<SubmissionResponse>>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let use_case = GetSubmissionUseCase::new(state.repo.clone(), state.tokens.clone());

    let submission = use_case
        .execute(state.kind, SubmissionId::from_uuid(id), credential.as_ref())
        .await?;
    Ok(Json(submission.into()))
}

/// PATCH /{id}/status
pub async fn update_status<R, N>(
    State(state): State<SubmissionAppState<R, N>>,
    RequestCredential(credential): RequestCredential,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> SubmissionResult<Json<StatusUpdateResponse>>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let target = SubmissionStatus::from_code(req.status.trim()).ok_or_else(|| {
        SubmissionError::Validation(format!("Unknown status '{}'", req.status))
    })?;

    let use_case = TransitionStatusUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.notifications.clone(),
        state.config.clone(),
    );

    let input = TransitionInput {
        kind: state.kind,
        submission_id: SubmissionId::from_uuid(id),
        target,
        notes: req.notes,
        reason: req.reason,
    };

    let output = use_case.execute(input, credential.as_ref()).await?;

    let edit_token = output.edit_token.map(|token| {
        let edit_url = state
            .notifications
            .edit_link(&output.submission, &token.token);
        EditTokenResponse::new(token, edit_url)
    });

    Ok(Json(StatusUpdateResponse {
        submission: output.submission.into(),
        edit_token,
    }))
}

/// PATCH /{id}/content
pub async fn revise<R, N>(
    State(state): State<SubmissionAppState<R, N>>,
    RequestCredential(credential): RequestCredential,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviseRequest>,
) -> SubmissionResult<Json<SubmissionResponse>>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let use_case = ReviseContentUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.sanitizer.clone(),
        state.config.clone(),
    );

    let input = ReviseInput {
        kind: state.kind,
        submission_id: SubmissionId::from_uuid(id),
        revision: req.into(),
    };

    let submission = use_case.execute(input, credential.as_ref()).await?;
    Ok(Json(submission.into()))
}

/// POST /{id}/publish
pub async fn publish<R, N>(
    State(state): State<SubmissionAppState<R, N>>,
    RequestCredential(credential): RequestCredential,
    Path(id): Path<Uuid>,
) -> SubmissionResult<Json<PublishResponse>>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let use_case = PublishUseCase::new(
        state.repo.clone(),
        state.policy.clone(),
        state.notifications.clone(),
    );

    let output = use_case
        .execute(state.kind, SubmissionId::from_uuid(id), credential.as_ref())
        .await?;

    Ok(Json(PublishResponse {
        submission: output.submission.into(),
        post: output.post,
    }))
}

/// DELETE /{id}
pub async fn delete<R, N>(
    State(state): State<SubmissionAppState<R, N>>,
    RequestCredential(credential): RequestCredential,
    Path(id): Path<Uuid>,
) -> SubmissionResult<StatusCode>
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let use_case = DeleteSubmissionUseCase::new(state.repo.clone());

    use_case
        .execute(state.kind, SubmissionId::from_uuid(id), credential.as_ref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
