//! Submission Router

use crate::application::config::SubmissionConfig;
use crate::domain::gateway::Notifier;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::infra::notifier::MailNotifier;
use crate::infra::postgres::PgSubmissionStore;
use crate::presentation::handlers::{self, SubmissionAppState, SubmissionStore};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Create the router for one submission kind with the PostgreSQL store
pub fn submission_router(
    kind: SubmissionKind,
    repo: PgSubmissionStore,
    notifier: MailNotifier,
    config: SubmissionConfig,
) -> Router {
    submission_router_generic(kind, repo, notifier, config)
}

/// Create a submission router for any store and notifier
pub fn submission_router_generic<R, N>(
    kind: SubmissionKind,
    repo: R,
    notifier: N,
    config: SubmissionConfig,
) -> Router
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    let state = SubmissionAppState::new(kind, repo, notifier, config);

    Router::new()
        .route(
            "/",
            post(handlers::submit::<R, N>).get(handlers::list::<R, N>),
        )
        .route(
            "/{id}",
            get(handlers::get::<R, N>).delete(handlers::delete::<R, N>),
        )
        .route("/{id}/status", patch(handlers::update_status::<R, N>))
        .route("/{id}/content", patch(handlers::revise::<R, N>))
        .route("/{id}/publish", post(handlers::publish::<R, N>))
        .with_state(state)
}
