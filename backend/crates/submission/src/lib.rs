//! Guest and sponsored post submissions
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, content policy, repository traits
//! - `application/` - Use cases, edit tokens, authorization, notifications
//! - `infra/` - PostgreSQL and in-memory stores, sanitizer, mail delivery
//! - `presentation/` - HTTP handlers
//!
//! ## Workflow
//! - Anyone may submit; the submission starts `pending`
//! - Moderators and admins move it through review
//! - Approval mints an edit token so an anonymous submitter can still revise
//! - Publishing filters links, snapshots a canonical post and marks the
//!   submission `published` in one commit

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SubmissionConfig;
pub use application::reconcile::{ReconcileReport, ReconcileUseCase};
pub use domain::value_object::submission_kind::SubmissionKind;
pub use error::{SubmissionError, SubmissionResult};
pub use infra::memory::InMemoryStore;
pub use infra::notifier::MailNotifier;
pub use infra::postgres::PgSubmissionStore;
pub use presentation::router::{submission_router, submission_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::canonical_post::*;
    pub use crate::domain::entity::submission::*;
    pub use crate::domain::value_object::credential::*;
    pub use crate::domain::value_object::locale::*;
    pub use crate::domain::value_object::post_payload::*;
    pub use crate::domain::value_object::submission_status::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryStore;
    pub use crate::infra::postgres::PgSubmissionStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
