//! Domain Layer
//!
//! Entities, value objects, the content policy, and the traits the
//! application layer depends on (repositories, sanitizer, notifier).

pub mod entity;
pub mod gateway;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{canonical_post::CanonicalPost, submission::Submission};
pub use gateway::{HtmlSanitizer, Notifier};
pub use repository::{PostRepository, PublishRepository, SubmissionRepository};
pub use services::content_policy::ContentPolicy;
