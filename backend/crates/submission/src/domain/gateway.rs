//! Outbound collaborators
//!
//! The HTML sanitizer and the notification channel. Neither is allowed to
//! fail a workflow operation.

use thiserror::Error;

pub use platform::mail::OutgoingMail as EmailMessage;

/// Allowlist sanitizer applied to user-supplied rich text before storage
pub trait HtmlSanitizer: Send + Sync {
    fn clean(&self, html: &str) -> String;

    /// Strip every tag, keeping text
    fn plain_text(&self, input: &str) -> String;
}

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

#[trait_variant::make(Notifier: Send)]
pub trait LocalNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}
