//! Mail notifier
//!
//! SMTP delivery through `lettre` when configured; otherwise messages are
//! only logged.

use crate::domain::gateway::{EmailMessage, Notifier, NotifyError};
use platform::mail::SmtpMailer;

#[derive(Clone)]
pub enum MailNotifier {
    Smtp(SmtpMailer),
    LogOnly,
}

impl Notifier for MailNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        match self {
            MailNotifier::Smtp(mailer) => mailer
                .send(message)
                .await
                .map_err(|e| NotifyError(e.to_string())),
            MailNotifier::LogOnly => {
                tracing::info!(
                    to = %message.to,
                    subject = %message.subject,
                    "SMTP not configured; notification logged only"
                );
                Ok(())
            }
        }
    }
}
