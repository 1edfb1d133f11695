//! Submitter notifications
//!
//! Templates render `{to, subject, html, text}`. Delivery runs on a spawned
//! task so the response never waits on SMTP; failures are logged at `warn`
//! and go no further.

use crate::application::edit_token::IssuedEditToken;
use crate::domain::entity::{canonical_post::CanonicalPost, submission::Submission};
use crate::domain::gateway::{EmailMessage, Notifier};
use crate::domain::value_object::locale::Locale;
use ammonia::clean_text;
use std::sync::Arc;

pub struct Notifications<N> {
    notifier: Arc<N>,
    site_url: String,
}

impl<N> Clone for Notifications<N> {
    fn clone(&self) -> Self {
        Self {
            notifier: Arc::clone(&self.notifier),
            site_url: self.site_url.clone(),
        }
    }
}

impl<N> Notifications<N>
where
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(notifier: Arc<N>, site_url: impl Into<String>) -> Self {
        Self {
            notifier,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fire and forget
    pub fn dispatch(&self, message: EmailMessage) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match notifier.send(&message).await {
                Ok(()) => tracing::debug!(subject = %message.subject, "Notification sent"),
                Err(e) => tracing::warn!(
                    error = %e,
                    subject = %message.subject,
                    "Notification failed"
                ),
            }
        });
    }

    pub fn edit_link(&self, submission: &Submission, token: &str) -> String {
        format!(
            "{}/submissions/{}/{}/edit?token={}",
            self.site_url, submission.kind, submission.id, token
        )
    }

    pub fn submission_received(&self, submission: &Submission) {
        let title = title_of(submission);
        let text = format!(
            "Hi {},\n\nThanks for your {} submission \"{}\". Our editors will review it and get back to you.\n\nReference: {}",
            submission.submitter.name, submission.kind, title, submission.id
        );
        let html = format!(
            "<p>Hi {},</p><p>Thanks for your {} submission <strong>{}</strong>. Our editors will review it and get back to you.</p><p>Reference: <code>{}</code></p>",
            clean_text(&submission.submitter.name),
            submission.kind,
            clean_text(title),
            submission.id
        );
        self.dispatch(message(
            submission,
            format!("We received your submission: {title}"),
            html,
            text,
        ));
    }

    pub fn submission_approved(&self, submission: &Submission, token: &IssuedEditToken) {
        let title = title_of(submission);
        let link = self.edit_link(submission, &token.token);
        let expires = token.expires_at.format("%Y-%m-%d %H:%M UTC");
        let text = format!(
            "Hi {},\n\n\"{}\" has been approved. You can still polish the content before it goes live:\n{}\n\nThis link expires on {}.",
            submission.submitter.name, title, link, expires
        );
        let html = format!(
            "<p>Hi {},</p><p><strong>{}</strong> has been approved. You can still polish the content before it goes live:</p><p><a href=\"{}\">Edit your submission</a></p><p>This link expires on {}.</p>",
            clean_text(&submission.submitter.name),
            clean_text(title),
            clean_text(&link),
            expires
        );
        self.dispatch(message(
            submission,
            format!("Approved: {title}"),
            html,
            text,
        ));
    }

    pub fn revision_requested(&self, submission: &Submission, token: &IssuedEditToken) {
        let title = title_of(submission);
        let link = self.edit_link(submission, &token.token);
        let notes = submission.admin_notes.as_deref().unwrap_or("");
        let text = format!(
            "Hi {},\n\nOur editors asked for changes to \"{}\".\n\n{}\n\nRevise it here: {}",
            submission.submitter.name, title, notes, link
        );
        let html = format!(
            "<p>Hi {},</p><p>Our editors asked for changes to <strong>{}</strong>.</p><blockquote>{}</blockquote><p><a href=\"{}\">Revise your submission</a></p>",
            clean_text(&submission.submitter.name),
            clean_text(title),
            clean_text(notes),
            clean_text(&link)
        );
        self.dispatch(message(
            submission,
            format!("Changes requested: {title}"),
            html,
            text,
        ));
    }

    pub fn submission_rejected(&self, submission: &Submission) {
        let title = title_of(submission);
        let reason = submission.rejection_reason().unwrap_or("");
        let text = format!(
            "Hi {},\n\nThank you for submitting \"{}\". We are not able to publish it.\n\nReason: {}",
            submission.submitter.name, title, reason
        );
        let html = format!(
            "<p>Hi {},</p><p>Thank you for submitting <strong>{}</strong>. We are not able to publish it.</p><p>Reason: {}</p>",
            clean_text(&submission.submitter.name),
            clean_text(title),
            clean_text(reason)
        );
        self.dispatch(message(
            submission,
            format!("Update on your submission: {title}"),
            html,
            text,
        ));
    }

    pub fn submission_published(&self, submission: &Submission, post: &CanonicalPost) {
        let title = title_of(submission);
        let slug = post.slug.text(Locale::PRIMARY).unwrap_or_default();
        let link = format!("{}/blog/{}", self.site_url, slug);
        let text = format!(
            "Hi {},\n\n\"{}\" is now live: {}",
            submission.submitter.name, title, link
        );
        let html = format!(
            "<p>Hi {},</p><p><strong>{}</strong> is now live.</p><p><a href=\"{}\">Read it on the blog</a></p>",
            clean_text(&submission.submitter.name),
            clean_text(title),
            clean_text(&link)
        );
        self.dispatch(message(
            submission,
            format!("Published: {title}"),
            html,
            text,
        ));
    }
}

fn title_of(submission: &Submission) -> &str {
    submission
        .post
        .title
        .text(Locale::PRIMARY)
        .unwrap_or("your post")
}

fn message(submission: &Submission, subject: String, html: String, text: String) -> EmailMessage {
    EmailMessage {
        to: submission.submitter.email.as_str().to_string(),
        subject,
        html,
        text,
    }
}
