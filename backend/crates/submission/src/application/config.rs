//! Application Configuration
//!
//! Configuration for the submission workflow.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// HMAC key for edit tokens (32 bytes)
    pub edit_token_secret: [u8; 32],
    /// HMAC key shared with the account service (32 bytes)
    pub account_token_secret: [u8; 32],
    pub edit_token_ttl: Duration,
    /// Per populated locale, after trimming
    pub min_content_chars: usize,
    pub sponsored_min_budget: u32,
    /// How long a sponsored submission may sit approved before it expires
    pub sponsored_approval_window: Duration,
    /// Public frontend origin used in edit links
    pub site_url: String,
    /// Hosts stripped from published content
    pub blocked_link_hosts: Vec<String>,
    /// Used when a rejection arrives without a reason; `None` makes it mandatory
    pub default_rejection_reason: Option<String>,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            edit_token_secret: [0u8; 32],
            account_token_secret: [0u8; 32],
            edit_token_ttl: Duration::from_secs(7 * 24 * 3600),
            min_content_chars: 800,
            sponsored_min_budget: 50,
            sponsored_approval_window: Duration::from_secs(30 * 24 * 3600),
            site_url: "http://localhost:3000".to_string(),
            blocked_link_hosts: Vec::new(),
            default_rejection_reason: None,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl SubmissionConfig {
    /// Config with random token secrets (for development)
    pub fn with_random_secret() -> Self {
        Self {
            edit_token_secret: platform::crypto::random_secret(),
            account_token_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Clamp a requested page size
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

    pub fn site_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SubmissionConfig::default();
        assert_eq!(config.min_content_chars, 800);
        assert_eq!(config.edit_token_ttl.as_secs(), 604_800);
        assert!(config.default_rejection_reason.is_none());
    }

    #[test]
    fn test_random_secrets_differ() {
        let config = SubmissionConfig::with_random_secret();
        assert_ne!(config.edit_token_secret, [0u8; 32]);
        assert_ne!(config.edit_token_secret, config.account_token_secret);
    }

    #[test]
    fn test_page_size_clamped() {
        let config = SubmissionConfig::default();
        assert_eq!(config.page_size(None), 20);
        assert_eq!(config.page_size(Some(0)), 1);
        assert_eq!(config.page_size(Some(1000)), 100);
    }
}
