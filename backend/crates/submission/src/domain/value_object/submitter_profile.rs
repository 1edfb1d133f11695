//! Submitter Profile Value Object
//!
//! Identity of whoever wrote the submission. Guests need a name and a
//! contact email; sponsors additionally name a company and a budget.

use super::email::Email;
use super::submission_kind::KindPolicy;
use crate::error::{SubmissionError, SubmissionResult};
use serde::{Deserialize, Serialize};

const NAME_MAX_CHARS: usize = 100;
const BIO_MAX_CHARS: usize = 1000;
const COMPANY_MAX_CHARS: usize = 200;

/// Unvalidated profile as received from a caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitterDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub company: Option<String>,
    pub budget: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitterProfile {
    pub name: String,
    pub email: Email,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub company: Option<String>,
    pub budget: Option<u32>,
}

impl SubmitterProfile {
    /// Validate a draft against the kind's required fields.
    ///
    /// Every problem is reported at once, joined into one message.
    pub fn from_draft(
        draft: SubmitterDraft,
        policy: &KindPolicy,
        min_budget: u32,
    ) -> SubmissionResult<Self> {
        let mut problems = Vec::new();

        let name = draft.name.trim().to_string();
        if name.is_empty() {
            problems.push("name is required".to_string());
        } else if name.chars().count() > NAME_MAX_CHARS {
            problems.push(format!("name must be at most {NAME_MAX_CHARS} characters"));
        }

        let email = match Email::new(draft.email) {
            Ok(email) => Some(email),
            Err(e) => {
                problems.push(format!("email: {}", e.message()));
                None
            }
        };

        let bio = non_blank(draft.bio);
        if bio.as_ref().is_some_and(|b| b.chars().count() > BIO_MAX_CHARS) {
            problems.push(format!("bio must be at most {BIO_MAX_CHARS} characters"));
        }

        let website = non_blank(draft.website);
        if let Some(site) = &website
            && !is_http_url(site)
        {
            problems.push("website must be an absolute http(s) URL".to_string());
        }

        let company = non_blank(draft.company);
        if policy.requires_company {
            match &company {
                None => problems.push("company is required".to_string()),
                Some(c) if c.chars().count() > COMPANY_MAX_CHARS => problems.push(format!(
                    "company must be at most {COMPANY_MAX_CHARS} characters"
                )),
                _ => {}
            }
        }

        if policy.requires_budget {
            match draft.budget {
                None => problems.push("budget is required".to_string()),
                Some(b) if b < min_budget => {
                    problems.push(format!("budget must be at least {min_budget}"))
                }
                _ => {}
            }
        }

        match email {
            Some(email) if problems.is_empty() => Ok(Self {
                name,
                email,
                bio,
                website,
                company,
                budget: draft.budget,
            }),
            _ => Err(SubmissionError::Validation(problems.join("; "))),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::submission_kind::SubmissionKind;

    fn guest_draft() -> SubmitterDraft {
        SubmitterDraft {
            name: "Rahim Uddin".to_string(),
            email: "rahim@example.com".to_string(),
            bio: Some("  Travel writer  ".to_string()),
            website: Some("https://rahim.example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_guest_profile_valid() {
        let profile =
            SubmitterProfile::from_draft(guest_draft(), SubmissionKind::Guest.policy(), 50)
                .unwrap();
        assert_eq!(profile.name, "Rahim Uddin");
        assert_eq!(profile.bio.as_deref(), Some("Travel writer"));
        assert_eq!(profile.company, None);
    }

    #[test]
    fn test_sponsored_requires_company_and_budget() {
        let err =
            SubmitterProfile::from_draft(guest_draft(), SubmissionKind::Sponsored.policy(), 50)
                .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("company is required"));
        assert!(message.contains("budget is required"));
    }

    #[test]
    fn test_sponsored_budget_minimum() {
        let draft = SubmitterDraft {
            company: Some("Acme Ltd".to_string()),
            budget: Some(49),
            ..guest_draft()
        };
        let err = SubmitterProfile::from_draft(draft, SubmissionKind::Sponsored.policy(), 50)
            .unwrap_err();
        assert!(err.to_string().contains("at least 50"));
    }

    #[test]
    fn test_collects_all_problems() {
        let draft = SubmitterDraft {
            name: " ".to_string(),
            email: "nope".to_string(),
            website: Some("ftp://files.example.com".to_string()),
            ..Default::default()
        };
        let err = SubmitterProfile::from_draft(draft, SubmissionKind::Guest.policy(), 50)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name is required"));
        assert!(message.contains("email"));
        assert!(message.contains("website"));
    }
}
