//! Authorization decisions
//!
//! Pure functions of (credential, submission). Nothing here touches a
//! request or a store.

use crate::application::edit_token::{EditTokenCheck, EditTokenService};
use crate::domain::entity::submission::Submission;
use crate::domain::value_object::credential::{AccountRole, Credential};
use crate::domain::value_object::submission_status::SubmissionStatus;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::{DateTime, Utc};
use kernel::id::AccountId;

/// Who is acting on a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Reviewer(AccountId),
    Owner(AccountId),
    TokenHolder,
}

fn missing() -> SubmissionError {
    SubmissionError::Unauthenticated("Authentication required".to_string())
}

/// Moderator or admin session
pub fn require_reviewer(credential: Option<&Credential>) -> SubmissionResult<AccountId> {
    match credential {
        None => Err(missing()),
        Some(Credential::Authenticated { account_id, role }) if role.is_reviewer() => {
            Ok(*account_id)
        }
        Some(_) => Err(SubmissionError::Authorization(
            "Reviewer role required".to_string(),
        )),
    }
}

pub fn require_admin(credential: Option<&Credential>) -> SubmissionResult<AccountId> {
    match credential {
        None => Err(missing()),
        Some(Credential::Authenticated {
            account_id,
            role: AccountRole::Admin,
        }) => Ok(*account_id),
        Some(_) => Err(SubmissionError::Authorization(
            "Admin role required".to_string(),
        )),
    }
}

/// Reviewer, owner, or holder of a valid edit token for this submission
pub fn authorize_access(
    credential: Option<&Credential>,
    submission: &Submission,
    tokens: &EditTokenService,
    now: DateTime<Utc>,
) -> SubmissionResult<Actor> {
    match credential {
        None => Err(missing()),
        Some(Credential::Authenticated { account_id, role }) => {
            if role.is_reviewer() {
                Ok(Actor::Reviewer(*account_id))
            } else if submission.is_owned_by(*account_id) {
                Ok(Actor::Owner(*account_id))
            } else {
                Err(SubmissionError::forbidden())
            }
        }
        Some(Credential::EditToken { raw }) => {
            let check = tokens
                .verify_at(raw, submission.id, submission.kind, now)
                .unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "Malformed edit token");
                    EditTokenCheck::BadSignature
                });
            if check.is_valid() {
                Ok(Actor::TokenHolder)
            } else {
                tracing::warn!(
                    submission_id = %submission.id,
                    check = ?check,
                    "Edit token rejected"
                );
                Err(SubmissionError::Authorization(
                    "Invalid or expired edit token".to_string(),
                ))
            }
        }
    }
}

/// Access plus the status window in which token holders may edit
pub fn authorize_revision(
    credential: Option<&Credential>,
    submission: &Submission,
    tokens: &EditTokenService,
    now: DateTime<Utc>,
) -> SubmissionResult<Actor> {
    let actor = authorize_access(credential, submission, tokens, now)?;
    if actor == Actor::TokenHolder
        && !matches!(
            submission.status(),
            SubmissionStatus::Approved | SubmissionStatus::NeedsRevision
        )
    {
        return Err(SubmissionError::Authorization(format!(
            "Edit tokens cannot revise a submission that is '{}'",
            submission.status()
        )));
    }
    Ok(actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::email::Email;
    use crate::domain::value_object::post_payload::PostPayload;
    use crate::domain::value_object::submission_kind::SubmissionKind;
    use crate::domain::value_object::submitter_profile::SubmitterProfile;
    use std::time::Duration;

    fn tokens() -> EditTokenService {
        EditTokenService::new([3u8; 32], Duration::from_secs(600))
    }

    fn submission(owner: Option<AccountId>) -> Submission {
        let submitter = SubmitterProfile {
            name: "Tania".to_string(),
            email: Email::new("tania@example.com").unwrap(),
            bio: None,
            website: None,
            company: None,
            budget: None,
        };
        Submission::new(
            SubmissionKind::Guest,
            owner,
            submitter,
            PostPayload::default(),
            None,
            Utc::now(),
        )
    }

    fn account(role: AccountRole) -> (AccountId, Credential) {
        let account_id = AccountId::new();
        (account_id, Credential::Authenticated { account_id, role })
    }

    #[test]
    fn test_require_reviewer() {
        assert!(matches!(
            require_reviewer(None),
            Err(SubmissionError::Unauthenticated(_))
        ));
        let (_, user) = account(AccountRole::User);
        assert!(matches!(
            require_reviewer(Some(&user)),
            Err(SubmissionError::Authorization(_))
        ));
        let token = Credential::EditToken { raw: "x".into() };
        assert!(require_reviewer(Some(&token)).is_err());
        let (id, moderator) = account(AccountRole::Moderator);
        assert_eq!(require_reviewer(Some(&moderator)).unwrap(), id);
    }

    #[test]
    fn test_require_admin() {
        let (_, moderator) = account(AccountRole::Moderator);
        assert!(require_admin(Some(&moderator)).is_err());
        let (id, admin) = account(AccountRole::Admin);
        assert_eq!(require_admin(Some(&admin)).unwrap(), id);
    }

    #[test]
    fn test_owner_and_stranger() {
        let (owner_id, owner) = account(AccountRole::User);
        let (_, stranger) = account(AccountRole::User);
        let s = submission(Some(owner_id));
        let now = Utc::now();
        assert_eq!(
            authorize_access(Some(&owner), &s, &tokens(), now).unwrap(),
            Actor::Owner(owner_id)
        );
        assert!(matches!(
            authorize_access(Some(&stranger), &s, &tokens(), now),
            Err(SubmissionError::Authorization(_))
        ));
    }

    #[test]
    fn test_token_holder_status_window() {
        let tokens = tokens();
        let s = submission(None);
        let issued = tokens.issue(s.id, s.kind).unwrap();
        let credential = Credential::EditToken { raw: issued.token };
        let now = Utc::now();

        assert_eq!(
            authorize_access(Some(&credential), &s, &tokens, now).unwrap(),
            Actor::TokenHolder
        );
        // still pending
        assert!(authorize_revision(Some(&credential), &s, &tokens, now).is_err());
    }

    #[test]
    fn test_garbage_token_is_authorization_error() {
        let s = submission(None);
        let credential = Credential::EditToken {
            raw: "not-a-token".into(),
        };
        let err = authorize_access(Some(&credential), &s, &tokens(), Utc::now()).unwrap_err();
        assert!(matches!(err, SubmissionError::Authorization(_)));
    }
}
