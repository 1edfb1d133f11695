//! Edit-Token Issuer/Verifier
//!
//! An edit token is an HS256 JWT asserting `{submission id, purpose, expiry}`.
//! It is never persisted. It lets the original submitter revise one
//! submission without an account.

use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::{DateTime, TimeZone, Utc};
use kernel::id::SubmissionId;
use platform::token::{Opened, TokenSigner};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Malformed or unsigned input
pub type EditTokenError = platform::token::TokenError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct EditClaims {
    sid: Uuid,
    purpose: String,
    exp: i64,
}

/// Outcome of verifying a well-formed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTokenCheck {
    Valid,
    Expired,
    WrongSubmission,
    WrongPurpose,
    BadSignature,
}

impl EditTokenCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, EditTokenCheck::Valid)
    }
}

#[derive(Debug, Clone)]
pub struct IssuedEditToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EditTokenService {
    signer: TokenSigner,
    ttl: Duration,
}

impl EditTokenService {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self {
            signer: TokenSigner::new(secret),
            ttl,
        }
    }

    pub fn issue(
        &self,
        submission_id: SubmissionId,
        kind: SubmissionKind,
    ) -> SubmissionResult<IssuedEditToken> {
        self.issue_at(submission_id, kind, Utc::now())
    }

    pub fn issue_at(
        &self,
        submission_id: SubmissionId,
        kind: SubmissionKind,
        now: DateTime<Utc>,
    ) -> SubmissionResult<IssuedEditToken> {
        let exp = now.timestamp().saturating_add(self.ttl.as_secs() as i64);
        let claims = EditClaims {
            sid: submission_id.into_uuid(),
            purpose: kind.policy().edit_purpose.to_string(),
            exp,
        };
        let token = self
            .signer
            .sign(&claims)
            .map_err(|e| SubmissionError::Internal(e.to_string()))?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| SubmissionError::Internal("edit token expiry out of range".into()))?;
        Ok(IssuedEditToken { token, expires_at })
    }

    pub fn verify(
        &self,
        token: &str,
        submission_id: SubmissionId,
        kind: SubmissionKind,
    ) -> Result<EditTokenCheck, EditTokenError> {
        self.verify_at(token, submission_id, kind, Utc::now())
    }

    /// Checks signature, expiry, purpose and submission id, in that order
    pub fn verify_at(
        &self,
        token: &str,
        submission_id: SubmissionId,
        kind: SubmissionKind,
        now: DateTime<Utc>,
    ) -> Result<EditTokenCheck, EditTokenError> {
        let claims: EditClaims = match self.signer.open(token)? {
            Opened::Verified(claims) => claims,
            Opened::Expired => return Ok(EditTokenCheck::Expired),
            Opened::BadSignature => return Ok(EditTokenCheck::BadSignature),
        };

        if claims.exp <= now.timestamp() {
            return Ok(EditTokenCheck::Expired);
        }
        if claims.purpose != kind.policy().edit_purpose {
            return Ok(EditTokenCheck::WrongPurpose);
        }
        if claims.sid != *submission_id.as_uuid() {
            return Ok(EditTokenCheck::WrongSubmission);
        }
        Ok(EditTokenCheck::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> EditTokenService {
        EditTokenService::new([7u8; 32], Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();
        let id = SubmissionId::new();
        let issued = service.issue(id, SubmissionKind::Guest).unwrap();
        assert!(issued.expires_at > Utc::now());
        assert_eq!(
            service.verify(&issued.token, id, SubmissionKind::Guest).unwrap(),
            EditTokenCheck::Valid
        );
    }

    #[test]
    fn test_other_submission_fails() {
        let service = service();
        let a = SubmissionId::new();
        let b = SubmissionId::new();
        let issued = service.issue(a, SubmissionKind::Guest).unwrap();
        assert_eq!(
            service.verify(&issued.token, b, SubmissionKind::Guest).unwrap(),
            EditTokenCheck::WrongSubmission
        );
    }

    #[test]
    fn test_expired_fails() {
        let service = service();
        let id = SubmissionId::new();
        let issued_at = Utc::now() - chrono::Duration::hours(2);
        let issued = service.issue_at(id, SubmissionKind::Guest, issued_at).unwrap();
        assert_eq!(
            service.verify(&issued.token, id, SubmissionKind::Guest).unwrap(),
            EditTokenCheck::Expired
        );
    }

    #[test]
    fn test_expiry_uses_supplied_clock() {
        let service = service();
        let id = SubmissionId::new();
        let issued = service.issue(id, SubmissionKind::Guest).unwrap();
        let later = issued.expires_at + chrono::Duration::seconds(1);
        assert_eq!(
            service
                .verify_at(&issued.token, id, SubmissionKind::Guest, later)
                .unwrap(),
            EditTokenCheck::Expired
        );
    }

    #[test]
    fn test_token_is_a_three_part_jwt() {
        let issued = service().issue(SubmissionId::new(), SubmissionKind::Guest).unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn test_wrong_purpose_fails() {
        let service = service();
        let id = SubmissionId::new();
        let issued = service.issue(id, SubmissionKind::Guest).unwrap();
        assert_eq!(
            service
                .verify(&issued.token, id, SubmissionKind::Sponsored)
                .unwrap(),
            EditTokenCheck::WrongPurpose
        );
    }

    #[test]
    fn test_other_secret_fails() {
        let id = SubmissionId::new();
        let issued = service().issue(id, SubmissionKind::Guest).unwrap();
        let other = EditTokenService::new([8u8; 32], Duration::from_secs(3600));
        assert_eq!(
            other.verify(&issued.token, id, SubmissionKind::Guest).unwrap(),
            EditTokenCheck::BadSignature
        );
    }

    #[test]
    fn test_malformed_is_error() {
        let service = service();
        let id = SubmissionId::new();
        assert!(service.verify("garbage", id, SubmissionKind::Guest).is_err());
        assert!(service.verify("", id, SubmissionKind::Guest).is_err());
    }
}
