//! Account token verification
//!
//! Account tokens are HS256 JWTs issued by the account service and signed
//! with a shared secret. This crate only verifies them.

use crate::domain::value_object::credential::{AccountRole, Credential};
use crate::error::{SubmissionError, SubmissionResult};
use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::token::{Opened, TokenSigner};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct AccountTokenVerifier {
    signer: TokenSigner,
}

impl AccountTokenVerifier {
    pub fn new(secret: [u8; 32]) -> Self {
        Self {
            signer: TokenSigner::new(secret),
        }
    }

    pub fn verify(&self, token: &str) -> SubmissionResult<Credential> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> SubmissionResult<Credential> {
        let rejected = || SubmissionError::Unauthenticated("Invalid or expired session".to_string());

        let claims: AccountClaims = match self.signer.open(token) {
            Ok(Opened::Verified(claims)) => claims,
            Ok(Opened::Expired) => return Err(rejected()),
            Ok(Opened::BadSignature) => {
                tracing::warn!("Account token signature mismatch");
                return Err(rejected());
            }
            Err(e) => {
                tracing::debug!(error = %e, "Malformed account token");
                return Err(rejected());
            }
        };

        if claims.exp <= now.timestamp() {
            return Err(rejected());
        }

        let role = AccountRole::from_code(&claims.role).ok_or_else(|| {
            tracing::warn!(role = %claims.role, "Account token carries unknown role");
            rejected()
        })?;

        Ok(Credential::Authenticated {
            account_id: AccountId::from_uuid(claims.sub),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: [u8; 32], role: &str, exp: i64) -> (Uuid, String) {
        let sub = Uuid::new_v4();
        let claims = AccountClaims {
            sub,
            role: role.to_string(),
            exp,
        };
        (sub, TokenSigner::new(secret).sign(&claims).unwrap())
    }

    #[test]
    fn test_valid_token() {
        let exp = Utc::now().timestamp() + 60;
        let (sub, token) = sign([1u8; 32], "moderator", exp);
        let credential = AccountTokenVerifier::new([1u8; 32]).verify(&token).unwrap();
        assert_eq!(
            credential,
            Credential::Authenticated {
                account_id: AccountId::from_uuid(sub),
                role: AccountRole::Moderator
            }
        );
    }

    #[test]
    fn test_rejections() {
        let verifier = AccountTokenVerifier::new([1u8; 32]);
        let future = Utc::now().timestamp() + 60;

        let (_, expired) = sign([1u8; 32], "admin", Utc::now().timestamp() - 1);
        let (_, foreign) = sign([2u8; 32], "admin", future);
        let (_, unknown_role) = sign([1u8; 32], "root", future);

        for token in [expired.as_str(), foreign.as_str(), unknown_role.as_str(), "junk"] {
            let err = verifier.verify(token).unwrap_err();
            assert!(matches!(err, SubmissionError::Unauthenticated(_)));
        }
    }
}
