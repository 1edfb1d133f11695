//! Signed Claim Tokens
//!
//! HS256 JSON Web Tokens keyed by a 32-byte shared secret. Tokens are never
//! stored; possession plus a valid signature is the whole credential.
//!
//! The `exp` claim is required and checked here with zero leeway. Scoping
//! claims are checked by the caller, which knows what they mean.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure modes that indicate garbage input rather than a rejected credential
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(JwtError),

    #[error("Claims could not be encoded: {0}")]
    Encode(JwtError),
}

/// Result of opening a well-formed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened<C> {
    /// Signature matched and `exp` is in the future
    Verified(C),
    /// Signature matched but `exp` has passed
    Expired,
    /// Signature did not match this signer's secret
    BadSignature,
}

/// HS256 signer bound to one secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: [u8; 32]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            validation,
        }
    }

    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(TokenError::Encode)
    }

    /// Verify the signature and expiry, then decode the claims
    ///
    /// A token with the wrong signature is `Ok(BadSignature)` and a lapsed one
    /// is `Ok(Expired)`; only structurally broken input is an `Err`.
    pub fn open<C: DeserializeOwned>(&self, token: &str) -> Result<Opened<C>, TokenError> {
        match decode::<C>(token.trim(), &self.decoding, &self.validation) {
            Ok(data) => Ok(Opened::Verified(data.claims)),
            Err(e) => match e.kind() {
                ErrorKind::InvalidSignature => Ok(Opened::BadSignature),
                ErrorKind::ExpiredSignature => Ok(Opened::Expired),
                _ => Err(TokenError::Malformed(e)),
            },
        }
    }
}
