//! Request extractors
//!
//! Credentials and client address are pulled from the request head here so
//! handlers and use cases receive plain values.

use crate::domain::gateway::Notifier;
use crate::domain::value_object::credential::Credential;
use crate::error::SubmissionError;
use crate::presentation::handlers::{SubmissionAppState, SubmissionStore};
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use platform::client::{extract_bearer, extract_client_ip, header_str};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Header carrying an edit token for unauthenticated revisions
pub const EDIT_TOKEN_HEADER: &str = "x-edit-token";

/// The caller's credential, if any.
///
/// A bearer account token wins over an edit token; a bearer token that
/// fails verification rejects the request with 401.
#[derive(Debug, Clone)]
pub struct RequestCredential(pub Option<Credential>);

impl<R, N> FromRequestParts<SubmissionAppState<R, N>> for RequestCredential
where
    R: SubmissionStore,
    N: Notifier + Send + Sync + 'static,
{
    type Rejection = SubmissionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SubmissionAppState<R, N>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(bearer) = extract_bearer(&parts.headers) {
            let credential = state.accounts.verify(bearer)?;
            return Ok(Self(Some(credential)));
        }

        let edit_token = header_str(&parts.headers, EDIT_TOKEN_HEADER).map(|raw| {
            Credential::EditToken {
                raw: raw.to_string(),
            }
        });
        Ok(Self(edit_token))
    }
}

/// Client address, `X-Forwarded-For` first, then the peer address
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(Self(extract_client_ip(&parts.headers, peer)))
    }
}
