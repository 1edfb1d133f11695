//! Caller credentials
//!
//! A request carries at most one credential: an account session verified
//! from a bearer token, or a raw edit token scoped to a single submission.

use kernel::id::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    #[default]
    User,
    Moderator,
    Admin,
}

impl AccountRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountRole::User => "user",
            AccountRole::Moderator => "moderator",
            AccountRole::Admin => "admin",
        }
    }

    /// Unknown codes yield `None`; the caller decides how to reject them
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "user" => Some(AccountRole::User),
            "moderator" => Some(AccountRole::Moderator),
            "admin" => Some(AccountRole::Admin),
            _ => None,
        }
    }

    /// Moderators and admins review submissions
    #[inline]
    pub const fn is_reviewer(&self) -> bool {
        matches!(self, AccountRole::Moderator | AccountRole::Admin)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Authenticated {
        account_id: AccountId,
        role: AccountRole,
    },
    EditToken {
        raw: String,
    },
}

impl Credential {
    pub fn account(&self) -> Option<(AccountId, AccountRole)> {
        match self {
            Credential::Authenticated { account_id, role } => Some((*account_id, *role)),
            Credential::EditToken { .. } => None,
        }
    }
}

// Keep raw tokens out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Authenticated { account_id, role } => f
                .debug_struct("Authenticated")
                .field("account_id", account_id)
                .field("role", role)
                .finish(),
            Credential::EditToken { .. } => f.write_str("EditToken(<redacted>)"),
        }
    }
}
