use std::convert::TryFrom;
use chrono::{DateTime, Duration, Utc};
use ring::digest;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use super::{hasher::HashedPassword, history::PasswordHistoryStore};

///
/// The persisted credential state of one identity.
///
/// Only the credential manager and reset token service change a record, and always by saving a whole
/// new copy through the store.
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CredentialRecord {
    pub current_hash: Option<HashedPassword>,
    pub history: PasswordHistoryStore,
    pub reset_token: Option<ResetToken>,
}

impl CredentialRecord {
    ///
    /// Drop the pending reset token if it has outlived the ttl (in seconds). Returns true if one was dropped.
    ///
    pub fn expire_reset_token(&mut self, now: DateTime<Utc>, ttl: Option<u64>) -> bool {
        let expired = match (&self.reset_token, ttl) {
            (Some(token), Some(ttl)) => token.is_expired(now, ttl),
            _ => false,
        };

        if expired {
            self.reset_token = None;
        }
        expired
    }
}

///
/// A pending password reset. Only a digest of the token value is kept - the value itself goes to the user.
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResetToken {
    pub token_digest: String,
    pub identity: String,
    pub issued_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn new(token_value: &str, identity: &str, issued_at: DateTime<Utc>) -> Self {
        ResetToken {
            token_digest: token_digest(token_value),
            identity: identity.to_string(),
            issued_at,
        }
    }

    pub fn matches(&self, token_value: &str) -> bool {
        token_digest(token_value).as_bytes().ct_eq(self.token_digest.as_bytes()).into()
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: u64) -> bool {
        let ttl = Duration::seconds(i64::try_from(ttl).unwrap_or(i64::MAX).min(i64::MAX / 1000));
        now - self.issued_at >= ttl
    }
}

///
/// The hex SHA-256 of a token value - the key tokens are stored and looked up by.
///
pub fn token_digest(token_value: &str) -> String {
    hex::encode(digest::digest(&digest::SHA256, token_value.as_bytes()))
}
