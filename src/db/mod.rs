pub mod file;
pub mod memory;

use crate::{model::credential::CredentialRecord, utils::errors::CredentialError};

///
/// Where credential records live. Each identity owns at most one record.
///
/// A save replaces the whole record in one step - readers see either the old record or the new one.
///
pub trait CredentialStore: Send + Sync {
    fn load(&self, identity: &str) -> Result<Option<CredentialRecord>, CredentialError>;

    fn save(&self, identity: &str, record: &CredentialRecord) -> Result<(), CredentialError>;

    fn remove(&self, identity: &str) -> Result<bool, CredentialError>;

    ///
    /// The identity holding a pending reset token with this digest, if any.
    ///
    fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<String>, CredentialError>;
}
