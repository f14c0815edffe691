mod complete_reset;
mod consume_reset;
mod delete_credential;
mod set_password;
mod start_reset;
mod verify_password;

use std::sync::Arc;
use tracing::instrument;
use crate::utils::{context::ServiceContext, errors::CredentialError};

///
/// Sets and verifies passwords. Used by the registration, login and change-password flows.
///
/// Re-authenticating the user before a change is the caller's job.
///
#[derive(Clone)]
pub struct CredentialManager {
    ctx: Arc<ServiceContext>,
}

impl CredentialManager {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        CredentialManager { ctx }
    }

    ///
    /// Fails with PolicyViolation (listing every broken rule) or PasswordReused without touching the
    /// stored record, or PersistenceError if the record couldn't be saved.
    ///
    #[instrument(skip(self, plain_text_password))]
    pub fn set_password(&self, identity: &str, plain_text_password: &str) -> Result<(), CredentialError> {
        set_password::set_password(&self.ctx, identity, plain_text_password)
    }

    #[instrument(skip(self, plain_text_password))]
    pub fn verify_password(&self, identity: &str, plain_text_password: &str) -> Result<bool, CredentialError> {
        verify_password::verify_password(&self.ctx, identity, plain_text_password)
    }

    #[instrument(skip(self))]
    pub fn remove(&self, identity: &str) -> Result<bool, CredentialError> {
        delete_credential::delete_credential(&self.ctx, identity)
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }
}

///
/// Issues and redeems single-use password reset tokens. Used by the forgot/reset-password flows.
///
#[derive(Clone)]
pub struct ResetTokenService {
    ctx: Arc<ServiceContext>,
}

impl ResetTokenService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        ResetTokenService { ctx }
    }

    #[instrument(skip(self))]
    pub fn issue(&self, identity: &str) -> Result<String, CredentialError> {
        start_reset::start_reset_password(&self.ctx, identity)
    }

    ///
    /// The caller should follow a successful consume with CredentialManager::set_password for the identity.
    ///
    #[instrument(skip(self, token_value))]
    pub fn consume(&self, token_value: &str) -> Result<String, CredentialError> {
        consume_reset::consume_reset_token(&self.ctx, token_value)
    }

    #[instrument(skip(self, token_value, plain_text_password))]
    pub fn complete_reset(&self, token_value: &str, plain_text_password: &str) -> Result<String, CredentialError> {
        complete_reset::complete_reset_password(&self.ctx, token_value, plain_text_password)
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }
}
