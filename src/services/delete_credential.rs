use crate::utils::{context::ServiceContext, errors::CredentialError};

///
/// Remove the identity's credential record, along with its history and any pending reset token.
///
/// Returns false if there was nothing to remove.
///
pub fn delete_credential(ctx: &ServiceContext, identity: &str) -> Result<bool, CredentialError> {
    ctx.locks().with_lock(identity, || -> Result<bool, CredentialError> {
        let removed = ctx.store().remove(identity)?;
        if removed {
            tracing::info!("Credentials removed for identity {}", identity);
        }
        Ok(removed)
    })
}
