use super::{consume_reset::with_pending_reset, set_password::apply_new_password};
use crate::utils::{context::ServiceContext, errors::CredentialError};

///
/// Use a reset token to set a new password in one step, returning the identity that was reset.
///
/// The new password and the cleared token are saved together. If the password is rejected by the policy
/// or the history check the token remains pending so the user can try another password.
///
pub fn complete_reset_password(ctx: &ServiceContext, token_value: &str, plain_text_password: &str)
    -> Result<String, CredentialError> {

    let identity = with_pending_reset(ctx, token_value, |record| {
        apply_new_password(ctx, &record, plain_text_password)
    })?;

    tracing::info!("Password reset completed for identity {}", identity);
    Ok(identity)
}
