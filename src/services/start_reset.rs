use crate::model::credential::ResetToken;
use crate::utils::{self, context::ServiceContext, errors::{ErrorCode, CredentialError}};

///
/// Issue a reset token for the identity, replacing any token it already had.
///
/// The token value is returned once, for the caller to deliver out-of-band. Only its digest is stored.
///
pub fn start_reset_password(ctx: &ServiceContext, identity: &str) -> Result<String, CredentialError> {
    ctx.locks().with_lock(identity, || -> Result<String, CredentialError> {
        let mut record = match ctx.store().load(identity)? {
            Some(record) => record,
            None => return Err(ErrorCode::UnknownIdentity
                .with_msg("No credentials exist for this identity")),
        };

        if record.reset_token.is_some() {
            tracing::info!("Replacing the pending reset token for identity {}", identity);
        }

        let token_value = utils::generate_token();
        record.reset_token = Some(ResetToken::new(&token_value, identity, ctx.now()));
        ctx.store().save(identity, &record)?;

        tracing::info!("Reset token issued for identity {}", identity);
        Ok(token_value)
    })
}
