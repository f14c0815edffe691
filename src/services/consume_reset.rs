use crate::model::credential::{CredentialRecord, token_digest};
use crate::utils::{context::ServiceContext, errors::{ErrorCode, CredentialError}};

///
/// Resolve and burn a reset token, returning the identity it was issued to.
///
/// Unknown, replaced, already used and expired tokens all give the same InvalidToken error.
///
pub fn consume_reset_token(ctx: &ServiceContext, token_value: &str) -> Result<String, CredentialError> {
    with_pending_reset(ctx, token_value, Ok)
}

///
/// Find the identity owning the token and, under that identity's lock, let the action rewrite its record.
///
/// If the action succeeds its record is saved with the token cleared, in one write. If it fails nothing is
/// saved and the token stays pending. Expired tokens are cleared and rejected without running the action.
///
pub(crate) fn with_pending_reset<F>(ctx: &ServiceContext, token_value: &str, action: F) -> Result<String, CredentialError>
    where F: FnOnce(CredentialRecord) -> Result<CredentialRecord, CredentialError> {

    let identity = match ctx.store().find_by_reset_token(&token_digest(token_value))? {
        Some(identity) => identity,
        None => return Err(invalid_token()),
    };

    ctx.locks().with_lock(&identity, || -> Result<String, CredentialError> {
        // Re-read under the lock - another caller may have used or replaced the token since the lookup.
        let mut record = match ctx.store().load(&identity)? {
            Some(record) => record,
            None => return Err(invalid_token()),
        };

        match &record.reset_token {
            Some(token) if token.matches(token_value) => {},
            _ => return Err(invalid_token()),
        }

        if record.expire_reset_token(ctx.now(), ctx.policy().reset_token_ttl) {
            tracing::info!("Reset token for identity {} has expired", identity);
            ctx.store().save(&identity, &record)?;
            return Err(invalid_token())
        }

        let mut updated = action(record)?;
        updated.reset_token = None;
        ctx.store().save(&identity, &updated)?;

        tracing::info!("Reset token consumed for identity {}", identity);
        Ok(identity.clone())
    })
}

fn invalid_token() -> CredentialError {
    ErrorCode::InvalidToken.with_msg("Invalid reset token.")
}
