use crate::model::credential::CredentialRecord;
use crate::utils::{context::ServiceContext, errors::{ErrorCode, CredentialError}};

///
/// Validate the password against the policy and the identity's history, then store its hash.
///
/// Registration, change-password and reset flows all end up here.
///
pub fn set_password(ctx: &ServiceContext, identity: &str, plain_text_password: &str) -> Result<(), CredentialError> {
    ctx.locks().with_lock(identity, || -> Result<(), CredentialError> {
        let record = ctx.store().load(identity)?.unwrap_or_default();
        let updated = apply_new_password(ctx, &record, plain_text_password)?;

        ctx.store().save(identity, &updated)?;

        tracing::info!("Password set for identity {} ({} remembered)", identity, updated.history.len());
        Ok(())
    })
}

///
/// Build the record that results from setting the password, leaving the original untouched.
///
/// The caller must hold the identity's lock and is responsible for saving the result.
///
pub(crate) fn apply_new_password(ctx: &ServiceContext, record: &CredentialRecord, plain_text_password: &str)
    -> Result<CredentialRecord, CredentialError> {

    // Check password against the policy.
    if let Err(violations) = ctx.validator().validate(plain_text_password, ctx.policy()) {
        tracing::debug!("Password rejected by {} policy rules", violations.len());
        return Err(ErrorCode::PolicyViolation.with_violations(violations))
    }

    // Check this password against the password-history to prohibit reusing old passwords.
    if record.history.contains(plain_text_password, ctx.hasher()) {
        return Err(ErrorCode::PasswordReused
            .with_msg(&format!("Password cannot match the last {} passwords.", ctx.policy().history_depth)))
    }

    let hashed = ctx.hasher().hash(plain_text_password);

    let mut updated = record.clone();
    updated.current_hash = Some(hashed.clone());
    updated.history.append(hashed, ctx.policy().history_depth());
    Ok(updated)
}
