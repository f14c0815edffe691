use lazy_static::lazy_static;
use crate::model::hasher::{HashedPassword, PasswordHasher};
use crate::utils::{context::ServiceContext, errors::CredentialError};

lazy_static! {
    // Unknown identities are checked against this so they take as long as a wrong password.
    static ref DECOY_HASH: HashedPassword = PasswordHasher::default().hash("decoy-password-never-matches");
}

///
/// True if the password matches the identity's current password.
///
/// Unknown identities, identities without a password and corrupt stored hashes all give false.
///
pub fn verify_password(ctx: &ServiceContext, identity: &str, plain_text_password: &str) -> Result<bool, CredentialError> {
    let record = ctx.store().load(identity)?;

    let current = match record.as_ref().and_then(|r| r.current_hash.as_ref()) {
        Some(current) => current,
        None => {
            let _ = ctx.hasher().verify(plain_text_password, &DECOY_HASH);
            return Ok(false)
        }
    };

    if !current.is_well_formed() {
        tracing::warn!("Identity {} has a malformed password hash, treating as a failed verification", identity);
        let _ = ctx.hasher().verify(plain_text_password, &DECOY_HASH);
        return Ok(false)
    }

    Ok(ctx.hasher().verify(plain_text_password, current))
}
