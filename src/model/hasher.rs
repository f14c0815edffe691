use rand::{RngCore, rngs::OsRng};
use ring::hmac;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

pub const SALT_LEN: usize   = 16;
pub const DIGEST_LEN: usize = 32;
pub const DELIMITER: char   = '$';

///
/// An opaque "salt$digest" value. The salt is lowercase hex, the digest is the hex HMAC-SHA-256 of the
/// plain text password keyed with the salt.
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    ///
    /// Split into the salt and the decoded digest. None if the value isn't a well-formed hash.
    ///
    fn parts(&self) -> Option<(&str, Vec<u8>)> {
        let mut split = self.0.split(DELIMITER);

        let (salt, digest) = match (split.next(), split.next(), split.next()) {
            (Some(salt), Some(digest), None) => (salt, digest),
            _ => return None,
        };

        if salt.len() != SALT_LEN * 2 || !salt.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None
        }

        match hex::decode(digest) {
            Ok(digest) if digest.len() == DIGEST_LEN => Some((salt, digest)),
            _ => None,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.parts().is_some()
    }
}

impl From<String> for HashedPassword {
    fn from(value: String) -> Self {
        HashedPassword(value)
    }
}

impl From<&str> for HashedPassword {
    fn from(value: &str) -> Self {
        HashedPassword(value.to_string())
    }
}

///
/// Salted HMAC password hashing with constant-time verification.
///
#[derive(Clone, Debug, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn hash(&self, plain_text_password: &str) -> HashedPassword {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let salt = hex::encode(salt);

        let digest = keyed_digest(&salt, plain_text_password);
        HashedPassword(format!("{}{}{}", salt, DELIMITER, hex::encode(digest)))
    }

    ///
    /// True if the password matches the stored hash. A malformed stored value never matches.
    ///
    pub fn verify(&self, plain_text_password: &str, stored: &HashedPassword) -> bool {
        let (salt, stored_digest) = match stored.parts() {
            Some(parts) => parts,
            None => return false,
        };

        let digest = keyed_digest(salt, plain_text_password);
        digest.as_ref().ct_eq(&stored_digest[..]).into()
    }
}

fn keyed_digest(salt: &str, plain_text_password: &str) -> hmac::Tag {
    let key = hmac::Key::new(hmac::HMAC_SHA256, salt.as_bytes());
    hmac::sign(&key, plain_text_password.as_bytes())
}
