use std::sync::Arc;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use super::{denylist::{Denylist, StaticDenylist}, policy::PolicyConfig};

pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

///
/// The policy rules, in the order they are checked.
///
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum RuleCode {
    #[display(fmt = "password_too_short")]
    TooShort,
    #[display(fmt = "password_no_upper")]
    MissingUppercase,
    #[display(fmt = "password_no_lower")]
    MissingLowercase,
    #[display(fmt = "password_no_digit")]
    MissingDigit,
    #[display(fmt = "password_no_special")]
    MissingSpecial,
    #[display(fmt = "password_in_dictionary")]
    Denylisted,
}

///
/// A broken rule and the message to show the user.
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Violation {
    pub code: RuleCode,
    pub message: String,
}

impl Violation {
    pub fn new(code: RuleCode, message: &str) -> Self {
        Violation { code, message: message.to_string() }
    }
}

pub type ValidationResult = Result<(), Vec<Violation>>;

///
/// Checks candidate passwords against a PolicyConfig. Every broken rule is reported, not just the first.
///
#[derive(Clone)]
pub struct PasswordPolicyValidator {
    denylist: Arc<dyn Denylist>,
}

impl Default for PasswordPolicyValidator {
    fn default() -> Self {
        PasswordPolicyValidator::new(Arc::new(StaticDenylist::default()))
    }
}

impl PasswordPolicyValidator {
    pub fn new(denylist: Arc<dyn Denylist>) -> Self {
        PasswordPolicyValidator { denylist }
    }

    pub fn validate(&self, candidate: &str, config: &PolicyConfig) -> ValidationResult {
        let mut violations = vec!();

        if candidate.chars().count() < config.min_length as usize {
            violations.push(Violation::new(RuleCode::TooShort,
                &format!("Password must be at least {} characters long.", config.min_length)));
        }

        if config.require_uppercase && !candidate.chars().any(char::is_uppercase) {
            violations.push(Violation::new(RuleCode::MissingUppercase,
                "Password must contain at least one uppercase letter."));
        }

        if config.require_lowercase && !candidate.chars().any(char::is_lowercase) {
            violations.push(Violation::new(RuleCode::MissingLowercase,
                "Password must contain at least one lowercase letter."));
        }

        if config.require_digits && !candidate.chars().any(char::is_numeric) {
            violations.push(Violation::new(RuleCode::MissingDigit,
                "Password must contain at least one digit."));
        }

        if config.require_special && !candidate.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            violations.push(Violation::new(RuleCode::MissingSpecial,
                "Password must contain at least one special character."));
        }

        if config.dictionary_check && self.denylist.is_denylisted(candidate) {
            violations.push(Violation::new(RuleCode::Denylisted,
                "Password cannot be a common password."));
        }

        match violations.is_empty() {
            true  => Ok(()),
            false => Err(violations),
        }
    }
}
