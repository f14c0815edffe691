use std::convert::TryFrom;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::utils::errors::{ErrorCode, CredentialError};

pub const DEFAULT_MIN_LENGTH: u32         = 10;
pub const DEFAULT_HISTORY_DEPTH: u32      = 3;
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;

///
/// The password requirements - constructed once at start-up and handed to every component.
///
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PolicyConfig {
    pub min_length: u32,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digits: bool,
    pub require_special: bool,
    pub dictionary_check: bool,
    pub history_depth: u32,
    pub max_login_attempts: u32,      // Enforced by the login throttling collaborator, not here.
    pub reset_token_ttl: Option<u64>, // Seconds. None means reset tokens never expire.
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            min_length: DEFAULT_MIN_LENGTH,
            require_uppercase: true,
            require_lowercase: true,
            require_digits: true,
            require_special: true,
            dictionary_check: true,
            history_depth: DEFAULT_HISTORY_DEPTH,
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            reset_token_ttl: None,
        }
    }
}

///
/// The on-disk policy document. Field names match the password_config.json files already deployed.
///
#[derive(Debug, Deserialize)]
#[serde(default)]
struct PolicyDocument {
    min_password_length: i64,
    password_requirements: RequirementsDocument,
    password_history: i64,
    dictionary_check: bool,
    login_attempts: i64,
    reset_token_ttl_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RequirementsDocument {
    uppercase: bool,
    lowercase: bool,
    digits: bool,
    special_characters: bool,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        PolicyDocument {
            min_password_length: DEFAULT_MIN_LENGTH as i64,
            password_requirements: RequirementsDocument::default(),
            password_history: DEFAULT_HISTORY_DEPTH as i64,
            dictionary_check: true,
            login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS as i64,
            reset_token_ttl_seconds: None,
        }
    }
}

impl Default for RequirementsDocument {
    fn default() -> Self {
        RequirementsDocument { uppercase: true, lowercase: true, digits: true, special_characters: true }
    }
}

impl PolicyConfig {
    ///
    /// Load the policy from a JSON document.
    ///
    /// A missing file, unparsable content or out-of-range values all fall back to the defaults.
    ///
    pub fn load(path: &Path) -> PolicyConfig {
        if !path.exists() {
            tracing::info!("No policy file at {}, using the default password policy", path.display());
            return PolicyConfig::default()
        }

        match PolicyConfig::try_load(path) {
            Ok(policy) => {
                tracing::info!("Loaded password policy from {}", path.display());
                policy
            },
            Err(err) => {
                tracing::warn!("Ignoring policy file {}, using the default password policy: {}", path.display(), err);
                PolicyConfig::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<PolicyConfig, CredentialError> {
        let mut cfg = config::Config::default();
        cfg.merge(config::File::from(path).format(config::FileFormat::Json).required(true))?;

        let document: PolicyDocument = cfg.try_into()?;
        let policy = PolicyConfig::from_document(document)?;
        policy.validate()?;
        Ok(policy)
    }

    fn from_document(document: PolicyDocument) -> Result<PolicyConfig, CredentialError> {
        let to_u32 = |name: &str, value: i64| {
            u32::try_from(value)
                .map_err(|_| ErrorCode::InvalidConfig.with_msg(&format!("{} must not be negative (was {})", name, value)))
        };

        Ok(PolicyConfig {
            min_length: to_u32("min_password_length", document.min_password_length)?,
            require_uppercase: document.password_requirements.uppercase,
            require_lowercase: document.password_requirements.lowercase,
            require_digits: document.password_requirements.digits,
            require_special: document.password_requirements.special_characters,
            dictionary_check: document.dictionary_check,
            history_depth: to_u32("password_history", document.password_history)?,
            max_login_attempts: to_u32("login_attempts", document.login_attempts)?,
            reset_token_ttl: document.reset_token_ttl_seconds,
        })
    }

    ///
    /// Check the numeric bounds of the policy.
    ///
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.min_length < 1 {
            return Err(ErrorCode::InvalidConfig.with_msg("min_length must be at least 1"))
        }

        if self.max_login_attempts < 1 {
            return Err(ErrorCode::InvalidConfig.with_msg("max_login_attempts must be at least 1"))
        }

        if self.reset_token_ttl == Some(0) {
            return Err(ErrorCode::InvalidConfig.with_msg("reset_token_ttl must be greater than zero when set"))
        }

        Ok(())
    }

    pub fn history_depth(&self) -> usize {
        self.history_depth as usize
    }

    ///
    /// A description of the requirements suitable for showing beside a password form.
    ///
    pub fn help_text(&self) -> String {
        let mut classes = vec!();
        if self.require_uppercase { classes.push("one uppercase letter") }
        if self.require_lowercase { classes.push("one lowercase letter") }
        if self.require_digits    { classes.push("one digit") }
        if self.require_special   { classes.push("one special character") }

        let mut text = format!("Your password must be at least {} characters long", self.min_length);

        match classes.len() {
            0 => {},
            1 => text.push_str(&format!(" and contain at least {}", classes[0])),
            n => text.push_str(&format!(" and contain at least {} and {}", classes[..n - 1].join(", "), classes[n - 1])),
        }
        text.push('.');

        if self.history_depth > 0 {
            text.push_str(&format!(" It cannot be the same as any of your last {} passwords.", self.history_depth));
        }

        text
    }
}
