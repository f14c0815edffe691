use config::ConfigError;
use crate::model::validator::Violation;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorCode {
    PersistenceError                = 0503,
    InvalidConfig                   = 0508,
    MalformedCredentialRecord       = 0510,
    PolicyViolation                 = 2000,
    PasswordReused                  = 2012,
    UnknownIdentity                 = 2101,
    InvalidToken                    = 2200,
}

impl ErrorCode {
    pub fn with_msg(&self, message: &str) -> CredentialError {
        CredentialError::new(*self, message)
    }

    ///
    /// Build a policy violation error carrying every rule the candidate password broke.
    ///
    pub fn with_violations(&self, violations: Vec<Violation>) -> CredentialError {
        let message = violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        CredentialError { error_code: *self, message, violations }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CredentialError {
    error_code: ErrorCode,
    message: String,
    violations: Vec<Violation>,
}

impl CredentialError {
    pub fn new(error_code: ErrorCode, message: &str) -> Self {
        CredentialError { error_code, message: message.to_string(), violations: vec!() }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    ///
    /// The broken policy rules, in check order. Only populated for PolicyViolation.
    ///
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    ///
    /// Infrastructure failures the caller may retry. Nothing is retried internally.
    ///
    pub fn is_retryable(&self) -> bool {
        self.error_code == ErrorCode::PersistenceError
    }

    ///
    /// Errors the end user can fix by re-submitting the form.
    ///
    pub fn is_user_correctable(&self) -> bool {
        use ErrorCode::*;

        match self.error_code {
            PolicyViolation |
            PasswordReused  |
            UnknownIdentity |
            InvalidToken => true,

            PersistenceError          |
            InvalidConfig             |
            MalformedCredentialRecord => false,
        }
    }
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({}): {}", self.error_code, self.error_code as u32, self.message)
    }
}

impl std::error::Error for CredentialError {}

impl From<std::io::Error> for CredentialError {
    fn from(error: std::io::Error) -> Self {
        ErrorCode::PersistenceError.with_msg(&format!("Storage I/O failed: {}", error))
    }
}

impl From<serde_json::Error> for CredentialError {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::PersistenceError.with_msg(&format!("Unable to convert credential records to/from json: {}", error))
    }
}

impl From<tempfile::PersistError> for CredentialError {
    fn from(error: tempfile::PersistError) -> Self {
        ErrorCode::PersistenceError.with_msg(&format!("Unable to commit the credential store: {}", error.error))
    }
}

impl From<ConfigError> for CredentialError {
    fn from(error: ConfigError) -> Self {
        ErrorCode::InvalidConfig.with_msg(&format!("The configuration is not correct: {}", error))
    }
}
