use std::fmt::Write;
use std::env::VarError;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use super::errors::CredentialError;

///
/// The process settings - initialised at start-up from environment variables.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Configuration {
    pub policy_file: String,           // The JSON password policy document. Defaults apply if it's missing.
    pub store_path: Option<String>,    // The JSON credential store. If unset, credentials are held in memory only.
    pub denylist_file: Option<String>, // Extra common passwords, one per line, added to the built-in list.
}

impl Configuration {
    ///
    /// Load the service's configuration.
    ///
    pub fn from_env() -> Result<Configuration, ConfigError> {
        let mut cfg = config::Config::default();

        // Merge any environment variables with the same name as the struct fields.
        cfg.merge(config::Environment::new())?;

        // Set defaults for settings that were not specified.
        cfg.set_default("policy_file", "password_config.json")?;
        cfg.set_default("store_path", None::<String>)?;
        cfg.set_default("denylist_file", None::<String>)?;

        let config: Configuration = cfg.try_into()?;

        Ok(config)
    }

    ///
    /// Pretty-print the config, one sorted setting per line.
    ///
    pub fn fmt_console(&self) -> Result<String, CredentialError> {
        // Serialise to JSON so we have fields to iterate.
        let values = serde_json::to_value(&self)?;

        let mut sorted: Vec<_> = match values.as_object() {
            Some(values) => values.iter().collect(),
            None => vec!(),
        };
        sorted.sort_by_key(|a| a.0);

        let mut output = String::new();
        for (k, v) in sorted {
            let _ = writeln!(&mut output, "{:>23}: {}", k, v);
        }

        Ok(output)
    }
}

///
/// If the specified environment variable is not set for this process, set it to the default value specified.
///
pub fn default_env(key: &str, value: &str) {
    if let Err(VarError::NotPresent) = std::env::var(key) {
        std::env::set_var(key, value);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_console_lists_every_setting() -> Result<(), CredentialError> {
        let config = Configuration {
            policy_file: "password_config.json".to_string(),
            store_path: Some("/var/lib/credvault/credentials.json".to_string()),
            denylist_file: None,
        };

        let output = config.fmt_console()?;
        let lines: Vec<&str> = output.lines().map(str::trim).collect();
        assert_eq!(lines, vec!(
            "denylist_file: null",
            "policy_file: \"password_config.json\"",
            "store_path: \"/var/lib/credvault/credentials.json\""));
        Ok(())
    }
}
