pub mod db;
pub mod model;
pub mod services;
pub mod utils;

use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use db::{CredentialStore, file::JsonFileStore, memory::MemoryStore};
use model::{denylist::StaticDenylist, policy::PolicyConfig, validator::PasswordPolicyValidator};
use utils::config::{Configuration, self};
use utils::context::ServiceContext;
use utils::errors::CredentialError;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, Registry, util::SubscriberInitExt};

pub use services::{CredentialManager, ResetTokenService};

const APP_NAME: &str = "CredVault";

///
/// Build the credential engine from the environment - the host application calls this once at start-up
/// and shares the result with its request handlers.
///
pub fn init() -> Result<Arc<ServiceContext>, CredentialError> {

    // Load any local dev settings as environment variables from a .env file.
    dotenv().ok();

    // Default log level to INFO if it's not specified.
    config::default_env("RUST_LOG", "INFO");

    init_tracing();

    // Load the service configuration into struct.
    let config = Configuration::from_env()?;

    tracing::info!("{} starting\n{}", APP_NAME, config.fmt_console()?);

    let policy = PolicyConfig::load(Path::new(&config.policy_file));
    tracing::info!("{}", policy.help_text());

    let denylist = match &config.denylist_file {
        Some(path) => StaticDenylist::from_file(Path::new(path))?,
        None => StaticDenylist::default(),
    };

    let store: Arc<dyn CredentialStore> = match &config.store_path {
        Some(path) => Arc::new(JsonFileStore::open(Path::new(path))?),
        None => {
            tracing::warn!("No store_path configured, credentials will only be held in memory");
            Arc::new(MemoryStore::new())
        },
    };

    let ctx = ServiceContext::new(policy, store, PasswordPolicyValidator::new(Arc::new(denylist)))?;
    Ok(Arc::new(ctx))
}

///
/// Initialise tracing with the level taken from the RUST_LOG environment variable.
///
pub fn init_tracing() {
    if let Err(err) = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env()) // Set the tracing level to match RUST_LOG env variable.
        .with(tracing_subscriber::fmt::layer().with_test_writer().with_ansi(true))
        .try_init() {
            tracing::info!("Tracing already initialised: {}", err.to_string()); // Allowed error here - tests call this fn repeatedly.
    }
}
