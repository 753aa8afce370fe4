//! Application configuration

use clap::Args;

use crate::config::{
    accounts::AccountsConfig, admin::AdminConfig, audit::AuditConfig, logging::LoggingConfig,
    store::StoreConfig,
};

pub mod accounts;
pub mod admin;
pub mod audit;
pub mod logging;
pub mod store;

pub use logging::LogFormat;

/// Settings shared by every command, read from flags or the environment.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Record store connection settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Demo account credentials.
    #[command(flatten)]
    pub accounts: AccountsConfig,

    /// Record store administrator, used for seeding.
    #[command(flatten)]
    pub admin: AdminConfig,

    /// Text-generation service settings.
    #[command(flatten)]
    pub audit: AuditConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
