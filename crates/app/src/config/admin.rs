//! Admin Config

use clap::Args;

use crate::auth::Credentials;

/// Record store administrator.
#[derive(Debug, Clone, Args)]
pub struct AdminConfig {
    /// Administrator email
    #[arg(long, env = "ADMIN_EMAIL", global = true)]
    pub admin_email: Option<String>,

    /// Administrator password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true, global = true)]
    pub admin_password: Option<String>,
}

impl AdminConfig {
    /// Administrator credentials, when both parts are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }
}
