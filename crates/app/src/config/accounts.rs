//! Demo Accounts Config

use clap::Args;

use crate::{
    auth::Credentials,
    session::{CAMP_EMAIL, DEMO_PASSWORD, DemoAccounts, MINISTRY_EMAIL},
};

/// Credentials used when signing in by role.
#[derive(Debug, Clone, Args)]
pub struct AccountsConfig {
    /// Ministry reviewer account email
    #[arg(long, env = "MINISTRY_EMAIL", default_value = MINISTRY_EMAIL, global = true)]
    pub ministry_email: String,

    /// Ministry reviewer account password
    #[arg(
        long,
        env = "MINISTRY_PASSWORD",
        default_value = DEMO_PASSWORD,
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub ministry_password: String,

    /// Camp representative account email
    #[arg(long, env = "CAMP_EMAIL", default_value = CAMP_EMAIL, global = true)]
    pub camp_email: String,

    /// Camp representative account password
    #[arg(
        long,
        env = "CAMP_PASSWORD",
        default_value = DEMO_PASSWORD,
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub camp_password: String,
}

impl AccountsConfig {
    /// Credential pair per role.
    #[must_use]
    pub fn demo_accounts(&self) -> DemoAccounts {
        DemoAccounts {
            ministry: Credentials::new(&self.ministry_email, &self.ministry_password),
            camp: Credentials::new(&self.camp_email, &self.camp_password),
        }
    }
}
