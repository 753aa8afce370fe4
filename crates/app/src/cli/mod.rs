use camp_registry::users::Role;
use camp_registry_app::{config::AppConfig, context::AppContext, observability};
use clap::{Parser, Subcommand};

mod account;
mod camp;
mod documents;
mod registry;
mod review;
mod seed;
mod session;

#[derive(Debug, Parser)]
#[command(name = "camp-registry", about = "Реестр организаций отдыха детей", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    /// Role to sign in as (ministry, camp)
    #[arg(long, env = "REGISTRY_ROLE", default_value = "ministry", global = true)]
    role: Role,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and cache the session
    Login,

    /// Drop the cached session
    Logout,

    /// Show the store state and the signed-in user
    Status,

    /// List registry entries
    Registry(registry::RegistryArgs),

    /// Show registry statistics
    Stats,

    /// Write the registry as CSV
    Export(registry::ExportArgs),

    /// Include a camp in the registry
    Verify(review::VerifyArgs),

    /// Revoke a camp's inclusion
    Unverify(review::VerifyArgs),

    /// Set the review status of a document
    Review(review::ReviewArgs),

    /// Run the compliance check for a camp
    Audit(review::AuditArgs),

    /// Camp card
    Camp(camp::CampCommand),

    /// Camp documents
    Documents(documents::DocumentsCommand),

    /// Recreate collections and load the demo registry
    Seed,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_subscriber(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let role = self.role;
        let ctx = AppContext::from_config(self.config);

        match self.command {
            Commands::Login => account::login(&ctx, role).await,
            Commands::Logout => account::logout(&ctx).await,
            Commands::Status => account::status(&ctx).await,
            Commands::Registry(args) => registry::list(&ctx, role, args).await,
            Commands::Stats => registry::stats(&ctx, role).await,
            Commands::Export(args) => registry::export(&ctx, role, args).await,
            Commands::Verify(args) => review::set_verification(&ctx, role, args, true).await,
            Commands::Unverify(args) => review::set_verification(&ctx, role, args, false).await,
            Commands::Review(args) => review::review(&ctx, role, args).await,
            Commands::Audit(args) => review::audit(&ctx, role, args).await,
            Commands::Camp(command) => camp::run(&ctx, role, command).await,
            Commands::Documents(command) => documents::run(&ctx, role, command).await,
            Commands::Seed => seed::run(&ctx).await,
        }
    }
}
