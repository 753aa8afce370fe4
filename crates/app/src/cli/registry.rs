use std::{io, path::PathBuf};

use camp_registry::{
    export,
    registry::{RegistryFilter, RegistryQuery},
    report::{stats_table, write_registry},
    users::Role,
};
use camp_registry_app::context::AppContext;
use clap::Args;
use jiff::Zoned;

use crate::cli::session::{self, chain, require_ministry};

#[derive(Debug, Args)]
pub(crate) struct RegistryArgs {
    /// Name fragment, or an INN or registry code fragment
    #[arg(long, short, default_value = "")]
    search: String,

    /// Status filter (all, verified, pending, problematic)
    #[arg(long, short, default_value = "all")]
    filter: RegistryFilter,
}

#[derive(Debug, Args)]
pub(crate) struct ExportArgs {
    /// Directory the CSV file is written to
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

pub(crate) async fn list(ctx: &AppContext, role: Role, args: RegistryArgs) -> Result<(), String> {
    require_ministry(role)?;

    let session = session::open(ctx, role).await?;
    let query = RegistryQuery {
        search: args.search,
        filter: args.filter,
    };

    write_registry(io::stdout().lock(), &query.apply(session.camps()))
        .map_err(|error| chain(&error))
}

pub(crate) async fn stats(ctx: &AppContext, role: Role) -> Result<(), String> {
    require_ministry(role)?;

    let session = session::open(ctx, role).await?;

    println!("{}", stats_table(&session.camp_stats()));

    Ok(())
}

pub(crate) async fn export(ctx: &AppContext, role: Role, args: ExportArgs) -> Result<(), String> {
    require_ministry(role)?;

    let session = session::open(ctx, role).await?;
    let path = export::write_to_dir(session.camps(), &args.dir, Zoned::now().date())
        .map_err(|error| format!("failed to export registry: {}", chain(&error)))?;

    println!("Выгружено организаций: {}", session.camps().len());
    println!("{}", path.display());

    Ok(())
}
