use camp_registry::{
    camps::update::CampUpdate,
    report::{camp_card, documents_table},
    users::Role,
};
use camp_registry_app::{context::AppContext, session::SessionError};
use clap::{Args, Subcommand};

use crate::cli::session::{self, find_camp, notice, target_camp};

#[derive(Debug, Args)]
pub(crate) struct CampCommand {
    /// Camp id; representatives always act on their linked camp
    #[arg(long, global = true)]
    camp: Option<String>,

    #[command(subcommand)]
    command: CampSubcommand,
}

#[derive(Debug, Subcommand)]
enum CampSubcommand {
    /// Print the camp card and its documents
    Show,

    /// Save form fields given as field=value
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Assignments such as `phone=+7 4742 00-00-00` or `sanitaryNumber=48.20.04`
    #[arg(required = true)]
    assignments: Vec<String>,
}

pub(crate) async fn run(ctx: &AppContext, role: Role, command: CampCommand) -> Result<(), String> {
    let mut session = session::open(ctx, role).await?;
    let camp_id = target_camp(&session, command.camp)?;

    if let CampSubcommand::Update(args) = command.command {
        let mut update = CampUpdate::default();

        for assignment in &args.assignments {
            update
                .assign(assignment)
                .map_err(|error| notice(SessionError::InvalidUpdate(error)))?;
        }

        session
            .update_camp(&camp_id, update)
            .await
            .map_err(notice)?;

        println!("Изменения сохранены");
    }

    let camp = find_camp(&session, &camp_id)?;

    println!("{}", camp_card(camp));

    if !camp.documents.is_empty() {
        println!("{}", documents_table(camp));
    }

    Ok(())
}
