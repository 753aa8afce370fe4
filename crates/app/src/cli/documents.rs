use std::path::PathBuf;

use camp_registry::{
    documents::{DocumentId, DocumentType},
    users::Role,
};
use camp_registry_app::{camps::UploadFile, context::AppContext};
use clap::{Args, Subcommand};

use crate::cli::session::{self, notice, target_camp};

#[derive(Debug, Args)]
pub(crate) struct DocumentsCommand {
    #[command(subcommand)]
    command: DocumentsSubcommand,
}

#[derive(Debug, Subcommand)]
enum DocumentsSubcommand {
    /// Upload a document for a camp
    Upload(UploadArgs),

    /// Delete an uploaded document
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct UploadArgs {
    /// Camp id; representatives always act on their linked camp
    #[arg(long)]
    camp: Option<String>,

    /// Document type, as label or slug (fire-safety, sanitary, staff-list,
    /// menu, medical-license, education-license, excel-report)
    #[arg(long = "type")]
    kind: DocumentType,

    /// File to upload
    path: PathBuf,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    /// Document id
    document: String,
}

pub(crate) async fn run(
    ctx: &AppContext,
    role: Role,
    command: DocumentsCommand,
) -> Result<(), String> {
    let mut session = session::open(ctx, role).await?;

    match command.command {
        DocumentsSubcommand::Upload(args) => {
            let camp = target_camp(&session, args.camp)?;
            let file = UploadFile::read(&args.path)
                .map_err(|error| format!("failed to read {}: {error}", args.path.display()))?;

            session
                .upload_document(&camp, file, args.kind)
                .await
                .map_err(notice)?;

            println!("Документ \"{}\" загружен", args.kind);
        }
        DocumentsSubcommand::Delete(args) => {
            session
                .delete_document(&DocumentId::new(args.document))
                .await
                .map_err(notice)?;

            println!("Документ удален");
        }
    }

    Ok(())
}
