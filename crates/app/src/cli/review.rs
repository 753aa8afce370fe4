use std::io;

use camp_registry::{
    audit::AuditVerdict,
    camps::CampId,
    documents::{DocumentId, DocumentStatus},
    report::write_gaps,
    users::Role,
};
use camp_registry_app::context::AppContext;
use clap::Args;

use crate::cli::session::{self, chain, find_camp, notice, require_ministry};

#[derive(Debug, Args)]
pub(crate) struct VerifyArgs {
    /// Camp id
    camp: String,
}

#[derive(Debug, Args)]
pub(crate) struct ReviewArgs {
    /// Document id
    document: String,

    /// New status (pending, verified, rejected)
    status: DocumentStatus,
}

#[derive(Debug, Args)]
pub(crate) struct AuditArgs {
    /// Camp id
    camp: String,
}

pub(crate) async fn set_verification(
    ctx: &AppContext,
    role: Role,
    args: VerifyArgs,
    verified: bool,
) -> Result<(), String> {
    require_ministry(role)?;

    let mut session = session::open(ctx, role).await?;
    let camp = CampId::new(args.camp);

    session
        .set_verification(&camp, verified)
        .await
        .map_err(notice)?;

    let camp = find_camp(&session, &camp)?;

    match camp.inclusion_date {
        Some(date) if verified => println!("{} включен в реестр {date}", camp.name),
        _ => println!("{}: статус \"На проверке\"", camp.name),
    }

    Ok(())
}

pub(crate) async fn review(ctx: &AppContext, role: Role, args: ReviewArgs) -> Result<(), String> {
    require_ministry(role)?;

    let mut session = session::open(ctx, role).await?;

    session
        .review_document(&DocumentId::new(args.document), args.status)
        .await
        .map_err(notice)?;

    println!("Статус документа: {}", args.status);

    Ok(())
}

pub(crate) async fn audit(ctx: &AppContext, role: Role, args: AuditArgs) -> Result<(), String> {
    require_ministry(role)?;

    let session = session::open(ctx, role).await?;
    let camp = find_camp(&session, &CampId::new(args.camp))?;

    write_gaps(io::stdout().lock(), camp).map_err(|error| chain(&error))?;

    let Some(narration) = ctx.auditor.narrate(camp).await else {
        println!("ИИ-аудит недоступен: проверьте ключ API и соединение");

        return Ok(());
    };

    println!();
    println!("{narration}");
    println!();

    match AuditVerdict::parse(&narration) {
        AuditVerdict::Recommended => println!("Итог: рекомендовано к включению"),
        AuditVerdict::Refused(reason) => println!("Итог: отказ ({reason})"),
        AuditVerdict::Unclear => println!("Итог: не определен"),
    }

    Ok(())
}
