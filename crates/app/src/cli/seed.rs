use camp_registry_app::context::AppContext;

use crate::cli::session::chain;

pub(crate) async fn run(ctx: &AppContext) -> Result<(), String> {
    let admin = ctx
        .config
        .admin
        .credentials()
        .ok_or_else(|| "--admin-email and --admin-password are required".to_string())?;

    let report = ctx
        .seeder()
        .run(&admin, &ctx.config.accounts.demo_accounts())
        .await
        .map_err(|error| format!("failed to seed record store: {}", chain(&error)))?;

    println!("camps: {}", report.camps);
    println!("users: {}", report.users);

    if report.skipped > 0 {
        println!("skipped: {}", report.skipped);
    }

    Ok(())
}
