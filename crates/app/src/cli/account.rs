use camp_registry::users::Role;
use camp_registry_app::context::AppContext;

use crate::cli::session::notice;

pub(crate) async fn login(ctx: &AppContext, role: Role) -> Result<(), String> {
    let mut session = ctx.session();

    session.initialize().await.map_err(notice)?;

    let user = session.login(role).await.map_err(notice)?;

    println!("Вход выполнен: {} <{}>", user.name, user.email);
    println!("role: {}", user.role);

    match &user.camp_id {
        Some(camp) => println!("camp: {camp}"),
        None if user.role == Role::Camp => println!("camp: не привязан"),
        None => {}
    }

    if user.offline {
        println!("Автономный режим: сессия не сохраняется");
    }

    Ok(())
}

pub(crate) async fn logout(ctx: &AppContext) -> Result<(), String> {
    let mut session = ctx.session();

    session.initialize().await.map_err(notice)?;
    session.logout().map_err(notice)?;

    println!("Сессия завершена");

    Ok(())
}

pub(crate) async fn status(ctx: &AppContext) -> Result<(), String> {
    let mut session = ctx.session();

    session.initialize().await.map_err(notice)?;

    let snapshot = session.snapshot();

    println!("store: {}", ctx.client.base_url());
    println!("availability: {}", snapshot.availability);
    println!("camps: {}", snapshot.camps.len());

    match &snapshot.user {
        Some(user) => println!("user: {} ({}, {})", user.email, user.role, user.name),
        None => println!("user: не выполнен вход"),
    }

    Ok(())
}
