use std::error::Error;

use camp_registry::{
    camps::{Camp, CampId},
    users::Role,
};
use camp_registry_app::{
    context::AppContext,
    session::{Availability, FailureKind, Session, SessionError},
};

/// Initialized session signed in as `role`, reusing a cached session of the
/// same role.
pub(crate) async fn open(ctx: &AppContext, role: Role) -> Result<Session, String> {
    let mut session = ctx.session();

    session.initialize().await.map_err(notice)?;

    if session.current_user().is_none_or(|user| user.role != role) {
        session.login(role).await.map_err(notice)?;
    }

    announce(&session);

    Ok(session)
}

/// Refuse commands reserved for ministry reviewers.
pub(crate) fn require_ministry(role: Role) -> Result<(), String> {
    match role {
        Role::Ministry => Ok(()),
        Role::Camp => Err("Команда доступна только сотрудникам Министерства".to_string()),
    }
}

/// Camp the command acts on: the linked camp for representatives, the
/// `--camp` argument for reviewers.
pub(crate) fn target_camp(session: &Session, requested: Option<String>) -> Result<CampId, String> {
    let user = session
        .current_user()
        .ok_or_else(|| notice(SessionError::NotSignedIn))?;

    match (user.role, requested) {
        (Role::Camp, _) => user
            .camp_id
            .clone()
            .ok_or_else(|| "Учетная запись не привязана к лагерю".to_string()),
        (Role::Ministry, Some(camp)) => Ok(CampId::new(camp)),
        (Role::Ministry, None) => Err("Укажите лагерь: --camp <id>".to_string()),
    }
}

pub(crate) fn find_camp<'a>(session: &'a Session, camp: &CampId) -> Result<&'a Camp, String> {
    session
        .camps()
        .iter()
        .find(|candidate| candidate.id == *camp)
        .ok_or_else(|| notice(SessionError::CampNotFound(camp.clone())))
}

/// User-facing message for a session failure.
pub(crate) fn notice(error: SessionError) -> String {
    let headline = match error.kind() {
        FailureKind::Connectivity => "Нет связи с сервером",
        FailureKind::Authentication => "Неверный логин или пароль",
        FailureKind::MissingSchema => {
            "База данных не настроена: коллекции не найдены, выполните `camp-registry seed`"
        }
        FailureKind::Mutation => "Не удалось сохранить изменения",
        FailureKind::Forbidden => "Действие недоступно",
        FailureKind::Invalid => "Некорректные данные",
    };

    format!("{headline}: {}", chain(&error))
}

pub(crate) fn chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

fn announce(session: &Session) {
    match session.availability() {
        Availability::Online => {}
        Availability::Offline => eprintln!(
            "Сервер недоступен: показаны демонстрационные данные, изменения не сохраняются"
        ),
        Availability::Degraded => eprintln!(
            "Сервер доступен, но коллекции не найдены: выполните `camp-registry seed`"
        ),
    }
}
