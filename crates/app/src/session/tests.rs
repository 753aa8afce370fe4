use std::sync::Arc;

use camp_registry::{
    camps::{CampId, update::CampUpdate},
    documents::{DocumentId, DocumentStatus, DocumentType},
    users::Role,
};
use jiff::Zoned;
use testresult::TestResult;

use crate::{
    auth::{AuthServiceError, MockAuthService},
    camps::{CampsServiceError, MockCampsService, UploadFile},
    health::MockHealthcheck,
    session::{Availability, CAMP_EMAIL, DemoAccounts, FailureKind, Session, SessionError},
    store::RecordStoreError,
    test::{account, camp, unreachable, with_document},
};

fn session(auth: MockAuthService, camps: MockCampsService, health: MockHealthcheck) -> Session {
    Session::new(
        Arc::new(auth),
        Arc::new(camps),
        Arc::new(health),
        DemoAccounts::default(),
    )
}

fn healthy() -> MockHealthcheck {
    let mut health = MockHealthcheck::new();

    health.expect_check().once().returning(|| Ok(()));

    health
}

fn offline_store() -> MockHealthcheck {
    let mut health = MockHealthcheck::new();

    health
        .expect_check()
        .once()
        .returning(|| Err(unreachable()));

    health
}

fn rejected() -> RecordStoreError {
    RecordStoreError::Rejected {
        status: 400,
        message: "Failed to update record.".to_string(),
    }
}

async fn offline_session() -> Result<Session, SessionError> {
    let mut session = session(
        MockAuthService::new(),
        MockCampsService::new(),
        offline_store(),
    );

    session.initialize().await?;

    Ok(session)
}

/// Online session signed in through `sign_in` with an account record.
async fn signed_in(
    role: Role,
    record_email: &str,
    mut camps: MockCampsService,
) -> Result<Session, SessionError> {
    let mut auth = MockAuthService::new();
    let record = account("u1", record_email);

    auth.expect_sign_in()
        .once()
        .return_once(move |_| Ok(record));

    camps
        .expect_list_camps()
        .returning(|| Ok(vec![camp("c1", CAMP_EMAIL), camp("c2", "camp2@lipetsk.ru")]));

    let mut session = session(auth, camps, MockHealthcheck::new());

    session.login(role).await?;

    Ok(session)
}

#[tokio::test]
async fn unreachable_store_switches_to_demo_registry() -> TestResult {
    let session = offline_session().await?;

    assert_eq!(session.availability(), Availability::Offline);
    assert_eq!(session.camps().len(), 3);
    assert_eq!(session.current_user(), None);

    Ok(())
}

#[tokio::test]
async fn offline_login_synthesizes_users_without_the_store() -> TestResult {
    let mut session = offline_session().await?;

    let representative = session.login(Role::Camp).await?;

    assert!(representative.offline, "offline user not flagged");
    assert_eq!(representative.id.as_str(), "offline-camp");
    assert_eq!(representative.name, "Лагерь (Тест)");
    assert_eq!(representative.camp_id, Some(CampId::new("c1")));

    let reviewer = session.login(Role::Ministry).await?;

    assert_eq!(reviewer.id.as_str(), "offline-ministry");
    assert_eq!(reviewer.camp_id, None);
    assert_eq!(session.current_user(), Some(&reviewer));

    Ok(())
}

#[tokio::test]
async fn other_health_failures_keep_the_session_online() -> TestResult {
    let mut health = MockHealthcheck::new();
    let mut auth = MockAuthService::new();

    health
        .expect_check()
        .once()
        .returning(|| Err(RecordStoreError::NotFound));
    auth.expect_restore().once().returning(|| None);

    let mut session = session(auth, MockCampsService::new(), health);

    session.initialize().await?;

    assert_eq!(session.availability(), Availability::Online);
    assert!(session.camps().is_empty(), "demo registry loaded while online");

    Ok(())
}

#[tokio::test]
async fn restored_session_honours_explicit_claims() -> TestResult {
    let mut auth = MockAuthService::new();
    let mut camps = MockCampsService::new();
    let record = crate::store::records::AuthRecord {
        role: "camp".to_string(),
        camp: "c2".to_string(),
        ..account("u7", CAMP_EMAIL)
    };

    auth.expect_restore()
        .once()
        .return_const(Some(record));
    camps
        .expect_list_camps()
        .once()
        .returning(|| Ok(vec![camp("c1", CAMP_EMAIL), camp("c2", "camp2@lipetsk.ru")]));

    let mut session = session(auth, camps, healthy());

    session.initialize().await?;

    let user = session.current_user().ok_or("session not resumed")?;

    assert_eq!(user.role, Role::Camp);
    assert_eq!(user.camp_id, Some(CampId::new("c2")));
    assert!(!user.offline, "resumed user flagged offline");

    Ok(())
}

#[tokio::test]
async fn restored_session_without_claims_infers_role_from_email() -> TestResult {
    let mut auth = MockAuthService::new();
    let mut camps = MockCampsService::new();

    auth.expect_restore()
        .once()
        .return_const(Some(account("u1", "admin@edu.lipetsk.ru")));
    camps.expect_list_camps().once().returning(|| Ok(Vec::new()));

    let mut session = session(auth, camps, healthy());

    session.initialize().await?;

    assert_eq!(
        session.current_user().map(|user| user.role),
        Some(Role::Ministry)
    );

    Ok(())
}

#[tokio::test]
async fn login_links_camp_by_unique_email() -> TestResult {
    let session = signed_in(Role::Camp, "CAMP@lipetsk.ru", MockCampsService::new()).await?;
    let user = session.current_user().ok_or("not signed in")?;

    assert_eq!(user.role, Role::Camp);
    assert_eq!(user.name, "Директор Лагеря");
    assert_eq!(user.camp_id, Some(CampId::new("c1")));

    Ok(())
}

#[tokio::test]
async fn ambiguous_email_leaves_user_unlinked() -> TestResult {
    let mut auth = MockAuthService::new();
    let mut camps = MockCampsService::new();

    auth.expect_sign_in()
        .once()
        .return_once(|_| Ok(account("u1", CAMP_EMAIL)));
    camps
        .expect_list_camps()
        .once()
        .returning(|| Ok(vec![camp("c1", CAMP_EMAIL), camp("c2", CAMP_EMAIL)]));

    let mut session = session(auth, camps, MockHealthcheck::new());
    let user = session.login(Role::Camp).await?;

    assert_eq!(user.camp_id, None);

    Ok(())
}

#[tokio::test]
async fn login_sends_the_credentials_of_the_requested_role() -> TestResult {
    let mut auth = MockAuthService::new();
    let mut camps = MockCampsService::new();

    auth.expect_sign_in()
        .once()
        .withf(|credentials| credentials.email == "admin@edu.lipetsk.ru")
        .return_once(|_| Ok(account("u1", "admin@edu.lipetsk.ru")));
    camps.expect_list_camps().once().returning(|| Ok(Vec::new()));

    let mut session = session(auth, camps, MockHealthcheck::new());
    let user = session.login(Role::Ministry).await?;

    assert!(user.is_ministry(), "ministry login produced {user:?}");

    Ok(())
}

#[tokio::test]
async fn rejected_credentials_leave_the_session_unchanged() -> TestResult {
    let mut auth = MockAuthService::new();

    auth.expect_sign_in()
        .once()
        .return_once(|_| Err(AuthServiceError::InvalidCredentials));

    let mut session = session(auth, MockCampsService::new(), MockHealthcheck::new());
    let result = session.login(Role::Camp).await;

    assert!(
        matches!(&result, Err(error) if error.kind() == FailureKind::Authentication),
        "expected an authentication failure, got {result:?}"
    );
    assert_eq!(session.current_user(), None);
    assert_eq!(session.availability(), Availability::Online);

    Ok(())
}

#[tokio::test]
async fn unreachable_login_falls_back_to_offline() -> TestResult {
    let mut auth = MockAuthService::new();

    auth.expect_sign_in()
        .once()
        .return_once(|_| Err(AuthServiceError::Unreachable(unreachable())));

    let mut session = session(auth, MockCampsService::new(), MockHealthcheck::new());
    let user = session.login(Role::Ministry).await?;

    assert!(user.offline, "fallback user not flagged offline");
    assert_eq!(session.availability(), Availability::Offline);
    assert_eq!(session.camps().len(), 3);

    Ok(())
}

#[tokio::test]
async fn missing_collection_degrades_to_an_empty_registry() -> TestResult {
    let mut auth = MockAuthService::new();
    let mut camps = MockCampsService::new();

    auth.expect_sign_in()
        .once()
        .return_once(|_| Ok(account("u1", "admin@edu.lipetsk.ru")));
    camps
        .expect_list_camps()
        .once()
        .returning(|| Err(CampsServiceError::MissingCollection("camps".to_string())));
    camps
        .expect_list_camps()
        .once()
        .returning(|| Ok(vec![camp("c1", CAMP_EMAIL)]));

    let mut session = session(auth, camps, MockHealthcheck::new());

    session.login(Role::Ministry).await?;

    assert_eq!(session.availability(), Availability::Degraded);
    assert!(session.camps().is_empty(), "degraded registry not empty");

    session.refresh().await;

    assert_eq!(session.availability(), Availability::Online);
    assert_eq!(session.camps().len(), 1);

    Ok(())
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_snapshot() -> TestResult {
    let mut auth = MockAuthService::new();
    let mut camps = MockCampsService::new();

    auth.expect_sign_in()
        .once()
        .return_once(|_| Ok(account("u1", "admin@edu.lipetsk.ru")));
    camps
        .expect_list_camps()
        .once()
        .returning(|| Ok(vec![camp("c1", CAMP_EMAIL), camp("c2", "camp2@lipetsk.ru")]));
    camps
        .expect_list_camps()
        .once()
        .returning(|| Err(CampsServiceError::Unreachable(unreachable())));

    let mut session = session(auth, camps, MockHealthcheck::new());

    session.login(Role::Ministry).await?;
    session.refresh().await;

    assert_eq!(session.camps().len(), 2);
    assert_eq!(session.availability(), Availability::Online);

    Ok(())
}

#[tokio::test]
async fn camp_representative_cannot_edit_another_camp() -> TestResult {
    let mut session = signed_in(Role::Camp, CAMP_EMAIL, MockCampsService::new()).await?;
    let mut update = CampUpdate::default();

    update.assign("phone=+7 (4742) 00-00-00")?;

    let result = session.update_camp(&CampId::new("c2"), update).await;

    assert!(
        matches!(result, Err(SessionError::Forbidden(_))),
        "cross-camp update allowed: {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn refused_changes_keep_the_last_known_registry() -> TestResult {
    let mut auth = MockAuthService::new();
    let mut camps = MockCampsService::new();

    auth.expect_sign_in()
        .once()
        .return_once(|_| Ok(account("u1", CAMP_EMAIL)));
    camps.expect_list_camps().times(1).returning(|| {
        Ok(vec![
            with_document(camp("c1", CAMP_EMAIL), "d9", DocumentType::Menu),
            camp("c2", "camp2@lipetsk.ru"),
        ])
    });
    camps
        .expect_update_camp()
        .once()
        .withf(|camp, update| camp.as_str() == "c1" && update.phone.is_some())
        .return_once(|_, _| Err(CampsServiceError::Store(rejected())));
    camps
        .expect_upload_document()
        .once()
        .return_once(|_| Err(CampsServiceError::Store(rejected())));
    camps
        .expect_delete_document()
        .once()
        .return_once(|_| Err(CampsServiceError::Store(rejected())));

    let mut session = session(auth, camps, MockHealthcheck::new());

    session.login(Role::Camp).await?;

    let before = session.snapshot();
    let c1 = CampId::new("c1");
    let mut update = CampUpdate::default();

    update.assign("phone=+7 (4742) 00-00-00")?;

    let report = UploadFile {
        file_name: "june.xlsx".to_string(),
        bytes: b"PK".to_vec(),
    };

    let results = [
        session.update_camp(&c1, update).await,
        session
            .upload_document(&c1, report, DocumentType::ExcelReport)
            .await,
        session.delete_document(&DocumentId::new("d9")).await,
    ];

    for result in results {
        assert!(
            matches!(&result, Err(error) if error.kind() == FailureKind::Mutation),
            "expected a mutation failure, got {result:?}"
        );
    }

    assert_eq!(session.camps(), &*before.camps);
    assert_eq!(session.availability(), Availability::Online);

    Ok(())
}

#[tokio::test]
async fn invalid_update_never_reaches_the_store() -> TestResult {
    let mut session = signed_in(Role::Camp, CAMP_EMAIL, MockCampsService::new()).await?;
    let mut update = CampUpdate::default();

    update.assign("inn=12ab")?;

    let result = session.update_camp(&CampId::new("c1"), update).await;

    assert!(
        matches!(&result, Err(error) if error.kind() == FailureKind::Invalid),
        "invalid update accepted: {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn deleting_an_unknown_document_changes_nothing() -> TestResult {
    let mut session = offline_session().await?;

    session.login(Role::Ministry).await?;

    let before = session.snapshot();
    let result = session.delete_document(&DocumentId::new("missing")).await;

    assert!(
        matches!(result, Err(SessionError::DocumentNotFound(_))),
        "unknown document deleted: {result:?}"
    );
    assert_eq!(&*session.snapshot().camps, &*before.camps);

    Ok(())
}

#[tokio::test]
async fn offline_delete_leaves_earlier_snapshots_intact() -> TestResult {
    let mut session = offline_session().await?;

    session.login(Role::Ministry).await?;

    let before = session.snapshot();

    session.delete_document(&DocumentId::new("d1")).await?;

    let has_d1 = |camps: &[camp_registry::camps::Camp]| {
        camps
            .iter()
            .flat_map(|camp| &camp.documents)
            .any(|document| document.id.as_str() == "d1")
    };

    assert!(has_d1(&before.camps), "earlier snapshot was mutated");
    assert!(!has_d1(session.camps()), "document still present");

    Ok(())
}

#[tokio::test]
async fn online_delete_forwards_and_refetches() -> TestResult {
    let mut camps = MockCampsService::new();

    camps
        .expect_list_camps()
        .once()
        .returning(|| Ok(vec![with_document(camp("c1", CAMP_EMAIL), "d9", DocumentType::Menu)]));
    camps
        .expect_delete_document()
        .once()
        .withf(|document| document.as_str() == "d9")
        .return_once(|_| Ok(()));
    camps
        .expect_list_camps()
        .once()
        .returning(|| Ok(vec![camp("c1", CAMP_EMAIL)]));

    let mut auth = MockAuthService::new();

    auth.expect_sign_in()
        .once()
        .return_once(|_| Ok(account("u1", CAMP_EMAIL)));

    let mut session = session(auth, camps, MockHealthcheck::new());

    session.login(Role::Camp).await?;
    session.delete_document(&DocumentId::new("d9")).await?;

    assert!(session.camps()[0].documents.is_empty(), "refetch not applied");

    Ok(())
}

#[tokio::test]
async fn checklist_documents_cannot_be_uploaded_twice() -> TestResult {
    let mut session = offline_session().await?;

    session.login(Role::Camp).await?;

    let c1 = CampId::new("c1");
    let scan = UploadFile {
        file_name: "fire.pdf".to_string(),
        bytes: b"%PDF-1.7".to_vec(),
    };

    let result = session
        .upload_document(&c1, scan, DocumentType::FireSafety)
        .await;

    assert!(
        matches!(result, Err(SessionError::DuplicateDocument(DocumentType::FireSafety))),
        "duplicate accepted: {result:?}"
    );

    for period in ["june.xlsx", "july.xlsx"] {
        let report = UploadFile {
            file_name: period.to_string(),
            bytes: b"PK".to_vec(),
        };

        session
            .upload_document(&c1, report, DocumentType::ExcelReport)
            .await?;
    }

    let camp = session
        .camps()
        .iter()
        .find(|camp| camp.id == c1)
        .ok_or("c1 missing")?;

    assert_eq!(camp.documents_of(DocumentType::ExcelReport).count(), 2);
    assert!(
        camp.documents_of(DocumentType::ExcelReport)
            .all(|document| document.status == DocumentStatus::Pending),
        "uploads must start pending"
    );

    Ok(())
}

#[tokio::test]
async fn uploads_are_checked_before_reaching_the_store() -> TestResult {
    let mut session = signed_in(Role::Camp, CAMP_EMAIL, MockCampsService::new()).await?;
    let script = UploadFile {
        file_name: "menu.exe".to_string(),
        bytes: b"MZ".to_vec(),
    };

    let result = session
        .upload_document(&CampId::new("c1"), script, DocumentType::Menu)
        .await;

    assert!(
        matches!(result, Err(SessionError::InvalidUpload(_))),
        "executable accepted: {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn verification_is_reserved_for_the_ministry() -> TestResult {
    let mut session = offline_session().await?;

    session.login(Role::Camp).await?;

    let c2 = CampId::new("c2");
    let result = session.set_verification(&c2, true).await;

    assert!(
        matches!(result, Err(SessionError::Forbidden(_))),
        "camp representative verified a camp: {result:?}"
    );

    session.login(Role::Ministry).await?;
    session.set_verification(&c2, true).await?;

    let camp = session
        .camps()
        .iter()
        .find(|camp| camp.id == c2)
        .ok_or("c2 missing")?;

    assert!(camp.is_verified, "camp not verified");
    assert_eq!(camp.inclusion_date, Some(Zoned::now().date()));

    session.set_verification(&c2, false).await?;

    let camp = session
        .camps()
        .iter()
        .find(|camp| camp.id == c2)
        .ok_or("c2 missing")?;

    assert_eq!(camp.inclusion_date, None);

    Ok(())
}

#[tokio::test]
async fn online_verification_sends_the_inclusion_date() -> TestResult {
    let mut camps = MockCampsService::new();

    camps
        .expect_set_verification()
        .once()
        .withf(|camp, verified, date| camp.as_str() == "c2" && *verified && date.is_some())
        .return_once(|_, _, _| Ok(()));

    let mut session = signed_in(Role::Ministry, "admin@edu.lipetsk.ru", camps).await?;

    session.set_verification(&CampId::new("c2"), true).await?;

    Ok(())
}

#[tokio::test]
async fn review_requires_a_known_document() -> TestResult {
    let mut session = offline_session().await?;

    session.login(Role::Ministry).await?;
    session
        .review_document(&DocumentId::new("d1"), DocumentStatus::Rejected)
        .await?;

    let status = session
        .camps()
        .iter()
        .flat_map(|camp| &camp.documents)
        .find(|document| document.id.as_str() == "d1")
        .map(|document| document.status);

    assert_eq!(status, Some(DocumentStatus::Rejected));

    let result = session
        .review_document(&DocumentId::new("nope"), DocumentStatus::Verified)
        .await;

    assert!(
        matches!(result, Err(SessionError::DocumentNotFound(_))),
        "unknown document reviewed: {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn actions_require_a_signed_in_user() -> TestResult {
    let mut session = offline_session().await?;
    let result = session.set_verification(&CampId::new("c1"), true).await;

    assert!(
        matches!(&result, Err(error) if error.kind() == FailureKind::Forbidden),
        "anonymous verification allowed: {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn logout_keeps_the_registry() -> TestResult {
    let mut auth = MockAuthService::new();

    auth.expect_sign_out().once().returning(|| Ok(()));

    let mut session = session(auth, MockCampsService::new(), offline_store());

    session.initialize().await?;
    session.login(Role::Ministry).await?;
    session.logout()?;

    assert_eq!(session.current_user(), None);
    assert_eq!(session.camp_stats().total, 3);

    Ok(())
}

#[test]
fn failure_kinds_follow_the_error_source() {
    assert_eq!(
        SessionError::from(CampsServiceError::Unreachable(unreachable())).kind(),
        FailureKind::Connectivity
    );
    assert_eq!(
        SessionError::from(CampsServiceError::MissingCollection("camps".to_string())).kind(),
        FailureKind::MissingSchema
    );
    assert_eq!(
        SessionError::from(AuthServiceError::InvalidCredentials).kind(),
        FailureKind::Authentication
    );
    assert_eq!(SessionError::NotSignedIn.kind(), FailureKind::Forbidden);
}
