//! Session state.

use std::{fmt, sync::Arc};

use camp_registry::{
    camps::{Camp, CampId, update::CampUpdate},
    documents::{Document, DocumentId, DocumentStatus, DocumentType},
    fixtures::demo_camps,
    stats::CampStats,
    users::{Role, User, UserId},
};
use jiff::{Timestamp, Zoned, civil::Date};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::{
    auth::{AuthService, AuthServiceError},
    camps::{CampsService, CampsServiceError, NewDocument, UploadFile},
    health::Healthcheck,
    session::{DemoAccounts, SessionError},
    store::records::AuthRecord,
};

/// Whether the registry mirrors the record store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Availability {
    /// Camps come from the record store
    #[default]
    Online,

    /// The store was unreachable; the demo registry is shown and every change
    /// stays local
    Offline,

    /// The store answered but its collections are missing; the registry is
    /// empty
    Degraded,
}

impl Availability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable view of the session handed to presentation code.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Signed-in user
    pub user: Option<User>,

    /// Registry in display order
    pub camps: Arc<[Camp]>,

    /// Store availability
    pub availability: Availability,
}

/// Current user, the registry snapshot and store availability. Every change
/// to the registry goes through here.
pub struct Session {
    auth: Arc<dyn AuthService>,
    camps_service: Arc<dyn CampsService>,
    health: Arc<dyn Healthcheck>,
    accounts: DemoAccounts,
    user: Option<User>,
    camps: Arc<[Camp]>,
    availability: Availability,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("camps", &self.camps.len())
            .field("availability", &self.availability)
            .finish_non_exhaustive()
    }
}

impl Session {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthService>,
        camps_service: Arc<dyn CampsService>,
        health: Arc<dyn Healthcheck>,
        accounts: DemoAccounts,
    ) -> Self {
        Self {
            auth,
            camps_service,
            health,
            accounts,
            user: None,
            camps: Arc::from(Vec::new()),
            availability: Availability::Online,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            camps: Arc::clone(&self.camps),
            availability: self.availability,
        }
    }

    pub fn camps(&self) -> &[Camp] {
        &self.camps
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Statistics over the current snapshot.
    pub fn camp_stats(&self) -> CampStats {
        CampStats::from_camps(&self.camps)
    }

    /// Check store health and resume a cached session.
    ///
    /// An unreachable store switches to the demo registry. Any other health check
    /// failure is logged and the session stays online.
    ///
    /// # Errors
    ///
    /// Returns an error if the demo registry cannot be loaded.
    pub async fn initialize(&mut self) -> Result<(), SessionError> {
        self.availability = Availability::Online;

        match self.health.check().await {
            Ok(()) => info!("record store is online"),
            Err(error) if error.is_unreachable() => {
                warn!(%error, "record store is unreachable");

                return self.go_offline();
            }
            Err(error) => warn!(%error, "health probe failed, staying online"),
        }

        if let Some(record) = self.auth.restore() {
            self.refresh().await;

            let user = self.user_from_record(&record, None);

            info!(account = %user.id, role = %user.role, "resumed cached session");

            self.user = Some(user);
        }

        Ok(())
    }

    /// Sign in with the demo account of `role`.
    ///
    /// Offline, or when the store turns out to be unreachable, the user is
    /// synthesized locally without contacting the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected; the session is left
    /// unchanged.
    pub async fn login(&mut self, role: Role) -> Result<User, SessionError> {
        if self.availability == Availability::Offline {
            return Ok(self.sign_in_offline(role));
        }

        let result = self.auth.sign_in(self.accounts.for_role(role)).await;

        match result {
            Ok(record) => {
                self.refresh().await;

                let user = self.user_from_record(&record, Some(role));

                info!(account = %user.id, role = %user.role, "signed in");

                self.user = Some(user.clone());

                Ok(user)
            }
            Err(AuthServiceError::Unreachable(error)) => {
                warn!(%error, "record store is unreachable, signing in offline");

                self.go_offline()?;

                Ok(self.sign_in_offline(role))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Forget the user and the cached session. The registry is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the cached session cannot be removed.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(user) = self.user.take() {
            info!(account = %user.id, "signed out");
        }

        self.auth.sign_out()?;

        Ok(())
    }

    /// Refetch the registry.
    ///
    /// A missing collection empties the registry and marks the session
    /// degraded. Other failures are logged and the snapshot is kept.
    pub async fn refresh(&mut self) {
        if self.availability == Availability::Offline {
            if self.camps.is_empty()
                && let Err(error) = self.load_demo_camps()
            {
                warn!(%error, "demo registry unavailable");
            }

            return;
        }

        match self.camps_service.list_camps().await {
            Ok(camps) => {
                debug!(camps = camps.len(), "registry refreshed");

                if self.availability != Availability::Online {
                    info!("record store collections are available");
                }

                self.camps = camps.into();
                self.availability = Availability::Online;
            }
            Err(CampsServiceError::MissingCollection(collection)) => {
                warn!(%collection, "record store is up but its collections are missing");

                self.camps = Arc::from(Vec::new());
                self.availability = Availability::Degraded;
            }
            Err(error) => warn!(%error, "could not refresh registry, keeping snapshot"),
        }
    }

    /// Save a camp card.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is invalid, the user may not edit the
    /// camp, or the store refuses it.
    pub async fn update_camp(
        &mut self,
        camp: &CampId,
        update: CampUpdate,
    ) -> Result<(), SessionError> {
        update.validate()?;
        self.require_camp_access(camp)?;

        if self.availability == Availability::Offline {
            return self.mutate_local(|camps| {
                let target = find_camp_mut(camps, camp)?;

                update.apply_to(target);

                Ok(())
            });
        }

        let result = self.camps_service.update_camp(camp, &update).await;

        self.settle(result).await
    }

    /// Upload a document for a camp.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is refused, a checklist document of the
    /// same type is already on file, the user may not edit the camp, or the
    /// store refuses the upload.
    pub async fn upload_document(
        &mut self,
        camp: &CampId,
        file: UploadFile,
        kind: DocumentType,
    ) -> Result<(), SessionError> {
        self.require_camp_access(camp)?;

        kind.check_upload(&file.file_name, file.size())?;

        let current = self
            .camps
            .iter()
            .find(|candidate| candidate.id == *camp)
            .ok_or_else(|| SessionError::CampNotFound(camp.clone()))?;

        if !kind.is_periodic() && current.has_document(kind) {
            return Err(SessionError::DuplicateDocument(kind));
        }

        if self.availability == Availability::Offline {
            let document = Document {
                id: DocumentId::new(format!("local-{}", Timestamp::now().as_nanosecond())),
                camp_id: camp.clone(),
                kind,
                file_name: file.file_name,
                uploaded_on: today(),
                status: DocumentStatus::Pending,
                url: None,
            };

            return self.mutate_local(|camps| {
                find_camp_mut(camps, camp)?.documents.push(document);

                Ok(())
            });
        }

        let result = self
            .camps_service
            .upload_document(&NewDocument {
                camp: camp.clone(),
                kind,
                file,
            })
            .await;

        self.settle(result).await
    }

    /// Delete a document. Only documents in the current snapshot can be
    /// deleted, and only from their owning camp.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not in the snapshot, the user may
    /// not edit its camp, or the store refuses the deletion.
    pub async fn delete_document(&mut self, document: &DocumentId) -> Result<(), SessionError> {
        let owner = self.owner_of(document)?;

        self.require_camp_access(&owner)?;

        if self.availability == Availability::Offline {
            return self.mutate_local(|camps| {
                find_camp_mut(camps, &owner)?
                    .documents
                    .retain(|candidate| candidate.id != *document);

                Ok(())
            });
        }

        let result = self.camps_service.delete_document(document).await;

        self.settle(result).await
    }

    /// Include a camp in the registry or revoke its inclusion. Inclusion is
    /// dated today; revoking clears the date.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not a ministry reviewer, the camp is
    /// unknown, or the store refuses the change.
    pub async fn set_verification(
        &mut self,
        camp: &CampId,
        verified: bool,
    ) -> Result<(), SessionError> {
        self.require_ministry()?;

        if !self.camps.iter().any(|candidate| candidate.id == *camp) {
            return Err(SessionError::CampNotFound(camp.clone()));
        }

        let inclusion_date = verified.then(today);

        if self.availability == Availability::Offline {
            return self.mutate_local(|camps| {
                let target = find_camp_mut(camps, camp)?;

                target.is_verified = verified;
                target.inclusion_date = inclusion_date;

                Ok(())
            });
        }

        let result = self
            .camps_service
            .set_verification(camp, verified, inclusion_date)
            .await;

        self.settle(result).await
    }

    /// Set the review status of a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not a ministry reviewer, the document
    /// is not in the snapshot, or the store refuses the change.
    pub async fn review_document(
        &mut self,
        document: &DocumentId,
        status: DocumentStatus,
    ) -> Result<(), SessionError> {
        self.require_ministry()?;

        let owner = self.owner_of(document)?;

        if self.availability == Availability::Offline {
            return self.mutate_local(|camps| {
                find_camp_mut(camps, &owner)?
                    .documents
                    .iter_mut()
                    .filter(|candidate| candidate.id == *document)
                    .for_each(|candidate| candidate.status = status);

                Ok(())
            });
        }

        let result = self.camps_service.review_document(document, status).await;

        self.settle(result).await
    }

    /// Refetch after a change the store accepted. A refused change leaves
    /// the snapshot and availability as they were.
    async fn settle(&mut self, result: Result<(), CampsServiceError>) -> Result<(), SessionError> {
        result?;

        self.refresh().await;

        Ok(())
    }

    fn go_offline(&mut self) -> Result<(), SessionError> {
        self.availability = Availability::Offline;

        self.load_demo_camps()?;

        info!(camps = self.camps.len(), "offline, showing demo registry");

        Ok(())
    }

    fn load_demo_camps(&mut self) -> Result<(), SessionError> {
        self.camps = demo_camps()?.into();

        Ok(())
    }

    fn sign_in_offline(&mut self, role: Role) -> User {
        let email = self.accounts.for_role(role).email.clone();

        let camp_id = match role {
            Role::Ministry => None,
            Role::Camp => link_camp_by_email(&self.camps, &email),
        };

        let user = User {
            id: UserId::new(format!("offline-{}", role.as_str())),
            name: role.offline_display_name().to_string(),
            email,
            role,
            camp_id,
            offline: true,
        };

        info!(role = %user.role, "signed in offline");

        self.user = Some(user.clone());

        user
    }

    /// Rebuild the user from an auth record. Explicit claims win; otherwise
    /// the requested role is used and the camp is linked by email.
    fn user_from_record(&self, record: &AuthRecord, requested: Option<Role>) -> User {
        let role = record
            .role_claim()
            .or(requested)
            .unwrap_or_else(|| legacy_role(record));

        let camp_id = match role {
            Role::Ministry => None,
            Role::Camp => record
                .camp_claim()
                .or_else(|| link_camp_by_email(&self.camps, &record.email)),
        };

        User {
            id: record.user_id(),
            name: role.display_name().to_string(),
            email: record.email.clone(),
            role,
            camp_id,
            offline: false,
        }
    }

    fn require_user(&self) -> Result<&User, SessionError> {
        self.user.as_ref().ok_or(SessionError::NotSignedIn)
    }

    fn require_ministry(&self) -> Result<(), SessionError> {
        if self.require_user()?.is_ministry() {
            Ok(())
        } else {
            Err(SessionError::Forbidden("ministry reviewers only"))
        }
    }

    fn require_camp_access(&self, camp: &CampId) -> Result<(), SessionError> {
        if self.require_user()?.can_edit(camp) {
            Ok(())
        } else {
            Err(SessionError::Forbidden("camp representatives may only edit their own camp"))
        }
    }

    fn owner_of(&self, document: &DocumentId) -> Result<CampId, SessionError> {
        self.camps
            .iter()
            .find(|camp| camp.documents.iter().any(|candidate| candidate.id == *document))
            .map(|camp| camp.id.clone())
            .ok_or_else(|| SessionError::DocumentNotFound(document.clone()))
    }

    fn mutate_local(
        &mut self,
        change: impl FnOnce(&mut Vec<Camp>) -> Result<(), SessionError>,
    ) -> Result<(), SessionError> {
        let mut camps = self.camps.to_vec();

        change(&mut camps)?;

        self.camps = camps.into();

        debug!("applied change to local registry");

        Ok(())
    }
}

/// The camp whose contact email matches `email`, if exactly one does.
pub fn link_camp_by_email(camps: &[Camp], email: &str) -> Option<CampId> {
    let matches: SmallVec<[&Camp; 2]> = camps
        .iter()
        .filter(|camp| camp.matches_email(email))
        .take(2)
        .collect();

    match matches.as_slice() {
        [camp] => Some(camp.id.clone()),
        [] => {
            warn!(email, "no camp matches the account email");

            None
        }
        _ => {
            warn!(email, "several camps share the account email, leaving unlinked");

            None
        }
    }
}

fn legacy_role(record: &AuthRecord) -> Role {
    warn!(account = %record.id, "no role claim, inferring role from account email");

    if record.email.contains("admin") {
        Role::Ministry
    } else {
        Role::Camp
    }
}

fn find_camp_mut<'a>(camps: &'a mut [Camp], id: &CampId) -> Result<&'a mut Camp, SessionError> {
    camps
        .iter_mut()
        .find(|camp| camp.id == *id)
        .ok_or_else(|| SessionError::CampNotFound(id.clone()))
}

fn today() -> Date {
    Zoned::now().date()
}
