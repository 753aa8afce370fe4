//! Record store provisioning.
//!
//! Recreates the `camps` and `documents` collections, loads the demo camps
//! and creates one account per demo camp email plus the ministry reviewer.

use std::sync::Arc;

use camp_registry::{
    camps::{Camp, CampId},
    fixtures::{FixtureError, demo_camps},
    users::Role,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::Credentials,
    session::DemoAccounts,
    store::{
        RecordStoreClient, RecordStoreError,
        records::{AuthRecord, CAMPS, CampRecord, DOCUMENTS, USERS},
        schema::{camps_collection, documents_collection},
    },
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("administrator sign-in failed")]
    Admin(#[source] RecordStoreError),

    #[error("could not provision collection `{collection}`")]
    Schema {
        collection: &'static str,
        #[source]
        source: RecordStoreError,
    },

    #[error("demo data unavailable")]
    Fixtures(#[from] FixtureError),
}

/// Counts of what a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub camps: usize,
    pub users: usize,
    pub skipped: usize,
}

/// New row of the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRecord {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub email_visibility: bool,
    pub verified: bool,
    pub name: String,
    pub role: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub camp: String,
}

impl NewUserRecord {
    fn new(credentials: &Credentials, role: Role, camp: String) -> Self {
        Self {
            email: credentials.email.clone(),
            password: credentials.password().to_string(),
            password_confirm: credentials.password().to_string(),
            email_visibility: true,
            verified: true,
            name: role.display_name().to_string(),
            role: role.as_str(),
            camp,
        }
    }
}

/// Accounts to create for `camps`, whose ids are the ones the store
/// assigned: the ministry reviewer plus one representative per distinct camp
/// email, all sharing the camp account password.
pub fn demo_users(camps: &[Camp], accounts: &DemoAccounts) -> Vec<NewUserRecord> {
    let mut users = vec![NewUserRecord::new(
        &accounts.ministry,
        Role::Ministry,
        String::new(),
    )];

    for camp in camps {
        let email = camp.email.trim();

        if email.is_empty()
            || users
                .iter()
                .any(|user| user.email.eq_ignore_ascii_case(email))
        {
            continue;
        }

        let credentials = Credentials::new(email, accounts.camp.password());

        users.push(NewUserRecord::new(
            &credentials,
            Role::Camp,
            camp.id.to_string(),
        ));
    }

    users
}

/// Provisions a record store with the demo registry.
#[derive(Debug, Clone)]
pub struct Seeder {
    client: Arc<RecordStoreClient>,
}

impl Seeder {
    #[must_use]
    pub fn new(client: Arc<RecordStoreClient>) -> Self {
        Self { client }
    }

    /// Drop and recreate the collections, then load the demo camps and
    /// accounts. Records the store refuses are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the demo registry cannot be loaded, the
    /// administrator cannot sign in or a collection cannot be provisioned.
    pub async fn run(
        &self,
        admin: &Credentials,
        accounts: &DemoAccounts,
    ) -> Result<SeedReport, SeedError> {
        let demo = demo_camps()?;

        self.client
            .admin_auth_with_password(&admin.email, admin.password())
            .await
            .map_err(SeedError::Admin)?;

        self.provision_collections().await?;

        let mut report = SeedReport::default();
        let mut created = Vec::with_capacity(demo.len());

        for mut camp in demo {
            let record: Result<CampRecord, _> =
                self.client.create(CAMPS, &CampRecord::from(&camp)).await;

            match record {
                Ok(record) => {
                    camp.id = CampId::new(record.id);
                    report.camps += 1;
                    created.push(camp);
                }
                Err(error) => {
                    warn!(camp = %camp.name, %error, "skipping camp");
                    report.skipped += 1;
                }
            }
        }

        for user in demo_users(&created, accounts) {
            let account: Result<AuthRecord, _> = self.client.create(USERS, &user).await;

            match account {
                Ok(account) => {
                    info!(account = %account.id, email = %user.email, "created account");
                    report.users += 1;
                }
                Err(error) => {
                    warn!(email = %user.email, %error, "skipping account");
                    report.skipped += 1;
                }
            }
        }

        info!(
            camps = report.camps,
            users = report.users,
            skipped = report.skipped,
            "record store seeded"
        );

        Ok(report)
    }

    async fn provision_collections(&self) -> Result<(), SeedError> {
        // documents first, it references camps
        for collection in [DOCUMENTS, CAMPS] {
            match self.client.delete_collection(collection).await {
                Ok(()) => info!(collection, "dropped collection"),
                Err(RecordStoreError::NotFound) => {}
                Err(source) => return Err(SeedError::Schema { collection, source }),
            }
        }

        let camps_id = self
            .client
            .create_collection(&camps_collection())
            .await
            .map_err(|source| SeedError::Schema {
                collection: CAMPS,
                source,
            })?;

        self.client
            .create_collection(&documents_collection(&camps_id))
            .await
            .map_err(|source| SeedError::Schema {
                collection: DOCUMENTS,
                source,
            })?;

        info!("collections provisioned");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn every_demo_camp_gets_a_linked_account() -> TestResult {
        let camps = demo_camps()?;
        let users = demo_users(&camps, &DemoAccounts::default());

        assert_eq!(users.len(), camps.len() + 1);
        assert_eq!(users[0].role, "ministry");
        assert!(users[0].camp.is_empty(), "ministry account linked to a camp");

        for camp in &camps {
            let user = users
                .iter()
                .find(|user| user.email == camp.email)
                .ok_or("camp account missing")?;

            assert_eq!(user.role, "camp");
            assert_eq!(user.camp, camp.id.as_str());
        }

        Ok(())
    }

    #[test]
    fn shared_emails_get_one_account() {
        let camps = [
            Camp {
                email: "same@lipetsk.ru".to_string(),
                ..Camp::default()
            },
            Camp {
                email: "SAME@lipetsk.ru".to_string(),
                ..Camp::default()
            },
        ];

        assert_eq!(demo_users(&camps, &DemoAccounts::default()).len(), 2);
    }

    #[test]
    fn user_payload_confirms_the_password() -> TestResult {
        let users = demo_users(&[], &DemoAccounts::default());
        let json = serde_json::to_value(&users[0])?;

        assert_eq!(json["passwordConfirm"], json["password"]);
        assert_eq!(json["emailVisibility"], true);
        assert!(json.get("camp").is_none(), "empty camp claim serialized");

        Ok(())
    }
}
