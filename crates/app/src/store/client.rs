//! Record store HTTP client.

use std::path::PathBuf;

use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart::Form};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;

use crate::store::{
    AuthSession, AuthStore, RecordStoreError,
    records::{AuthRecord, ListPage, USERS},
    schema::CollectionSchema,
};

/// Records requested per listing page.
pub const PER_PAGE: u32 = 500;

/// Configuration for connecting to a record store.
#[derive(Debug, Clone)]
pub struct RecordStoreConfig {
    /// Base URL, e.g. `"http://127.0.0.1:8090"`.
    pub base_url: String,

    /// File the session is mirrored to between invocations.
    pub session_file: Option<PathBuf>,
}

/// HTTP client for a PocketBase-compatible record store.
#[derive(Debug)]
pub struct RecordStoreClient {
    base_url: String,
    http: Client,
    auth: AuthStore,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(default)]
    record: AuthRecord,
}

#[derive(Debug, Deserialize)]
struct AdminAuthResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedCollection {
    id: String,
}

impl RecordStoreClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: RecordStoreConfig) -> Self {
        let auth = match config.session_file {
            Some(path) => AuthStore::with_file(path),
            None => AuthStore::new(),
        };

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
            auth,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session store.
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Probe `GET /api/health`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), RecordStoreError> {
        let url = format!("{}/api/health", self.base_url);

        debug!(%url, "probing record store");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        ensure_success(response).await?;

        Ok(())
    }

    /// Sign in to the `users` collection and keep the session.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::InvalidCredentials`] on rejected
    /// credentials, or another error on transport failure.
    pub async fn auth_with_password(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<AuthRecord, RecordStoreError> {
        let url = format!(
            "{}/api/collections/{USERS}/auth-with-password",
            self.base_url
        );

        let response = self
            .http
            .post(&url)
            .json(&json!({ "identity": identity, "password": password }))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        let parsed: AuthResponse = ensure_success(response)
            .await
            .map_err(credentials_error)?
            .json()
            .await
            .map_err(RecordStoreError::Decode)?;

        self.auth.save(AuthSession {
            token: parsed.token.clone(),
            record: Some(parsed.record.clone()),
        })?;

        Ok(parsed.record)
    }

    /// Sign in as a store administrator. The admin session is kept in memory
    /// only.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::InvalidCredentials`] on rejected
    /// credentials, or another error on transport failure.
    pub async fn admin_auth_with_password(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<(), RecordStoreError> {
        let url = format!("{}/api/admins/auth-with-password", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "identity": identity, "password": password }))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        let parsed: AdminAuthResponse = ensure_success(response)
            .await
            .map_err(credentials_error)?
            .json()
            .await
            .map_err(RecordStoreError::Decode)?;

        self.auth.save(AuthSession {
            token: parsed.token.clone(),
            record: None,
        })
    }

    /// Fetch every record of `collection`, page by page.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::MissingCollection`] if the collection does
    /// not exist, or another error on transport or decode failure.
    pub async fn full_list<T: DeserializeOwned>(
        &self,
        collection: &str,
        sort: Option<&str>,
    ) -> Result<Vec<T>, RecordStoreError> {
        let url = self.records_url(collection);
        let mut items = Vec::new();
        let mut page = 1_u32;

        loop {
            let mut query = vec![("page", page.to_string()), ("perPage", PER_PAGE.to_string())];

            if let Some(sort) = sort {
                query.push(("sort", sort.to_string()));
            }

            debug!(collection, page, "listing records");

            let response = self
                .authorize(self.http.get(&url).query(&query))
                .send()
                .await
                .map_err(RecordStoreError::transport)?;

            let batch: ListPage<T> = ensure_success(response)
                .await
                .map_err(|error| missing_collection(error, collection))?
                .json()
                .await
                .map_err(RecordStoreError::Decode)?;

            let last = batch.page >= batch.total_pages
                || batch.items.len() < usize::try_from(PER_PAGE).unwrap_or(usize::MAX);

            items.extend(batch.items);

            if last {
                break;
            }

            page += 1;
        }

        Ok(items)
    }

    /// Create a record from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the record or is unreachable.
    pub async fn create<B, T>(&self, collection: &str, body: &B) -> Result<T, RecordStoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .authorize(self.http.post(self.records_url(collection)).json(body))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        ensure_success(response)
            .await
            .map_err(|error| missing_collection(error, collection))?
            .json()
            .await
            .map_err(RecordStoreError::Decode)
    }

    /// Create a record from a multipart form, used for file uploads.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the record or is unreachable.
    pub async fn create_multipart(
        &self,
        collection: &str,
        form: Form,
    ) -> Result<(), RecordStoreError> {
        let response = self
            .authorize(self.http.post(self.records_url(collection)).multipart(form))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        ensure_success(response)
            .await
            .map_err(|error| missing_collection(error, collection))?;

        Ok(())
    }

    /// Patch a record with the fields present in `body`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::NotFound`] if the record does not exist, or
    /// another error if the server rejects the patch or is unreachable.
    pub async fn update<B>(&self, collection: &str, id: &str, body: &B) -> Result<(), RecordStoreError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}/{id}", self.records_url(collection));

        let response = self
            .authorize(self.http.patch(&url).json(body))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        ensure_success(response).await?;

        Ok(())
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::NotFound`] if the record does not exist, or
    /// another error if the server refuses or is unreachable.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), RecordStoreError> {
        let url = format!("{}/{id}", self.records_url(collection));

        let response = self
            .authorize(self.http.delete(&url))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        ensure_success(response).await?;

        Ok(())
    }

    /// Create a collection and return the id the server assigned to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the schema or is unreachable.
    pub async fn create_collection(
        &self,
        schema: &CollectionSchema,
    ) -> Result<String, RecordStoreError> {
        let url = format!("{}/api/collections", self.base_url);

        let response = self
            .authorize(self.http.post(&url).json(schema))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        let created: CreatedCollection = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(RecordStoreError::Decode)?;

        Ok(created.id)
    }

    /// Delete a collection by name.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::NotFound`] if the collection does not
    /// exist, or another error if the server refuses or is unreachable.
    pub async fn delete_collection(&self, name: &str) -> Result<(), RecordStoreError> {
        let url = format!("{}/api/collections/{name}", self.base_url);

        let response = self
            .authorize(self.http.delete(&url))
            .send()
            .await
            .map_err(RecordStoreError::transport)?;

        ensure_success(response).await?;

        Ok(())
    }

    /// Download URL of a stored file.
    pub fn file_url(&self, collection: &str, record: &str, file: &str) -> String {
        format!("{}/api/files/{collection}/{record}/{file}", self.base_url)
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{collection}/records", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.token() {
            Some(token) => request.header("Authorization", token),
            None => request,
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response, RecordStoreError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(RecordStoreError::from_status(status, &body))
}

fn missing_collection(error: RecordStoreError, collection: &str) -> RecordStoreError {
    match error {
        RecordStoreError::NotFound => RecordStoreError::MissingCollection(collection.to_string()),
        other => other,
    }
}

fn credentials_error(error: RecordStoreError) -> RecordStoreError {
    match error {
        RecordStoreError::Rejected { status, .. }
            if status == StatusCode::BAD_REQUEST.as_u16()
                || status == StatusCode::UNAUTHORIZED.as_u16() =>
        {
            RecordStoreError::InvalidCredentials
        }
        other => other,
    }
}
