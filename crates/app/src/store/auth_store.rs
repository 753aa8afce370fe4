//! Session token store.

use std::{
    fmt,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write as _},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt as _, PermissionsExt as _};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::store::{RecordStoreError, records::AuthRecord};

/// Token plus the account it was issued for. Admin sessions carry no record.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Raw session token, sent as the `Authorization` header
    pub token: String,

    /// Authenticated account
    pub record: Option<AuthRecord>,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"**redacted**")
            .field("record", &self.record)
            .finish()
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

impl AuthSession {
    /// Whether the token is present and its `exp` claim lies in the future.
    pub fn is_valid(&self) -> bool {
        token_expiry(&self.token).is_some_and(|expiry| expiry > Timestamp::now())
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// Expiry of a JWT, read from its unverified payload.
pub fn token_expiry(token: &str) -> Option<Timestamp> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    Timestamp::from_second(claims.exp).ok()
}

/// Holds the current session, optionally mirrored to a file so a later
/// invocation can resume it.
#[derive(Debug, Default)]
pub struct AuthStore {
    session: RwLock<Option<AuthSession>>,
    file: Option<PathBuf>,
}

impl AuthStore {
    /// In-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store mirrored to `path`. An existing file is loaded; a missing or
    /// unreadable one starts the store empty.
    #[must_use]
    pub fn with_file(path: PathBuf) -> Self {
        let session = match read_session(&path) {
            Ok(session) => session,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable session file");

                None
            }
        };

        Self {
            session: RwLock::new(session),
            file: Some(path),
        }
    }

    /// Current session token.
    pub fn token(&self) -> Option<String> {
        self.read(|session| session.map(|session| session.token.clone()))
    }

    /// Authenticated account, if the stored session is still valid.
    pub fn valid_record(&self) -> Option<AuthRecord> {
        self.read(|session| {
            session
                .filter(|session| session.is_valid())
                .and_then(|session| session.record.clone())
        })
    }

    /// Whether a session with an unexpired token is held.
    pub fn is_valid(&self) -> bool {
        self.read(|session| session.is_some_and(AuthSession::is_valid))
    }

    /// Replace the session. Account sessions are written to the session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub fn save(&self, session: AuthSession) -> Result<(), RecordStoreError> {
        if let Some(path) = &self.file
            && session.record.is_some()
        {
            write_private(path, &serde_json::to_vec(&session)?)?;
            debug!(path = %path.display(), "session file written");
        }

        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);

        Ok(())
    }

    /// Drop the session and remove the session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), RecordStoreError> {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(path) = &self.file {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "session file removed"),
                Err(error) if error.kind() == ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
        }

        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(Option<&AuthSession>) -> T) -> T {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);

        f(guard.as_ref())
    }
}

fn read_session(path: &Path) -> Result<Option<AuthSession>, RecordStoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Write the session file readable by the owner only. It holds the bearer
/// token.
fn write_private(path: &Path, contents: &[u8]) -> Result<(), RecordStoreError> {
    let mut options = OpenOptions::new();

    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path)?;

    // mode only applies on create
    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))?;

    file.write_all(contents)?;

    Ok(())
}
