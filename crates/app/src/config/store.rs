//! Record Store Config

use std::path::PathBuf;

use clap::Args;

use crate::store::RecordStoreConfig;

/// Port the record store listens on.
pub const STORE_PORT: u16 = 8090;

/// Fallback when neither a URL nor a usable origin is configured.
pub const LOCAL_STORE_URL: &str = "http://127.0.0.1:8090";

const TUNNEL_HOSTS: [&str; 2] = ["loca.lt", "ngrok"];

/// Record store settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Record store base URL; resolved from the page origin when omitted
    #[arg(long, env = "RECORD_STORE_URL", global = true)]
    pub store_url: Option<String>,

    /// Origin the registry is served from
    #[arg(long, env = "PAGE_ORIGIN", global = true)]
    pub page_origin: Option<String>,

    /// File the signed-in session is cached in between invocations
    #[arg(long, env = "SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,
}

impl StoreConfig {
    /// Base URL of the record store.
    #[must_use]
    pub fn base_url(&self) -> String {
        match (&self.store_url, &self.page_origin) {
            (Some(url), _) if !url.trim().is_empty() => url.trim().to_string(),
            (_, Some(origin)) => resolve_from_origin(origin),
            _ => LOCAL_STORE_URL.to_string(),
        }
    }

    /// Client configuration.
    #[must_use]
    pub fn client_config(&self) -> RecordStoreConfig {
        RecordStoreConfig {
            base_url: self.base_url(),
            session_file: self.session_file.clone(),
        }
    }
}

/// Same origin when the page is served by the store itself or through a
/// tunnel; the local store otherwise.
#[must_use]
pub fn resolve_from_origin(origin: &str) -> String {
    let origin = origin.trim().trim_end_matches('/');
    let authority = origin
        .split_once("://")
        .map_or(origin, |(_, rest)| rest)
        .split('/')
        .next()
        .unwrap_or_default();

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().ok()),
        None => (authority, None),
    };

    let same_origin = port == Some(STORE_PORT)
        || TUNNEL_HOSTS.iter().any(|tunnel| host.contains(tunnel));

    if same_origin && !host.is_empty() {
        origin.to_string()
    } else {
        LOCAL_STORE_URL.to_string()
    }
}
