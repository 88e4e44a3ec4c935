use axum::extract::FromRef;
use importer::{ImportLatch, ImportOptions, WatchProgress};
use std::sync::Arc;
use storage::Database;

use crate::middleware::auth::ApiKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub api_keys: ApiKeys,
    pub imports: ImportState,
    pub site_url: SiteUrl,
}

/// Public origin of the site, used for absolute links.
#[derive(Clone)]
pub struct SiteUrl(Arc<str>);

impl SiteUrl {
    pub fn new(url: &str) -> Self {
        Self(Arc::from(url.trim_end_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shared by every import request: one latch, one progress channel.
#[derive(Clone)]
pub struct ImportState {
    pub latch: ImportLatch,
    pub progress: WatchProgress,
    pub options: ImportOptions,
}

impl ImportState {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            latch: ImportLatch::new(),
            progress: WatchProgress::new(),
            options,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for ApiKeys {
    fn from_ref(state: &AppState) -> Self {
        state.api_keys.clone()
    }
}

impl FromRef<AppState> for SiteUrl {
    fn from_ref(state: &AppState) -> Self {
        state.site_url.clone()
    }
}
