use std::sync::Arc;

use cms_core::auth::{AdminOnlyAuth, AuthContext};
use cms_core::settings::{SettingsService, SettingsServiceConfig, SettingsServiceTrait};
use cms_core::store::DocumentStore;
use cms_document_store::{InMemoryDocumentStore, RestDocumentStore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    /// When set, only this uid is treated as signed in.
    pub admin_user_id: Option<String>,
}

impl AppState {
    /// Apply the admin restriction, if any, to a request's identity.
    pub fn auth_context(&self, auth: Arc<dyn AuthContext>) -> Arc<dyn AuthContext> {
        match &self.admin_user_id {
            Some(admin) => Arc::new(AdminOnlyAuth::new(auth, admin.clone())),
            None => auth,
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("CMS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match &config.store_url {
        Some(url) => {
            let mut store = RestDocumentStore::with_timeout(url, config.store_timeout)?;
            if let Some(token) = &config.store_token {
                store = store.with_token(token.clone());
            }
            tracing::info!("Using REST document store at {}", url);
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("CMS_STORE_URL not set, settings are kept in memory only");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = build_store(config)?;
    Ok(build_state_with_store(config, store))
}

/// Wire the services over an already-built store.
pub fn build_state_with_store(config: &Config, store: Arc<dyn DocumentStore>) -> Arc<AppState> {
    let settings_service = Arc::new(SettingsService::new(
        store,
        SettingsServiceConfig {
            provision_missing: config.provision_missing,
        },
    ));
    if let Some(admin) = &config.admin_user_id {
        tracing::info!("Settings restricted to admin user {}", admin);
    }

    Arc::new(AppState {
        settings_service,
        admin_user_id: config.admin_user_id.clone(),
    })
}
