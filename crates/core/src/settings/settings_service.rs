use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};

use super::{
    AppearanceForm, FormKind, NotificationForm, SettingsForm, SiteSettingsForm, UserSettings,
};
use crate::auth::AuthUser;
use crate::errors::Result;
use crate::store::{Document, DocumentPath, DocumentStore};

/// Options for [`SettingsService`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsServiceConfig {
    /// Write the default record when a user has no settings document yet.
    ///
    /// Off by default: the first save for such a user then fails, because
    /// partial updates require an existing document.
    pub provision_missing: bool,
}

/// Result of loading a user's settings.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedSettings {
    /// A stored document was found and hydrated.
    Existing(UserSettings),
    /// No document exists; the in-memory defaults are used.
    Defaulted(UserSettings),
}

impl LoadedSettings {
    pub fn settings(&self) -> &UserSettings {
        match self {
            LoadedSettings::Existing(s) | LoadedSettings::Defaulted(s) => s,
        }
    }

    pub fn exists(&self) -> bool {
        matches!(self, LoadedSettings::Existing(_))
    }
}

/// The values submitted by one of the three forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Appearance(AppearanceForm),
    Notifications(NotificationForm),
    Site(SiteSettingsForm),
}

impl FormInput {
    pub fn kind(&self) -> FormKind {
        match self {
            FormInput::Appearance(_) => AppearanceForm::KIND,
            FormInput::Notifications(_) => NotificationForm::KIND,
            FormInput::Site(_) => SiteSettingsForm::KIND,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            FormInput::Appearance(f) => f.validate(),
            FormInput::Notifications(f) => f.validate(),
            FormInput::Site(f) => f.validate(),
        }
    }

    fn update_fields(&self) -> Document {
        let now = Utc::now();
        match self {
            FormInput::Appearance(f) => f.update_fields(now),
            FormInput::Notifications(f) => f.update_fields(now),
            FormInput::Site(f) => f.update_fields(now),
        }
    }
}

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    /// Read the user's settings document, falling back to defaults.
    async fn load_settings(&self, user: &AuthUser) -> Result<LoadedSettings>;

    /// Validate a form and write its fields (plus `updatedAt`) to the
    /// user's document.
    async fn save_form(&self, user: &AuthUser, input: &FormInput) -> Result<()>;
}

pub struct SettingsService {
    store: Arc<dyn DocumentStore>,
    config: SettingsServiceConfig,
}

impl SettingsService {
    pub fn new(store: Arc<dyn DocumentStore>, config: SettingsServiceConfig) -> Self {
        SettingsService { store, config }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    async fn load_settings(&self, user: &AuthUser) -> Result<LoadedSettings> {
        let path = DocumentPath::user_settings(&user.uid)?;

        if let Some(doc) = self.store.get_document(&path).await? {
            debug!("Loaded settings document {}", path);
            return Ok(LoadedSettings::Existing(UserSettings::from_document(&doc)));
        }

        let defaults = UserSettings::default_for_new_user(Utc::now());
        if self.config.provision_missing {
            self.store
                .set_document(&path, defaults.to_document()?)
                .await?;
            info!("Provisioned default settings document {}", path);
        } else {
            debug!("No settings document at {}, using defaults", path);
        }
        Ok(LoadedSettings::Defaulted(defaults))
    }

    async fn save_form(&self, user: &AuthUser, input: &FormInput) -> Result<()> {
        input.validate()?;
        let path = DocumentPath::user_settings(&user.uid)?;
        let fields = input.update_fields();
        debug!(
            "Updating {} settings at {} ({} fields)",
            input.kind(),
            path,
            fields.len()
        );
        self.store.update_document(&path, fields).await
    }
}
