//! Settings page session.
//!
//! Binds the three settings forms of one mounted page to the user's remote
//! settings document. Every store failure is caught here, logged, and turned
//! into a toast; callers only ever see an outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use super::{
    AppearanceForm, FormInput, FormKind, FormState, NotificationForm, SettingsServiceTrait,
    SiteSettingsForm, UserSettings,
};
use crate::auth::AuthContext;
use crate::constants::LOAD_FAILED_MESSAGE;
use crate::notify::Notifier;

/// What happened to a load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    /// A stored document hydrated the forms.
    Loaded,
    /// No document exists; forms hold the defaults.
    Defaulted,
    /// The store failed; forms hold the defaults.
    Failed,
    /// Nobody is signed in; nothing was read.
    Skipped,
    /// The page was unmounted before the read finished.
    Detached,
}

/// What happened to a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitOutcome {
    Saved,
    Failed,
    /// Nobody is signed in; nothing was written.
    Skipped,
    /// The same form is already submitting.
    Busy,
}

/// Point-in-time view of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub loading_settings: bool,
    pub settings_exists: bool,
    pub appearance: AppearanceForm,
    pub notifications: NotificationForm,
    pub site: SiteSettingsForm,
    pub appearance_state: FormState,
    pub notifications_state: FormState,
    pub site_state: FormState,
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self {
            loading_settings: true,
            settings_exists: false,
            appearance: AppearanceForm::default(),
            notifications: NotificationForm::default(),
            site: SiteSettingsForm::default(),
            appearance_state: FormState::default(),
            notifications_state: FormState::default(),
            site_state: FormState::default(),
        }
    }
}

impl PageSnapshot {
    pub fn form_state(&self, kind: FormKind) -> FormState {
        match kind {
            FormKind::Appearance => self.appearance_state,
            FormKind::Notifications => self.notifications_state,
            FormKind::Site => self.site_state,
        }
    }

    fn form_state_mut(&mut self, kind: FormKind) -> &mut FormState {
        match kind {
            FormKind::Appearance => &mut self.appearance_state,
            FormKind::Notifications => &mut self.notifications_state,
            FormKind::Site => &mut self.site_state,
        }
    }

    fn hydrate(&mut self, settings: &UserSettings) {
        self.appearance = settings.appearance();
        self.notifications = settings.notifications();
        self.site = settings.site();
    }

    fn set_form_values(&mut self, input: &FormInput) {
        match input {
            FormInput::Appearance(f) => self.appearance = f.clone(),
            FormInput::Notifications(f) => self.notifications = f.clone(),
            FormInput::Site(f) => self.site = f.clone(),
        }
    }
}

pub struct SettingsPage {
    service: Arc<dyn SettingsServiceTrait>,
    auth: Arc<dyn AuthContext>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<PageSnapshot>,
    mounted: AtomicBool,
}

impl SettingsPage {
    pub fn new(
        service: Arc<dyn SettingsServiceTrait>,
        auth: Arc<dyn AuthContext>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        SettingsPage {
            service,
            auth,
            notifier,
            state: Mutex::new(PageSnapshot::default()),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.with_state(|s| s.clone())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Tear the page down. Operations still in flight finish at the store
    /// but no longer touch page state or emit toasts.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Fetch the user's settings and reset all three forms from them.
    pub async fn load(&self) -> LoadOutcome {
        let Some(user) = self.auth.current_user() else {
            debug!("No signed-in user, skipping settings load");
            return LoadOutcome::Skipped;
        };

        self.with_state(|s| s.loading_settings = true);
        let result = self.service.load_settings(&user).await;

        if !self.is_mounted() {
            debug!("Settings page unmounted before load finished");
            return LoadOutcome::Detached;
        }

        let outcome = match result {
            Ok(loaded) => {
                let exists = loaded.exists();
                self.with_state(|s| {
                    s.hydrate(loaded.settings());
                    s.settings_exists = exists;
                });
                if exists {
                    LoadOutcome::Loaded
                } else {
                    LoadOutcome::Defaulted
                }
            }
            Err(e) => {
                error!("Error fetching user settings: {}", e);
                self.notifier.error(LOAD_FAILED_MESSAGE);
                LoadOutcome::Failed
            }
        };

        self.with_state(|s| s.loading_settings = false);
        outcome
    }

    pub async fn submit_appearance(&self, form: AppearanceForm) -> SubmitOutcome {
        self.submit(FormInput::Appearance(form)).await
    }

    pub async fn submit_notifications(&self, form: NotificationForm) -> SubmitOutcome {
        self.submit(FormInput::Notifications(form)).await
    }

    pub async fn submit_site(&self, form: SiteSettingsForm) -> SubmitOutcome {
        self.submit(FormInput::Site(form)).await
    }

    /// Write one form's values to the user's settings document.
    ///
    /// The submitted values stay in the form whatever the result.
    pub async fn submit(&self, input: FormInput) -> SubmitOutcome {
        let Some(user) = self.auth.current_user() else {
            debug!("No signed-in user, skipping {} submit", input.kind());
            return SubmitOutcome::Skipped;
        };
        let kind = input.kind();

        let started = self.with_state(|s| {
            if s.form_state_mut(kind).begin_submit().is_err() {
                return false;
            }
            s.set_form_values(&input);
            true
        });
        if !started {
            debug!("{} form is already submitting", kind);
            return SubmitOutcome::Busy;
        }

        let result = self.service.save_form(&user, &input).await;

        if !self.is_mounted() {
            debug!("Settings page unmounted before {} submit finished", kind);
            return if result.is_ok() {
                SubmitOutcome::Saved
            } else {
                SubmitOutcome::Failed
            };
        }

        match result {
            Ok(()) => {
                self.finish(kind, true);
                self.notifier.success(kind.success_message());
                SubmitOutcome::Saved
            }
            Err(e) => {
                error!("Error updating {} settings: {}", kind, e);
                self.finish(kind, false);
                self.notifier.error(kind.failure_message());
                SubmitOutcome::Failed
            }
        }
    }

    fn finish(&self, kind: FormKind, succeeded: bool) {
        self.with_state(|s| {
            let form = s.form_state_mut(kind);
            let finished = if succeeded { form.succeed() } else { form.fail() };
            if let Err(e) = finished.and_then(|_| form.settle()) {
                warn!("Unexpected {} form state: {}", kind, e);
            }
        });
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut PageSnapshot) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
