//! Settings module - per-user settings models, sync service and page session.

mod form_state;
mod settings_model;
mod settings_page;
mod settings_service;

#[cfg(test)]
mod settings_page_tests;

pub use form_state::{FormPhase, FormState};
pub use settings_model::*;
pub use settings_page::{LoadOutcome, PageSnapshot, SettingsPage, SubmitOutcome};
pub use settings_service::{
    FormInput, LoadedSettings, SettingsService, SettingsServiceConfig, SettingsServiceTrait,
};
