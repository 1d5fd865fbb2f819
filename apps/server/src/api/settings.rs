use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use cms_core::{
    auth::AuthContext,
    constants::{SUPPORTED_LANGUAGES, SUPPORTED_TIMEZONES},
    notify::{CollectingNotifier, LogNotifier, Toast},
    settings::{
        AppearanceForm, ColorScheme, DateFormat, FormInput, FormKind, LoadOutcome,
        NotificationForm, PageSnapshot, SettingsPage, SiteSettingsForm, SubmitOutcome, Theme,
    },
};
use serde::Serialize;

use crate::{
    auth::HeaderAuth,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsResponse {
    outcome: LoadOutcome,
    exists: bool,
    appearance: AppearanceForm,
    notifications: NotificationForm,
    site: SiteSettingsForm,
    toasts: Vec<Toast>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum SubmittedForm {
    Appearance(AppearanceForm),
    Notifications(NotificationForm),
    Site(SiteSettingsForm),
}

impl SubmittedForm {
    fn from_snapshot(snapshot: PageSnapshot, kind: FormKind) -> Self {
        match kind {
            FormKind::Appearance => SubmittedForm::Appearance(snapshot.appearance),
            FormKind::Notifications => SubmittedForm::Notifications(snapshot.notifications),
            FormKind::Site => SubmittedForm::Site(snapshot.site),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    outcome: SubmitOutcome,
    form: SubmittedForm,
    toasts: Vec<Toast>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsOptions {
    languages: &'static [&'static str],
    timezones: &'static [&'static str],
    themes: [Theme; 3],
    color_schemes: [ColorScheme; 5],
    date_formats: [DateFormat; 3],
}

/// Mount a page for one request; its toasts are returned in the response
/// and written to the log.
fn open_page(
    state: &AppState,
    auth: Arc<dyn AuthContext>,
) -> (SettingsPage, CollectingNotifier) {
    let notifier = CollectingNotifier::forwarding_to(Arc::new(LogNotifier));
    let page = SettingsPage::new(
        state.settings_service.clone(),
        auth,
        Arc::new(notifier.clone()),
    );
    (page, notifier)
}

async fn get_settings(
    State(state): State<Arc<AppState>>,
    auth: HeaderAuth,
) -> ApiResult<Json<SettingsResponse>> {
    let (page, notifier) = open_page(&state, state.auth_context(Arc::new(auth)));
    let outcome = page.load().await;
    if outcome == LoadOutcome::Skipped {
        return Err(ApiError::Unauthorized("No signed-in user".to_string()));
    }

    let snapshot = page.snapshot();
    page.unmount();
    Ok(Json(SettingsResponse {
        outcome,
        exists: snapshot.settings_exists,
        appearance: snapshot.appearance,
        notifications: snapshot.notifications,
        site: snapshot.site,
        toasts: notifier.take(),
    }))
}

/// Run one form submit.
///
/// Without a signed-in user nothing is read from the body or the store.
async fn submit_form<T>(
    state: &AppState,
    auth: HeaderAuth,
    body: Result<Json<T>, JsonRejection>,
    into_input: fn(T) -> FormInput,
) -> ApiResult<Response> {
    let auth = state.auth_context(Arc::new(auth));
    if auth.current_user().is_none() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    let Json(form) = body?;
    let input = into_input(form);

    let kind = input.kind();
    let (page, notifier) = open_page(state, auth);
    let outcome = page.submit(input).await;
    if outcome == SubmitOutcome::Skipped {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let form = SubmittedForm::from_snapshot(page.snapshot(), kind);
    page.unmount();
    Ok(Json(SubmitResponse {
        outcome,
        form,
        toasts: notifier.take(),
    })
    .into_response())
}

async fn update_appearance(
    State(state): State<Arc<AppState>>,
    auth: HeaderAuth,
    body: Result<Json<AppearanceForm>, JsonRejection>,
) -> ApiResult<Response> {
    submit_form(&state, auth, body, FormInput::Appearance).await
}

async fn update_notifications(
    State(state): State<Arc<AppState>>,
    auth: HeaderAuth,
    body: Result<Json<NotificationForm>, JsonRejection>,
) -> ApiResult<Response> {
    submit_form(&state, auth, body, FormInput::Notifications).await
}

async fn update_site(
    State(state): State<Arc<AppState>>,
    auth: HeaderAuth,
    body: Result<Json<SiteSettingsForm>, JsonRejection>,
) -> ApiResult<Response> {
    submit_form(&state, auth, body, FormInput::Site).await
}

/// Choices offered by the three forms.
async fn get_options() -> Json<SettingsOptions> {
    Json(SettingsOptions {
        languages: SUPPORTED_LANGUAGES,
        timezones: SUPPORTED_TIMEZONES,
        themes: Theme::ALL,
        color_schemes: ColorScheme::ALL,
        date_formats: DateFormat::ALL,
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/settings", get(get_settings))
        .route("/settings/options", get(get_options))
        .route("/settings/appearance", put(update_appearance))
        .route("/settings/notifications", put(update_notifications))
        .route("/settings/site", put(update_site))
}
