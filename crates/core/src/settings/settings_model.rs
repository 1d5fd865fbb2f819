//! User settings domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    APPEARANCE_FAILED_MESSAGE, APPEARANCE_UPDATED_MESSAGE, DEFAULT_LANGUAGE, DEFAULT_TIMEZONE,
    NOTIFICATIONS_FAILED_MESSAGE, NOTIFICATIONS_UPDATED_MESSAGE, SITE_FAILED_MESSAGE,
    SITE_UPDATED_MESSAGE,
};
use crate::errors::{Result, ValidationError};
use crate::store::Document;

// Document field names
pub const FIELD_THEME: &str = "theme";
pub const FIELD_COLOR_SCHEME: &str = "colorScheme";
pub const FIELD_EMAIL_NOTIFICATIONS: &str = "emailNotifications";
pub const FIELD_MARKETING_EMAILS: &str = "marketingEmails";
pub const FIELD_NEW_COMMENT_NOTIFICATIONS: &str = "newCommentNotifications";
pub const FIELD_MENTION_NOTIFICATIONS: &str = "mentionNotifications";
pub const FIELD_LANGUAGE: &str = "language";
pub const FIELD_TIMEZONE: &str = "timezone";
pub const FIELD_DATE_FORMAT: &str = "dateFormat";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

/// Dashboard theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

/// Dashboard accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Blue,
        ColorScheme::Green,
        ColorScheme::Purple,
        ColorScheme::Orange,
        ColorScheme::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Blue => "blue",
            ColorScheme::Green => "green",
            ColorScheme::Purple => "purple",
            ColorScheme::Orange => "orange",
            ColorScheme::Pink => "pink",
        }
    }
}

/// How dates are rendered across the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

impl DateFormat {
    pub const ALL: [DateFormat; 3] = [
        DateFormat::MonthDayYear,
        DateFormat::DayMonthYear,
        DateFormat::Iso,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "MM/DD/YYYY",
            DateFormat::DayMonthYear => "DD/MM/YYYY",
            DateFormat::Iso => "YYYY-MM-DD",
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ident, $field:expr) => {
        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ValidationError::invalid_value($field, s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_str_enum!(Theme, FIELD_THEME);
impl_str_enum!(ColorScheme, FIELD_COLOR_SCHEME);
impl_str_enum!(DateFormat, FIELD_DATE_FORMAT);

/// The per-user settings record stored at `userSettings/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: Theme,
    pub color_scheme: ColorScheme,
    pub email_notifications: bool,
    pub marketing_emails: bool,
    pub new_comment_notifications: bool,
    pub mention_notifications: bool,
    pub language: String,
    pub timezone: String,
    pub date_format: DateFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for UserSettings {
    fn default() -> Self {
        let appearance = AppearanceForm::default();
        let notifications = NotificationForm::default();
        let site = SiteSettingsForm::default();
        Self {
            theme: appearance.theme,
            color_scheme: appearance.color_scheme,
            email_notifications: notifications.email_notifications,
            marketing_emails: notifications.marketing_emails,
            new_comment_notifications: notifications.new_comment_notifications,
            mention_notifications: notifications.mention_notifications,
            language: site.language,
            timezone: site.timezone,
            date_format: site.date_format,
            created_at: None,
            updated_at: None,
        }
    }
}

impl UserSettings {
    /// The record held in memory for a user that has no stored settings yet.
    pub fn default_for_new_user(now: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(now),
            ..Self::default()
        }
    }

    /// Hydrates a record from a stored document.
    ///
    /// Every field falls back to its default on its own. Strings also fall
    /// back when empty, booleans only when absent or not a boolean, and enum
    /// fields when the stored value is not one of the known options.
    pub fn from_document(doc: &Document) -> Self {
        let defaults = Self::default();
        Self {
            theme: enum_field(doc, FIELD_THEME).unwrap_or(defaults.theme),
            color_scheme: enum_field(doc, FIELD_COLOR_SCHEME).unwrap_or(defaults.color_scheme),
            email_notifications: bool_field(doc, FIELD_EMAIL_NOTIFICATIONS)
                .unwrap_or(defaults.email_notifications),
            marketing_emails: bool_field(doc, FIELD_MARKETING_EMAILS)
                .unwrap_or(defaults.marketing_emails),
            new_comment_notifications: bool_field(doc, FIELD_NEW_COMMENT_NOTIFICATIONS)
                .unwrap_or(defaults.new_comment_notifications),
            mention_notifications: bool_field(doc, FIELD_MENTION_NOTIFICATIONS)
                .unwrap_or(defaults.mention_notifications),
            language: string_field(doc, FIELD_LANGUAGE).unwrap_or(defaults.language),
            timezone: string_field(doc, FIELD_TIMEZONE).unwrap_or(defaults.timezone),
            date_format: enum_field(doc, FIELD_DATE_FORMAT).unwrap_or(defaults.date_format),
            created_at: timestamp_field(doc, FIELD_CREATED_AT),
            updated_at: timestamp_field(doc, FIELD_UPDATED_AT),
        }
    }

    /// Serializes the whole record as a document.
    pub fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ValidationError::InvalidInput(format!(
                "settings serialized to non-object: {}",
                other
            ))
            .into()),
        }
    }

    pub fn appearance(&self) -> AppearanceForm {
        AppearanceForm {
            theme: self.theme,
            color_scheme: self.color_scheme,
        }
    }

    pub fn notifications(&self) -> NotificationForm {
        NotificationForm {
            email_notifications: self.email_notifications,
            marketing_emails: self.marketing_emails,
            new_comment_notifications: self.new_comment_notifications,
            mention_notifications: self.mention_notifications,
        }
    }

    pub fn site(&self) -> SiteSettingsForm {
        SiteSettingsForm {
            language: self.language.clone(),
            timezone: self.timezone.clone(),
            date_format: self.date_format,
        }
    }
}

fn string_field(doc: &Document, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn bool_field(doc: &Document, key: &str) -> Option<bool> {
    doc.get(key).and_then(Value::as_bool)
}

fn enum_field<T: FromStr>(doc: &Document, key: &str) -> Option<T> {
    doc.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

fn timestamp_field(doc: &Document, key: &str) -> Option<DateTime<Utc>> {
    doc.get(key)
        .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok())
}

/// Identifies one of the three settings forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Appearance,
    Notifications,
    Site,
}

impl FormKind {
    pub fn success_message(&self) -> &'static str {
        match self {
            FormKind::Appearance => APPEARANCE_UPDATED_MESSAGE,
            FormKind::Notifications => NOTIFICATIONS_UPDATED_MESSAGE,
            FormKind::Site => SITE_UPDATED_MESSAGE,
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            FormKind::Appearance => APPEARANCE_FAILED_MESSAGE,
            FormKind::Notifications => NOTIFICATIONS_FAILED_MESSAGE,
            FormKind::Site => SITE_FAILED_MESSAGE,
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormKind::Appearance => "appearance",
            FormKind::Notifications => "notifications",
            FormKind::Site => "site",
        };
        f.write_str(label)
    }
}

/// A form that owns a subset of the settings fields.
pub trait SettingsForm: Clone + Send + Sync + 'static {
    const KIND: FormKind;

    /// Checks the values the way the page schema does before submission.
    fn validate(&self) -> Result<()>;

    /// The fields this form owns, and only those.
    fn to_fields(&self) -> Document;

    /// The partial update sent on submit: own fields plus `updatedAt`.
    fn update_fields(&self, now: DateTime<Utc>) -> Document {
        let mut fields = self.to_fields();
        fields.insert(
            FIELD_UPDATED_AT.to_string(),
            Value::String(now.to_rfc3339()),
        );
        fields
    }
}

/// Theme and color scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceForm {
    pub theme: Theme,
    pub color_scheme: ColorScheme,
}

impl SettingsForm for AppearanceForm {
    const KIND: FormKind = FormKind::Appearance;

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn to_fields(&self) -> Document {
        let mut fields = Document::new();
        fields.insert(FIELD_THEME.to_string(), Value::from(self.theme.as_str()));
        fields.insert(
            FIELD_COLOR_SCHEME.to_string(),
            Value::from(self.color_scheme.as_str()),
        );
        fields
    }
}

/// Email and in-app notification switches.
///
/// Missing switches take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationForm {
    pub email_notifications: bool,
    pub marketing_emails: bool,
    pub new_comment_notifications: bool,
    pub mention_notifications: bool,
}

impl Default for NotificationForm {
    fn default() -> Self {
        Self {
            email_notifications: true,
            marketing_emails: false,
            new_comment_notifications: true,
            mention_notifications: true,
        }
    }
}

impl SettingsForm for NotificationForm {
    const KIND: FormKind = FormKind::Notifications;

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn to_fields(&self) -> Document {
        let mut fields = Document::new();
        fields.insert(
            FIELD_EMAIL_NOTIFICATIONS.to_string(),
            Value::Bool(self.email_notifications),
        );
        fields.insert(
            FIELD_MARKETING_EMAILS.to_string(),
            Value::Bool(self.marketing_emails),
        );
        fields.insert(
            FIELD_NEW_COMMENT_NOTIFICATIONS.to_string(),
            Value::Bool(self.new_comment_notifications),
        );
        fields.insert(
            FIELD_MENTION_NOTIFICATIONS.to_string(),
            Value::Bool(self.mention_notifications),
        );
        fields
    }
}

/// Language, timezone and date format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettingsForm {
    pub language: String,
    pub timezone: String,
    pub date_format: DateFormat,
}

impl Default for SiteSettingsForm {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            date_format: DateFormat::default(),
        }
    }
}

impl SettingsForm for SiteSettingsForm {
    const KIND: FormKind = FormKind::Site;

    fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(ValidationError::MissingField(FIELD_LANGUAGE.to_string()).into());
        }
        if self.timezone.trim().is_empty() {
            return Err(ValidationError::MissingField(FIELD_TIMEZONE.to_string()).into());
        }
        if self.timezone.parse::<Tz>().is_err() {
            return Err(ValidationError::invalid_value(FIELD_TIMEZONE, &self.timezone).into());
        }
        Ok(())
    }

    fn to_fields(&self) -> Document {
        let mut fields = Document::new();
        fields.insert(FIELD_LANGUAGE.to_string(), Value::from(self.language.as_str()));
        fields.insert(FIELD_TIMEZONE.to_string(), Value::from(self.timezone.as_str()));
        fields.insert(
            FIELD_DATE_FORMAT.to_string(),
            Value::from(self.date_format.as_str()),
        );
        fields
    }
}
