/// Collection holding one settings document per user
pub const USER_SETTINGS_COLLECTION: &str = "userSettings";

/// Languages offered by the site settings form
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "es", "fr", "de", "ja"];

/// Timezones offered by the site settings form
pub const SUPPORTED_TIMEZONES: &[&str] = &[
    "UTC",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "Europe/London",
    "Europe/Paris",
    "Asia/Tokyo",
];

pub const DEFAULT_LANGUAGE: &str = "en";

pub const DEFAULT_TIMEZONE: &str = "UTC";

// Toast messages
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load settings";
pub const APPEARANCE_UPDATED_MESSAGE: &str = "Appearance settings updated";
pub const APPEARANCE_FAILED_MESSAGE: &str = "Failed to update appearance settings";
pub const NOTIFICATIONS_UPDATED_MESSAGE: &str = "Notification settings updated";
pub const NOTIFICATIONS_FAILED_MESSAGE: &str = "Failed to update notification settings";
pub const SITE_UPDATED_MESSAGE: &str = "Site settings updated";
pub const SITE_FAILED_MESSAGE: &str = "Failed to update site settings";
