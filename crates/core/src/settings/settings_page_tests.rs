//! Tests for the settings service and page session.

#[cfg(test)]
mod tests {
    use crate::auth::{AuthContext, AuthUser, StaticAuth};
    use crate::errors::{Result, StoreError};
    use crate::notify::{CollectingNotifier, Toast};
    use crate::settings::*;
    use crate::store::{Document, DocumentPath, DocumentStore};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    // --- Mock DocumentStore ---
    #[derive(Default)]
    struct MockStore {
        docs: Mutex<HashMap<String, Document>>,
        updates: Mutex<Vec<(String, Document)>>,
        reads: AtomicUsize,
        writes: AtomicUsize,
        fail_reads: bool,
        fail_writes: bool,
        /// (entered, release): writes signal `entered` then wait for `release`.
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    impl MockStore {
        fn with_doc(uid: &str, doc: Document) -> Self {
            let store = Self::default();
            store
                .docs
                .lock()
                .unwrap()
                .insert(format!("userSettings/{}", uid), doc);
            store
        }

        fn calls(&self) -> usize {
            self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
        }

        fn updates(&self) -> Vec<(String, Document)> {
            self.updates.lock().unwrap().clone()
        }

        fn doc(&self, uid: &str) -> Option<Document> {
            self.docs
                .lock()
                .unwrap()
                .get(&format!("userSettings/{}", uid))
                .cloned()
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads {
                return Err(StoreError::Unavailable("network down".to_string()).into());
            }
            Ok(self.docs.lock().unwrap().get(&path.to_string()).cloned())
        }

        async fn update_document(&self, path: &DocumentPath, fields: Document) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            if self.fail_writes {
                return Err(StoreError::PermissionDenied("rules".to_string()).into());
            }
            self.updates
                .lock()
                .unwrap()
                .push((path.to_string(), fields.clone()));
            let mut docs = self.docs.lock().unwrap();
            match docs.get_mut(&path.to_string()) {
                Some(existing) => {
                    existing.extend(fields);
                    Ok(())
                }
                None => Err(StoreError::NotFound(path.to_string()).into()),
            }
        }

        async fn set_document(&self, path: &DocumentPath, document: Document) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.docs.lock().unwrap().insert(path.to_string(), document);
            Ok(())
        }
    }

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn signed_in(uid: &str) -> Arc<dyn AuthContext> {
        Arc::new(StaticAuth::signed_in(AuthUser::new(uid)))
    }

    fn build_page(
        store: Arc<MockStore>,
        auth: Arc<dyn AuthContext>,
        config: SettingsServiceConfig,
    ) -> (SettingsPage, CollectingNotifier) {
        let service = Arc::new(SettingsService::new(store, config));
        let notifier = CollectingNotifier::new();
        let page = SettingsPage::new(service, auth, Arc::new(notifier.clone()));
        (page, notifier)
    }

    fn existing_store(uid: &str) -> Arc<MockStore> {
        Arc::new(MockStore::with_doc(
            uid,
            doc(json!({ "theme": "light", "language": "de", "createdAt": "2024-01-01T00:00:00Z" })),
        ))
    }

    // ==================== Load ====================

    #[tokio::test]
    async fn test_load_hydrates_appearance_from_stored_theme() {
        let store = Arc::new(MockStore::with_doc("u1", doc(json!({ "theme": "dark" }))));
        let (page, notifier) = build_page(store, signed_in("u1"), SettingsServiceConfig::default());

        assert!(page.snapshot().loading_settings);
        let outcome = page.load().await;

        assert_eq!(outcome, LoadOutcome::Loaded);
        let snapshot = page.snapshot();
        assert_eq!(snapshot.appearance.theme, Theme::Dark);
        assert_eq!(snapshot.appearance.color_scheme, ColorScheme::Blue);
        assert!(snapshot.settings_exists);
        assert!(!snapshot.loading_settings);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_document_uses_defaults_without_writing() {
        let store = Arc::new(MockStore::default());
        let (page, notifier) =
            build_page(store.clone(), signed_in("u1"), SettingsServiceConfig::default());

        let outcome = page.load().await;

        assert_eq!(outcome, LoadOutcome::Defaulted);
        let snapshot = page.snapshot();
        assert_eq!(snapshot.appearance, AppearanceForm::default());
        assert_eq!(snapshot.notifications, NotificationForm::default());
        assert_eq!(snapshot.site, SiteSettingsForm::default());
        assert_eq!(snapshot.site.date_format, DateFormat::MonthDayYear);
        assert!(!snapshot.settings_exists);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert!(store.doc("u1").is_none());
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_notifies_and_keeps_defaults() {
        let store = Arc::new(MockStore {
            fail_reads: true,
            ..MockStore::default()
        });
        let (page, notifier) = build_page(store, signed_in("u1"), SettingsServiceConfig::default());

        let outcome = page.load().await;

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(notifier.toasts(), vec![Toast::error("Failed to load settings")]);
        let snapshot = page.snapshot();
        assert_eq!(snapshot.appearance, AppearanceForm::default());
        assert!(!snapshot.loading_settings);
    }

    #[tokio::test]
    async fn test_load_without_user_reads_nothing() {
        let store = Arc::new(MockStore::default());
        let (page, notifier) = build_page(
            store.clone(),
            Arc::new(StaticAuth::signed_out()),
            SettingsServiceConfig::default(),
        );

        assert_eq!(page.load().await, LoadOutcome::Skipped);
        assert_eq!(store.calls(), 0);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_load_provisions_missing_document_when_enabled() {
        let store = Arc::new(MockStore::default());
        let (page, _notifier) = build_page(
            store.clone(),
            signed_in("u1"),
            SettingsServiceConfig {
                provision_missing: true,
            },
        );

        assert_eq!(page.load().await, LoadOutcome::Defaulted);

        let stored = store.doc("u1").expect("default document written");
        assert_eq!(stored.get("theme"), Some(&json!("system")));
        assert_eq!(stored.get("timezone"), Some(&json!("UTC")));
        assert!(stored.contains_key("createdAt"));

        // A later save now finds the document.
        assert_eq!(
            page.submit_appearance(AppearanceForm {
                theme: Theme::Dark,
                color_scheme: ColorScheme::Purple,
            })
            .await,
            SubmitOutcome::Saved
        );
    }

    // ==================== Submit ====================

    #[tokio::test]
    async fn test_submit_notifications_writes_only_notification_fields() {
        let store = existing_store("u1");
        let (page, notifier) =
            build_page(store.clone(), signed_in("u1"), SettingsServiceConfig::default());
        page.load().await;

        let form = NotificationForm {
            email_notifications: false,
            marketing_emails: true,
            new_comment_notifications: true,
            mention_notifications: false,
        };
        let outcome = page.submit_notifications(form.clone()).await;

        assert_eq!(outcome, SubmitOutcome::Saved);
        let updates = store.updates();
        assert_eq!(updates.len(), 1);
        let (path, fields) = &updates[0];
        assert_eq!(path, "userSettings/u1");

        let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "emailNotifications",
                "marketingEmails",
                "mentionNotifications",
                "newCommentNotifications",
                "updatedAt",
            ]
        );
        assert_eq!(fields.get("marketingEmails"), Some(&json!(true)));
        assert_eq!(
            notifier.toasts(),
            vec![Toast::success("Notification settings updated")]
        );

        // Untouched fields survive the merge.
        let stored = store.doc("u1").unwrap();
        assert_eq!(stored.get("theme"), Some(&json!("light")));
        assert_eq!(stored.get("language"), Some(&json!("de")));
        assert_eq!(page.snapshot().notifications, form);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_entered_values_and_does_not_error() {
        let store = Arc::new(MockStore {
            fail_writes: true,
            ..MockStore::with_doc("u1", doc(json!({ "language": "en" })))
        });
        let (page, notifier) = build_page(store, signed_in("u1"), SettingsServiceConfig::default());
        page.load().await;

        let entered = SiteSettingsForm {
            language: "es".to_string(),
            timezone: "America/Chicago".to_string(),
            date_format: DateFormat::DayMonthYear,
        };
        let outcome = page.submit_site(entered.clone()).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        let snapshot = page.snapshot();
        assert_eq!(snapshot.site, entered);
        assert_eq!(snapshot.site_state.phase(), FormPhase::Idle);
        assert!(!snapshot.site_state.is_loading());
        assert_eq!(
            notifier.toasts(),
            vec![Toast::error("Failed to update site settings")]
        );
    }

    #[tokio::test]
    async fn test_submit_without_user_makes_no_store_calls() {
        let store = Arc::new(MockStore::default());
        let (page, notifier) = build_page(
            store.clone(),
            Arc::new(StaticAuth::signed_out()),
            SettingsServiceConfig::default(),
        );

        assert_eq!(
            page.submit_appearance(AppearanceForm::default()).await,
            SubmitOutcome::Skipped
        );
        assert_eq!(
            page.submit_notifications(NotificationForm::default()).await,
            SubmitOutcome::Skipped
        );
        assert_eq!(
            page.submit_site(SiteSettingsForm::default()).await,
            SubmitOutcome::Skipped
        );
        assert_eq!(store.calls(), 0);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_submit_against_missing_document_fails() {
        let store = Arc::new(MockStore::default());
        let (page, notifier) =
            build_page(store, signed_in("new-user"), SettingsServiceConfig::default());
        assert_eq!(page.load().await, LoadOutcome::Defaulted);

        let outcome = page
            .submit_appearance(AppearanceForm {
                theme: Theme::Light,
                color_scheme: ColorScheme::Orange,
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(
            notifier.toasts(),
            vec![Toast::error("Failed to update appearance settings")]
        );
        assert_eq!(page.snapshot().appearance.theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_invalid_site_form_fails_before_writing() {
        let store = existing_store("u1");
        let (page, notifier) =
            build_page(store.clone(), signed_in("u1"), SettingsServiceConfig::default());

        let outcome = page
            .submit_site(SiteSettingsForm {
                timezone: "Nowhere/Special".to_string(),
                ..SiteSettingsForm::default()
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(
            notifier.toasts(),
            vec![Toast::error("Failed to update site settings")]
        );
    }

    #[tokio::test]
    async fn test_second_submit_of_same_form_is_busy() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let store = Arc::new(MockStore {
            gate: Some((entered.clone(), release.clone())),
            ..MockStore::with_doc("u1", doc(json!({})))
        });
        let (page, notifier) =
            build_page(store.clone(), signed_in("u1"), SettingsServiceConfig::default());
        let page = Arc::new(page);

        let first = {
            let page = page.clone();
            tokio::spawn(async move { page.submit_appearance(AppearanceForm::default()).await })
        };
        entered.notified().await;

        let snapshot = page.snapshot();
        assert!(snapshot.appearance_state.is_loading());
        assert!(!snapshot.site_state.is_loading());
        assert_eq!(
            page.submit_appearance(AppearanceForm::default()).await,
            SubmitOutcome::Busy
        );

        release.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Saved);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.len(), 1);
        assert_eq!(page.snapshot().appearance_state.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_unmount_suppresses_late_notifications() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let store = Arc::new(MockStore {
            gate: Some((entered.clone(), release.clone())),
            ..MockStore::with_doc("u1", doc(json!({})))
        });
        let (page, notifier) =
            build_page(store.clone(), signed_in("u1"), SettingsServiceConfig::default());
        let page = Arc::new(page);

        let pending = {
            let page = page.clone();
            tokio::spawn(async move {
                page.submit_notifications(NotificationForm::default())
                    .await
            })
        };
        entered.notified().await;
        page.unmount();
        release.notify_one();

        assert_eq!(pending.await.unwrap(), SubmitOutcome::Saved);
        assert!(!page.is_mounted());
        assert!(notifier.is_empty());
        // The write itself still reached the store.
        assert_eq!(store.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_forms_submit_independently() {
        let store = existing_store("u1");
        let (page, notifier) =
            build_page(store.clone(), signed_in("u1"), SettingsServiceConfig::default());
        page.load().await;

        let (a, s) = tokio::join!(
            page.submit_appearance(AppearanceForm {
                theme: Theme::Dark,
                color_scheme: ColorScheme::Green,
            }),
            page.submit_site(SiteSettingsForm {
                language: "fr".to_string(),
                ..SiteSettingsForm::default()
            })
        );

        assert_eq!(a, SubmitOutcome::Saved);
        assert_eq!(s, SubmitOutcome::Saved);
        assert_eq!(notifier.len(), 2);

        let stored = UserSettings::from_document(&store.doc("u1").unwrap());
        assert_eq!(stored.theme, Theme::Dark);
        assert_eq!(stored.color_scheme, ColorScheme::Green);
        assert_eq!(stored.language, "fr");
        assert!(stored.updated_at.is_some());
    }

    // ==================== Service ====================

    #[tokio::test]
    async fn test_service_propagates_store_errors() {
        let store = Arc::new(MockStore {
            fail_reads: true,
            ..MockStore::default()
        });
        let service = SettingsService::new(store, SettingsServiceConfig::default());

        let err = service
            .load_settings(&AuthUser::new("u1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Store(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_service_rejects_invalid_uid() {
        let store = Arc::new(MockStore::default());
        let service = SettingsService::new(store.clone(), SettingsServiceConfig::default());

        let result = service
            .save_form(
                &AuthUser::new("a/b"),
                &FormInput::Appearance(AppearanceForm::default()),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(store.calls(), 0);
    }
}
