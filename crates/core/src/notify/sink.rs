//! Notifier trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Toast;

/// Receives toasts emitted by core.
///
/// `notify()` must be fast and must not fail; a lost toast never affects the
/// operation it reports on.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Toast::error(message));
    }
}

/// Discards every toast.
#[derive(Clone, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _toast: Toast) {}
}

/// Writes toasts to the log.
#[derive(Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            super::ToastKind::Success => log::info!("{}", toast.message),
            super::ToastKind::Error => log::warn!("{}", toast.message),
        }
    }
}

/// Collects toasts in memory so a host can hand them back to the client.
///
/// Optionally passes every toast on to another notifier as well.
#[derive(Clone, Default)]
pub struct CollectingNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
    forward: Option<Arc<dyn Notifier>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forwarding_to(next: Arc<dyn Notifier>) -> Self {
        Self {
            toasts: Arc::default(),
            forward: Some(next),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns all collected toasts.
    pub fn toasts(&self) -> Vec<Toast> {
        self.guard().clone()
    }

    /// Removes and returns all collected toasts.
    pub fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.guard())
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, toast: Toast) {
        if let Some(next) = &self.forward {
            next.notify(toast.clone());
        }
        self.guard().push(toast);
    }
}
