// Notification surface: transient toasts with a fixed show/fade timeline.
// Each toast is independent; nothing is merged, queued or deduplicated.

use crate::config::Timings;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => f.write_str("success"),
            NotificationKind::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub shown: bool,
}

impl Toast {
    pub fn render(&self) -> String {
        let class = if self.shown {
            format!("toast {} show", self.kind)
        } else {
            format!("toast {}", self.kind)
        };
        format!(
            r#"<div class="{}"><svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M22 11.08V12a10 10 0 1 1-5.93-9.14"></path><polyline points="22 4 12 14.01 9 11.01"></polyline></svg><span>{}</span></div>"#,
            class, self.message
        )
    }
}

#[derive(Debug, Default)]
struct Surface {
    active: Mutex<Vec<Toast>>,
    history: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
}

impl Surface {
    fn set_shown(&self, id: u64, shown: bool) {
        if let Some(toast) = self.active.lock().iter_mut().find(|t| t.id == id) {
            toast.shown = shown;
        }
    }

    fn remove(&self, id: u64) {
        self.active.lock().retain(|t| t.id != id);
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    surface: Arc<Surface>,
    timings: Timings,
}

impl Notifier {
    pub fn new(timings: Timings) -> Self {
        Self {
            surface: Arc::new(Surface::default()),
            timings,
        }
    }

    // Insert a toast and drive it through shown -> hidden -> removed on timers.
    // Without a tokio runtime the toast is inserted but stays until `dismiss`.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let message = message.into();
        let id = self.surface.next_id.fetch_add(1, Ordering::SeqCst);
        info!(id, %kind, message = %message, "notification");

        self.surface.history.lock().push(Notification {
            message: message.clone(),
            kind,
        });
        self.surface.active.lock().push(Toast {
            id,
            message,
            kind,
            shown: false,
        });

        match Handle::try_current() {
            Ok(handle) => {
                let surface = Arc::clone(&self.surface);
                let show_delay = self.timings.toast_show_delay;
                let visible_for = self.timings.toast_visible.saturating_sub(show_delay);
                let fade = self.timings.toast_fade;
                handle.spawn(async move {
                    sleep(show_delay).await;
                    surface.set_shown(id, true);
                    sleep(visible_for).await;
                    surface.set_shown(id, false);
                    sleep(fade).await;
                    surface.remove(id);
                    debug!(id, "toast removed");
                });
            }
            Err(_) => warn!(id, "no timer runtime, toast will not auto-dismiss"),
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Error)
    }

    pub fn dismiss(&self, id: u64) {
        self.surface.remove(id);
    }

    // Toasts currently on screen, oldest first
    pub fn active(&self) -> Vec<Toast> {
        self.surface.active.lock().clone()
    }

    // Every notification ever emitted on this surface
    pub fn history(&self) -> Vec<Notification> {
        self.surface.history.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.surface.history.lock().last().cloned()
    }

    pub fn render(&self) -> String {
        self.surface.active.lock().iter().map(Toast::render).collect()
    }
}
