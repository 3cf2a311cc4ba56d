/**
 * NOTIFICATION BUS - Transient success/failure announcements
 *
 * ROLE :
 * Process-wide announcer for fetch outcomes, decoupled from the view that
 * triggered them. Views publish events, sinks (console, tests) render them.
 *
 * BEHAVIOUR :
 * - At most `max_visible` notifications visible (default 3), oldest evicted first
 * - Events flagged `dedupe` are dropped while an identical message+severity is visible
 * - Every notification expires after `auto_dismiss` (default 3000 ms) unless dismissed
 * - Fire-and-forget : sink failures are logged, never returned to the caller
 */

use crate::error::SinkError;
use crate::state::{new_state, Shared};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_MAX_VISIBLE: usize = 3;
pub const DEFAULT_AUTO_DISMISS: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub message: String,
    pub severity: Severity,
    pub dedupe: bool,
}

impl NotificationEvent {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            dedupe: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            dedupe: true,
        }
    }

    pub fn allow_duplicates(mut self) -> Self {
        self.dedupe = false;
        self
    }
}

/// A notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

/// Renders notifications. Errors are logged by the bus and otherwise ignored.
pub trait NotificationSink: Send + Sync {
    fn show(&self, notification: &Notification) -> Result<(), SinkError>;

    fn dismiss(&self, _id: u64) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusSettings {
    pub max_visible: usize,
    pub auto_dismiss: Duration,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            max_visible: DEFAULT_MAX_VISIBLE,
            auto_dismiss: DEFAULT_AUTO_DISMISS,
        }
    }
}

/// Counters since the bus was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    pub received: u64,
    pub shown: u64,
    pub suppressed: u64,
    pub evicted: u64,
    pub expired: u64,
    pub dismissed: u64,
}

struct BusInner {
    settings: BusSettings,
    visible: VecDeque<Notification>,
    next_id: u64,
    sinks: Vec<Arc<dyn NotificationSink>>,
    stats: BusStats,
}

impl BusInner {
    /// Drops expired notifications and returns their ids.
    fn expire(&mut self, now: Instant) -> Vec<u64> {
        let ttl = self.settings.auto_dismiss;
        let mut expired = Vec::new();
        self.visible.retain(|n| {
            let alive = now.saturating_duration_since(n.shown_at) < ttl;
            if !alive {
                expired.push(n.id);
            }
            alive
        });
        self.stats.expired += expired.len() as u64;
        expired
    }
}

#[derive(Clone)]
pub struct NotificationBus {
    inner: Shared<BusInner>,
}

static GLOBAL_BUS: OnceCell<NotificationBus> = OnceCell::new();

impl NotificationBus {
    pub fn new(settings: BusSettings) -> Self {
        let settings = BusSettings {
            max_visible: settings.max_visible.max(1),
            ..settings
        };
        Self {
            inner: new_state(BusInner {
                settings,
                visible: VecDeque::new(),
                next_id: 1,
                sinks: Vec::new(),
                stats: BusStats::default(),
            }),
        }
    }

    /// Installs the process-wide bus. Once installed, later calls return it
    /// unchanged.
    pub fn init_global(settings: BusSettings) -> &'static NotificationBus {
        let mut installed = false;
        let bus = GLOBAL_BUS.get_or_init(|| {
            installed = true;
            NotificationBus::new(settings)
        });
        if !installed {
            warn!("global notification bus already installed, keeping its settings");
        }
        bus
    }

    /// Process-wide bus; installed with default settings if nobody did.
    pub fn global() -> &'static NotificationBus {
        GLOBAL_BUS.get_or_init(NotificationBus::default)
    }

    pub fn settings(&self) -> BusSettings {
        self.inner.lock().settings
    }

    pub fn add_sink(&self, sink: Arc<dyn NotificationSink>) {
        self.inner.lock().sinks.push(sink);
    }

    pub fn notify(&self, event: NotificationEvent) {
        let now = Instant::now();

        let (shown, mut gone, sinks, ttl) = {
            let mut inner = self.inner.lock();
            inner.stats.received += 1;
            let gone = inner.expire(now);

            let duplicate = event.dedupe
                && inner
                    .visible
                    .iter()
                    .any(|n| n.message == event.message && n.severity == event.severity);

            if duplicate {
                inner.stats.suppressed += 1;
                debug!(message = %event.message, "duplicate notification suppressed");
                (None, gone, inner.sinks.clone(), inner.settings.auto_dismiss)
            } else {
                let mut gone = gone;
                while inner.visible.len() >= inner.settings.max_visible {
                    match inner.visible.pop_front() {
                        Some(oldest) => {
                            inner.stats.evicted += 1;
                            gone.push(oldest.id);
                        }
                        None => break,
                    }
                }

                let notification = Notification {
                    id: inner.next_id,
                    message: event.message,
                    severity: event.severity,
                    shown_at: now,
                };
                inner.next_id += 1;
                inner.stats.shown += 1;
                inner.visible.push_back(notification.clone());
                (Some(notification), gone, inner.sinks.clone(), inner.settings.auto_dismiss)
            }
        };

        dispatch_dismissals(&sinks, gone.drain(..));

        if let Some(notification) = shown {
            for sink in &sinks {
                guarded("show", notification.id, || sink.show(&notification));
            }
            self.schedule_expiry(ttl);
        }
    }

    /// Currently visible notifications, oldest first.
    pub fn visible(&self) -> Vec<Notification> {
        self.purge_expired();
        self.inner.lock().visible.iter().cloned().collect()
    }

    /// Manual dismissal. Returns false if `id` is not visible.
    pub fn dismiss(&self, id: u64) -> bool {
        let sinks = {
            let mut inner = self.inner.lock();
            let before = inner.visible.len();
            inner.visible.retain(|n| n.id != id);
            if inner.visible.len() == before {
                return false;
            }
            inner.stats.dismissed += 1;
            inner.sinks.clone()
        };
        dispatch_dismissals(&sinks, std::iter::once(id));
        true
    }

    pub fn clear(&self) {
        let (ids, sinks) = {
            let mut inner = self.inner.lock();
            let ids: Vec<u64> = inner.visible.drain(..).map(|n| n.id).collect();
            inner.stats.dismissed += ids.len() as u64;
            (ids, inner.sinks.clone())
        };
        dispatch_dismissals(&sinks, ids);
    }

    pub fn stats(&self) -> BusStats {
        self.inner.lock().stats
    }

    fn purge_expired(&self) {
        let (expired, sinks) = {
            let mut inner = self.inner.lock();
            let expired = inner.expire(Instant::now());
            (expired, inner.sinks.clone())
        };
        dispatch_dismissals(&sinks, expired);
    }

    /// Expiry is evaluated lazily on every access; inside a tokio runtime a
    /// timer also purges so sinks hear about it without further traffic.
    fn schedule_expiry(&self, ttl: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let bus = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            bus.purge_expired();
        });
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(BusSettings::default())
    }
}

fn dispatch_dismissals(sinks: &[Arc<dyn NotificationSink>], ids: impl IntoIterator<Item = u64>) {
    for id in ids {
        for sink in sinks {
            guarded("dismiss", id, || sink.dismiss(id));
        }
    }
}

/// Runs one sink call; errors and panics are logged, never propagated.
fn guarded(action: &'static str, id: u64, call: impl FnOnce() -> Result<(), SinkError>) {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(id, "failed to {action} notification: {e}"),
        Err(panic) => warn!(
            id,
            "notification sink panicked on {action}: {}",
            panic_message(panic.as_ref())
        ),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
