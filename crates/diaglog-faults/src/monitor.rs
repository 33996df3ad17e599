//! Fault hub and monitor
//!
//! `FaultHub` is the host's add/remove-observer notification mechanism:
//! faults are delivered synchronously on whatever thread raised them.
//! `FaultMonitor` owns the filter and keeps exactly one observer subscribed
//! while enabled; disabling unsubscribes entirely so the monitor costs
//! nothing when off.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use diaglog_core::{RunMode, Severity};
use diaglog_files::LogSink;

use crate::fault::Fault;
use crate::filter::{FaultFilter, FaultReport};

/// Receives every raised fault on the raising thread
pub trait FaultObserver: Send + Sync {
    fn on_fault(&self, fault: &Arc<Fault>);
}

/// Handle for removing a subscribed observer
pub type ObserverId = u64;

/// Fault notification mechanism: observers in, faults out
#[derive(Default)]
pub struct FaultHub {
    observers: Mutex<Vec<(ObserverId, Arc<dyn FaultObserver>)>>,
    next_id: AtomicU64,
}

impl FaultHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn FaultObserver>) -> ObserverId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.observers.lock().push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.observers.lock().retain(|(oid, _)| *oid != id);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Deliver a fault to every observer on the calling thread. Observers are
    /// snapshotted first so one may unsubscribe from inside its callback.
    pub fn raise(&self, fault: Arc<Fault>) {
        let observers: Vec<Arc<dyn FaultObserver>> = self
            .observers
            .lock()
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in observers {
            observer.on_fault(&fault);
        }
    }
}

/// Short transient user-facing surface (chat line, toast). The monitor only
/// uses it in an interactive, content-loaded session.
pub trait NoticeSink: Send + Sync {
    fn transient(&self, message: &str);
}

struct MonitorInner {
    filter: Arc<FaultFilter>,
    sink: Arc<LogSink>,
    notice: Option<Arc<dyn NoticeSink>>,
    content_loaded: AtomicBool,
    /// Emission failures are logged once, then dropped; an error escaping
    /// here could re-enter the very stream being observed
    emit_failure_logged: AtomicBool,
}

impl MonitorInner {
    fn emit(&self, report: FaultReport) {
        if self.sink.mode() == RunMode::Interactive && self.content_loaded.load(Ordering::SeqCst) {
            if let Some(notice) = &self.notice {
                notice.transient(&format!(
                    "{} (see {} for the full trace)",
                    report.message,
                    self.sink.file_name()
                ));
            }
        }

        self.sink.console_line(
            Severity::Warn,
            &format!("{}: {}", report.type_name, report.message),
        );

        let entry = format!("Silently caught exception\n{}", report.trace);
        if let Err(e) = self.sink.file_line("faults", Severity::Warn, &entry) {
            if !self.emit_failure_logged.swap(true, Ordering::SeqCst) {
                warn!("Could not write fault report: {}", e);
            }
        }
    }
}

impl FaultObserver for MonitorInner {
    fn on_fault(&self, fault: &Arc<Fault>) {
        if let Some(report) = self.filter.observe(fault) {
            self.emit(report);
        }
    }
}

/// Subscribes the fault filter to the hub and emits surviving reports
pub struct FaultMonitor {
    hub: Arc<FaultHub>,
    inner: Arc<MonitorInner>,
    subscription: Mutex<Option<ObserverId>>,
}

impl FaultMonitor {
    /// Create a monitor; call `set_enabled(true)` to start observing
    pub fn new(
        hub: Arc<FaultHub>,
        filter: Arc<FaultFilter>,
        sink: Arc<LogSink>,
        notice: Option<Arc<dyn NoticeSink>>,
    ) -> Self {
        Self {
            hub,
            inner: Arc::new(MonitorInner {
                filter,
                sink,
                notice,
                content_loaded: AtomicBool::new(false),
                emit_failure_logged: AtomicBool::new(false),
            }),
            subscription: Mutex::new(None),
        }
    }

    /// Subscribe or fully unsubscribe from the hub
    pub fn set_enabled(&self, enabled: bool) {
        let mut subscription = self.subscription.lock();
        if enabled {
            if subscription.is_none() {
                let observer: Arc<dyn FaultObserver> = Arc::clone(&self.inner) as _;
                *subscription = Some(self.hub.subscribe(observer));
            }
        } else if let Some(id) = subscription.take() {
            self.hub.unsubscribe(id);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Tell the monitor whether the interactive session has content loaded;
    /// transient notices are held back until it does
    pub fn set_content_loaded(&self, loaded: bool) {
        self.inner.content_loaded.store(loaded, Ordering::SeqCst);
    }

    /// The filter, for ignore-rule and seen-set management
    pub fn filter(&self) -> &Arc<FaultFilter> {
        &self.inner.filter
    }
}
