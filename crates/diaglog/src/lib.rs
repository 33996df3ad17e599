//! Diaglog - diagnostic logging for a long-running moddable host
//!
//! One `Logging::init` call per process: rotate the previous run's log files
//! into dated zip archives, open the active log, write the session banner,
//! and wire up first-chance fault capture with dedup and noise filtering.
//!
//! ```no_run
//! use std::sync::Arc;
//! use diaglog::{LogConfig, Logging, OwnerResolver};
//!
//! struct ModRegistry;
//! impl OwnerResolver for ModRegistry {
//!     fn resolve(&self, _module: &str) -> Option<String> { None }
//! }
//!
//! let config = LogConfig::default();
//! let logging = Logging::init("client", &config, Arc::new(ModRegistry), None).unwrap();
//! logging.sink().log("startup", diaglog::Severity::Info, "content loaded");
//! ```

pub mod session;
pub mod status;

use std::path::Path;
use std::sync::Arc;

pub use diaglog_core::{Error, LogConfig, Result, RunMode, Severity};
pub use diaglog_files::{ArchiveStore, LogSink, RotationManager};
pub use diaglog_faults::{
    render_trace, rewrite_frames, Fault, FaultFilter, FaultHub, FaultMonitor, FaultObserver,
    FaultReport, Frame, NoticeSink, ObserverId, OwnerResolver,
};

pub use status::StatusTracker;

/// Handle to the initialized logging subsystem
pub struct Logging {
    sink: Arc<LogSink>,
    hub: Arc<FaultHub>,
    monitor: FaultMonitor,
}

impl Logging {
    /// Initialize logging for this process.
    ///
    /// Rotation runs first: previous logs are archived (or sidestepped when a
    /// previous instance still holds one open), old archives pruned, and the
    /// active file opened. The fault monitor starts subscribed only when
    /// `config.first_chance` is set.
    pub fn init(
        role: &str,
        config: &LogConfig,
        resolver: Arc<dyn OwnerResolver>,
        notice: Option<Arc<dyn NoticeSink>>,
    ) -> Result<Self> {
        let dir = config.log_dir();

        let rotation = RotationManager::new(&dir, config.max_archives);
        let path = rotation.select_active_log_file(role)?;

        let sink = Arc::new(LogSink::open(path, config.mode)?);
        session::log_session_start(&sink, role, config.mode);

        let filter = Arc::new(FaultFilter::with_rules(
            resolver,
            config.ignore_sources.clone(),
            config.ignore_contents.clone(),
        ));
        let hub = Arc::new(FaultHub::new());
        let monitor = FaultMonitor::new(Arc::clone(&hub), filter, Arc::clone(&sink), notice);
        monitor.set_enabled(config.first_chance);

        Ok(Self { sink, hub, monitor })
    }

    pub fn sink(&self) -> &Arc<LogSink> {
        &self.sink
    }

    /// The fault notification mechanism; the host raises faults here
    pub fn hub(&self) -> &Arc<FaultHub> {
        &self.hub
    }

    pub fn monitor(&self) -> &FaultMonitor {
        &self.monitor
    }

    /// Path of the active log file
    pub fn log_path(&self) -> &Path {
        self.sink.path()
    }

    /// Status tracker writing through this session's sink
    pub fn status_tracker(&self) -> StatusTracker {
        StatusTracker::new(Arc::clone(&self.sink))
    }
}
