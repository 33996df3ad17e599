//! Diaglog Faults - First-chance fault capture with dedup and noise filtering

mod fault;
mod filter;
mod monitor;
mod trace;

pub use fault::Fault;
pub use filter::{FaultFilter, FaultReport};
pub use monitor::{FaultHub, FaultMonitor, FaultObserver, NoticeSink, ObserverId};
pub use trace::{render_trace, rewrite_frames, Frame, OwnerResolver};
