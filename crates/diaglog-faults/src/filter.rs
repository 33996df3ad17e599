//! Fault filtering and deduplication
//!
//! A busy host can raise thousands of near-identical faults per second. The
//! filter collapses them to one report per distinct fault: ignore rules run
//! first, then the rewritten trace is fingerprinted and checked against the
//! grow-only seen set. All shared state sits behind one mutex; faults arrive
//! on whatever thread raised them.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::fault::Fault;
use crate::trace::{render_trace, rewrite_frames, OwnerResolver};

/// A fault that survived filtering, ready to be emitted exactly once
#[derive(Debug, Clone)]
pub struct FaultReport {
    pub type_name: String,
    pub message: String,
    /// Full rewritten trace, including the `Type: message` header line
    pub trace: String,
}

struct FilterState {
    seen: HashSet<String>,
    previous: Option<Arc<Fault>>,
    ignore_sources: HashSet<String>,
    ignore_contents: Vec<String>,
}

/// Filters the host's fault stream down to first occurrences
pub struct FaultFilter {
    resolver: Arc<dyn OwnerResolver>,
    state: Mutex<FilterState>,
}

impl FaultFilter {
    pub fn new(resolver: Arc<dyn OwnerResolver>) -> Self {
        Self::with_rules(resolver, Vec::new(), Vec::new())
    }

    /// Construct with seed ignore rules, typically from config
    pub fn with_rules(
        resolver: Arc<dyn OwnerResolver>,
        ignore_sources: Vec<String>,
        ignore_contents: Vec<String>,
    ) -> Self {
        Self {
            resolver,
            state: Mutex::new(FilterState {
                seen: HashSet::new(),
                previous: None,
                ignore_sources: ignore_sources.into_iter().collect(),
                ignore_contents,
            }),
        }
    }

    /// Never report faults originating from this module
    pub fn add_ignored_source(&self, name: impl Into<String>) {
        self.state.lock().ignore_sources.insert(name.into());
    }

    /// Never report faults whose rendered trace contains this substring
    pub fn add_ignored_content(&self, substring: impl Into<String>) {
        let substring = substring.into();
        let mut state = self.state.lock();
        if !state.ignore_contents.contains(&substring) {
            state.ignore_contents.push(substring);
        }
    }

    /// Forget every fingerprint, e.g. before a controlled re-run.
    /// Ignore rules are unaffected.
    pub fn reset_seen(&self) {
        self.state.lock().seen.clear();
    }

    /// Run the filtering pipeline. Returns a report for the first occurrence
    /// of a distinct fault, `None` for everything suppressed.
    pub fn observe(&self, fault: &Arc<Fault>) -> Option<FaultReport> {
        let mut state = self.state.lock();

        // redelivery of the very same allocation
        if state
            .previous
            .as_ref()
            .is_some_and(|prev| Arc::ptr_eq(prev, fault))
        {
            return None;
        }

        if fault.cancellation {
            return None;
        }

        if fault
            .source
            .as_deref()
            .is_some_and(|s| state.ignore_sources.contains(s))
        {
            return None;
        }

        let mut frames = fault.frames.clone();
        rewrite_frames(&mut frames, self.resolver.as_ref());
        let trace = render_trace(&fault.type_name, &fault.message, &frames);

        if state.ignore_contents.iter().any(|c| trace.contains(c.as_str())) {
            return None;
        }

        // fingerprint on the trace minus its header line
        let body = trace.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        let fingerprint = format!("{}: {}\n{}", fault.type_name, fault.message, body);
        if !state.seen.insert(fingerprint) {
            return None;
        }

        state.previous = Some(Arc::clone(fault));

        Some(FaultReport {
            type_name: fault.type_name.clone(),
            message: fault.message.clone(),
            trace,
        })
    }
}
