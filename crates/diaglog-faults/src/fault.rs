//! Fault model
//!
//! A fault is a first-chance error observed before any handler has caught it.
//! The host raises faults as `Arc<Fault>`; the notification mechanism may
//! redeliver the same allocation several times in a row, which the filter
//! detects with pointer identity.

use crate::trace::Frame;

/// A first-chance fault delivered by the host
#[derive(Debug, Clone)]
pub struct Fault {
    /// Runtime type name of the underlying error
    pub type_name: String,
    pub message: String,
    /// Originating module, matched against the ignored-source rules
    pub source: Option<String>,
    pub frames: Vec<Frame>,
    /// Cooperative cancellation signals are never worth reporting
    pub cancellation: bool,
}

impl Fault {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            source: None,
            frames: Vec::new(),
            cancellation: false,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }

    pub fn cancellation(mut self) -> Self {
        self.cancellation = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_builder() {
        let fault = Fault::new("IoError", "disk full")
            .with_source("storage")
            .with_frames(vec![Frame::new("write")]);

        assert_eq!(fault.type_name, "IoError");
        assert_eq!(fault.source.as_deref(), Some("storage"));
        assert_eq!(fault.frames.len(), 1);
        assert!(!fault.cancellation);
        assert!(Fault::new("Cancelled", "").cancellation().cancellation);
    }
}
