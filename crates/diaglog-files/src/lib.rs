//! Diaglog Files - Log rotation, archiving, and line sinks

mod archive;
mod rotation;
mod sink;

pub use archive::ArchiveStore;
pub use rotation::RotationManager;
pub use sink::LogSink;
