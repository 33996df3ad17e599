//! Stack trace rewriting
//!
//! Traces captured on a build machine carry absolute paths nobody reading a
//! log can use. When a frame's module resolves to a known owner (a mod name,
//! or the host's own label), the path is truncated to start at the owner
//! name, turning `/build/agent/work/ModX/Src/Foo.cs` into `ModX/Src/Foo.cs`.
//! This is cosmetic only and never fails the caller.

/// One call-stack frame. Only `path` is ever rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    /// Code module that owns the frame, fed to the resolver
    pub module: Option<String>,
    pub path: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            module: None,
            path: None,
            line: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// Maps a code module to the human-readable name of whatever owns it.
/// Display-only; a `None` leaves the frame untouched.
pub trait OwnerResolver: Send + Sync {
    fn resolve(&self, module: &str) -> Option<String>;
}

/// Rewrite frame paths in place so they start at the owning component's name
pub fn rewrite_frames(frames: &mut [Frame], resolver: &dyn OwnerResolver) {
    for frame in frames.iter_mut() {
        let rewritten = match (&frame.path, &frame.module) {
            (Some(path), Some(module)) => resolver
                .resolve(module)
                .and_then(|owner| truncate_at_owner(path, &owner)),
            _ => None,
        };
        if rewritten.is_some() {
            frame.path = rewritten;
        }
    }
}

/// Truncate `path` at the last case-insensitive occurrence of `owner`,
/// but only when that occurrence is past the start of the string
fn truncate_at_owner(path: &str, owner: &str) -> Option<String> {
    if owner.is_empty() {
        return None;
    }
    // ASCII lowering maps bytes one to one, so the index is valid in `path`
    let idx = path
        .to_ascii_lowercase()
        .rfind(&owner.to_ascii_lowercase())?;
    if idx == 0 {
        return None;
    }
    Some(path[idx..].to_string())
}

/// Render a full trace: a `Type: message` header followed by one line per frame
pub fn render_trace(type_name: &str, message: &str, frames: &[Frame]) -> String {
    let mut out = format!("{}: {}", type_name, message);
    for frame in frames {
        out.push_str("\n   at ");
        out.push_str(&frame.function);
        if let Some(path) = &frame.path {
            out.push_str(" in ");
            out.push_str(path);
            if let Some(line) = frame.line {
                out.push_str(&format!(":{}", line));
            }
        }
    }
    out
}
