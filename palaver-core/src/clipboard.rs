/// Clipboard-write capability. The core only ever writes plain text; the
/// TUI supplies the system-backed implementation. Failures surface as a
/// notice, never as a crash.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, thiserror::Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);
