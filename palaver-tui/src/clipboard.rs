use palaver_core::{Clipboard, ClipboardError};

/// System clipboard. Constructed per write: keeping an `arboard` handle
/// alive holds the X11 selection connection open for the whole session.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(text.to_owned()))
            .map_err(|err| ClipboardError(err.to_string()))
    }
}
