use std::fmt;

/// Process-wide message identifier. Assigned by the store from a single
/// counter shared across all conversations, so ids are globally unique.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Sent,
    Received,
}

/// Snapshot of a quoted message, captured when the reply is drafted.
/// Deliberately not a live reference: deleting the original later leaves
/// the quote intact.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplyRef {
    pub sender: String,
    pub content: String,
}

#[derive(Clone, Debug)]
pub enum MessageBody {
    Text(String),
    Attachment(Attachment),
}

impl MessageBody {
    /// The matchable, copyable text of the body. Search and clipboard both
    /// operate on this, never on any rendered markup.
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Attachment(attachment) => &attachment.file_name,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Message {
    pub id: MessageId,
    pub direction: Direction,
    pub body: MessageBody,
    /// Pre-formatted display timestamp ("2:30 PM", "Yesterday"). Display
    /// order is insertion order, not timestamp order.
    pub timestamp: String,
    pub reply_to: Option<ReplyRef>,
}

impl Message {
    pub fn plain_text(&self) -> &str {
        self.body.plain_text()
    }

    pub fn is_sent(&self) -> bool {
        self.direction == Direction::Sent
    }
}

/// A locally selected file rendered as a message. The file has already been
/// read by the time this exists; the core never touches the filesystem.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub file_name: String,
    pub size_bytes: u64,
    pub kind: AttachmentKind,
    /// Raw bytes, loaded for image previews only.
    pub data: Option<Vec<u8>>,
}

impl Attachment {
    pub fn size_label(&self) -> String {
        format_size(self.size_bytes)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    Pdf,
    Word,
    Spreadsheet,
    Presentation,
    Archive,
    Other,
}

impl AttachmentKind {
    /// Classifies by file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg" => Self::Image,
            "mp4" | "mkv" | "avi" | "mov" | "webm" => Self::Video,
            "mp3" | "wav" | "ogg" | "flac" | "m4a" => Self::Audio,
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Word,
            "xls" | "xlsx" | "csv" | "ods" => Self::Spreadsheet,
            "ppt" | "pptx" | "odp" => Self::Presentation,
            "zip" | "rar" | "7z" | "tar" | "gz" => Self::Archive,
            _ => Self::Other,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Image => "🖼",
            Self::Video => "🎞",
            Self::Audio => "🎵",
            Self::Pdf => "📕",
            Self::Word => "📝",
            Self::Spreadsheet => "📊",
            Self::Presentation => "📽",
            Self::Archive => "🗜",
            Self::Other => "📄",
        }
    }
}

/// Human-readable file size: 1024-based units, two decimals with trailing
/// zeros trimmed ("1.5 KB", "2 MB", "0 Bytes").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }
    let exp = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let scaled = bytes as f64 / f64::from(1u32 << (10 * exp));
    let mut figure = format!("{scaled:.2}");
    while figure.ends_with('0') {
        figure.pop();
    }
    if figure.ends_with('.') {
        figure.pop();
    }
    format!("{figure} {}", UNITS[exp as usize])
}
