//! Pure projection of a conversation plus search state into renderable
//! units. The rendering surface consumes this as data; nothing here mutates
//! the store.

use std::ops::Range;

use crate::message::{AttachmentKind, Message, MessageId, ReplyRef};
use crate::search::{match_ranges, SearchState};
use crate::store::Conversation;

pub const EMPTY_TITLE: &str = "No messages yet";
pub const EMPTY_SUBTITLE: &str = "Start a conversation by sending a message below";

#[derive(Clone, Debug)]
pub enum ConversationView {
    /// Placeholder state rendered instead of an empty list.
    Empty {
        title: &'static str,
        subtitle: &'static str,
    },
    Messages(Vec<MessageView>),
}

/// One renderable message bubble.
#[derive(Clone, Debug)]
pub struct MessageView {
    pub id: MessageId,
    /// Sent messages align right and carry the delivery marker.
    pub outgoing: bool,
    pub reply: Option<ReplyRef>,
    /// Plain text; for attachments, the file name.
    pub text: String,
    pub attachment: Option<AttachmentView>,
    pub timestamp: String,
    /// Byte ranges into `text` to decorate; every occurrence of the active
    /// query within a matched message.
    pub highlights: Vec<Range<usize>>,
    pub matched: bool,
    /// Exactly one message across the view carries this at a time.
    pub current_match: bool,
}

#[derive(Clone, Debug)]
pub struct AttachmentView {
    pub kind: AttachmentKind,
    pub size_label: String,
    pub is_image: bool,
}

pub fn project(conversation: &Conversation, search: &SearchState) -> ConversationView {
    if conversation.is_empty() {
        return ConversationView::Empty {
            title: EMPTY_TITLE,
            subtitle: EMPTY_SUBTITLE,
        };
    }
    let current = search.current();
    let items = conversation
        .messages()
        .iter()
        .map(|msg| project_message(msg, search, current))
        .collect();
    ConversationView::Messages(items)
}

fn project_message(
    message: &Message,
    search: &SearchState,
    current: Option<MessageId>,
) -> MessageView {
    let text = message.plain_text().to_owned();
    let matched = search.is_active() && search.is_match(message.id);
    let highlights = if matched {
        match_ranges(&text, search.query())
    } else {
        Vec::new()
    };
    let attachment = match &message.body {
        crate::message::MessageBody::Attachment(att) => Some(AttachmentView {
            kind: att.kind,
            size_label: att.size_label(),
            is_image: att.kind == AttachmentKind::Image,
        }),
        crate::message::MessageBody::Text(_) => None,
    };
    MessageView {
        id: message.id,
        outgoing: message.is_sent(),
        reply: message.reply_to.clone(),
        text,
        attachment,
        timestamp: message.timestamp.clone(),
        highlights,
        matched,
        current_match: current == Some(message.id),
    }
}
