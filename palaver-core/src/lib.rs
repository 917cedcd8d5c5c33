pub mod action;
pub mod clipboard;
pub mod message;
pub mod profile;
pub mod search;
mod seed;
pub mod session;
pub mod store;
pub mod view;

pub use action::ActionState;
pub use clipboard::{Clipboard, ClipboardError};
pub use message::{
    Attachment, AttachmentKind, Direction, Message, MessageBody, MessageId, ReplyRef,
};
pub use profile::{GroupMember, Profile, ProfileKind};
pub use search::{NavDirection, SearchState};
pub use session::{ChatSession, Notice, NoticeKind, ProfileDetails, SendReceipt};
pub use store::{Conversation, ConversationStore, StoreError};
pub use view::{ConversationView, MessageView};
