//! The session owns the store and all view-scoped state (active
//! conversation, search, pending action) and exposes the closed set of
//! operations the UI shell dispatches into. All mutation is synchronous;
//! missing entities degrade to a logged no-op.

use crate::action::ActionState;
use crate::clipboard::Clipboard;
use crate::message::{Attachment, Direction, MessageBody, MessageId, ReplyRef};
use crate::profile::{Profile, ProfileKind};
use crate::search::{NavDirection, SearchState};
use crate::store::{Conversation, ConversationStore};
use crate::view::{self, ConversationView};

const DEFAULT_GRADIENT: (&str, &str) = ("#ff6b6b", "#feca57");

/// Transient user notification, consumed by the toast surface.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeKind {
    Info,
    Error,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// Returned from a successful send so the caller can schedule the simulated
/// auto-reply against the conversation that was active at send time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SendReceipt {
    pub conversation: String,
    pub id: MessageId,
}

/// Display fields for synthesizing an ad-hoc profile when opening a
/// conversation the directory does not know.
#[derive(Clone, Debug)]
pub struct ProfileDetails {
    pub avatar_initials: String,
    pub status: String,
    pub gradient: Option<(String, String)>,
}

#[derive(Debug)]
pub struct ChatSession {
    store: ConversationStore,
    active: Option<String>,
    search: SearchState,
    action: ActionState,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_store(ConversationStore::seeded())
    }

    pub fn with_store(store: ConversationStore) -> Self {
        Self {
            store,
            active: None,
            search: SearchState::default(),
            action: ActionState::default(),
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.store.conversation(self.active.as_deref()?)
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn action_state(&self) -> &ActionState {
        &self.action
    }

    /// Switches the active conversation and resets search and reply state.
    /// An unknown name with no display details to synthesize a profile from
    /// leaves the prior view in place.
    pub fn open_conversation(&mut self, name: &str, details: Option<ProfileDetails>) {
        if self.store.conversation(name).is_none() {
            let Some(details) = details else {
                tracing::warn!(name, "cannot open unknown conversation");
                return;
            };
            let online = details.status == "Online";
            let (from, to) = details.gradient.unwrap_or((
                DEFAULT_GRADIENT.0.to_owned(),
                DEFAULT_GRADIENT.1.to_owned(),
            ));
            self.store.insert_conversation(Profile {
                display_name: name.to_owned(),
                avatar_initials: details.avatar_initials,
                gradient: (from, to),
                status: details.status,
                online,
                kind: ProfileKind::Individual {
                    about: None,
                    phone: None,
                },
            });
        }
        self.active = Some(name.to_owned());
        self.search.clear();
        self.action.dismiss();
    }

    /// Back to the welcome screen.
    pub fn close_conversation(&mut self) -> Notice {
        self.active = None;
        self.search.clear();
        self.action.dismiss();
        Notice::info("Chat closed")
    }

    /// Sends the trimmed text as a new message in the active conversation,
    /// attaching any pending reply draft. Blank input is rejected before
    /// any state changes.
    pub fn send_message(&mut self, text: &str) -> Option<SendReceipt> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let name = self.active.clone()?;
        let reply = self.action.take_draft();
        let id = match self.store.append_message(
            &name,
            Direction::Sent,
            MessageBody::Text(text.to_owned()),
            now_label(),
            reply,
        ) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(%err, "send failed");
                return None;
            }
        };
        self.refresh_search();
        Some(SendReceipt {
            conversation: name,
            id,
        })
    }

    /// Delivers an auto-reply to its target conversation, which may no
    /// longer be the active one; the message lands where the send happened.
    pub fn receive_message(&mut self, conversation: &str, text: &str) {
        match self.store.append_message(
            conversation,
            Direction::Received,
            MessageBody::Text(text.to_owned()),
            now_label(),
            None,
        ) {
            Ok(_) if self.active.as_deref() == Some(conversation) => self.refresh_search(),
            Ok(_) => {}
            Err(err) => tracing::warn!(%err, "dropping reply"),
        }
    }

    /// Appends a loaded attachment as a sent message.
    pub fn attach(&mut self, attachment: Attachment) -> Option<Notice> {
        let name = self.active.clone()?;
        let file_name = attachment.file_name.clone();
        match self.store.append_message(
            &name,
            Direction::Sent,
            MessageBody::Attachment(attachment),
            now_label(),
            None,
        ) {
            Ok(_) => {
                self.refresh_search();
                Some(Notice::info(format!("{file_name} sent")))
            }
            Err(err) => {
                tracing::warn!(%err, "attachment dropped");
                None
            }
        }
    }

    pub fn search(&mut self, query: &str) {
        let conversation = self.active.as_deref().and_then(|name| self.store.conversation(name));
        match conversation {
            Some(conv) => self.search.search(query, conv.messages()),
            None => self.search.clear(),
        }
    }

    pub fn navigate(&mut self, direction: NavDirection) {
        self.search.navigate(direction);
    }

    pub fn close_search(&mut self) {
        self.search.clear();
    }

    /// Opens the action menu for a message in the active conversation.
    pub fn select_message(&mut self, id: MessageId) {
        let rendered = self
            .active_conversation()
            .is_some_and(|conv| conv.message(id).is_some());
        if rendered {
            self.action.select(id);
        } else {
            tracing::debug!(%id, "selection targets no rendered message");
        }
    }

    pub fn dismiss_action(&mut self) {
        self.action.dismiss();
    }

    /// Captures a reply snapshot of the selected message. Received messages
    /// are quoted under the conversation's display name, sent ones as "You".
    pub fn reply(&mut self) {
        let Some(id) = self.action.selected() else {
            return;
        };
        let Some(conv) = self.active_conversation() else {
            return;
        };
        let Some(message) = conv.message(id) else {
            tracing::debug!(%id, "selected message vanished before reply");
            self.action.dismiss();
            return;
        };
        let sender = if message.is_sent() {
            "You".to_owned()
        } else {
            conv.profile.display_name.clone()
        };
        self.action.begin_reply(ReplyRef {
            sender,
            content: message.plain_text().to_owned(),
        });
    }

    pub fn cancel_reply(&mut self) {
        if self.action.draft().is_some() {
            self.action.dismiss();
        }
    }

    pub fn reply_draft(&self) -> Option<&ReplyRef> {
        self.action.draft()
    }

    /// Copies the selected message's text. The clipboard failing leaves the
    /// store untouched and surfaces an error notice.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard) -> Option<Notice> {
        let id = self.action.selected()?;
        let text = self
            .active_conversation()
            .and_then(|conv| conv.message(id))
            .map(|msg| msg.plain_text().to_owned())?;
        self.action.dismiss();
        match clipboard.write_text(&text) {
            Ok(()) => Some(Notice::info("Message copied to clipboard")),
            Err(err) => {
                tracing::warn!(%err, "clipboard write failed");
                Some(Notice::error("Couldn't copy message"))
            }
        }
    }

    /// Deletes the selected message from store and view.
    pub fn delete_selected(&mut self) -> Option<Notice> {
        let id = self.action.selected()?;
        let name = self.active.clone()?;
        self.action.dismiss();
        match self.store.delete_message(&name, id) {
            Ok(()) => {
                self.refresh_search();
                Some(Notice::info("Message deleted"))
            }
            Err(err) => {
                tracing::debug!(%err, "delete was a no-op");
                None
            }
        }
    }

    pub fn clear_active(&mut self) -> Option<Notice> {
        let name = self.active.clone()?;
        if let Err(err) = self.store.clear_conversation(&name) {
            tracing::warn!(%err, "clear was a no-op");
            return None;
        }
        self.refresh_search();
        Some(Notice::info("Chat cleared successfully"))
    }

    /// Projects the active conversation for rendering; `None` means the
    /// welcome screen.
    pub fn view(&self) -> Option<ConversationView> {
        self.active_conversation()
            .map(|conv| view::project(conv, &self.search))
    }

    /// Appends and deletes can change the match set while the search bar
    /// stays open.
    fn refresh_search(&mut self) {
        if !self.search.is_active() {
            return;
        }
        let conversation = self.active.as_deref().and_then(|name| self.store.conversation(name));
        match conversation {
            Some(conv) => self.search.refresh(conv.messages()),
            None => self.search.clear(),
        }
    }
}

/// Display timestamp for messages created now, e.g. "2:30 PM".
fn now_label() -> String {
    chrono::Local::now()
        .format("%l:%M %p")
        .to_string()
        .trim_start()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::view::{ConversationView, EMPTY_TITLE};

    struct FakeClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl FakeClipboard {
        fn working() -> Self {
            Self {
                contents: None,
                fail: false,
            }
        }

        fn broken() -> Self {
            Self {
                contents: None,
                fail: true,
            }
        }
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError("no display server".to_owned()));
            }
            self.contents = Some(text.to_owned());
            Ok(())
        }
    }

    fn open(name: &str) -> ChatSession {
        let mut session = ChatSession::new();
        session.open_conversation(name, None);
        session
    }

    #[test]
    fn seeded_coffee_scenario() {
        let mut session = open("John Doe");
        session.search("coffee");
        assert_eq!(session.search_state().matches().len(), 1);
        assert_eq!(session.search_state().count_label().as_deref(), Some("1 of 1"));
        let ConversationView::Messages(items) = session.view().unwrap() else {
            panic!("expected messages");
        };
        assert!(items.iter().any(|item| item.matched && item.current_match));
    }

    #[test]
    fn send_on_empty_conversation_replaces_placeholder() {
        let mut session = open("John Doe");
        session.clear_active().unwrap();
        assert!(matches!(
            session.view().unwrap(),
            ConversationView::Empty { title, .. } if title == EMPTY_TITLE
        ));
        let receipt = session.send_message("hello").unwrap();
        assert_eq!(receipt.conversation, "John Doe");
        let ConversationView::Messages(items) = session.view().unwrap() else {
            panic!("expected messages");
        };
        assert_eq!(items.len(), 1);
        assert!(items[0].outgoing);
        assert_eq!(items[0].text, "hello");
    }

    #[test]
    fn blank_send_is_rejected_before_mutation() {
        let mut session = open("John Doe");
        let before = session.active_conversation().unwrap().messages().len();
        assert!(session.send_message("   ").is_none());
        assert_eq!(session.active_conversation().unwrap().messages().len(), before);
    }

    #[test]
    fn reply_to_message_three_snapshots_sender_and_content() {
        let mut session = open("John Doe");
        session.select_message(MessageId(3));
        session.reply();
        let draft = session.reply_draft().unwrap().clone();
        assert_eq!(draft.sender, "John Doe");
        assert!(draft.content.starts_with("That sounds awesome!"));

        let receipt = session.send_message("ok").unwrap();
        assert_eq!(session.action_state(), &ActionState::Idle);
        let conv = session.active_conversation().unwrap();
        let sent = conv.message(receipt.id).unwrap();
        assert_eq!(sent.reply_to.as_ref(), Some(&draft));
    }

    #[test]
    fn quote_survives_deleting_the_original() {
        let mut session = open("John Doe");
        session.select_message(MessageId(3));
        session.reply();
        let receipt = session.send_message("ok").unwrap();

        session.select_message(MessageId(3));
        let notice = session.delete_selected().unwrap();
        assert_eq!(notice, Notice::info("Message deleted"));

        let conv = session.active_conversation().unwrap();
        assert!(conv.message(MessageId(3)).is_none());
        let quote = conv.message(receipt.id).unwrap().reply_to.as_ref().unwrap();
        assert!(quote.content.starts_with("That sounds awesome!"));
    }

    #[test]
    fn replying_to_own_message_quotes_you() {
        let mut session = open("John Doe");
        session.select_message(MessageId(2));
        session.reply();
        assert_eq!(session.reply_draft().unwrap().sender, "You");
    }

    #[test]
    fn deleting_the_last_message_shows_the_placeholder() {
        let mut session = open("Alex Johnson");
        for id in [12, 13] {
            session.select_message(MessageId(id));
            session.delete_selected().unwrap();
        }
        assert!(matches!(
            session.view().unwrap(),
            ConversationView::Empty { .. }
        ));
    }

    #[test]
    fn switching_conversations_resets_search_and_reply() {
        let mut session = open("John Doe");
        session.search("coffee");
        session.select_message(MessageId(3));
        session.reply();
        session.open_conversation("Sarah Wilson", None);
        assert_eq!(session.search_state().count_label(), None);
        assert!(session.search_state().matches().is_empty());
        assert_eq!(session.action_state(), &ActionState::Idle);
    }

    #[test]
    fn unknown_conversation_without_details_keeps_prior_view() {
        let mut session = open("John Doe");
        session.open_conversation("Nobody", None);
        assert_eq!(session.active_name(), Some("John Doe"));
    }

    #[test]
    fn unknown_conversation_with_details_synthesizes_a_profile() {
        let mut session = ChatSession::new();
        session.open_conversation(
            "Nina Patel",
            Some(ProfileDetails {
                avatar_initials: "NP".to_owned(),
                status: "Online".to_owned(),
                gradient: None,
            }),
        );
        assert_eq!(session.active_name(), Some("Nina Patel"));
        let profile = &session.active_conversation().unwrap().profile;
        assert!(profile.online);
        assert_eq!(profile.gradient.0, DEFAULT_GRADIENT.0);
    }

    #[test]
    fn copy_puts_plain_text_on_the_clipboard() {
        let mut session = open("John Doe");
        session.select_message(MessageId(1));
        let mut clipboard = FakeClipboard::working();
        let notice = session.copy(&mut clipboard).unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(
            clipboard.contents.as_deref(),
            Some("Hey! How are you doing today? 😊")
        );
        assert_eq!(session.action_state(), &ActionState::Idle);
    }

    #[test]
    fn clipboard_failure_surfaces_an_error_notice() {
        let mut session = open("John Doe");
        let before = session.active_conversation().unwrap().messages().len();
        session.select_message(MessageId(1));
        let notice = session.copy(&mut FakeClipboard::broken()).unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(session.active_conversation().unwrap().messages().len(), before);
    }

    #[test]
    fn auto_reply_lands_in_the_originating_conversation() {
        let mut session = open("John Doe");
        let receipt = session.send_message("hello").unwrap();
        // User navigates away before the timer fires.
        session.open_conversation("Sarah Wilson", None);
        session.receive_message(&receipt.conversation, "That's interesting! Tell me more. 🤔");
        let john = session.store().conversation("John Doe").unwrap();
        assert_eq!(
            john.preview(),
            Some("That's interesting! Tell me more. 🤔")
        );
        let sarah = session.store().conversation("Sarah Wilson").unwrap();
        assert_eq!(sarah.preview(), Some("You are the best! 🙌"));
    }

    #[test]
    fn appending_while_searching_refreshes_the_match_set() {
        let mut session = open("John Doe");
        session.search("coffee");
        assert_eq!(session.search_state().matches().len(), 1);
        session.send_message("more coffee please").unwrap();
        assert_eq!(session.search_state().matches().len(), 2);
    }

    #[test]
    fn literal_query_matches_literal_message() {
        let mut session = open("John Doe");
        session.send_message("version a.b*c shipped").unwrap();
        session.search("a.b*c");
        assert_eq!(session.search_state().matches().len(), 1);
        session.search("a b*c");
        assert_eq!(session.search_state().count_label().as_deref(), Some("0 of 0"));
    }
}
