use crate::message::{Direction, Message, MessageBody, MessageId, ReplyRef};
use crate::profile::Profile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no conversation named {0:?}")]
    UnknownConversation(String),
    #[error("no message {id} in conversation {conversation:?}")]
    UnknownMessage {
        conversation: String,
        id: MessageId,
    },
}

/// A named message thread. The name is the profile's display name and is
/// the conversation's unique key within the store.
#[derive(Clone, Debug)]
pub struct Conversation {
    pub profile: Profile,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn name(&self) -> &str {
        &self.profile.display_name
    }

    /// Messages in display order, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|msg| msg.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Last-message text for the sidebar preview.
    pub fn preview(&self) -> Option<&str> {
        self.messages.last().map(Message::plain_text)
    }
}

/// Directory of conversations plus the shared id counter. Owns every piece
/// of chat state; constructed once and handed to the session by value.
/// Conversations are never removed, only emptied.
#[derive(Clone, Debug)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    next_id: u64,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: Vec::new(),
            next_id: 1,
        }
    }

    /// The stock directory: eight conversations with message history.
    pub fn seeded() -> Self {
        crate::seed::store()
    }

    /// Conversations in directory order (seed order, then insertion order).
    pub fn conversations(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.iter()
    }

    pub fn conversation(&self, name: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|conv| conv.name() == name)
    }

    fn conversation_mut(&mut self, name: &str) -> Result<&mut Conversation, StoreError> {
        self.conversations
            .iter_mut()
            .find(|conv| conv.name() == name)
            .ok_or_else(|| StoreError::UnknownConversation(name.to_owned()))
    }

    /// Adds an empty conversation for the given profile. Existing entries
    /// win: re-inserting a known name is a no-op.
    pub fn insert_conversation(&mut self, profile: Profile) {
        if self.conversation(&profile.display_name).is_some() {
            tracing::debug!(name = %profile.display_name, "conversation already present");
            return;
        }
        self.conversations.push(Conversation {
            profile,
            messages: Vec::new(),
        });
    }

    /// Appends a message, assigning the next id from the shared counter.
    /// Append-only: display order is insertion order.
    pub fn append_message(
        &mut self,
        name: &str,
        direction: Direction,
        body: MessageBody,
        timestamp: String,
        reply_to: Option<ReplyRef>,
    ) -> Result<MessageId, StoreError> {
        // Reserve the id only after the lookup so failed appends leave no
        // gaps in the counter.
        if self.conversation(name).is_none() {
            return Err(StoreError::UnknownConversation(name.to_owned()));
        }
        let id = MessageId(self.next_id);
        self.next_id += 1;
        let conversation = self.conversation_mut(name)?;
        conversation.messages.push(Message {
            id,
            direction,
            body,
            timestamp,
            reply_to,
        });
        Ok(id)
    }

    /// Removes one message. Quoting messages keep their captured snapshot.
    pub fn delete_message(&mut self, name: &str, id: MessageId) -> Result<(), StoreError> {
        let conversation = self.conversation_mut(name)?;
        let index = conversation
            .messages
            .iter()
            .position(|msg| msg.id == id)
            .ok_or(StoreError::UnknownMessage {
                conversation: name.to_owned(),
                id,
            })?;
        conversation.messages.remove(index);
        Ok(())
    }

    /// Empties the message list; the conversation entry and profile remain.
    pub fn clear_conversation(&mut self, name: &str) -> Result<(), StoreError> {
        self.conversation_mut(name)?.messages.clear();
        Ok(())
    }

    /// Sidebar filter: conversations whose name or last-message preview
    /// contains the term, case-insensitively, in directory order.
    pub fn filter(&self, term: &str) -> Vec<&Conversation> {
        let term = term.to_lowercase();
        self.conversations
            .iter()
            .filter(|conv| {
                conv.name().to_lowercase().contains(&term)
                    || conv
                        .preview()
                        .is_some_and(|text| text.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub(crate) fn set_next_id(&mut self, next_id: u64) {
        self.next_id = next_id;
    }

    pub(crate) fn push_seeded(&mut self, profile: Profile, messages: Vec<Message>) {
        self.conversations.push(Conversation { profile, messages });
    }
}
