//! Per-conversation context-action state: a message is selected via its
//! action affordance, then replied to, copied, or deleted. Every completed
//! or dismissed action returns to `Idle`.

use crate::message::{MessageId, ReplyRef};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ActionState {
    #[default]
    Idle,
    /// The action menu is open for this message.
    Selected(MessageId),
    /// A reply draft is pending attachment to the next sent message.
    Replying(ReplyRef),
}

impl ActionState {
    pub fn select(&mut self, id: MessageId) {
        *self = Self::Selected(id);
    }

    /// Menu dismissed, or a copy/delete action completed.
    pub fn dismiss(&mut self) {
        *self = Self::Idle;
    }

    pub fn selected(&self) -> Option<MessageId> {
        match self {
            Self::Selected(id) => Some(*id),
            _ => None,
        }
    }

    /// Reply action chosen: trades the selection for a draft snapshot.
    /// Only legal from `Selected`.
    pub fn begin_reply(&mut self, snapshot: ReplyRef) {
        if matches!(self, Self::Selected(_)) {
            *self = Self::Replying(snapshot);
        }
    }

    pub fn draft(&self) -> Option<&ReplyRef> {
        match self {
            Self::Replying(draft) => Some(draft),
            _ => None,
        }
    }

    /// Detaches the draft for the message being sent, resetting to `Idle`.
    pub fn take_draft(&mut self) -> Option<ReplyRef> {
        match std::mem::take(self) {
            Self::Replying(draft) => Some(draft),
            other => {
                *self = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ReplyRef {
        ReplyRef {
            sender: "John Doe".to_owned(),
            content: "Hey!".to_owned(),
        }
    }

    #[test]
    fn reply_requires_a_selection() {
        let mut state = ActionState::Idle;
        state.begin_reply(snapshot());
        assert_eq!(state, ActionState::Idle);

        state.select(MessageId(3));
        state.begin_reply(snapshot());
        assert_eq!(state.draft(), Some(&snapshot()));
    }

    #[test]
    fn take_draft_resets_to_idle() {
        let mut state = ActionState::Idle;
        state.select(MessageId(3));
        state.begin_reply(snapshot());
        assert_eq!(state.take_draft(), Some(snapshot()));
        assert_eq!(state, ActionState::Idle);
        assert_eq!(state.take_draft(), None);
    }

    #[test]
    fn take_draft_leaves_a_selection_alone() {
        let mut state = ActionState::Idle;
        state.select(MessageId(7));
        assert_eq!(state.take_draft(), None);
        assert_eq!(state.selected(), Some(MessageId(7)));
    }

    #[test]
    fn dismiss_returns_to_idle() {
        let mut state = ActionState::Idle;
        state.select(MessageId(1));
        state.dismiss();
        assert_eq!(state, ActionState::Idle);
    }
}
