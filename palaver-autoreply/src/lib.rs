//! Simulated chat counterpart: after each sent message, a canned reply is
//! delivered to the originating conversation after a randomized delay.
//! Replies are scheduled as tokio tasks keyed by conversation name, so they
//! can be cancelled and so tests can drive them under paused time.

use std::collections::HashMap;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

const REPLIES: &[&str] = &[
    "That's interesting! Tell me more. 🤔",
    "I completely agree with you! 👍",
    "Thanks for sharing that with me. 😊",
    "That sounds like a great idea! 💡",
    "I'll definitely consider that. 🤝",
    "Awesome! Let's do it! 🚀",
    "Haha, that's funny! 😂",
    "Sure thing! No problem. ✅",
    "Interesting perspective! 🧠",
    "I love that idea! ❤️",
    "You're absolutely right! 💯",
    "That makes perfect sense. 🎯",
];

const MIN_DELAY_MS: u64 = 1000;
const MAX_DELAY_MS: u64 = 3000;

/// A reply that is due. Addressed to the conversation that was active at
/// send time, which is not necessarily the one on screen when it arrives.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AutoReply {
    pub conversation: String,
    pub text: String,
}

#[derive(Debug)]
pub struct ReplyScheduler {
    events: mpsc::UnboundedSender<AutoReply>,
    tasks: HashMap<String, Vec<JoinHandle<()>>>,
}

impl ReplyScheduler {
    pub fn new(events: mpsc::UnboundedSender<AutoReply>) -> Self {
        Self {
            events,
            tasks: HashMap::new(),
        }
    }

    /// Schedules one reply for `conversation` after a random 1–3 s delay.
    /// Multiple sends stack: each schedules its own reply.
    pub fn schedule(&mut self, conversation: &str) {
        let mut rng = rand::thread_rng();
        let delay = Duration::from_millis(rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS));
        let text = REPLIES[rng.gen_range(0..REPLIES.len())].to_string();
        let events = self.events.clone();
        let target = conversation.to_owned();
        tracing::debug!(conversation, ?delay, "reply scheduled");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if events.send(AutoReply { conversation: target, text }).is_err() {
                tracing::debug!("reply receiver dropped");
            }
        });
        self.reap();
        self.tasks.entry(conversation.to_owned()).or_default().push(handle);
    }

    /// Whether a reply is still due for this conversation; drives the
    /// typing indicator.
    pub fn pending(&self, conversation: &str) -> bool {
        self.tasks
            .get(conversation)
            .is_some_and(|handles| handles.iter().any(|handle| !handle.is_finished()))
    }

    /// Aborts every reply still due for this conversation.
    pub fn cancel(&mut self, conversation: &str) {
        if let Some(handles) = self.tasks.remove(conversation) {
            for handle in handles {
                handle.abort();
            }
        }
    }

    fn reap(&mut self) {
        self.tasks.retain(|_, handles| {
            handles.retain(|handle| !handle.is_finished());
            !handles.is_empty()
        });
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        for handles in self.tasks.values() {
            for handle in handles {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reply_targets_the_originating_conversation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(tx);
        scheduler.schedule("John Doe");
        assert!(scheduler.pending("John Doe"));
        assert!(!scheduler.pending("Sarah Wilson"));

        // The user switches away; the timer still fires against the
        // original target.
        tokio::time::advance(Duration::from_millis(MAX_DELAY_MS)).await;
        let reply = rx.recv().await.unwrap();
        assert_eq!(reply.conversation, "John Doe");
        assert!(REPLIES.contains(&reply.text.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn each_send_schedules_its_own_reply() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(tx);
        scheduler.schedule("John Doe");
        scheduler.schedule("John Doe");
        scheduler.schedule("Lisa Park");

        tokio::time::advance(Duration::from_millis(MAX_DELAY_MS)).await;
        let mut conversations = vec![
            rx.recv().await.unwrap().conversation,
            rx.recv().await.unwrap().conversation,
            rx.recv().await.unwrap().conversation,
        ];
        conversations.sort();
        assert_eq!(conversations, ["John Doe", "John Doe", "Lisa Park"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_pending_replies() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(tx);
        scheduler.schedule("John Doe");
        scheduler.cancel("John Doe");
        assert!(!scheduler.pending("John Doe"));

        tokio::time::advance(Duration::from_millis(MAX_DELAY_MS)).await;
        // Yield so an erroneously surviving task would get to run.
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn pending_clears_after_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(tx);
        scheduler.schedule("John Doe");
        tokio::time::advance(Duration::from_millis(MAX_DELAY_MS)).await;
        rx.recv().await.unwrap();
        tokio::task::yield_now().await;
        assert!(!scheduler.pending("John Doe"));
    }
}
