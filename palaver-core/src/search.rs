//! Incremental message search: literal case-insensitive substring matching
//! with cursor navigation. Decorations are produced as byte ranges into the
//! matched text, so the renderer never splices markup and the query needs no
//! escaping.

use std::ops::Range;

use crate::message::{Message, MessageId};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavDirection {
    Next,
    Prev,
}

/// Ephemeral match set for the currently rendered message list. Rebuilt on
/// every query change; never persisted.
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    query: String,
    matches: Vec<MessageId>,
    cursor: Option<usize>,
}

impl SearchState {
    /// Rebuilds the match set for `query` against the messages in display
    /// order. A whitespace-only query clears the results (the query text is
    /// kept for the count label).
    pub fn search<'a>(&mut self, query: &str, messages: impl IntoIterator<Item = &'a Message>) {
        self.query = query.to_owned();
        self.matches.clear();
        if query.trim().is_empty() {
            self.cursor = None;
            return;
        }
        self.matches.extend(
            messages
                .into_iter()
                .filter(|msg| !match_ranges(msg.plain_text(), query).is_empty())
                .map(|msg| msg.id),
        );
        self.cursor = if self.matches.is_empty() { None } else { Some(0) };
    }

    /// Re-runs the current query, e.g. after a message was appended or
    /// deleted while the search bar is open.
    pub fn refresh<'a>(&mut self, messages: impl IntoIterator<Item = &'a Message>) {
        let query = std::mem::take(&mut self.query);
        self.search(&query, messages);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.cursor = None;
    }

    /// Moves the cursor with wraparound; no-op while the match set is empty.
    pub fn navigate(&mut self, direction: NavDirection) {
        if self.matches.is_empty() {
            return;
        }
        let len = self.matches.len();
        let cursor = self.cursor.unwrap_or(0);
        self.cursor = Some(match direction {
            NavDirection::Next => (cursor + 1) % len,
            NavDirection::Prev => cursor.checked_sub(1).unwrap_or(len - 1),
        });
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn matches(&self) -> &[MessageId] {
        &self.matches
    }

    pub fn is_match(&self, id: MessageId) -> bool {
        self.matches.contains(&id)
    }

    /// The message carrying the "current" decoration.
    pub fn current(&self) -> Option<MessageId> {
        self.cursor.map(|idx| self.matches[idx])
    }

    /// "3 of 7" while there are matches, "0 of 0" for a non-empty query
    /// without matches, nothing for an empty query.
    pub fn count_label(&self) -> Option<String> {
        match self.cursor {
            Some(idx) => Some(format!("{} of {}", idx + 1, self.matches.len())),
            None if self.is_active() => Some("0 of 0".to_owned()),
            None => None,
        }
    }
}

/// All non-overlapping occurrences of `query` in `text` as byte ranges,
/// compared case-insensitively, character by character. The query is plain
/// text, not a pattern: every character matches literally.
pub fn match_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle: Vec<char> = query.chars().collect();
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < text.len() {
        if let Some(len) = match_at(&text[start..], &needle) {
            ranges.push(start..start + len);
            start += len;
        } else {
            start += text[start..].chars().next().map_or(1, char::len_utf8);
        }
    }
    ranges
}

/// Byte length of a case-insensitive match of `needle` at the start of
/// `text`, if any.
fn match_at(text: &str, needle: &[char]) -> Option<usize> {
    let mut len = 0;
    let mut chars = text.chars();
    for &wanted in needle {
        let found = chars.next()?;
        if !found.to_lowercase().eq(wanted.to_lowercase()) {
            return None;
        }
        len += found.len_utf8();
    }
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Direction, MessageBody};

    fn message(id: u64, content: &str) -> Message {
        Message {
            id: MessageId(id),
            direction: Direction::Received,
            body: MessageBody::Text(content.to_owned()),
            timestamp: "2:30 PM".to_owned(),
            reply_to: None,
        }
    }

    #[test]
    fn ranges_cover_every_occurrence_case_insensitively() {
        let ranges = match_ranges("Coffee, more COFFEE, decaf coffee", "coffee");
        assert_eq!(ranges, vec![0..6, 13..19, 27..33]);
    }

    #[test]
    fn special_characters_match_literally() {
        assert_eq!(match_ranges("pattern a.b*c here", "a.b*c"), vec![8..13]);
        // A dot must not act as a wildcard.
        assert!(match_ranges("axb", "a.b").is_empty());
        assert!(match_ranges("(par)en [br]ack", "(par)").len() == 1);
    }

    #[test]
    fn multibyte_text_yields_valid_ranges() {
        let text = "héllo HÉLLO";
        let ranges = match_ranges(text, "héllo");
        assert_eq!(ranges.len(), 2);
        for range in ranges {
            assert_eq!(text[range].to_lowercase(), "héllo");
        }
    }

    #[test]
    fn empty_query_reports_nothing() {
        let messages = [message(1, "hello")];
        let mut search = SearchState::default();
        search.search("hello", &messages);
        assert_eq!(search.matches().len(), 1);
        search.search("", &messages);
        assert!(search.matches().is_empty());
        assert_eq!(search.current(), None);
        assert_eq!(search.count_label(), None);
    }

    #[test]
    fn whitespace_query_counts_as_empty() {
        let messages = [message(1, "hello   ")];
        let mut search = SearchState::default();
        search.search("   ", &messages);
        assert!(search.matches().is_empty());
        assert_eq!(search.count_label(), None);
    }

    #[test]
    fn no_match_reports_zero_of_zero() {
        let messages = [message(1, "hello")];
        let mut search = SearchState::default();
        search.search("zzz", &messages);
        assert_eq!(search.count_label().as_deref(), Some("0 of 0"));
        assert_eq!(search.current(), None);
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let messages = [message(1, "hit"), message(2, "miss"), message(3, "hit"), message(4, "hit")];
        let mut search = SearchState::default();
        search.search("hit", &messages);
        assert_eq!(search.matches(), &[MessageId(1), MessageId(3), MessageId(4)]);
        assert_eq!(search.current(), Some(MessageId(1)));
        assert_eq!(search.count_label().as_deref(), Some("1 of 3"));
        // Stepping forward once per match cycles back to the first.
        for _ in 0..3 {
            search.navigate(NavDirection::Next);
        }
        assert_eq!(search.current(), Some(MessageId(1)));
        // Stepping back from the first wraps to the last.
        search.navigate(NavDirection::Prev);
        assert_eq!(search.current(), Some(MessageId(4)));
        assert_eq!(search.count_label().as_deref(), Some("3 of 3"));
    }

    #[test]
    fn navigate_on_empty_set_is_a_noop() {
        let mut search = SearchState::default();
        search.navigate(NavDirection::Next);
        assert_eq!(search.current(), None);
    }

    #[test]
    fn refresh_picks_up_new_messages() {
        let mut messages = vec![message(1, "coffee break")];
        let mut search = SearchState::default();
        search.search("coffee", &messages);
        assert_eq!(search.matches().len(), 1);
        messages.push(message(2, "more Coffee"));
        search.refresh(&messages);
        assert_eq!(search.matches(), &[MessageId(1), MessageId(2)]);
    }
}
