use std::{cmp, collections::BTreeMap};

use crossterm::event::KeyModifiers;
use tokio::time::{Duration, Instant};

// Key sequences are resolved against a prefix map: each key either extends
// a pending sequence, completes a binding, or falls through. Buffered keys
// expire after a timeout so a stale prefix doesn't swallow the next press.

pub fn parse_key_sequence(input: &str) -> Result<Vec<KeyEvent>, nom::error::Error<&str>> {
    use nom::Finish;
    nom::combinator::all_consuming(nom::multi::many1(parse_key))(input)
        .finish()
        .map(|(_, keys)| keys)
}

fn parse_key(input: &str) -> nom::IResult<&str, KeyEvent> {
    use nom::{
        branch::alt,
        bytes::complete::tag,
        character::complete::one_of,
        combinator::map,
        sequence::{delimited, separated_pair},
    };

    let key = alt((KeyCode::parse_char, KeyCode::parse_special));
    let modifiers = nom::multi::fold_many1(
        map(one_of("ACMS"), |c| match c {
            'A' => KeyModifiers::ALT,
            'C' => KeyModifiers::CONTROL,
            'M' => KeyModifiers::META,
            'S' => KeyModifiers::SHIFT,
            _ => unreachable!(),
        }),
        KeyModifiers::empty,
        KeyModifiers::union,
    );

    let bracketed = alt((
        map(
            separated_pair(modifiers, tag("-"), key),
            |(modifiers, code)| KeyEvent { modifiers, code },
        ),
        map(KeyCode::parse_special, KeyEvent::from),
    ));
    alt((
        delimited(tag("<"), bracketed, tag(">")),
        map(KeyCode::parse_plain, KeyEvent::from),
    ))(input)
}

#[derive(Clone, Copy, Debug, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        let mut modifiers = event.modifiers;
        // Shifted characters already arrive as their shifted form.
        if matches!(event.code, crossterm::event::KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self {
            code: event.code.into(),
            modifiers,
        }
    }
}

// manually impl `Ord` since `KeyModifiers` isn't `Ord`
// https://github.com/crossterm-rs/crossterm/pull/951
impl Ord for KeyEvent {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.code
            .cmp(&other.code)
            .then(self.modifiers.bits().cmp(&other.modifiers.bits()))
    }
}

impl PartialOrd for KeyEvent {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}

// Our own version of `crossterm::event::KeyCode`, which isn't `Ord`
// https://github.com/crossterm-rs/crossterm/pull/951
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum KeyCode {
    Char(char),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Insert,
    Escape,
    F(u8),
    Unknown,
}

impl KeyCode {
    fn parse_char(input: &str) -> nom::IResult<&str, Self> {
        nom::combinator::map(
            nom::character::complete::satisfy(nom_unicode::is_alphanumeric),
            Self::Char,
        )(input)
    }

    /// Like `parse_char`, but also accepts the punctuation we bind outside
    /// of brackets.
    fn parse_plain(input: &str) -> nom::IResult<&str, Self> {
        nom::combinator::map(
            nom::character::complete::satisfy(|c| {
                nom_unicode::is_alphanumeric(c) || "/?[]{}.,;:!@#$%^&*()_+-=~'\"|".contains(c)
            }),
            Self::Char,
        )(input)
    }

    fn parse_special(input: &str) -> nom::IResult<&str, Self> {
        use nom::{
            bytes::complete::tag,
            combinator::{map, value},
            sequence::preceded,
        };
        nom::branch::alt((
            value(Self::Backspace, tag("BS")),
            value(Self::Delete, tag("Del")),
            value(Self::Enter, tag("CR")),
            value(Self::Left, tag("Left")),
            value(Self::Right, tag("Right")),
            value(Self::Up, tag("Up")),
            value(Self::Down, tag("Down")),
            value(Self::Home, tag("Home")),
            value(Self::End, tag("End")),
            value(Self::PageUp, tag("PageUp")),
            value(Self::PageDown, tag("PageDown")),
            value(Self::Tab, tag("Tab")),
            value(Self::Insert, tag("Ins")),
            value(Self::Escape, tag("Esc")),
            map(preceded(tag("F"), nom::character::complete::u8), Self::F),
            value(Self::Char(' '), tag("Space")),
        ))(input)
    }
}

impl From<crossterm::event::KeyCode> for KeyCode {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode as Kc;
        match code {
            Kc::Char(c) => Self::Char(c),
            Kc::Backspace => Self::Backspace,
            Kc::Delete => Self::Delete,
            Kc::Enter => Self::Enter,
            Kc::Left => Self::Left,
            Kc::Right => Self::Right,
            Kc::Up => Self::Up,
            Kc::Down => Self::Down,
            Kc::Home => Self::Home,
            Kc::End => Self::End,
            Kc::PageUp => Self::PageUp,
            Kc::PageDown => Self::PageDown,
            Kc::Tab => Self::Tab,
            Kc::Insert => Self::Insert,
            Kc::Esc => Self::Escape,
            Kc::F(n) => Self::F(n),
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid key sequence {0:?}")]
pub struct BindError(String);

/// What a key press resolved to. Passthru keys matched no binding and are
/// returned to the caller; an action may complete on the same press.
#[derive(Debug)]
pub struct Resolution<A> {
    pub passthru: Vec<KeyEvent>,
    pub action: Option<A>,
}

#[derive(Clone, Debug)]
pub struct Keymap<A> {
    keys: BTreeMap<Vec<KeyEvent>, A>,
    timeout: Duration,
    buffer: Vec<KeyEvent>,
    deadline: Option<Instant>,
}

impl<A: Clone> Keymap<A> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            keys: BTreeMap::new(),
            timeout,
            buffer: Vec::new(),
            deadline: None,
        }
    }

    pub fn bind(&mut self, sequence: &str, action: A) -> Result<(), BindError> {
        let keys =
            parse_key_sequence(sequence).map_err(|_| BindError(sequence.to_owned()))?;
        self.keys.insert(keys, action);
        Ok(())
    }

    /// Feeds one key press. An expired pending sequence is discarded first.
    pub fn push(&mut self, event: KeyEvent, now: Instant) -> Resolution<A> {
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            self.buffer.clear();
        }
        self.buffer.push(event);
        let (skipped, action) = (0..self.buffer.len())
            .find_map(|i| self.get(&self.buffer[i..]).map(|action| (i, action)))
            .unwrap_or((self.buffer.len(), None));
        let passthru = self.buffer.drain(..skipped).collect();
        if action.is_some() {
            self.buffer.clear();
        }
        self.deadline = (!self.buffer.is_empty()).then(|| now + self.timeout);
        Resolution { passthru, action }
    }

    fn entries_with_prefix<'s>(
        &'s self,
        prefix: &[KeyEvent],
    ) -> impl Iterator<Item = (&'s Vec<KeyEvent>, &'s A)> {
        use std::ops::Bound;

        self.keys
            .range::<[_], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while({
                let prefix = prefix.to_vec();
                move |(k, _)| k.starts_with(&prefix)
            })
    }

    /// Finds the action corresponding to the provided key sequence.
    ///
    /// ## Return values
    /// - `Some(Some(action))`: the key sequence is mapped to the action
    /// - `Some(None)`: the key sequence is a prefix to at least one action
    /// - `None`: the key sequence is not a prefix to any action
    fn get(&self, keys: &[KeyEvent]) -> Option<Option<A>> {
        self.entries_with_prefix(keys)
            .next()
            .map(|(k, v)| (k == keys).then_some(v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyCode::Char(c).into()
    }

    #[test]
    fn parses_plain_and_bracketed_keys() {
        assert_eq!(parse_key_sequence("gc").unwrap(), vec![key('g'), key('c')]);
        assert_eq!(parse_key_sequence("/").unwrap(), vec![key('/')]);
        assert_eq!(
            parse_key_sequence("<Esc>").unwrap(),
            vec![KeyCode::Escape.into()]
        );
        assert_eq!(
            parse_key_sequence("<C-n>").unwrap(),
            vec![KeyEvent {
                code: KeyCode::Char('n'),
                modifiers: KeyModifiers::CONTROL,
            }]
        );
        assert!(parse_key_sequence("<bogus>").is_err());
    }

    #[test]
    fn single_key_resolves_immediately() {
        let mut keymap = Keymap::new(Duration::from_millis(500));
        keymap.bind("q", 1).unwrap();
        let resolution = keymap.push(key('q'), Instant::now());
        assert_eq!(resolution.action, Some(1));
        assert!(resolution.passthru.is_empty());
    }

    #[test]
    fn multi_key_sequences_buffer_then_resolve() {
        let mut keymap = Keymap::new(Duration::from_millis(500));
        keymap.bind("gc", 1).unwrap();
        let now = Instant::now();
        assert_eq!(keymap.push(key('g'), now).action, None);
        assert_eq!(keymap.push(key('c'), now).action, Some(1));
    }

    #[test]
    fn unbound_keys_pass_through() {
        let mut keymap = Keymap::new(Duration::from_millis(500));
        keymap.bind("gc", 1).unwrap();
        let now = Instant::now();
        let resolution = keymap.push(key('x'), now);
        assert_eq!(resolution.action, None);
        assert_eq!(resolution.passthru, vec![key('x')]);
    }

    #[test]
    fn expired_prefix_is_discarded() {
        let mut keymap = Keymap::new(Duration::from_millis(500));
        keymap.bind("gc", 1).unwrap();
        keymap.bind("c", 2).unwrap();
        let now = Instant::now();
        assert_eq!(keymap.push(key('g'), now).action, None);
        // Past the deadline "c" resolves on its own instead of completing
        // the stale "gc" prefix.
        let later = now + Duration::from_secs(1);
        assert_eq!(keymap.push(key('c'), later).action, Some(2));
    }
}
