use std::ops::Range;

use palaver_core::{ChatSession, ConversationView, MessageView, ProfileKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::palette;

const WELCOME_TITLE: &str = "Welcome to Chat";
const WELCOME_SUBTITLE: &str = "Select a conversation to start messaging";

/// The active conversation pane: header, message bubbles, search
/// decorations. Renders purely from the session; the event loop owns all
/// mutation.
#[derive(Debug)]
pub struct ChatView<'a> {
    pub session: &'a ChatSession,
    /// Shows the typing indicator while an auto reply is pending.
    pub typing: bool,
}

impl Widget for &ChatView<'_> {
    fn render(self, area: Rect, buffer: &mut Buffer) {
        let Some(conversation) = self.session.active_conversation() else {
            welcome(area, buffer);
            return;
        };

        let [header_area, messages_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(area);

        let profile = &conversation.profile;
        let accent = palette::gradient_start(profile);
        let mut header = vec![
            Span::styled(
                format!(" {} ", profile.avatar_initials),
                Style::new().fg(Color::Black).bg(accent),
            ),
            Span::raw(" "),
            Span::styled(
                profile.display_name.clone(),
                Style::new().add_modifier(Modifier::BOLD),
            ),
        ];
        let status = match &profile.kind {
            ProfileKind::Group { member_count, .. } => format!("  {member_count} members"),
            ProfileKind::Individual { .. } => format!("  {}", profile.status),
        };
        header.push(Span::styled(status, Style::new().dim()));
        if let Some(label) = self.session.search_state().count_label() {
            header.push(Span::styled(
                format!("  [{label}]"),
                Style::new().fg(Color::Yellow),
            ));
        }
        Paragraph::new(Line::from(header))
            .block(Block::new().borders(Borders::BOTTOM))
            .render(header_area, buffer);

        match self.session.view() {
            Some(ConversationView::Empty { title, subtitle }) => {
                placeholder(title, subtitle, messages_area, buffer);
            }
            Some(ConversationView::Messages(items)) => {
                self.messages(&items, messages_area, buffer);
            }
            None => {}
        }
    }
}

impl ChatView<'_> {
    fn messages(&self, items: &[MessageView], area: Rect, buffer: &mut Buffer) {
        let selected = self.session.action_state().selected();
        let mut lines = Vec::new();
        // First line of the current search match, for scroll targeting.
        let mut current_line = None;
        for item in items {
            if item.current_match {
                current_line = Some(lines.len());
            }
            lines.extend(bubble(item, selected == Some(item.id)));
            lines.push(Line::raw(""));
        }
        if self.typing {
            lines.push(Line::styled("typing...", Style::new().italic().dim()));
        }

        let height = area.height as usize;
        let bottom_anchor = lines.len().saturating_sub(height);
        let scroll = match current_line {
            // Keep the current match a third of the way down the pane.
            Some(line) => line
                .saturating_sub(height / 3)
                .min(bottom_anchor),
            None => bottom_anchor,
        };
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(area, buffer);
    }
}

fn bubble(item: &MessageView, selected: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(reply) = &item.reply {
        lines.push(quote_line(&reply.sender, &reply.content, item.outgoing));
    }

    let mut body = highlight_spans(&item.text, &item.highlights, item.current_match);
    if selected {
        body.insert(0, Span::styled("> ", Style::new().fg(Color::Cyan).bold()));
        for span in &mut body {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    lines.push(align(Line::from(body), item.outgoing));

    if let Some(attachment) = &item.attachment {
        let line = Line::styled(
            format!("{} {}", attachment.kind.glyph(), attachment.size_label),
            Style::new().dim(),
        );
        lines.push(align(line, item.outgoing));
    }

    let meta = if item.outgoing {
        format!("{} ✓✓", item.timestamp)
    } else {
        item.timestamp.clone()
    };
    lines.push(align(Line::styled(meta, Style::new().dim()), item.outgoing));
    lines
}

fn quote_line(sender: &str, content: &str, outgoing: bool) -> Line<'static> {
    let line = Line::from(vec![
        Span::styled(
            format!("│ {sender}: "),
            Style::new().fg(Color::Blue).bold(),
        ),
        Span::styled(content.to_owned(), Style::new().fg(Color::Blue).dim()),
    ]);
    align(line, outgoing)
}

fn align(line: Line<'static>, outgoing: bool) -> Line<'static> {
    if outgoing {
        line.right_aligned()
    } else {
        line
    }
}

/// Splits text into styled spans at the given byte ranges. Ranges come in
/// ascending order and never overlap.
fn highlight_spans(
    text: &str,
    highlights: &[Range<usize>],
    current: bool,
) -> Vec<Span<'static>> {
    if highlights.is_empty() {
        return vec![Span::raw(text.to_owned())];
    }
    let mark = if current {
        Style::new().fg(Color::Black).bg(Color::LightYellow)
    } else {
        Style::new().fg(Color::Black).bg(Color::Yellow)
    };
    let mut spans = Vec::new();
    let mut cursor = 0;
    for range in highlights {
        if range.start > cursor {
            spans.push(Span::raw(text[cursor..range.start].to_owned()));
        }
        spans.push(Span::styled(text[range.clone()].to_owned(), mark));
        cursor = range.end;
    }
    if cursor < text.len() {
        spans.push(Span::raw(text[cursor..].to_owned()));
    }
    spans
}

fn placeholder(title: &str, subtitle: &str, area: Rect, buffer: &mut Buffer) {
    let lines = vec![
        Line::styled(title.to_owned(), Style::new().bold()).centered(),
        Line::styled(subtitle.to_owned(), Style::new().dim()).centered(),
    ];
    let top = area.height.saturating_sub(2) / 2;
    let inner = Rect {
        y: area.y + top,
        height: area.height.saturating_sub(top),
        ..area
    };
    Paragraph::new(lines).wrap(Wrap { trim: true }).render(inner, buffer);
}

fn welcome(area: Rect, buffer: &mut Buffer) {
    placeholder(WELCOME_TITLE, WELCOME_SUBTITLE, area, buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_split_around_matches() {
        let spans = highlight_spans("go for coffee later?", &[7..13], false);
        let text: Vec<_> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, vec!["go for ", "coffee", " later?"]);
    }

    #[test]
    fn adjacent_and_edge_ranges_produce_no_empty_spans() {
        let spans = highlight_spans("aaaa", &[0..2, 2..4], false);
        let text: Vec<_> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, vec!["aa", "aa"]);
    }

    #[test]
    fn no_highlights_yields_one_plain_span() {
        let spans = highlight_spans("hello", &[], true);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].style, Style::new());
    }
}
