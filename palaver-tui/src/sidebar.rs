use palaver_core::{Conversation, ConversationStore};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::palette;

/// The conversation list. Filtering narrows by name or latest message
/// preview; the filter text is owned here because it never touches the
/// session state.
#[derive(Debug, Default)]
pub struct Sidebar {
    pub filter: String,
    pub filtering: bool,
}

impl Sidebar {
    /// Conversation names surviving the current filter, in store order.
    pub fn visible<'s>(&self, store: &'s ConversationStore) -> Vec<&'s str> {
        store
            .filter(&self.filter)
            .into_iter()
            .map(Conversation::name)
            .collect()
    }

    /// The entry to activate after a next/prev step from `active`.
    pub fn step<'s>(
        &self,
        store: &'s ConversationStore,
        active: Option<&str>,
        forward: bool,
    ) -> Option<&'s str> {
        let visible = self.visible(store);
        if visible.is_empty() {
            return None;
        }
        let current = active.and_then(|name| visible.iter().position(|v| *v == name));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % visible.len(),
            (Some(i), false) => i.checked_sub(1).unwrap_or(visible.len() - 1),
            (None, true) => 0,
            (None, false) => visible.len() - 1,
        };
        Some(visible[next])
    }

    pub fn render(
        &self,
        store: &ConversationStore,
        active: Option<&str>,
        area: Rect,
        buffer: &mut Buffer,
    ) {
        let title = if self.filtering || !self.filter.is_empty() {
            Line::from(vec![
                Span::raw(" Chats /"),
                Span::styled(&self.filter, Style::new().add_modifier(Modifier::BOLD)),
                Span::raw(if self.filtering { "_ " } else { " " }),
            ])
        } else {
            Line::raw(" Chats ")
        };
        let block = Block::new().borders(Borders::RIGHT).title(title);
        let inner = block.inner(area);
        block.render(area, buffer);

        let mut selected = None;
        let items = store
            .filter(&self.filter)
            .into_iter()
            .enumerate()
            .map(|(idx, conversation)| {
                if Some(conversation.name()) == active {
                    selected = Some(idx);
                }
                entry(conversation)
            })
            .collect::<Vec<_>>();
        let mut state = ListState::default().with_selected(selected);
        StatefulWidget::render(
            List::new(items).highlight_style(Style::new().bg(Color::DarkGray)),
            inner,
            buffer,
            &mut state,
        );
    }
}

fn entry(conversation: &Conversation) -> ListItem<'static> {
    let profile = &conversation.profile;
    let accent = palette::gradient_start(profile);
    let mut name_line = vec![
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
    if profile.is_group() {
        name_line.push(Span::styled(" 👥", Style::new().dim()));
    } else if profile.online {
        name_line.push(Span::styled(" ●", Style::new().fg(Color::Green)));
    }
    let preview = conversation
        .preview()
        .map(str::to_owned)
        .unwrap_or_default();
    ListItem::new(vec![
        Line::from(name_line),
        Line::from(format!("    {preview}")).dim(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_wraps_in_both_directions() {
        let store = ConversationStore::seeded();
        let sidebar = Sidebar::default();
        let visible = sidebar.visible(&store);
        let first = visible[0];
        let last = visible[visible.len() - 1];

        assert_eq!(sidebar.step(&store, Some(last), true), Some(first));
        assert_eq!(sidebar.step(&store, Some(first), false), Some(last));
    }

    #[test]
    fn filter_narrows_the_step_domain() {
        let store = ConversationStore::seeded();
        let sidebar = Sidebar {
            filter: "sarah".into(),
            filtering: false,
        };
        assert_eq!(sidebar.step(&store, None, true), Some("Sarah Wilson"));
        assert_eq!(
            sidebar.step(&store, Some("Sarah Wilson"), true),
            Some("Sarah Wilson")
        );
    }

    #[test]
    fn empty_filter_result_steps_nowhere() {
        let store = ConversationStore::seeded();
        let sidebar = Sidebar {
            filter: "zzzzzz".into(),
            filtering: false,
        };
        assert_eq!(sidebar.step(&store, None, true), None);
    }
}
