use std::collections::VecDeque;

use palaver_core::{Notice, NoticeKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Widget,
};
use tokio::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(3);

/// Transient notifications, newest last. Entries dismiss themselves after
/// three seconds; the event loop sleeps until the next deadline.
#[derive(Debug, Default)]
pub struct Toasts {
    entries: VecDeque<(Notice, Instant)>,
}

impl Toasts {
    pub fn push(&mut self, notice: Notice) {
        self.entries.push_back((notice, Instant::now() + TOAST_TTL));
    }

    pub fn expire(&mut self, now: Instant) {
        self.entries.retain(|(_, deadline)| *deadline > now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(_, deadline)| *deadline).min()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Widget for &Toasts {
    fn render(self, area: Rect, buffer: &mut Buffer) {
        // Show as many of the newest toasts as fit.
        let visible = self.entries.iter().rev().take(area.height as usize);
        for (row, (notice, _)) in visible.enumerate() {
            let style = match notice.kind {
                NoticeKind::Info => Style::new().fg(Color::Black).bg(Color::Green),
                NoticeKind::Error => Style::new().fg(Color::White).bg(Color::Red),
            };
            let line = Line::styled(format!(" {} ", notice.text), style).right_aligned();
            let y = area.bottom().saturating_sub(1 + row as u16);
            if y < area.top() {
                break;
            }
            line.render(Rect::new(area.x, y, area.width, 1), buffer);
        }
    }
}
