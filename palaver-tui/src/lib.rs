use crossterm::event::{Event, KeyEventKind};
use palaver_autoreply::{AutoReply, ReplyScheduler};
use palaver_core::{Attachment, ChatSession, MessageId, NavDirection, Notice};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    Frame,
};
use tokio::{sync::mpsc, time::Instant};

pub mod attach;
pub mod chat_view;
pub mod clipboard;
pub mod keymap;
pub mod palette;
pub mod sidebar;
pub mod toast;

use attach::AttachError;
use chat_view::ChatView;
use clipboard::SystemClipboard;
use keymap::Keymap;
use sidebar::Sidebar;
use toast::Toasts;

const SIDEBAR_WIDTH: u16 = 32;
const KEY_TIMEOUT: tokio::time::Duration = tokio::time::Duration::from_millis(750);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Action {
    Quit,
    Compose,
    OpenSearch,
    NextMatch,
    PrevMatch,
    SelectOlder,
    SelectNewer,
    Reply,
    CopyMessage,
    DeleteMessage,
    NextConversation,
    PrevConversation,
    ClearChat,
    CloseChat,
    Attach,
    Filter,
    Cancel,
}

fn default_keymap() -> Result<Keymap<Action>, keymap::BindError> {
    let mut keymap = Keymap::new(KEY_TIMEOUT);
    keymap.bind("q", Action::Quit)?;
    keymap.bind("i", Action::Compose)?;
    keymap.bind("/", Action::OpenSearch)?;
    keymap.bind("n", Action::NextMatch)?;
    keymap.bind("N", Action::PrevMatch)?;
    keymap.bind("k", Action::SelectOlder)?;
    keymap.bind("<Up>", Action::SelectOlder)?;
    keymap.bind("j", Action::SelectNewer)?;
    keymap.bind("<Down>", Action::SelectNewer)?;
    keymap.bind("r", Action::Reply)?;
    keymap.bind("y", Action::CopyMessage)?;
    keymap.bind("d", Action::DeleteMessage)?;
    keymap.bind("<Tab>", Action::NextConversation)?;
    keymap.bind("]", Action::NextConversation)?;
    keymap.bind("[", Action::PrevConversation)?;
    keymap.bind("gc", Action::ClearChat)?;
    keymap.bind("gx", Action::CloseChat)?;
    keymap.bind("a", Action::Attach)?;
    keymap.bind("f", Action::Filter)?;
    keymap.bind("<Esc>", Action::Cancel)?;
    Ok(keymap)
}

/// Which component owns the keyboard. Text entry modes bypass the keymap
/// entirely; only `Browse` dispatches actions.
#[derive(Debug, Default)]
enum Mode {
    #[default]
    Browse,
    Compose {
        draft: String,
    },
    Search {
        query: String,
    },
    Attach {
        path: String,
    },
    Filter,
}

struct App {
    session: ChatSession,
    scheduler: ReplyScheduler,
    sidebar: Sidebar,
    toasts: Toasts,
    mode: Mode,
    keymap: Keymap<Action>,
    clipboard: SystemClipboard,
    attach_tx: mpsc::UnboundedSender<Result<Attachment, AttachError>>,
    quit: bool,
}

impl App {
    fn new(
        scheduler: ReplyScheduler,
        attach_tx: mpsc::UnboundedSender<Result<Attachment, AttachError>>,
        keymap: Keymap<Action>,
        open: Option<String>,
    ) -> Self {
        let mut session = ChatSession::new();
        if let Some(name) = open {
            session.open_conversation(&name, None);
        }
        Self {
            session,
            scheduler,
            sidebar: Sidebar::default(),
            toasts: Toasts::default(),
            mode: Mode::default(),
            keymap,
            clipboard: SystemClipboard,
            attach_tx,
            quit: false,
        }
    }

    fn notify(&mut self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            self.toasts.push(notice);
        }
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            tracing::trace!("{event:?}");
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        match &mut self.mode {
            Mode::Browse => {
                let resolution = self.keymap.push(key.into(), Instant::now());
                for skipped in &resolution.passthru {
                    tracing::trace!("unbound key {skipped:?}");
                }
                if let Some(action) = resolution.action {
                    self.dispatch(action);
                }
            }
            Mode::Compose { draft } => match key.code {
                crossterm::event::KeyCode::Char(c) => draft.push(c),
                crossterm::event::KeyCode::Backspace => {
                    draft.pop();
                }
                crossterm::event::KeyCode::Enter => {
                    let draft = std::mem::take(draft);
                    if let Some(receipt) = self.session.send_message(&draft) {
                        self.scheduler.schedule(&receipt.conversation);
                    }
                }
                crossterm::event::KeyCode::Esc => {
                    self.session.cancel_reply();
                    self.mode = Mode::Browse;
                }
                _ => {}
            },
            Mode::Search { query } => match key.code {
                crossterm::event::KeyCode::Char(c) => {
                    query.push(c);
                    let query = query.clone();
                    self.session.search(&query);
                }
                crossterm::event::KeyCode::Backspace => {
                    query.pop();
                    let query = query.clone();
                    self.session.search(&query);
                }
                crossterm::event::KeyCode::Enter => {
                    self.session.navigate(NavDirection::Next);
                    self.mode = Mode::Browse;
                }
                crossterm::event::KeyCode::Esc => {
                    self.session.close_search();
                    self.mode = Mode::Browse;
                }
                _ => {}
            },
            Mode::Attach { path } => match key.code {
                crossterm::event::KeyCode::Char(c) => path.push(c),
                crossterm::event::KeyCode::Backspace => {
                    path.pop();
                }
                crossterm::event::KeyCode::Enter => {
                    let path = std::path::PathBuf::from(std::mem::take(path));
                    let results = self.attach_tx.clone();
                    tokio::spawn(async move {
                        if results.send(attach::load(path).await).is_err() {
                            tracing::debug!("attachment receiver dropped");
                        }
                    });
                    self.mode = Mode::Browse;
                }
                crossterm::event::KeyCode::Esc => self.mode = Mode::Browse,
                _ => {}
            },
            Mode::Filter => match key.code {
                crossterm::event::KeyCode::Char(c) => self.sidebar.filter.push(c),
                crossterm::event::KeyCode::Backspace => {
                    self.sidebar.filter.pop();
                }
                crossterm::event::KeyCode::Enter => {
                    self.sidebar.filtering = false;
                    self.mode = Mode::Browse;
                }
                crossterm::event::KeyCode::Esc => {
                    self.sidebar.filter.clear();
                    self.sidebar.filtering = false;
                    self.mode = Mode::Browse;
                }
                _ => {}
            },
        }
    }

    fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Quit => self.quit = true,
            Action::Compose => {
                if self.session.active_name().is_some() {
                    self.mode = Mode::Compose {
                        draft: String::new(),
                    };
                }
            }
            Action::OpenSearch => {
                if self.session.active_name().is_some() {
                    self.mode = Mode::Search {
                        query: self.session.search_state().query().to_owned(),
                    };
                }
            }
            Action::NextMatch => self.session.navigate(NavDirection::Next),
            Action::PrevMatch => self.session.navigate(NavDirection::Prev),
            Action::SelectOlder => self.step_selection(false),
            Action::SelectNewer => self.step_selection(true),
            Action::Reply => {
                self.session.reply();
                if self.session.reply_draft().is_some() {
                    self.mode = Mode::Compose {
                        draft: String::new(),
                    };
                }
            }
            Action::CopyMessage => {
                let notice = self.session.copy(&mut self.clipboard);
                self.notify(notice);
            }
            Action::DeleteMessage => {
                let notice = self.session.delete_selected();
                self.notify(notice);
            }
            Action::NextConversation => self.step_conversation(true),
            Action::PrevConversation => self.step_conversation(false),
            Action::ClearChat => {
                let notice = self.session.clear_active();
                self.notify(notice);
            }
            Action::CloseChat => {
                let notice = self.session.close_conversation();
                self.toasts.push(notice);
            }
            Action::Attach => {
                if self.session.active_name().is_some() {
                    self.mode = Mode::Attach {
                        path: String::new(),
                    };
                }
            }
            Action::Filter => {
                self.sidebar.filtering = true;
                self.mode = Mode::Filter;
            }
            Action::Cancel => {
                if self.session.action_state().selected().is_some() {
                    self.session.dismiss_action();
                } else if self.session.search_state().is_active() {
                    self.session.close_search();
                }
            }
        }
    }

    /// Moves the context-action selection through the rendered messages.
    /// With nothing selected, either direction starts at the newest.
    fn step_selection(&mut self, newer: bool) {
        let ids = self.rendered_ids();
        if ids.is_empty() {
            return;
        }
        let target = match self
            .session
            .action_state()
            .selected()
            .and_then(|id| ids.iter().position(|&rendered| rendered == id))
        {
            Some(pos) if newer => ids.get(pos + 1).copied(),
            Some(pos) => pos.checked_sub(1).map(|prev| ids[prev]),
            None => ids.last().copied(),
        };
        if let Some(id) = target {
            self.session.select_message(id);
        }
    }

    fn rendered_ids(&self) -> Vec<MessageId> {
        match self.session.view() {
            Some(palaver_core::ConversationView::Messages(items)) => {
                items.iter().map(|item| item.id).collect()
            }
            _ => Vec::new(),
        }
    }

    fn step_conversation(&mut self, forward: bool) {
        let name = self
            .sidebar
            .step(self.session.store(), self.session.active_name(), forward)
            .map(str::to_owned);
        if let Some(name) = name {
            self.session.open_conversation(&name, None);
        }
    }

    fn deliver(&mut self, reply: AutoReply) {
        self.session.receive_message(&reply.conversation, &reply.text);
    }

    fn attached(&mut self, result: Result<Attachment, AttachError>) {
        match result {
            Ok(attachment) => {
                let notice = self.session.attach(attachment);
                self.notify(notice);
            }
            Err(err) => self.toasts.push(Notice::error(err.to_string())),
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [sidebar_area, chat_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(frame.area());
        self.sidebar.render(
            self.session.store(),
            self.session.active_name(),
            sidebar_area,
            frame.buffer_mut(),
        );

        let reply_rows = u16::from(self.session.reply_draft().is_some());
        let [view_area, reply_area, input_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(reply_rows),
            Constraint::Length(1),
        ])
        .areas(chat_area);

        let typing = self
            .session
            .active_name()
            .is_some_and(|name| self.scheduler.pending(name));
        let view = ChatView {
            session: &self.session,
            typing,
        };
        frame.render_widget(&view, view_area);

        if let Some(reply) = self.session.reply_draft() {
            let banner = Line::from(vec![
                Span::styled("Replying to ", Style::new().dim()),
                Span::styled(reply.sender.clone(), Style::new().bold()),
                Span::styled(format!(": {}", reply.content), Style::new().dim()),
            ]);
            frame.render_widget(banner, reply_area);
        }

        frame.render_widget(self.input_line(), input_area);

        if !self.toasts.is_empty() {
            frame.render_widget(&self.toasts, view_area);
        }
    }

    fn input_line(&self) -> Line<'_> {
        match &self.mode {
            Mode::Browse => {
                Line::styled("i compose  / search  a attach  f filter  q quit", Style::new().dim())
            }
            Mode::Compose { draft } => Line::from(vec![
                Span::styled("> ", Style::new().fg(Color::Cyan)),
                Span::raw(draft.as_str()),
                Span::raw("_"),
            ]),
            Mode::Search { query } => Line::from(vec![
                Span::styled("/", Style::new().fg(Color::Yellow)),
                Span::raw(query.as_str()),
                Span::raw("_"),
            ]),
            Mode::Attach { path } => Line::from(vec![
                Span::styled("attach: ", Style::new().fg(Color::Cyan)),
                Span::raw(path.as_str()),
                Span::raw("_"),
            ]),
            Mode::Filter => Line::styled("editing filter (Enter to keep, Esc to clear)", Style::new().dim()),
        }
    }
}

pub async fn run(
    scheduler: ReplyScheduler,
    replies: mpsc::UnboundedReceiver<AutoReply>,
    open: Option<String>,
) -> std::io::Result<()> {
    let keymap = default_keymap().map_err(std::io::Error::other)?;
    let terminal = ratatui::init();
    let res = run_inner(terminal, scheduler, replies, keymap, open).await;
    ratatui::restore();
    res
}

async fn run_inner(
    mut term: ratatui::DefaultTerminal,
    scheduler: ReplyScheduler,
    mut replies: mpsc::UnboundedReceiver<AutoReply>,
    keymap: Keymap<Action>,
    open: Option<String>,
) -> std::io::Result<()> {
    use futures::stream::StreamExt;

    let (attach_tx, mut attach_rx) = mpsc::unbounded_channel();
    let mut app = App::new(scheduler, attach_tx, keymap, open);

    let mut term_events = crossterm::event::EventStream::new();
    loop {
        term.draw(|frame| app.draw(frame))?;
        if app.quit {
            break;
        }
        let toast_deadline = app.toasts.next_deadline();
        tokio::select! {
            event = term_events.next() => match event {
                Some(Ok(event)) => app.handle_event(event),
                Some(Err(err)) => tracing::warn!("{err}"),
                None => {
                    tracing::info!("term events stream stopped, shutting down");
                    break;
                }
            },
            reply = replies.recv() => match reply {
                Some(reply) => app.deliver(reply),
                None => tracing::info!("reply stream stopped"),
            },
            Some(result) = attach_rx.recv() => app.attached(result),
            _ = async move {
                match toast_deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            } => app.toasts.expire(Instant::now()),
        }
    }
    Ok(())
}
