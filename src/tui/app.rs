use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::TableState;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::PageFetcher;
use crate::config::Config;
use crate::pagination::{ApplyOutcome, FetchTicket, PaginationController};
use crate::selection::SelectionStore;
use crate::tui::{
    events::Event,
    keys::{Action, KeyMap},
    styles::Theme,
    table::{self, PagerMove},
    Frame,
};
use crate::view::ViewBinder;

/// Footer message plus its severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    controller: PaginationController,
    store: SelectionStore,
    binder: ViewBinder,
    fetcher: PageFetcher,

    /// Highlighted row on the current page
    table_state: TableState,

    key_map: KeyMap,
    theme: Theme,
    show_help: bool,
    mouse_enabled: bool,
    status: Option<StatusMessage>,

    /// Sender used by spawned fetches to report back
    event_sender: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(
        config: &Config,
        fetcher: PageFetcher,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Result<Self> {
        Ok(Self {
            should_quit: false,
            controller: PaginationController::new(config.page_size)?,
            store: SelectionStore::new(),
            binder: ViewBinder::new(),
            fetcher,
            table_state: TableState::default(),
            key_map: KeyMap::default(),
            theme: Theme::default(),
            show_help: false,
            mouse_enabled: config.mouse_enabled,
            status: None,
            event_sender,
        })
    }

    /// Issue the initial page fetch
    pub fn mount(&mut self) {
        if let Some(ticket) = self.controller.mount() {
            self.dispatch(ticket);
        }
    }

    /// Run a fetch in the background; its resolution arrives as
    /// `Event::PageLoaded`
    fn dispatch(&self, ticket: FetchTicket) {
        let fetcher = self.fetcher.clone();
        let sender = self.event_sender.clone();

        tokio::spawn(async move {
            let result = fetcher.fetch(ticket.window).await;
            if sender.send(Event::PageLoaded { ticket, result }).is_err() {
                debug!(seq = ticket.seq, "App gone before page resolved");
            }
        });
    }

    /// Handle incoming events. Returns whether the app should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::Mouse(mouse_event) => {
                if self.mouse_enabled {
                    self.handle_mouse_event(mouse_event);
                }
            }
            Event::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
            }
            Event::Tick => {}
            Event::PageLoaded { ticket, result } => {
                match self.controller.apply(ticket, result) {
                    ApplyOutcome::Applied => {
                        self.clamp_highlight();
                        if matches!(self.status, Some(StatusMessage { kind: StatusKind::Error, .. })) {
                            self.status = None;
                        }
                    }
                    ApplyOutcome::Failed => {
                        let text = self
                            .controller
                            .last_error()
                            .map(|error| format!("Fetch failed: {}", error));
                        if let Some(text) = text {
                            self.set_status(text, StatusKind::Error);
                        }
                    }
                    ApplyOutcome::Stale => {}
                }
            }
        }

        Ok(self.should_quit)
    }

    fn handle_key_event(&mut self, event: KeyEvent) {
        if self.binder.bulk.is_open() {
            self.handle_bulk_key(event);
            return;
        }

        let Some(action) = self.key_map.action(&event) else {
            return;
        };

        if self.show_help && action != Action::Quit {
            self.show_help = false;
            return;
        }

        match action {
            Action::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            Action::Help => self.show_help = true,
            Action::Up => self.move_highlight(-1),
            Action::Down => self.move_highlight(1),
            Action::NextPage => self.page_to(PagerMove::Next),
            Action::PreviousPage => self.page_to(PagerMove::Previous),
            Action::FirstPage => self.page_to(PagerMove::First),
            Action::LastPage => self.page_to(PagerMove::Last),
            Action::Refresh => {
                let ticket = self.controller.refresh();
                self.dispatch(ticket);
            }
            Action::ToggleRow => self.toggle_highlighted(),
            Action::TogglePage => {
                let changed = self
                    .binder
                    .toggle_page(self.controller.records(), &mut self.store);
                debug!(changed, "Page toggle");
            }
            Action::OpenBulkSelect => {
                if !self.controller.records().is_empty() {
                    self.binder.bulk.open();
                }
            }
            Action::ClearSelection => {
                if self.store.is_empty() {
                    self.set_status("No favorites to clear".to_string(), StatusKind::Info);
                } else {
                    let cleared = self.store.clear();
                    self.set_status(format!("Cleared {} favorites", cleared), StatusKind::Info);
                }
            }
        }
    }

    fn handle_bulk_key(&mut self, event: KeyEvent) {
        if self.key_map.action(&event) == Some(Action::Quit)
            && event.modifiers.contains(KeyModifiers::CONTROL)
        {
            info!("Quit requested");
            self.should_quit = true;
            return;
        }

        match event.code {
            KeyCode::Esc => self.binder.bulk.close(),
            KeyCode::Backspace => self.binder.bulk.backspace(),
            KeyCode::Enter => {
                if let Some(added) = self
                    .binder
                    .commit_bulk(self.controller.records(), &mut self.store)
                {
                    self.set_status(format!("Added {} favorites", added), StatusKind::Info);
                }
            }
            KeyCode::Char(ch) => self.binder.bulk.push_digit(ch),
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::ScrollDown => self.move_highlight(1),
            MouseEventKind::ScrollUp => self.move_highlight(-1),
            _ => {}
        }
    }

    /// Route a pager move through the lazy table's `{first, rows}` event
    fn page_to(&mut self, mv: PagerMove) {
        let window = self.controller.window();
        let Some(event) = table::pager_event(mv, window.offset(), window.size(), self.controller.total())
        else {
            return;
        };

        match self.controller.on_page_event(event) {
            Ok(Some(ticket)) => {
                self.table_state.select(Some(0));
                self.dispatch(ticket);
            }
            Ok(None) => {}
            Err(e) => self.set_status(e.to_string(), StatusKind::Error),
        }
    }

    fn toggle_highlighted(&mut self) {
        let Some(record) = self
            .table_state
            .selected()
            .and_then(|i| self.controller.records().get(i))
        else {
            return;
        };

        let id = record.id;
        let selected = !self.store.is_selected(id);
        debug!(record = %record, selected, "Row toggled");
        self.binder.toggle_row(&mut self.store, id, selected);
    }

    fn move_highlight(&mut self, delta: isize) {
        let len = self.controller.records().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn clamp_highlight(&mut self) {
        let len = self.controller.records().len();
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.table_state.select(selected);
    }

    fn set_status(&mut self, text: String, kind: StatusKind) {
        self.status = Some(StatusMessage { text, kind });
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Table
                Constraint::Length(1), // Pager
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        let window = self.controller.window();
        let props = self.binder.props(
            self.controller.records(),
            &self.store,
            self.controller.is_loading(),
            self.controller.total(),
            window.offset(),
            window.size(),
        );

        table::render_table(frame, chunks[0], &props, &mut self.table_state, &self.theme);
        table::render_pager(frame, chunks[1], &props, &self.theme);
        table::render_status_bar(frame, chunks[2], self.status.as_ref(), &self.theme);

        if self.binder.bulk.is_open() {
            table::render_bulk_popover(frame, &self.binder.bulk, props.rows.len(), &self.theme);
        }

        if self.show_help {
            table::render_help_overlay(frame, &self.key_map, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::MemorySource;
    use crate::tui::events::EventHandler;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_with(source: MemorySource, events: &EventHandler) -> App {
        let fetcher = PageFetcher::new(Arc::new(source));
        App::new(&Config::default(), fetcher, events.sender()).unwrap()
    }

    /// Feed the next resolved fetch back into the app
    async fn settle(app: &mut App, events: &mut EventHandler) {
        loop {
            let event = events.next().await.unwrap();
            let loaded = matches!(event, Event::PageLoaded { .. });
            app.handle_event(event).unwrap();
            if loaded {
                break;
            }
        }
    }

    fn selected(app: &App) -> Vec<u64> {
        app.store.iter().collect()
    }

    #[tokio::test]
    async fn test_mount_loads_first_page() {
        let mut events = EventHandler::internal_only();
        let mut app = app_with(MemorySource::with_records(30), &events);

        app.mount();
        assert!(app.controller.is_loading());
        settle(&mut app, &mut events).await;

        assert!(!app.controller.is_loading());
        assert_eq!(app.controller.records().len(), 12);
        assert_eq!(app.controller.total(), 30);
    }

    #[tokio::test]
    async fn test_selection_survives_paging() {
        let mut events = EventHandler::internal_only();
        let mut app = app_with(MemorySource::with_records(30), &events);
        app.mount();
        settle(&mut app, &mut events).await;

        app.handle_event(press(KeyCode::Char(' '))).unwrap();
        app.handle_event(press(KeyCode::Down)).unwrap();
        app.handle_event(press(KeyCode::Char(' '))).unwrap();
        assert_eq!(selected(&app), vec![1, 2]);

        app.handle_event(press(KeyCode::Right)).unwrap();
        settle(&mut app, &mut events).await;
        assert_eq!(app.controller.records()[0].id, 13);
        app.handle_event(press(KeyCode::Char('a'))).unwrap();

        app.handle_event(press(KeyCode::Left)).unwrap();
        settle(&mut app, &mut events).await;

        assert_eq!(selected(&app), [1, 2].into_iter().chain(13..=24).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_bulk_select_commits_prefix() {
        let mut events = EventHandler::internal_only();
        let mut app = app_with(MemorySource::with_records(30), &events);
        app.mount();
        settle(&mut app, &mut events).await;

        app.handle_event(press(KeyCode::Char('n'))).unwrap();
        app.handle_event(press(KeyCode::Enter)).unwrap();
        assert!(app.store.is_empty());

        app.handle_event(press(KeyCode::Char('4'))).unwrap();
        app.handle_event(press(KeyCode::Enter)).unwrap();

        assert_eq!(selected(&app), vec![1, 2, 3, 4]);
        assert_eq!(app.status.as_ref().unwrap().text, "Added 4 favorites");

        // Popover is closed again, so 'q' quits
        assert!(app.handle_event(press(KeyCode::Char('q'))).unwrap());
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_bulk_popover() {
        let mut events = EventHandler::internal_only();
        let mut app = app_with(MemorySource::with_records(30), &events);
        app.mount();
        settle(&mut app, &mut events).await;

        app.handle_event(press(KeyCode::Char('n'))).unwrap();
        app.handle_event(press(KeyCode::Char('2'))).unwrap();

        // A plain 'q' is just ignored input while the popover is open
        assert!(!app.handle_event(press(KeyCode::Char('q'))).unwrap());
        assert!(app.binder.bulk.is_open());

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.handle_event(ctrl_c).unwrap());
        assert!(app.store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_surfaces_error() {
        let mut events = EventHandler::internal_only();
        let mut app = app_with(MemorySource::failing(502), &events);
        app.mount();
        settle(&mut app, &mut events).await;

        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("502"));
        assert!(!app.controller.is_loading());
    }

    #[tokio::test]
    async fn test_render_shows_rows_and_pager() {
        let mut events = EventHandler::internal_only();
        let mut app = app_with(MemorySource::with_records(30), &events);
        app.mount();
        settle(&mut app, &mut events).await;
        app.handle_event(press(KeyCode::Char(' '))).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("Artwork 1"));
        assert!(rendered.contains("Page 1 of 3"));
        assert!(rendered.contains("1 favorite"));
    }
}
