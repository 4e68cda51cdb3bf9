use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::components::Component;
use crate::components::change_card::ChangeCard;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::status_bar::StatusBar;
use crate::data::DataService;
use crate::data::change::MountOutcome;
use crate::events::AppEvent;
use crate::theme::THEME;

pub struct App {
    // Components
    header: Header,
    card: ChangeCard,
    status_bar: StatusBar,
    help: HelpOverlay,

    // Data
    data_service: Arc<DataService>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn with_service(
        data_service: Arc<DataService>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        rpc_url: &str,
        tick_rate_ms: u64,
    ) -> Self {
        Self {
            header: Header::new(rpc_url),
            card: ChangeCard::new(),
            status_bar: StatusBar::new(),
            help: HelpOverlay::new(),
            data_service,
            event_rx,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        if !self.card.is_mounted() {
            self.status_bar.loading = true;
            self.card.mount(&self.data_service);
        }

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Fill background
        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | card (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);
        self.card.render(frame, chunks[1]);
        self.status_bar.render(frame, chunks[2]);

        // Overlays (rendered on top)
        self.help.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        let app_event = match event {
            Event::Key(key) => {
                // Only handle key press events (not release/repeat) for cross-platform compat
                if key.kind != KeyEventKind::Press {
                    return;
                }

                // Help overlay consumes all keys when visible
                if self.help.handle_key(key) {
                    return;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.should_quit = true;
                        return;
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.should_quit = true;
                        return;
                    }
                    KeyCode::Char('?') => {
                        self.help.toggle();
                        return;
                    }
                    _ => {}
                }

                self.card.handle_key(key)
            }
            Event::Mouse(mouse) => {
                if self.help.visible {
                    return;
                }
                self.card.handle_mouse(mouse)
            }
            _ => None,
        };

        if let Some(event) = app_event {
            self.handle_app_event(event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CardLoaded(state) => {
                tracing::info!(account = %state.account, "change card loaded");
                self.status_bar.loading = false;
                self.header.account = state.account.clone();
                self.card.commit(MountOutcome::Loaded(state));
            }
            AppEvent::AccountUnavailable => {
                self.status_bar.loading = false;
                self.status_bar.account_error = true;
                self.card.commit(MountOutcome::NoAccount);
            }
            AppEvent::Interact(action) => {
                let Some(contract) = self.card.state.contract.clone() else {
                    self.card.transaction_failed();
                    return;
                };
                self.status_bar.error_message = None;
                self.status_bar.notice = None;
                self.data_service.send_action(contract, action);
            }
            AppEvent::TransactionConfirmed { action, hash, state } => {
                tracing::info!(%action, %hash, state = state.as_u8(), "transaction confirmed");
                self.card.transaction_confirmed(state);
                self.status_bar.notice = Some(format!(
                    "{action} confirmed in {hash}, change is now {}",
                    state.label()
                ));
            }
            AppEvent::TransactionFailed(msg) => {
                self.card.transaction_failed();
                self.status_bar.error_message = Some(msg);
            }
            AppEvent::Error(msg) => {
                self.status_bar.error_message = Some(msg);
                self.status_bar.loading = false;
            }
        }
    }
}
