use chrono::Utc;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::task::JoinHandle;

use crate::components::Component;
use crate::components::contract_interaction::{ContractInteractionWidget, InteractionProps};
use crate::components::message_history::MessageHistory;
use crate::components::stacked::{StackedDate, StackedUser};
use crate::data::DataService;
use crate::data::change::{ChangeCardState, MountOutcome};
use crate::data::types::ChangeState;
use crate::events::AppEvent;
use crate::theme::THEME;

const PREVIEW_URL: &str = "https://bpmn.io/assets/attachments/blog/2016/019-colors.png";
const CHANGE_DESCRIPTION: &str = "New Design for the current change card";

/// Page showing a single change proposal and its review controls.
pub struct ChangeCard {
    pub state: ChangeCardState,
    pub interaction: ContractInteractionWidget,
    mount_task: Option<JoinHandle<()>>,
}

impl ChangeCard {
    pub fn new() -> Self {
        Self {
            state: ChangeCardState::default(),
            interaction: ContractInteractionWidget::new(),
            mount_task: None,
        }
    }

    /// Start initialization. Later calls are ignored, the card mounts once.
    pub fn mount(&mut self, data_service: &DataService) {
        if self.mount_task.is_some() {
            return;
        }
        self.mount_task = Some(data_service.mount_card());
    }

    pub fn is_mounted(&self) -> bool {
        self.mount_task.is_some()
    }

    pub fn commit(&mut self, outcome: MountOutcome) {
        self.state.commit(outcome);
        self.interaction.focused = 0;
        self.interaction.pending = None;
    }

    /// A transaction was mined and `state` was read back from the contract.
    pub fn transaction_confirmed(&mut self, state: ChangeState) {
        self.state.state = state;
        self.interaction.pending = None;
    }

    /// A transaction failed; the controls unlock with the previous state.
    pub fn transaction_failed(&mut self) {
        self.interaction.pending = None;
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> Option<AppEvent> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let props = InteractionProps {
            contract: self.state.contract.as_ref(),
            contract_state: self.state.state,
        };
        self.interaction.handle_click(event.column, event.row, props)
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Changed model ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("[ diagram preview ]", THEME.accent_style())),
            Line::from(""),
            Line::from(Span::styled(PREVIEW_URL, THEME.muted_style())),
        ];
        let preview = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(preview, area);
    }
}

impl Default for ChangeCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ChangeCard {
    fn drop(&mut self) {
        // A result arriving after teardown must not be applied anywhere.
        if let Some(task) = self.mount_task.take() {
            task.abort();
        }
    }
}

impl Component for ChangeCard {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        let props = InteractionProps {
            contract: self.state.contract.as_ref(),
            contract_state: self.state.state,
        };
        self.interaction.handle_key(key, props)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let card = Block::default()
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());
        let inner = card.inner(area);
        frame.render_widget(card, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(inner);

        // Left: preview image with date and proposer underneath
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(columns[0]);
        self.render_preview(frame, left[0]);

        let footer = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(left[1].inner(Margin::new(1, 0)));
        frame.render_widget(
            StackedDate {
                timestamp: &self.state.timestamp,
            },
            footer[0],
        );
        frame.render_widget(
            StackedUser {
                user: &self.state.proposer,
            },
            footer[1],
        );

        // Right: description, history and contract controls
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(4),
                Constraint::Length(7),
            ])
            .split(columns[1]);

        let title = Paragraph::new(Line::from(Span::styled(
            format!(" {CHANGE_DESCRIPTION}"),
            THEME.title_style(),
        )));
        frame.render_widget(title, right[0]);

        frame.render_widget(
            MessageHistory {
                messages: &self.state.messages,
                now: Utc::now(),
            },
            right[1],
        );

        let props = InteractionProps {
            contract: self.state.contract.as_ref(),
            contract_state: self.state.state,
        };
        self.interaction.render(frame, right[2], props);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::Address;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    use super::*;
    use crate::data::change::tests::{FakeBackend, loader};
    use crate::data::types::ContractAction;

    fn screen(card: &mut ChangeCard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal
            .draw(|frame| card.render(frame, frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    async fn loaded_card() -> ChangeCard {
        let backend = Arc::new(FakeBackend::with_accounts(vec![Address::from_slice(
            &[0x11; 20],
        )]));
        let outcome = loader(backend).initialize().await.unwrap();
        let mut card = ChangeCard::new();
        card.commit(outcome);
        card
    }

    #[test]
    fn test_default_card_renders_placeholders() {
        let mut card = ChangeCard::new();
        let text = screen(&mut card);
        assert!(text.contains(CHANGE_DESCRIPTION));
        assert!(text.contains("Unknown proposer"));
        assert!(text.contains("No messages yet"));
        assert!(text.contains("No contract loaded"));
    }

    #[test]
    fn test_account_error_does_not_change_layout() {
        let mut card = ChangeCard::new();
        card.commit(MountOutcome::NoAccount);
        assert!(card.state.account_error);
        let text = screen(&mut card);
        assert!(text.contains("No contract loaded"));
    }

    #[tokio::test]
    async fn test_loaded_card_renders_change() {
        let mut card = loaded_card().await;
        let text = screen(&mut card);
        assert!(text.contains("friedow"));
        assert!(text.contains("MaximilianV"));
        assert!(text.contains("bptlab"));
        assert!(text.contains("History (3)"));
        assert!(text.contains("READY"));
        assert!(text.contains("Approve"));
        assert!(text.contains("Reject"));
    }

    #[tokio::test]
    async fn test_keys_reach_interaction_widget() {
        let mut card = loaded_card().await;
        let event = card.handle_key(KeyEvent::from(crossterm::event::KeyCode::Enter));
        assert!(matches!(event, Some(AppEvent::Interact(ContractAction::Approve))));

        // Locked until the confirmation arrives
        let second = card.handle_key(KeyEvent::from(crossterm::event::KeyCode::Char('r')));
        assert!(second.is_none());

        card.transaction_confirmed(ChangeState::Approved);
        let after = card.handle_key(KeyEvent::from(crossterm::event::KeyCode::Char('r')));
        assert!(after.is_none());
        assert!(card.interaction.pending.is_none());
        let text = screen(&mut card);
        assert!(text.contains("APPROVED"));
        assert!(!text.contains("Reject"));
    }

    #[tokio::test]
    async fn test_mount_runs_once() {
        let backend = Arc::new(FakeBackend::with_accounts(Vec::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = DataService::new(loader(backend), tx);
        let mut card = ChangeCard::new();

        card.mount(&service);
        card.mount(&service);
        assert!(card.is_mounted());

        assert!(matches!(rx.recv().await, Some(AppEvent::AccountUnavailable)));
        drop(service);
        drop(card);
        assert!(rx.recv().await.is_none());
    }
}
