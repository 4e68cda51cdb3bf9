use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::button_widget::ButtonWidget;
use crate::data::contract::ChoreographyInstance;
use crate::data::types::{ChangeState, ContractAction};
use crate::events::AppEvent;
use crate::theme::THEME;

/// Props passed down by the change card.
#[derive(Clone, Copy)]
pub struct InteractionProps<'a> {
    pub contract: Option<&'a Arc<dyn ChoreographyInstance>>,
    pub contract_state: ChangeState,
}

/// Approve/reject controls for the deployed contract.
pub struct ContractInteractionWidget {
    pub focused: usize,
    /// Action whose transaction has not been mined yet.
    pub pending: Option<ContractAction>,
    buttons_area: Rect,
}

impl ContractInteractionWidget {
    pub fn new() -> Self {
        Self {
            focused: 0,
            pending: None,
            buttons_area: Rect::default(),
        }
    }

    fn buttons(&self, props: InteractionProps) -> Option<ButtonWidget<ContractAction>> {
        props.contract?;
        if self.pending.is_some() || props.contract_state != ChangeState::Ready {
            return None;
        }
        Some(
            ButtonWidget::new("Approve", ContractAction::Approve)
                .second_text("Reject")
                .second_on_click(ContractAction::Reject)
                .focused(Some(self.focused)),
        )
    }

    fn submit(&mut self, action: ContractAction) -> Option<AppEvent> {
        self.pending = Some(action);
        Some(AppEvent::Interact(action))
    }

    pub fn handle_key(&mut self, key: KeyEvent, props: InteractionProps) -> Option<AppEvent> {
        let buttons = self.buttons(props)?;
        let count = buttons.buttons().len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.focused = self.focused.checked_sub(1).unwrap_or(count - 1);
                None
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.focused = (self.focused + 1) % count;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let action = buttons.click(self.focused)?;
                self.submit(action)
            }
            KeyCode::Char('a') => self.submit(ContractAction::Approve),
            KeyCode::Char('r') => self.submit(ContractAction::Reject),
            _ => None,
        }
    }

    pub fn handle_click(&mut self, column: u16, row: u16, props: InteractionProps) -> Option<AppEvent> {
        let buttons = self.buttons(props)?;
        let action = buttons.click_at(self.buttons_area, column, row)?;
        self.submit(action)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, props: InteractionProps) {
        let block = Block::default()
            .title(" Contract ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(contract) = props.contract else {
            self.buttons_area = Rect::default();
            let text = Paragraph::new("No contract loaded")
                .style(THEME.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(text, inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let state_style = match props.contract_state {
            ChangeState::Ready => THEME.accent_style(),
            ChangeState::Approved => THEME.success_style(),
            ChangeState::Rejected => THEME.error_style(),
            ChangeState::Unknown(_) => Style::default().fg(THEME.warning),
        };
        let header = Line::from(vec![
            Span::styled(" Address: ", THEME.muted_style()),
            Span::styled(contract.address().to_string(), THEME.address_style()),
            Span::styled("  State: ", THEME.muted_style()),
            Span::styled(props.contract_state.label(), state_style.add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        if let Some(action) = self.pending {
            self.buttons_area = Rect::default();
            let text = Paragraph::new(format!(" Sending {action} transaction..."))
                .style(THEME.muted_style());
            frame.render_widget(text, chunks[1]);
            return;
        }

        match self.buttons(props) {
            Some(buttons) => {
                self.buttons_area = chunks[1];
                frame.render_widget(&buttons, chunks[1]);
            }
            None => {
                self.buttons_area = Rect::default();
                let text = match props.contract_state {
                    ChangeState::Approved => " This change has been approved",
                    ChangeState::Rejected => " This change has been rejected",
                    _ => " No actions available in this state",
                };
                frame.render_widget(Paragraph::new(text).style(THEME.muted_style()), chunks[1]);
            }
        }
    }
}

impl Default for ContractInteractionWidget {
    fn default() -> Self {
        Self::new()
    }
}
