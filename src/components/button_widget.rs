use ratatui::layout::Flex;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

const BUTTON_HEIGHT: u16 = 3;
const BUTTON_PADDING: u16 = 4;
const BUTTON_SPACING: u16 = 2;

/// One or two labelled buttons. Each button hands back the message its parent
/// supplied when it is clicked; the widget itself keeps no state.
#[derive(Debug, Clone)]
pub struct ButtonWidget<M> {
    first_text: String,
    first_on_click: M,
    second_text: Option<String>,
    second_on_click: Option<M>,
    focused: Option<usize>,
}

impl<M: Clone> ButtonWidget<M> {
    pub fn new(first_text: impl Into<String>, first_on_click: M) -> Self {
        Self {
            first_text: first_text.into(),
            first_on_click,
            second_text: None,
            second_on_click: None,
            focused: None,
        }
    }

    /// Show a second button. Without this no second button is rendered.
    pub fn second_text(mut self, text: impl Into<String>) -> Self {
        self.second_text = Some(text.into());
        self
    }

    pub fn second_on_click(mut self, on_click: M) -> Self {
        self.second_on_click = Some(on_click);
        self
    }

    /// Highlight the button at `index` for keyboard users.
    pub fn focused(mut self, index: Option<usize>) -> Self {
        self.focused = index;
        self
    }

    /// Labels of the buttons that will be rendered, in order.
    pub fn buttons(&self) -> Vec<&str> {
        let mut labels = vec![self.first_text.as_str()];
        if let Some(ref second) = self.second_text {
            labels.push(second.as_str());
        }
        labels
    }

    pub fn button_areas(&self, area: Rect) -> Vec<Rect> {
        let row = Rect {
            height: area.height.min(BUTTON_HEIGHT),
            ..area
        };
        let constraints = self
            .buttons()
            .into_iter()
            .map(|label| Constraint::Length(Line::from(label).width() as u16 + BUTTON_PADDING));
        Layout::horizontal(constraints)
            .spacing(BUTTON_SPACING)
            .flex(Flex::Start)
            .split(row)
            .to_vec()
    }

    /// Message of the button at `index`, if that button exists and has a handler.
    pub fn click(&self, index: usize) -> Option<M> {
        match index {
            0 => Some(self.first_on_click.clone()),
            1 if self.second_text.is_some() => self.second_on_click.clone(),
            _ => None,
        }
    }

    /// Message of the button under a mouse position, given the area the widget was rendered in.
    pub fn click_at(&self, area: Rect, column: u16, row: u16) -> Option<M> {
        let position = Position::new(column, row);
        self.button_areas(area)
            .iter()
            .position(|rect| rect.contains(position))
            .and_then(|index| self.click(index))
    }
}

impl<M: Clone> Widget for &ButtonWidget<M> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, (label, rect)) in self
            .buttons()
            .into_iter()
            .zip(self.button_areas(area))
            .enumerate()
        {
            let style = if self.focused == Some(index) {
                THEME.button_focused_style()
            } else {
                THEME.button_style()
            };
            let border = if self.focused == Some(index) {
                THEME.border_focused_style()
            } else {
                THEME.border_style()
            };
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(style)
                .block(Block::bordered().border_style(border))
                .render(rect, buf);
        }
    }
}
