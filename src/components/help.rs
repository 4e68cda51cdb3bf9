use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Review",
        &[
            ("\u{2190}/h", "Focus previous button"),
            ("\u{2192}/l", "Focus next button"),
            ("Tab", "Cycle buttons"),
            ("Enter", "Press focused button"),
            ("a", "Approve change"),
            ("r", "Reject change"),
            ("Mouse", "Click a button"),
        ],
    ),
    (
        "Other",
        &[("?", "Toggle this help"), ("q", "Quit"), ("Ctrl+C", "Quit")],
    ),
];

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 50 / 100;
        let popup_height = area.height * 60 / 100;
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let mut help_text = Vec::new();
        for (section, keys) in SHORTCUTS {
            if !help_text.is_empty() {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                *section,
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, action) in *keys {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {key:<9}"), Style::default().fg(THEME.text_accent)),
                    Span::styled(*action, Style::default().fg(THEME.text)),
                ]));
            }
        }

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
