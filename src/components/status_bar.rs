use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct StatusBar {
    pub loading: bool,
    pub account_error: bool,
    pub error_message: Option<String>,
    pub notice: Option<String>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            loading: false,
            account_error: false,
            error_message: None,
            notice: None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(24)])
            .split(area);

        // --- Left side ---
        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.as_str(), Style::default().fg(THEME.warning)),
            ])
        } else if self.account_error {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "No account available. Unlock an account in your node and restart.",
                    Style::default().fg(THEME.warning),
                ),
            ])
        } else if self.loading {
            Line::from(Span::styled(
                " Deploying change contract...",
                Style::default().fg(THEME.text_accent),
            ))
        } else if let Some(ref notice) = self.notice {
            Line::from(Span::styled(
                format!(" {notice}"),
                Style::default().fg(THEME.success),
            ))
        } else {
            Line::from(vec![
                Span::styled(" \u{2190}\u{2192}", Style::default().fg(THEME.text_accent)),
                Span::styled(":Focus  ", Style::default().fg(THEME.text_muted)),
                Span::styled("Enter", Style::default().fg(THEME.text_accent)),
                Span::styled(":Press  ", Style::default().fg(THEME.text_muted)),
                Span::styled("?", Style::default().fg(THEME.text_accent)),
                Span::styled(":Help  ", Style::default().fg(THEME.text_muted)),
                Span::styled("q", Style::default().fg(THEME.text_accent)),
                Span::styled(":Quit", Style::default().fg(THEME.text_muted)),
            ])
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        // --- Right side: connection status ---
        let (dot_color, status_text) = if self.error_message.is_some() || self.account_error {
            (THEME.error, "Error")
        } else if self.loading {
            (THEME.warning, "Loading")
        } else {
            (THEME.success, "Ready")
        };

        let right_content = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::raw(" "),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
