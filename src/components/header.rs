use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub account: String,
    pub rpc_url: String,
}

impl Header {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            account: String::new(),
            rpc_url: rpc_url.into(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background for the entire header bar
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(0)])
            .split(area);

        // Left: App title
        let title = Paragraph::new(Span::styled(
            " choreography-tui",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        // Right: account and endpoint
        let account = if self.account.is_empty() {
            Span::styled("no account", THEME.muted_style())
        } else {
            Span::styled(utils::truncate_id(&self.account), THEME.address_style())
        };
        let info = Line::from(vec![
            account,
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(self.rpc_url.as_str(), Style::default().fg(THEME.text)),
            Span::raw(" "),
        ]);
        let info_paragraph = Paragraph::new(info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(info_paragraph, chunks[1]);
    }
}
