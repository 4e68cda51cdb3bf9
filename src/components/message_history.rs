use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::types::MessageHistoryEntry;
use crate::theme::THEME;
use crate::utils;

/// Review conversation, oldest first.
pub struct MessageHistory<'a> {
    pub messages: &'a [MessageHistoryEntry],
    pub now: DateTime<Utc>,
}

impl Widget for MessageHistory<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" History ({}) ", self.messages.len()))
            .borders(Borders::ALL)
            .border_style(THEME.border_style());

        if self.messages.is_empty() {
            Paragraph::new("No messages yet")
                .style(THEME.muted_style())
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .messages
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            entry.user.display_name.clone(),
                            THEME.accent_style().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" "),
                        Span::styled(entry.message.clone(), Style::default().fg(THEME.text)),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "  {} ({})",
                            utils::format_date(entry.timestamp),
                            utils::format_time_ago(entry.timestamp, self.now)
                        ),
                        THEME.muted_style(),
                    )),
                ])
            })
            .collect();

        Widget::render(List::new(items).block(block), area, buf);
    }
}
