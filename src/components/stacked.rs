use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::types::User;
use crate::theme::THEME;
use crate::utils;

/// Date on one line, time below it.
pub struct StackedDate<'a> {
    pub timestamp: &'a DateTime<Utc>,
}

impl Widget for StackedDate<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                utils::format_date(*self.timestamp),
                THEME.date_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                utils::format_time(*self.timestamp),
                THEME.muted_style(),
            )),
        ];
        Paragraph::new(lines).render(area, buf);
    }
}

/// Display name on one line, shortened public key below it.
pub struct StackedUser<'a> {
    pub user: &'a User,
}

impl Widget for StackedUser<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = if self.user.is_empty() {
            vec![Line::from(Span::styled("Unknown proposer", THEME.muted_style()))]
        } else {
            vec![
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", utils::initials(&self.user.display_name)),
                        THEME.accent_style(),
                    ),
                    Span::styled(
                        self.user.display_name.clone(),
                        Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    utils::truncate_id(&self.user.id),
                    THEME.address_style(),
                )),
            ]
        };
        Paragraph::new(lines).alignment(Alignment::Right).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_stacked_date() {
        let ts = DateTime::from_timestamp(1_543_568_400, 0).unwrap();
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        StackedDate { timestamp: &ts }.render(area, &mut buf);
        let text = text_of(&buf);
        assert!(text.contains("Nov 30, 2018"));
        assert!(text.contains("09:00 UTC"));
    }

    #[test]
    fn test_stacked_user() {
        let user = User::new("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", "friedow");
        let area = Rect::new(0, 0, 24, 2);
        let mut buf = Buffer::empty(area);
        StackedUser { user: &user }.render(area, &mut buf);
        let text = text_of(&buf);
        assert!(text.contains("friedow"));
        assert!(text.contains("0xd8dA6B...6045"));
    }

    #[test]
    fn test_stacked_user_empty() {
        let user = User::empty();
        let area = Rect::new(0, 0, 24, 2);
        let mut buf = Buffer::empty(area);
        StackedUser { user: &user }.render(area, &mut buf);
        assert!(text_of(&buf).contains("Unknown proposer"));
    }
}
