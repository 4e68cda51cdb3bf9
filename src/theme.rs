use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub bg: Color,
    pub surface: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_accent: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub border: Color,
    pub border_focused: Color,
    pub button_bg: Color,
    pub button_focused_bg: Color,
    pub address_color: Color,
    pub date_color: Color,
}

pub const THEME: Theme = Theme {
    bg: Color::Rgb(16, 16, 28),
    surface: Color::Rgb(24, 24, 40),
    surface_bright: Color::Rgb(36, 36, 56),
    text: Color::Rgb(220, 220, 230),
    text_muted: Color::Rgb(120, 120, 140),
    text_accent: Color::Cyan,
    success: Color::Green,
    error: Color::Red,
    warning: Color::Yellow,
    border: Color::Rgb(60, 60, 80),
    border_focused: Color::Cyan,
    button_bg: Color::Rgb(40, 60, 100),
    button_focused_bg: Color::Rgb(0, 120, 160),
    address_color: Color::Rgb(255, 179, 71),
    date_color: Color::Rgb(150, 150, 180),
};

impl Theme {
    pub const fn header_style(&self) -> Style {
        Style::new().fg(self.text).bg(self.surface)
    }

    pub const fn border_style(&self) -> Style {
        Style::new().fg(self.border)
    }

    pub const fn border_focused_style(&self) -> Style {
        Style::new().fg(self.border_focused)
    }

    pub const fn muted_style(&self) -> Style {
        Style::new().fg(self.text_muted)
    }

    pub const fn accent_style(&self) -> Style {
        Style::new().fg(self.text_accent)
    }

    pub const fn success_style(&self) -> Style {
        Style::new().fg(self.success)
    }

    pub const fn error_style(&self) -> Style {
        Style::new().fg(self.error)
    }

    pub const fn address_style(&self) -> Style {
        Style::new().fg(self.address_color)
    }

    pub const fn date_style(&self) -> Style {
        Style::new().fg(self.date_color)
    }

    pub const fn button_style(&self) -> Style {
        Style::new().fg(self.text).bg(self.button_bg)
    }

    pub const fn button_focused_style(&self) -> Style {
        Style::new()
            .fg(Color::White)
            .bg(self.button_focused_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub const fn title_style(&self) -> Style {
        Style::new().fg(self.text).bg(self.surface_bright).add_modifier(Modifier::BOLD)
    }
}
