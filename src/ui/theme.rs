//! Color themes

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub background: Color,
    pub status_bg: Color,
}

impl Theme {
    pub const NORMAL: Theme = Theme {
        text: Color::Reset,
        muted: Color::DarkGray,
        accent: Color::Cyan,
        error: Color::Red,
        success: Color::Green,
        border: Color::DarkGray,
        background: Color::Reset,
        status_bg: Color::DarkGray,
    };

    pub const HIGH_CONTRAST: Theme = Theme {
        text: Color::White,
        muted: Color::Gray,
        accent: Color::LightYellow,
        error: Color::LightRed,
        success: Color::LightGreen,
        border: Color::White,
        background: Color::Black,
        status_bg: Color::Black,
    };

    pub fn for_contrast(high_contrast: bool) -> Self {
        if high_contrast {
            Self::HIGH_CONTRAST
        } else {
            Self::NORMAL
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Border for a control, highlighted while focused
    pub fn border_style(&self, is_focused: bool, is_invalid: bool) -> Style {
        if is_invalid {
            Style::default().fg(self.error)
        } else if is_focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn focused(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }
}
