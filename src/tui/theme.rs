use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Color scheme for the workflow screen
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI colors
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,

    // Buttons
    pub button_fg: Color,
    pub button_bg: Color,
    pub button_disabled: Color,

    // Charts
    pub chart_points: Color,
    pub chart_axis: Color,

    // Status/feedback colors
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Theme {
    /// Default dark theme
    pub fn default() -> Self {
        Self {
            name: "Default Dark".to_string(),
            background: Color::Reset,
            foreground: Color::Gray,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            title: Color::Cyan,
            button_fg: Color::Black,
            button_bg: Color::Cyan,
            button_disabled: Color::DarkGray,
            chart_points: Color::Magenta,
            chart_axis: Color::Gray,
            success: Color::Green,
            error: Color::Red,
            info: Color::Blue,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::Gray,
            border_focused: Color::Blue,
            title: Color::Blue,
            button_fg: Color::White,
            button_bg: Color::Blue,
            button_disabled: Color::Gray,
            chart_points: Color::Rgb(150, 0, 150),
            chart_axis: Color::DarkGray,
            success: Color::Green,
            error: Color::Red,
            info: Color::Blue,
        }
    }

    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::default(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Border style for a panel depending on focus
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            self.focused_border_style()
        } else {
            self.border_style()
        }
    }

    /// Button style; disabled buttons are dimmed and never bold
    pub fn button_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(self.button_fg)
                .bg(self.button_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.button_disabled)
        }
    }

    pub fn chart_points_style(&self) -> Style {
        Style::default().fg(self.chart_points)
    }

    pub fn chart_axis_style(&self) -> Style {
        Style::default().fg(self.chart_axis)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }
}
