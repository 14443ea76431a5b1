use crate::tui::Theme;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// The single error banner
pub struct ErrorBanner {
    message: Option<String>,
    theme: Theme,
}

impl ErrorBanner {
    pub fn new(theme: Theme) -> Self {
        Self {
            message: None,
            theme,
        }
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    /// Rows needed, zero when hidden
    pub fn height(&self) -> u16 {
        if self.is_visible() { 3 } else { 0 }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, dismiss_hint: &str) {
        let Some(message) = &self.message else {
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.error_style())
            .title_bottom(Span::styled(format!(" {dismiss_hint} "), self.theme.muted_style()));
        let line = Line::from(Span::styled(
            message.clone(),
            self.theme.error_style().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(
            Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}
