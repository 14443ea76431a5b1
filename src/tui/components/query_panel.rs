use crate::tui::components::button;
use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::{Input, Key, TextArea};

const PLACEHOLDER: &str = "e.g., 'Predict salary based on experience'";

/// Step 3: free-text prediction query
pub struct QueryPanel {
    input: TextArea<'static>,
    focused: bool,
    can_predict: bool,
    predicting: bool,
    theme: Theme,
}

impl QueryPanel {
    pub fn new(theme: Theme) -> Self {
        let mut input = TextArea::default();
        input.set_placeholder_text(PLACEHOLDER);
        input.set_cursor_line_style(Style::default());

        Self {
            input,
            focused: false,
            can_predict: false,
            predicting: false,
            theme,
        }
    }

    /// Query text exactly as typed
    pub fn text(&self) -> String {
        self.input.lines().join("")
    }

    /// Refresh from the session before drawing
    pub fn sync(&mut self, can_predict: bool, predicting: bool) {
        self.can_predict = can_predict;
        self.predicting = predicting;
    }

    pub fn button_label(&self) -> &'static str {
        if self.predicting {
            "Predicting..."
        } else {
            "Predict"
        }
    }
}

impl Component for QueryPanel {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match Input::from(key) {
            Input { key: Key::Enter, .. }
            | Input {
                key: Key::Char('m' | 'j'),
                ctrl: true,
                ..
            } => true,
            input => {
                self.input.input(input);
                true
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" 3. Make a Prediction ", self.theme.title_style()))
            .borders(Borders::ALL)
            .border_style(self.theme.panel_border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        let mut input = self.input.clone();
        input.set_block(
            Block::default()
                .title("Query")
                .borders(Borders::ALL)
                .border_style(self.theme.panel_border(self.focused)),
        );
        if !self.focused {
            input.set_cursor_style(self.theme.muted_style());
        }
        frame.render_widget(&input, rows[0]);

        frame.render_widget(
            Paragraph::new(button(self.button_label(), self.can_predict, &self.theme)),
            rows[1],
        );
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::Confirm, Action::Predict]
    }
}

impl Focusable for QueryPanel {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::test_support::buffer_text;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_text_keeps_whitespace() {
        let mut panel = QueryPanel::new(Theme::default());
        for c in " salary ".chars() {
            panel.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        assert_eq!(panel.text(), " salary ");

        panel.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(panel.text(), " salary");
    }

    #[test]
    fn test_placeholder_and_busy_label() {
        let mut panel = QueryPanel::new(Theme::default());
        panel.sync(false, true);

        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal.draw(|f| panel.render(f, f.area())).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("3. Make a Prediction"));
        assert!(text.contains("Predict salary based on experience"));
        assert!(text.contains("[ Predicting... ]"));
    }
}
