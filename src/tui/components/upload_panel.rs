use crate::tui::components::button;
use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::PathBuf;
use tui_textarea::{Input, Key, TextArea};

/// Feedback shown under the path input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadHint {
    Info(String),
    Error(String),
}

/// Step 1: pick a file by path and trigger the analysis
pub struct UploadPanel {
    input: TextArea<'static>,
    focused: bool,
    /// Description of the staged file, if any
    staged: Option<String>,
    hint: Option<UploadHint>,
    can_analyze: bool,
    analyzing: bool,
    theme: Theme,
}

impl UploadPanel {
    pub fn new(theme: Theme) -> Self {
        let mut input = TextArea::default();
        input.set_placeholder_text("path/to/data.csv");
        input.set_cursor_line_style(ratatui::style::Style::default());

        Self {
            input,
            focused: false,
            staged: None,
            hint: None,
            can_analyze: false,
            analyzing: false,
            theme,
        }
    }

    /// Trimmed content of the path input, `None` when blank
    pub fn path(&self) -> Option<PathBuf> {
        let text = self.input.lines().join("");
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    pub fn set_path(&mut self, path: &str) {
        self.input = TextArea::from(vec![path.to_string()]);
        self.input.set_placeholder_text("path/to/data.csv");
        self.input.set_cursor_line_style(ratatui::style::Style::default());
        self.input.move_cursor(tui_textarea::CursorMove::End);
    }

    pub fn set_hint(&mut self, hint: Option<UploadHint>) {
        self.hint = hint;
    }

    pub fn hint(&self) -> Option<&UploadHint> {
        self.hint.as_ref()
    }

    /// Refresh from the session before drawing
    pub fn sync(&mut self, staged: Option<String>, can_analyze: bool, analyzing: bool) {
        self.staged = staged;
        self.can_analyze = can_analyze;
        self.analyzing = analyzing;
    }

    pub fn button_label(&self) -> &'static str {
        if self.analyzing {
            "Analyzing..."
        } else {
            "Analyze"
        }
    }
}

impl Component for UploadPanel {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        // Confirm and Analyze touch the session, so the app owns them
        Ok(false)
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let input = Input::from(key);
        match input {
            // Single-line input
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
            .title(Span::styled(" 1. Upload Data ", self.theme.title_style()))
            .borders(Borders::ALL)
            .border_style(self.theme.panel_border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let mut input = self.input.clone();
        input.set_block(
            Block::default()
                .title("File path")
                .borders(Borders::ALL)
                .border_style(self.theme.panel_border(self.focused)),
        );
        if !self.focused {
            input.set_cursor_style(self.theme.muted_style());
        }
        frame.render_widget(&input, rows[0]);

        let staged = match &self.staged {
            Some(description) => Line::from(vec![
                Span::styled("Staged: ", self.theme.muted_style()),
                Span::styled(description.clone(), self.theme.normal_style()),
            ]),
            None => Line::from(Span::styled("No file staged", self.theme.muted_style())),
        };
        frame.render_widget(Paragraph::new(staged), rows[1]);

        if let Some(hint) = &self.hint {
            let line = match hint {
                UploadHint::Info(text) => Span::styled(text.clone(), self.theme.success_style()),
                UploadHint::Error(text) => Span::styled(text.clone(), self.theme.error_style()),
            };
            frame.render_widget(Paragraph::new(Line::from(line)), rows[2]);
        }

        frame.render_widget(
            Paragraph::new(button(self.button_label(), self.can_analyze, &self.theme)),
            rows[3],
        );
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::Confirm, Action::Analyze]
    }
}

impl Focusable for UploadPanel {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
