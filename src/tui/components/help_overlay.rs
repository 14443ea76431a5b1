use crate::tui::{Action, ActionCategory, Component, KeyBindings, Theme};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use strum::IntoEnumIterator;

/// Key binding reference, grouped by category
pub struct HelpOverlay {
    lines: Vec<(String, String)>,
    theme: Theme,
}

impl HelpOverlay {
    pub fn new(keybindings: &KeyBindings, theme: Theme) -> Self {
        let mut lines = Vec::new();
        for category in ActionCategory::iter() {
            lines.push((category.to_string(), String::new()));
            for action in Action::all().into_iter().filter(|a| a.category() == category) {
                let keys = keybindings.get_keys_for_action(action);
                if keys.is_empty() {
                    continue;
                }
                lines.push((format!("  {}", keys.join(", ")), action.description().to_string()));
            }
        }
        Self { lines, theme }
    }

    /// `(keys, description)` rows; category headings have no description
    pub fn entries(&self) -> &[(String, String)] {
        &self.lines
    }
}

impl Component for HelpOverlay {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        Ok(matches!(action, Action::ToggleHelp | Action::Cancel))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let key_width = self.lines.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 2;
        let lines: Vec<Line> = self
            .lines
            .iter()
            .map(|(keys, description)| {
                if description.is_empty() {
                    Line::from(Span::styled(keys.clone(), self.theme.title_style()))
                } else {
                    Line::from(vec![
                        Span::styled(format!("{keys:<key_width$}"), self.theme.info_style()),
                        Span::styled(description.clone(), self.theme.normal_style()),
                    ])
                }
            })
            .collect();

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(self.theme.focused_border_style());
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::ToggleHelp, Action::Cancel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::KeyBinding;

    #[test]
    fn test_lists_bound_actions() {
        let overlay = HelpOverlay::new(&KeyBindings::default(), Theme::default());
        let entries = overlay.entries();

        assert_eq!(entries[0], ("Workflow".to_string(), String::new()));
        assert!(entries.contains(&(
            "  F5, Ctrl+r".to_string(),
            "Analyze the staged file".to_string()
        )));
    }

    #[test]
    fn test_reflects_overrides() {
        let bindings = KeyBindings::with_overrides(&[KeyBinding::new("F2", Action::ToggleHelp)]);
        let overlay = HelpOverlay::new(&bindings, Theme::default());
        assert!(overlay.entries().iter().any(|(k, _)| k == "  F1, F2"));
    }

    #[test]
    fn test_closes_on_toggle_or_cancel() {
        let mut overlay = HelpOverlay::new(&KeyBindings::default(), Theme::default());
        assert!(overlay.handle_action(Action::Cancel).unwrap());
        assert!(overlay.handle_action(Action::ToggleHelp).unwrap());
        assert!(!overlay.handle_action(Action::Analyze).unwrap());
    }
}
