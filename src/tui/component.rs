use crate::tui::action::Action;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Base trait for the panels of the workflow screen
///
/// Panels receive the actions the app does not consume itself and draw
/// from a snapshot of the session the app hands them before each frame.
pub trait Component {
    /// Handle an action
    ///
    /// Returns Ok(true) if the action was handled and consumed.
    /// Returns Ok(false) if the action was not handled and should propagate.
    /// Returns Err if handling the action resulted in an error.
    fn handle_action(&mut self, action: Action) -> Result<bool>;

    /// Render the component to the terminal
    ///
    /// Components are responsible for rendering themselves within the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Actions this component reacts to
    ///
    /// Drives the footer hints for the focused panel.
    fn supported_actions(&self) -> &[Action];

    /// Raw key press for components holding a text input
    ///
    /// Returns true when the key was consumed. Only keys without a binding
    /// reach this.
    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }
}

/// Components that take keyboard input when focused
pub trait Focusable: Component {
    /// Check if component currently has focus
    fn is_focused(&self) -> bool;

    /// Set focus state
    fn set_focused(&mut self, focused: bool);
}
