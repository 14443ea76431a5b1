use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// All possible actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Workflow
    Analyze,
    Predict,

    // Navigation
    FocusNext,
    FocusPrev,
    ScrollUp,
    ScrollDown,

    // View
    ToggleHelp,

    // Application
    Confirm,
    Cancel,
    Quit,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::Analyze => "Analyze the staged file",
            Action::Predict => "Run the prediction query",
            Action::FocusNext => "Focus next input",
            Action::FocusPrev => "Focus previous input",
            Action::ScrollUp => "Scroll charts up",
            Action::ScrollDown => "Scroll charts down",
            Action::ToggleHelp => "Toggle help screen",
            Action::Confirm => "Stage file / submit query",
            Action::Cancel => "Dismiss error or close help",
            Action::Quit => "Quit application",
        }
    }

    /// Short label for the footer
    pub fn label(&self) -> &'static str {
        match self {
            Action::Analyze => "Analyze",
            Action::Predict => "Predict",
            Action::FocusNext => "Next",
            Action::FocusPrev => "Prev",
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::ToggleHelp => "Help",
            Action::Confirm => "Submit",
            Action::Cancel => "Dismiss",
            Action::Quit => "Quit",
        }
    }

    /// Get category for grouping in help screen
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::Analyze | Action::Predict => ActionCategory::Workflow,
            Action::FocusNext | Action::FocusPrev | Action::ScrollUp | Action::ScrollDown => {
                ActionCategory::Navigation
            }
            Action::ToggleHelp => ActionCategory::View,
            Action::Confirm | Action::Cancel | Action::Quit => ActionCategory::Application,
        }
    }

    /// Get all possible actions (for validation)
    pub fn all() -> Vec<Action> {
        Action::iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ActionCategory {
    Workflow,
    Navigation,
    View,
    Application,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Workflow => write!(f, "Workflow"),
            ActionCategory::Navigation => write!(f, "Navigation"),
            ActionCategory::View => write!(f, "View"),
            ActionCategory::Application => write!(f, "Application"),
        }
    }
}
