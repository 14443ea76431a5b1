use crate::tui::action::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Maps KeyEvents to Actions
///
/// Plain printable keys are left unbound so they reach the focused text
/// input; every action sits on a modifier, function or navigation key.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings_list: Vec<KeyBinding>,
    bindings_map: HashMap<KeyPattern, Action>,
}

/// Single keybinding entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub action: Action,
}

/// Pattern for matching key events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_list(vec![
            // Workflow
            KeyBinding::new("F5", Action::Analyze),
            KeyBinding::new("Ctrl+r", Action::Analyze),
            KeyBinding::new("F6", Action::Predict),
            KeyBinding::new("Ctrl+p", Action::Predict),
            // Focus
            KeyBinding::new("Tab", Action::FocusNext),
            KeyBinding::new("BackTab", Action::FocusPrev),
            KeyBinding::new("Shift+BackTab", Action::FocusPrev),
            // Chart scrolling
            KeyBinding::new("PageUp", Action::ScrollUp),
            KeyBinding::new("PageDown", Action::ScrollDown),
            // Help
            KeyBinding::new("F1", Action::ToggleHelp),
            // Application
            KeyBinding::new("Enter", Action::Confirm),
            KeyBinding::new("Esc", Action::Cancel),
            KeyBinding::new("Ctrl+c", Action::Quit),
            KeyBinding::new("Ctrl+q", Action::Quit),
        ])
    }
}

impl KeyBindings {
    fn from_list(bindings_list: Vec<KeyBinding>) -> Self {
        let bindings_map = Self::build_map(&bindings_list);
        Self {
            bindings_list,
            bindings_map,
        }
    }

    /// Default bindings with `overrides` layered on top
    ///
    /// An override replaces whatever the same key was bound to before.
    pub fn with_overrides(overrides: &[KeyBinding]) -> Self {
        let mut list = Self::default().bindings_list;
        for binding in overrides {
            let pattern = KeyPattern::from_string(&binding.key).ok();
            list.retain(|b| KeyPattern::from_string(&b.key).ok() != pattern);
            list.push(binding.clone());
        }
        Self::from_list(list)
    }

    /// Build hashmap from bindings list
    fn build_map(bindings: &[KeyBinding]) -> HashMap<KeyPattern, Action> {
        bindings
            .iter()
            .filter_map(|b| {
                KeyPattern::from_string(&b.key)
                    .ok()
                    .map(|pattern| (pattern, b.action))
            })
            .collect()
    }

    /// Get action for key event
    pub fn get_action(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings_map.get(&KeyPattern::from_event(key)).copied()
    }

    /// Get all bindings for an action (for help display)
    pub fn get_keys_for_action(&self, action: Action) -> Vec<String> {
        self.bindings_list
            .iter()
            .filter(|b| b.action == action)
            .map(|b| b.key.clone())
            .collect()
    }

    /// Footer text such as `F5: Analyze  F6: Predict`
    pub fn instructions(&self, actions: &[Action]) -> String {
        actions
            .iter()
            .filter_map(|action| {
                self.get_keys_for_action(*action)
                    .first()
                    .map(|key| format!("{key}: {}", action.label()))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Validate bindings and return warnings
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut seen_keys: HashMap<&str, Action> = HashMap::new();
        for binding in &self.bindings_list {
            if let Some(existing_action) = seen_keys.insert(&binding.key, binding.action) {
                warnings.push(format!(
                    "Duplicate key '{}': bound to both {:?} and {:?}",
                    binding.key, existing_action, binding.action
                ));
            }
            if KeyPattern::from_string(&binding.key).is_err() {
                warnings.push(format!(
                    "Invalid key pattern '{}' for action {:?}",
                    binding.key, binding.action
                ));
            }
        }

        let bound: HashSet<Action> = self.bindings_list.iter().map(|b| b.action).collect();
        let unbound: Vec<String> = Action::all()
            .into_iter()
            .filter(|action| !bound.contains(action))
            .map(|action| format!("{action:?}"))
            .collect();
        if !unbound.is_empty() {
            warnings.push(format!(
                "{} action(s) have no keybindings: {}",
                unbound.len(),
                unbound.join(", ")
            ));
        }

        warnings
    }
}

impl KeyBinding {
    pub fn new(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            action,
        }
    }
}

impl KeyPattern {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }

    /// Parse from string (e.g., "Ctrl+r", "F5", "Shift+BackTab")
    pub fn from_string(s: &str) -> Result<Self, String> {
        let mut parts: Vec<&str> = s.split('+').collect();
        let key_part = parts
            .pop()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| format!("Empty key: {s}"))?;

        let mut modifiers = KeyModifiers::empty();
        for part in parts {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return Err(format!("Unknown modifier: {part}")),
            }
        }

        let lower = key_part.to_lowercase();
        let code = match lower.as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            single if single.chars().count() == 1 => {
                KeyCode::Char(single.chars().next().unwrap_or(' '))
            }
            function if function.starts_with('f') => match function[1..].parse::<u8>() {
                Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                _ => return Err(format!("Invalid function key: {key_part}")),
            },
            _ => return Err(format!("Unknown key: {key_part}")),
        };

        Ok(Self { code, modifiers })
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) && self.code != KeyCode::BackTab {
            parts.push("Shift".to_string());
        }

        parts.push(match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });

        write!(f, "{}", parts.join("+"))
    }
}
