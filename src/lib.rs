#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_match)]
#![allow(clippy::collapsible_else_if)]

pub mod config;
pub mod core;
pub mod errors;
pub mod logging;
pub mod services;
pub mod terminal;
pub mod tui;
pub mod viz;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::core::{Stage, Workflow};
pub use services::{AnalysisService, HttpAnalysisService, RequestDispatcher};
pub use tui::{Action, ActionCategory, App};
