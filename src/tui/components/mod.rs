pub mod analysis_panel;
pub mod error_banner;
pub mod help_overlay;
pub mod prediction_panel;
pub mod query_panel;
pub mod upload_panel;

pub use analysis_panel::AnalysisPanel;
pub use error_banner::ErrorBanner;
pub use help_overlay::HelpOverlay;
pub use prediction_panel::PredictionPanel;
pub use query_panel::QueryPanel;
pub use upload_panel::{UploadHint, UploadPanel};

use crate::tui::Theme;
use ratatui::text::{Line, Span};

/// `[ Label ]` trigger, dimmed while disabled
pub(crate) fn button(label: &str, enabled: bool, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("[ {label} ]"),
        theme.button_style(enabled),
    ))
}
