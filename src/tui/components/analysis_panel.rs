use crate::core::AnalysisResult;
use crate::tui::{Action, Component, Theme};
use crate::viz::{self, RenderedChart};
use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;

/// Step 2: data-quality summary and the PCA projection
pub struct AnalysisPanel {
    analysis: Option<Arc<AnalysisResult>>,
    pca_chart: Option<RenderedChart>,
    theme: Theme,
}

impl AnalysisPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            analysis: None,
            pca_chart: None,
            theme,
        }
    }

    /// Show `analysis`; the PCA chart is rebuilt only when the result changes
    pub fn set_analysis(&mut self, analysis: Option<Arc<AnalysisResult>>) {
        let unchanged = match (&self.analysis, &analysis) {
            (Some(old), Some(new)) => Arc::ptr_eq(old, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.pca_chart = analysis
            .as_ref()
            .and_then(|a| a.pca_result.as_ref())
            .and_then(viz::render_pca);
        self.analysis = analysis;
    }

    pub fn pca_chart(&self) -> Option<&RenderedChart> {
        self.pca_chart.as_ref()
    }

    /// Summary text, one entry per line
    pub fn summary_lines(&self) -> Vec<String> {
        let Some(analysis) = &self.analysis else {
            return Vec::new();
        };

        let mut lines = vec![
            format!("Total Rows: {}", analysis.total_rows),
            format!("Total Columns: {}", analysis.total_columns),
            format!("Is Clean: {}", if analysis.is_clean { "Yes" } else { "No" }),
        ];
        if !analysis.is_clean && !analysis.noise_types.is_empty() {
            lines.push(format!("Noise: {}", analysis.noise_types.join(", ")));
        }
        if let Some(ratios) = analysis
            .pca_result
            .as_ref()
            .and_then(|p| p.explained_variance_ratio.as_deref())
            .filter(|r| !r.is_empty())
        {
            lines.push(format!(
                "Explained variance: {}",
                viz::explained_variance_label(ratios)
            ));
        }
        lines
    }
}

impl Component for AnalysisPanel {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" 2. Analysis Results ", self.theme.title_style()))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self
            .summary_lines()
            .into_iter()
            .map(|text| Line::from(Span::styled(text, self.theme.normal_style())))
            .collect();
        let summary_height = lines.len() as u16;

        let Some(chart) = &self.pca_chart else {
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(summary_height), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(lines), rows[0]);

        let chart_block = Block::default()
            .title(chart.title.as_str())
            .borders(Borders::TOP)
            .border_style(self.theme.border_style());
        frame.render_widget(chart.widget(chart_block, &self.theme), rows[1]);
    }

    fn supported_actions(&self) -> &[Action] {
        &[]
    }
}
