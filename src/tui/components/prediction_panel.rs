use crate::core::PredictionResult;
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

/// Rows given to each chart, borders included
const CHART_HEIGHT: u16 = 14;

/// Step 4: fitted model summary and its charts
pub struct PredictionPanel {
    prediction: Option<Arc<PredictionResult>>,
    charts: Vec<RenderedChart>,
    /// Index of the first chart on screen
    scroll: usize,
    theme: Theme,
}

impl PredictionPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            prediction: None,
            charts: Vec::new(),
            scroll: 0,
            theme,
        }
    }

    /// Show `prediction`; charts are rebuilt only when the result changes
    pub fn set_prediction(&mut self, prediction: Option<Arc<PredictionResult>>) {
        let unchanged = match (&self.prediction, &prediction) {
            (Some(old), Some(new)) => Arc::ptr_eq(old, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.charts = match &prediction {
            Some(result) => {
                let mut charts = viz::render_all(&result.visualizations);
                charts.extend(viz::render_predicted_vs_actual(&result.prediction_results));
                charts
            }
            None => Vec::new(),
        };
        self.scroll = 0;
        self.prediction = prediction;
    }

    pub fn charts(&self) -> &[RenderedChart] {
        &self.charts
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Summary text, one entry per line
    pub fn summary_lines(&self) -> Vec<String> {
        let Some(prediction) = &self.prediction else {
            return Vec::new();
        };
        let summary = &prediction.prediction_results;

        let mut lines = vec![
            format!("Model: {}", summary.model),
            format!("Target: {}", summary.target_variable),
            format!("MSE: {:.2}", summary.mean_squared_error),
        ];
        if let Some(features) = summary.feature_variables.as_ref().filter(|f| !f.is_empty()) {
            lines.push(format!("Features: {}", features.join(", ")));
        }
        lines
    }
}

impl Component for PredictionPanel {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                Ok(true)
            }
            Action::ScrollDown => {
                if self.scroll + 1 < self.charts.len() {
                    self.scroll += 1;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title = " 4. Prediction Results ".to_string();
        if self.charts.len() > 1 {
            title = format!(
                " 4. Prediction Results (chart {}/{}) ",
                self.scroll + 1,
                self.charts.len()
            );
        }
        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style()))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self
            .summary_lines()
            .into_iter()
            .map(|text| Line::from(Span::styled(text, self.theme.normal_style())))
            .collect();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(lines.len() as u16), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(lines), rows[0]);

        let mut chart_area = rows[1];
        for chart in self.charts.iter().skip(self.scroll) {
            if chart_area.height < 4 {
                break;
            }
            let height = CHART_HEIGHT.min(chart_area.height);
            let area = Rect {
                height,
                ..chart_area
            };
            let chart_block = Block::default()
                .title(chart.title.as_str())
                .borders(Borders::TOP)
                .border_style(self.theme.border_style());
            frame.render_widget(chart.widget(chart_block, &self.theme), area);

            chart_area.y += height;
            chart_area.height -= height;
        }
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::ScrollUp, Action::ScrollDown]
    }
}
