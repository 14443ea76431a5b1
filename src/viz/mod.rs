//! Visualization renderer
//!
//! Turns chart descriptors into [`RenderedChart`]s: plain data with computed
//! axis bounds, drawn by [`RenderedChart::widget`]. Descriptor kinds without
//! a renderer produce nothing.

use crate::core::{ModelSummary, PcaResult, VisualizationDescriptor};
use crate::tui::Theme;
use ratatui::{
    style::Stylize,
    symbols,
    text::Span,
    widgets::{Axis, Block, Chart, Dataset, GraphType},
};
use tracing::debug;

/// Relative padding added on each side of the data range
const PADDING: f64 = 0.05;

/// A chart ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl RenderedChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: Vec<(f64, f64)>,
    ) -> Self {
        let x_bounds = axis_bounds(points.iter().map(|(x, _)| *x));
        let y_bounds = axis_bounds(points.iter().map(|(_, y)| *y));
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            points,
            x_bounds,
            y_bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scatter chart widget; an empty chart still draws its axes
    pub fn widget<'a>(&'a self, block: Block<'a>, theme: &Theme) -> Chart<'a> {
        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Scatter)
            .style(theme.chart_points_style())
            .data(&self.points);

        let x_axis = Axis::default()
            .title(self.x_label.as_str().dark_gray())
            .style(theme.chart_axis_style())
            .bounds(self.x_bounds)
            .labels(axis_labels(self.x_bounds));

        let y_axis = Axis::default()
            .title(self.y_label.as_str().dark_gray())
            .style(theme.chart_axis_style())
            .bounds(self.y_bounds)
            .labels(axis_labels(self.y_bounds));

        Chart::new(vec![dataset])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis)
    }
}

/// Render one descriptor; `None` for kinds without a renderer
pub fn render(descriptor: &VisualizationDescriptor) -> Option<RenderedChart> {
    match descriptor {
        VisualizationDescriptor::Scatter(spec) => Some(RenderedChart::new(
            spec.title.clone(),
            spec.x_label.clone(),
            spec.y_label.clone(),
            spec.data.iter().map(|p| (p.x, p.y)).collect(),
        )),
        VisualizationDescriptor::Unknown { kind, .. } => {
            debug!("No renderer for visualization type {kind:?}");
            None
        }
    }
}

/// Render every descriptor in order, skipping the ones without a renderer
pub fn render_all(descriptors: &[VisualizationDescriptor]) -> Vec<RenderedChart> {
    descriptors.iter().filter_map(render).collect()
}

/// The fixed PCA chart; `None` when the result carries no components
pub fn render_pca(pca: &PcaResult) -> Option<RenderedChart> {
    pca.principal_components.as_ref()?;
    Some(RenderedChart::new("PCA", "PC1", "PC2", pca.points()))
}

/// Actual values on x against predictions on y, paired by index
pub fn render_predicted_vs_actual(summary: &ModelSummary) -> Option<RenderedChart> {
    let predictions = summary.predictions.as_ref()?;
    let actual = summary.actual_values.as_ref()?;
    let points = actual
        .iter()
        .zip(predictions.iter())
        .map(|(a, p)| (*a, *p))
        .collect();

    Some(RenderedChart::new(
        "Predicted vs Actual",
        format!("Actual {}", summary.target_variable),
        format!("Predicted {}", summary.target_variable),
        points,
    ))
}

/// `PC1 45.0%, PC2 20.1%`
pub fn explained_variance_label(ratios: &[f64]) -> String {
    ratios
        .iter()
        .enumerate()
        .map(|(i, r)| format!("PC{} {:.1}%", i + 1, r * 100.0))
        .collect::<Vec<_>>()
        .join(", ")
}

fn axis_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return [0.0, 1.0];
    }

    let pad = if min < max {
        // Scaled before subtracting so extremes near f64::MAX stay finite
        max * PADDING - min * PADDING
    } else if min - 1.0 < min {
        1.0
    } else {
        // A unit step is lost at this magnitude
        min.abs() * PADDING
    };
    [(min - pad).max(f64::MIN), (max + pad).min(f64::MAX)]
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let [lo, hi] = bounds;
    [lo, lo / 2.0 + hi / 2.0, hi]
        .into_iter()
        .map(|v| Span::raw(format_tick(v)))
        .collect()
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 1000.0 || value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ScatterPoint, ScatterSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn scatter(title: &str, data: Vec<ScatterPoint>) -> VisualizationDescriptor {
        VisualizationDescriptor::Scatter(ScatterSpec {
            title: title.to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            data,
        })
    }

    fn summary() -> ModelSummary {
        ModelSummary {
            model: "LinearRegression".to_string(),
            target_variable: "salary".to_string(),
            mean_squared_error: 12.5,
            feature_variables: None,
            predictions: None,
            actual_values: None,
        }
    }

    #[test]
    fn test_scatter_with_two_points() {
        let descriptor = scatter(
            "T",
            vec![ScatterPoint { x: 1.0, y: 2.0 }, ScatterPoint { x: 3.0, y: 4.0 }],
        );

        let charts = render_all(&[descriptor]);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "T");
        assert_eq!(charts[0].x_label, "X");
        assert_eq!(charts[0].y_label, "Y");
        assert_eq!(charts[0].points, vec![(1.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn test_unknown_kind_renders_nothing() {
        let heatmap: VisualizationDescriptor =
            serde_json::from_value(json!({"type": "heatmap", "cells": [[1, 2]]})).unwrap();
        assert!(render(&heatmap).is_none());

        let charts = render_all(&[heatmap, scatter("kept", vec![])]);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "kept");
    }

    #[test]
    fn test_empty_scatter_is_an_empty_chart() {
        let chart = render(&scatter("empty", vec![])).unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.x_bounds, [0.0, 1.0]);
        assert_eq!(chart.y_bounds, [0.0, 1.0]);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(axis_bounds([5.0, 5.0].into_iter()), [4.0, 6.0]);
        assert_eq!(axis_bounds([0.0, 10.0].into_iter()), [-0.5, 10.5]);
        assert_eq!(axis_bounds([f64::NAN].into_iter()), [0.0, 1.0]);
    }

    #[test]
    fn test_bounds_at_extremes_stay_finite() {
        let [lo, hi] = axis_bounds([-1e308, 1e308].into_iter());
        assert!(lo.is_finite() && hi.is_finite());
        assert!(lo <= -1e308 && hi >= 1e308);

        let [lo, hi] = axis_bounds([f64::MAX, f64::MAX].into_iter());
        assert!(lo.is_finite() && hi.is_finite());
        assert!(lo < hi);

        let labels = axis_labels(axis_bounds([f64::MAX / 2.0, f64::MAX].into_iter()));
        assert!(labels.iter().all(|l| !l.content.contains("inf")));
    }

    #[test]
    fn test_pca_chart() {
        assert!(render_pca(&PcaResult::default()).is_none());

        let pca = PcaResult {
            principal_components: Some(vec![vec![0.5, -1.0], vec![1.5], vec![2.0, 0.0, 9.0]]),
            explained_variance_ratio: None,
        };
        let chart = render_pca(&pca).unwrap();
        assert_eq!(chart.title, "PCA");
        assert_eq!((chart.x_label.as_str(), chart.y_label.as_str()), ("PC1", "PC2"));
        assert_eq!(chart.points, vec![(0.5, -1.0), (2.0, 0.0)]);
    }

    #[test]
    fn test_predicted_vs_actual_truncates_to_shorter() {
        assert!(render_predicted_vs_actual(&summary()).is_none());

        let summary = ModelSummary {
            predictions: Some(vec![10.0, 20.0, 30.0]),
            actual_values: Some(vec![11.0, 19.0]),
            ..summary()
        };
        let chart = render_predicted_vs_actual(&summary).unwrap();
        assert_eq!(chart.title, "Predicted vs Actual");
        assert_eq!(chart.x_label, "Actual salary");
        assert_eq!(chart.points, vec![(11.0, 10.0), (19.0, 20.0)]);
    }

    #[test]
    fn test_explained_variance_label() {
        assert_eq!(explained_variance_label(&[0.45, 0.201]), "PC1 45.0%, PC2 20.1%");
        assert_eq!(explained_variance_label(&[]), "");
    }

    #[test]
    fn test_tick_format() {
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(2.5), "2.50");
        assert_eq!(format_tick(12345.678), "12346");
    }
}
