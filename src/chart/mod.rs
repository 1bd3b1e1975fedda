//! Chart binding: (view, selector, chart kind) → declarative [`ChartSpec`],
//! then [`resolve`] evaluates a spec against a view into plot-ready series.

mod resolve;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::model::Column;
use crate::data::view::{View, ViewName};
use crate::error::DashboardError;

pub use resolve::{resolve, Bar, ChartData, Histogram, ScatterSeries};

#[cfg(test)]
pub use resolve::ScatterPoint;

// ---------------------------------------------------------------------------
// Metric selector and its lookup table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Price = 0,
    Efficiency = 1,
    Range = 2,
}

/// Column and display label a metric resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricBinding {
    pub metric: Metric,
    pub column: Column,
    pub label: &'static str,
}

/// Indexed by `Metric as usize`.
pub const METRIC_COLUMNS: [MetricBinding; 3] = [
    MetricBinding {
        metric: Metric::Price,
        column: Column::PriceEuro,
        label: "Price (Euros)",
    },
    MetricBinding {
        metric: Metric::Efficiency,
        column: Column::EfficiencyWhkm,
        label: "Efficiency (WhKm)",
    },
    MetricBinding {
        metric: Metric::Range,
        column: Column::RangeKm,
        label: "Range (Km)",
    },
];

/// Metrics offered on the scatter's Y axis. Price is always the X axis.
pub const SCATTER_Y_METRICS: [Metric; 2] = [Metric::Efficiency, Metric::Range];

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Price, Metric::Efficiency, Metric::Range];

    pub fn binding(self) -> &'static MetricBinding {
        &METRIC_COLUMNS[self as usize]
    }

    pub fn column(self) -> Column {
        self.binding().column
    }

    pub fn label(self) -> &'static str {
        self.binding().label
    }

    /// Name shown on the selector widget.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Price => "Price",
            Metric::Efficiency => "Efficiency",
            Metric::Range => "Range",
        }
    }

    /// Parse a widget value.
    pub fn from_selector(value: &str) -> Result<Metric, DashboardError> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == value)
            .ok_or_else(|| DashboardError::InvalidSelector {
                control: "metric".to_string(),
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Chart specification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// One bar per group, height = aggregated metric.
    AggregatedBar,
    /// Per-category histograms drawn on top of each other, not stacked.
    OverlaidHistogram,
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub histogram_bins: usize,
    /// Uniform alpha for overlaid histogram bars.
    pub histogram_opacity: f32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            histogram_opacity: 0.6,
        }
    }
}

/// Declarative description of one chart, consumed by the plot renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub view: ViewName,
    pub metric: Metric,
    pub title: String,
    pub x: Column,
    pub y: Option<Column>,
    pub group_by: Option<Column>,
    pub aggregation: Option<Aggregation>,
    pub color: Option<Column>,
    /// Axis / legend label overrides keyed by canonical column name.
    pub labels: BTreeMap<String, String>,
    pub hover: Vec<Column>,
    pub bins: Option<usize>,
    pub opacity: Option<f32>,
    /// Order categories by descending value.
    pub sort_descending: bool,
}

impl ChartSpec {
    fn new(kind: ChartKind, view: ViewName, metric: Metric, title: String, x: Column) -> Self {
        ChartSpec {
            kind,
            view,
            metric,
            title,
            x,
            y: None,
            group_by: None,
            aggregation: None,
            color: None,
            labels: BTreeMap::new(),
            hover: Vec::new(),
            bins: None,
            opacity: None,
            sort_descending: false,
        }
    }

    fn label(mut self, column: Column, text: &str) -> Self {
        self.labels
            .insert(column.canonical_name().to_string(), text.to_string());
        self
    }

    /// Label for a column: the override if present, else its canonical name.
    pub fn label_for(&self, column: Column) -> &str {
        self.labels
            .get(column.canonical_name())
            .map(String::as_str)
            .unwrap_or(column.canonical_name())
    }

    /// Metric column, wherever the chart kind puts it.
    pub fn target_column(&self) -> Column {
        self.metric.column()
    }
}

/// Resolve a selection into a chart specification.
///
/// Deterministic: the same view and selector always give an identical spec.
/// The scatter plots price against the selection, so `Price` is rejected
/// there.
pub fn bind(
    view: &View<'_>,
    metric: Metric,
    kind: ChartKind,
    options: &ChartOptions,
) -> Result<ChartSpec, DashboardError> {
    let binding = metric.binding();

    let spec = match kind {
        ChartKind::AggregatedBar => {
            let mut spec = ChartSpec::new(
                kind,
                view.name,
                metric,
                format!("Average {} by Brand of EVs", metric.name()),
                Column::Brand,
            )
            .label(binding.column, binding.label)
            .label(Column::Brand, "Brand Name");
            spec.y = Some(binding.column);
            spec.group_by = Some(Column::Brand);
            spec.aggregation = Some(Aggregation::Mean);
            spec.sort_descending = true;
            spec
        }
        ChartKind::OverlaidHistogram => {
            let mut spec = ChartSpec::new(
                kind,
                view.name,
                metric,
                format!("{} Distribution by Body Style", metric.name()),
                binding.column,
            )
            .label(binding.column, binding.label)
            .label(Column::BodyStyle, "Body Style");
            spec.color = Some(Column::BodyStyle);
            spec.bins = Some(options.histogram_bins.max(1));
            spec.opacity = Some(options.histogram_opacity.clamp(0.0, 1.0));
            spec
        }
        ChartKind::Scatter => {
            if !SCATTER_Y_METRICS.contains(&metric) {
                return Err(DashboardError::InvalidSelector {
                    control: "scatter y-axis".to_string(),
                    value: metric.name().to_string(),
                });
            }
            let mut spec = ChartSpec::new(
                kind,
                view.name,
                metric,
                format!("Price vs {} of EVs", metric.name()),
                Column::PriceEuro,
            )
            .label(Column::PriceEuro, Metric::Price.label())
            .label(binding.column, binding.label)
            .label(Column::Brand, "Brand Name");
            spec.y = Some(binding.column);
            spec.color = Some(Column::Brand);
            spec.hover = vec![Column::Model];
            spec
        }
    };

    log::debug!(
        "Bound {kind:?} on {}: {}",
        view.name,
        serde_json::to_string(&spec).unwrap_or_default()
    );
    Ok(spec)
}
