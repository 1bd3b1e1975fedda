use crate::data::model::{Column, VehicleRecord};
use crate::data::view::View;

use super::{Aggregation, ChartKind, ChartSpec};

// ---------------------------------------------------------------------------
// Resolved chart data
// ---------------------------------------------------------------------------

/// A chart spec evaluated against a view, ready for the plot widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bars(Vec<Bar>),
    Histogram(Histogram),
    Scatter(Vec<ScatterSeries>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: String,
    pub value: f64,
    /// Value label drawn above the bar.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` edges shared by every series.
    pub edges: Vec<f64>,
    pub series: Vec<HistogramSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub category: String,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub category: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub hover: String,
}

/// Evaluate `spec` over the rows of `view`.
pub fn resolve(view: &View<'_>, spec: &ChartSpec) -> ChartData {
    match spec.kind {
        ChartKind::AggregatedBar => ChartData::Bars(bars(view, spec)),
        ChartKind::OverlaidHistogram => ChartData::Histogram(histogram(view, spec)),
        ChartKind::Scatter => ChartData::Scatter(scatter(view, spec)),
    }
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

fn category_of(record: &VehicleRecord, column: Option<Column>) -> String {
    column
        .and_then(|c| record.text(c))
        .unwrap_or("")
        .to_string()
}

/// Records grouped by a text column, groups in order of first appearance.
fn group_by<'a>(
    view: &View<'a>,
    column: Option<Column>,
) -> Vec<(String, Vec<&'a VehicleRecord>)> {
    let mut groups: Vec<(String, Vec<&'a VehicleRecord>)> = Vec::new();
    for rec in view.iter() {
        let key = category_of(rec, column);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(rec),
            None => groups.push((key, vec![rec])),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Bar chart: mean per group
// ---------------------------------------------------------------------------

fn bars(view: &View<'_>, spec: &ChartSpec) -> Vec<Bar> {
    let Some(y) = spec.y else {
        return Vec::new();
    };

    let mut bars: Vec<Bar> = group_by(view, spec.group_by)
        .into_iter()
        .filter_map(|(category, members)| {
            let values: Vec<f64> = members.iter().filter_map(|r| r.numeric(y)).collect();
            let value = match spec.aggregation {
                Some(Aggregation::Mean) | None => mean(&values)?,
            };
            Some(Bar {
                text: format_si(value),
                category,
                value,
            })
        })
        .collect();

    if spec.sort_descending {
        // stable: ties keep first-appearance order
        bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    }
    bars
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

// ---------------------------------------------------------------------------
// Histogram: shared edges, counts per colour category
// ---------------------------------------------------------------------------

fn histogram(view: &View<'_>, spec: &ChartSpec) -> Histogram {
    let bins = spec.bins.unwrap_or(1).max(1);
    let values: Vec<f64> = view.iter().filter_map(|r| r.numeric(spec.x)).collect();
    let edges = bin_edges(&values, bins);

    let series = group_by(view, spec.color)
        .into_iter()
        .map(|(category, members)| {
            let mut counts = vec![0usize; bins];
            for v in members.iter().filter_map(|r| r.numeric(spec.x)) {
                counts[bin_index(&edges, v)] += 1;
            }
            HistogramSeries { category, counts }
        })
        .collect();

    Histogram { edges, series }
}

fn bin_edges(values: &[f64], bins: usize) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if !min.is_finite() {
        (0.0, 1.0)
    } else if (max - min).abs() < f64::EPSILON {
        (min - 0.5, min + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;
    (0..=bins).map(|i| lo + width * i as f64).collect()
}

/// The upper edge belongs to the last bin.
fn bin_index(edges: &[f64], value: f64) -> usize {
    let bins = edges.len() - 1;
    let lo = edges[0];
    let width = (edges[bins] - lo) / bins as f64;
    let idx = ((value - lo) / width).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(bins - 1)
    }
}

// ---------------------------------------------------------------------------
// Scatter: one point per record, series per colour category
// ---------------------------------------------------------------------------

fn scatter(view: &View<'_>, spec: &ChartSpec) -> Vec<ScatterSeries> {
    let Some(y) = spec.y else {
        return Vec::new();
    };

    group_by(view, spec.color)
        .into_iter()
        .map(|(category, members)| {
            let points = members
                .iter()
                .filter_map(|r| {
                    Some(ScatterPoint {
                        x: r.numeric(spec.x)?,
                        y: r.numeric(y)?,
                        hover: hover_text(r, spec),
                    })
                })
                .collect();
            ScatterSeries { category, points }
        })
        .collect()
}

fn hover_text(record: &VehicleRecord, spec: &ChartSpec) -> String {
    let mut parts = vec![record.brand.trim().to_string()];
    parts.extend(spec.hover.iter().map(|&c| record.display(c)));
    parts.join(" ")
}

// ---------------------------------------------------------------------------
// Value labels
// ---------------------------------------------------------------------------

const SI_PREFIXES: [&str; 7] = ["µ", "m", "", "k", "M", "G", "T"];

/// Two significant digits with an SI suffix: `55480.0` → `"55k"`,
/// `1234.0` → `"1.2k"`, `161.0` → `"160"`.
pub fn format_si(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value:.1}");
    }

    let exponent = value.abs().log10().floor() as i32;
    let step = 10f64.powi(exponent - 1);
    let rounded = (value / step).round() * step;

    // rounding may carry into the next power of ten (99.6 → 100)
    let exponent = (rounded.abs().log10() + 1e-9).floor() as i32;
    let group = exponent.div_euclid(3).clamp(-2, 4);
    let scaled = rounded / 10f64.powi(group * 3);
    let decimals = (1 - (exponent - group * 3)).max(0) as usize;

    format!("{scaled:.decimals$}{}", SI_PREFIXES[(group + 2) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{bind, ChartOptions, Metric};
    use crate::data::fixtures::sample_table;
    use crate::data::view::{select, ViewName};

    #[test]
    fn si_labels_use_two_significant_digits() {
        assert_eq!(format_si(55480.0), "55k");
        assert_eq!(format_si(1234.0), "1.2k");
        assert_eq!(format_si(161.0), "160");
        assert_eq!(format_si(180781.0), "180k");
        assert_eq!(format_si(99600.0), "100k");
        assert_eq!(format_si(7.8), "7.8");
        assert_eq!(format_si(0.5), "500m");
        assert_eq!(format_si(2_500_000.0), "2.5M");
        assert_eq!(format_si(0.0), "0.0");
    }

    #[test]
    fn bars_are_brand_means_sorted_descending() {
        let table = sample_table();
        let view = select(&table, ViewName::TopBrands);
        let spec = bind(&view, Metric::Price, ChartKind::AggregatedBar, &ChartOptions::default())
            .unwrap();
        let ChartData::Bars(bars) = resolve(&view, &spec) else {
            panic!("expected bars");
        };

        // one bar per brand present in the view
        assert_eq!(bars.len(), 12);
        assert_eq!(bars[0].category, "Porsche");
        assert_eq!(bars[0].value, 180781.0);
        assert!(bars.windows(2).all(|w| w[0].value >= w[1].value));

        let tesla = bars.iter().find(|b| b.category == "Tesla").unwrap();
        // the duplicate Long Range row was dropped, so its 59990 never counts
        assert_eq!(tesla.value, (55480.0 + 46380.0 + 75000.0) / 3.0);
        assert_eq!(tesla.text, "59k");

        let vw = bars.iter().find(|b| b.category == "Volkswagen").unwrap();
        assert_eq!(vw.value, 30950.0);
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let table = sample_table();
        let view = select(&table, ViewName::TopBodyStyles);
        let options = ChartOptions {
            histogram_bins: 5,
            ..ChartOptions::default()
        };
        let spec = bind(&view, Metric::Range, ChartKind::OverlaidHistogram, &options).unwrap();
        let ChartData::Histogram(hist) = resolve(&view, &spec) else {
            panic!("expected histogram");
        };

        assert_eq!(hist.edges.len(), 6);
        assert_eq!(hist.edges[0], 100.0);
        assert_eq!(hist.edges[5], 610.0);

        let total: usize = hist.series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, view.len());

        // first-appearance order of body styles in the view
        let order: Vec<&str> = hist.series.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(order, vec!["Sedan", "Hatchback", "SUV"]);

        // Lucid Air (610 km) sits on the upper edge and lands in the last bin
        let sedan = &hist.series[0];
        assert_eq!(sedan.counts[4], 1);
    }

    #[test]
    fn degenerate_histogram_has_a_single_wide_bin() {
        let edges = bin_edges(&[300.0, 300.0], 4);
        assert_eq!(edges.first(), Some(&299.5));
        assert_eq!(edges.last(), Some(&300.5));
        assert_eq!(bin_index(&edges, 300.0), 2);
        assert_eq!(bin_edges(&[], 2), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn scatter_has_one_point_per_record() {
        let table = sample_table();
        let view = select(&table, ViewName::TopBrands);
        let spec = bind(&view, Metric::Range, ChartKind::Scatter, &ChartOptions::default())
            .unwrap();
        let ChartData::Scatter(series) = resolve(&view, &spec) else {
            panic!("expected scatter");
        };

        let points: usize = series.iter().map(|s| s.points.len()).sum();
        assert_eq!(points, view.len());
        assert_eq!(series[0].category, "Tesla");
        assert_eq!(
            series[0].points[0],
            ScatterPoint {
                x: 55480.0,
                y: 450.0,
                hover: "Tesla Model 3 Long Range Dual Motor".to_string(),
            }
        );
    }
}
