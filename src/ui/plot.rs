use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::chart::{ChartData, Histogram, ScatterSeries};
use crate::state::ChartPanel;

const PLOT_HEIGHT: f32 = 360.0;
const BAR_COLOR: Color32 = Color32::from_rgb(0xFF, 0x97, 0xFF);

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render a resolved chart under its title.
pub fn chart(ui: &mut Ui, id: &str, panel: &ChartPanel) {
    ui.label(RichText::new(&panel.spec.title).strong());

    match &panel.data {
        ChartData::Bars(bars) => bar_chart(ui, id, panel, bars),
        ChartData::Histogram(hist) => histogram(ui, id, panel, hist),
        ChartData::Scatter(series) => scatter(ui, id, panel, series),
    }
}

// ---------------------------------------------------------------------------
// Bar chart: mean per brand, value label above each bar
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, id: &str, panel: &ChartPanel, bars: &[crate::chart::Bar]) {
    let spec = &panel.spec;
    let y_label = spec
        .y
        .map(|c| spec.label_for(c).to_string())
        .unwrap_or_default();

    let categories: Vec<String> = bars.iter().map(|b| b.category.clone()).collect();
    let plot_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.value)
                .name(&b.category)
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(spec.label_for(spec.x))
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| category_tick(&categories, mark.value))
        .show_grid(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(plot_bars).color(BAR_COLOR));
            for (i, b) in bars.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, b.value), b.text.as_str())
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

/// Tick label for an integer position on a categorical axis.
fn category_tick(categories: &[String], value: f64) -> String {
    if value.fract() != 0.0 || value < 0.0 {
        return String::new();
    }
    categories.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Overlaid histogram: one translucent bar series per category
// ---------------------------------------------------------------------------

fn histogram(ui: &mut Ui, id: &str, panel: &ChartPanel, hist: &Histogram) {
    let spec = &panel.spec;
    let opacity = spec.opacity.unwrap_or(1.0);

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(spec.label_for(spec.target_column()))
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in &hist.series {
                let color = panel.colors.translucent(&series.category, opacity);
                let bars: Vec<Bar> = hist
                    .edges
                    .windows(2)
                    .zip(&series.counts)
                    .map(|(edge, &count)| {
                        Bar::new((edge[0] + edge[1]) / 2.0, count as f64)
                            .width(edge[1] - edge[0])
                            .fill(color)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&series.category).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter: price vs. selected metric, coloured by brand
// ---------------------------------------------------------------------------

fn scatter(ui: &mut Ui, id: &str, panel: &ChartPanel, series: &[ScatterSeries]) {
    let spec = &panel.spec;
    let x_label = spec.label_for(spec.x).to_string();
    let y_label = spec
        .y
        .map(|c| spec.label_for(c).to_string())
        .unwrap_or_default();

    let hover_series = series.to_vec();
    let (hx, hy) = (x_label.clone(), y_label.clone());

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .label_formatter(move |name, point| hover_label(&hover_series, name, point, &hx, &hy))
        .show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = s.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&s.category)
                        .color(panel.colors.color_for(&s.category))
                        .radius(4.0),
                );
            }
        });
}

/// Hover tooltip: the vehicle under the cursor when there is one, else the
/// raw coordinates.
fn hover_label(
    series: &[ScatterSeries],
    name: &str,
    point: &PlotPoint,
    x_label: &str,
    y_label: &str,
) -> String {
    let vehicle = series
        .iter()
        .filter(|s| s.category == name)
        .flat_map(|s| s.points.iter())
        .find(|p| (p.x - point.x).abs() < 1e-6 && (p.y - point.y).abs() < 1e-6);

    match vehicle {
        Some(p) => format!("{}\n{x_label}: {:.0}\n{y_label}: {:.0}", p.hover, p.x, p.y),
        None => format!("{x_label}: {:.0}\n{y_label}: {:.0}", point.x, point.y),
    }
}
