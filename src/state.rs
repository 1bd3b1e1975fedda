use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::chart::{bind, resolve, ChartData, ChartKind, ChartOptions, ChartSpec, Metric};
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::loader;
use crate::data::model::VehicleTable;
use crate::data::normalize::{normalize, NormalizeOptions};
use crate::data::view::{select, ViewName};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load and normalize a source in one go. Blocking.
pub fn load_source(
    source: &Source,
    options: &NormalizeOptions,
) -> Result<VehicleTable, DashboardError> {
    let raw = match source {
        Source::Url(url) => loader::load_url(url)?,
        Source::File(path) => loader::load_file(path)?,
    };
    normalize(&raw, options)
}

// ---------------------------------------------------------------------------
// Chart slots
// ---------------------------------------------------------------------------

/// The three charts on the dashboard, each with its own selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    BrandBar,
    BodyStyleHistogram,
    PriceScatter,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 3] = [
        ChartSlot::BrandBar,
        ChartSlot::BodyStyleHistogram,
        ChartSlot::PriceScatter,
    ];

    pub fn view(self) -> ViewName {
        match self {
            ChartSlot::BrandBar | ChartSlot::PriceScatter => ViewName::TopBrands,
            ChartSlot::BodyStyleHistogram => ViewName::TopBodyStyles,
        }
    }

    pub fn kind(self) -> ChartKind {
        match self {
            ChartSlot::BrandBar => ChartKind::AggregatedBar,
            ChartSlot::BodyStyleHistogram => ChartKind::OverlaidHistogram,
            ChartSlot::PriceScatter => ChartKind::Scatter,
        }
    }

    /// Options the selector widget offers for this slot.
    pub fn choices(self) -> &'static [Metric] {
        match self {
            ChartSlot::BrandBar | ChartSlot::BodyStyleHistogram => &Metric::ALL,
            ChartSlot::PriceScatter => &crate::chart::SCATTER_Y_METRICS,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A bound and resolved chart plus the colours for its categories.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub spec: ChartSpec,
    pub data: ChartData,
    pub colors: ColorMap,
}

/// Bind and resolve one slot against the table.
pub fn build_panel(
    table: &VehicleTable,
    slot: ChartSlot,
    metric: Metric,
    options: &ChartOptions,
) -> Result<ChartPanel, DashboardError> {
    let view = select(table, slot.view());
    let spec = bind(&view, metric, slot.kind(), options)?;
    let data = resolve(&view, &spec);

    let colors = match &data {
        ChartData::Bars(_) => ColorMap::new(std::iter::empty::<&str>()),
        ChartData::Histogram(h) => ColorMap::new(h.series.iter().map(|s| s.category.as_str())),
        ChartData::Scatter(series) => ColorMap::new(series.iter().map(|s| s.category.as_str())),
    };

    Ok(ChartPanel { spec, data, colors })
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Where the current table came from.
    pub source: Option<Source>,

    /// Normalized table, shared read-only once loaded.
    pub table: Option<Arc<VehicleTable>>,

    /// Fatal load/normalize failure. No chart renders while set.
    pub error: Option<DashboardError>,

    /// Selected metric per slot, indexed by `ChartSlot`.
    pub metrics: [Metric; 3],

    /// Resolved charts per slot (cached until the selection changes).
    pub panels: [Option<ChartPanel>; 3],

    /// Non-fatal message shown in the top bar.
    pub status_message: Option<String>,

    /// Whether the data preview table is expanded.
    pub show_table: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            source: None,
            table: None,
            error: None,
            metrics: [Metric::Price, Metric::Price, config.scatter_y],
            panels: [None, None, None],
            status_message: None,
            show_table: false,
            config,
        }
    }

    /// Ingest a freshly loaded result; either the table or the error wins.
    pub fn set_loaded(&mut self, source: Source, result: Result<VehicleTable, DashboardError>) {
        self.source = Some(source);
        match result {
            Ok(table) => self.set_table(table),
            Err(e) => self.set_error(e),
        }
    }

    pub fn set_table(&mut self, table: VehicleTable) {
        let outside = select(&table, ViewName::TopBrands).excluded();
        if !outside.is_empty() {
            let brands: std::collections::BTreeSet<&str> = outside
                .iter()
                .filter_map(|&i| table.get(i))
                .map(|r| r.brand.as_str())
                .collect();
            log::debug!("Brands outside the top-brands list: {brands:?}");
        }

        self.table = Some(Arc::new(table));
        self.error = None;
        self.status_message = None;
        for slot in ChartSlot::ALL {
            self.refresh(slot);
        }
    }

    pub fn set_error(&mut self, error: DashboardError) {
        log::error!("Failed to load data: {error:#}");
        self.table = None;
        self.panels = [None, None, None];
        self.error = Some(error);
    }

    pub fn metric(&self, slot: ChartSlot) -> Metric {
        self.metrics[slot.index()]
    }

    pub fn panel(&self, slot: ChartSlot) -> Option<&ChartPanel> {
        self.panels[slot.index()].as_ref()
    }

    /// Change a slot's selection and re-evaluate that chart.
    pub fn select_metric(&mut self, slot: ChartSlot, metric: Metric) {
        if self.metric(slot) == metric {
            return;
        }
        self.metrics[slot.index()] = metric;
        self.refresh(slot);
    }

    /// Re-bind and re-resolve one chart from the current table.
    pub fn refresh(&mut self, slot: ChartSlot) {
        let Some(table) = self.table.clone() else {
            return;
        };
        match build_panel(&table, slot, self.metric(slot), &self.config.chart) {
            Ok(panel) => {
                self.panels[slot.index()] = Some(panel);
            }
            Err(e) => {
                log::error!("Cannot build {slot:?} chart: {e}");
                self.panels[slot.index()] = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;
    use crate::data::model::Column;

    fn loaded_state() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_loaded(Source::Url("fixture".into()), Ok(sample_table()));
        state
    }

    #[test]
    fn loading_builds_every_chart() {
        let state = loaded_state();
        assert!(state.error.is_none());
        for slot in ChartSlot::ALL {
            let panel = state.panel(slot).unwrap();
            assert_eq!(panel.spec.kind, slot.kind());
            assert_eq!(panel.spec.view, slot.view());
        }
        assert_eq!(
            state.panel(ChartSlot::PriceScatter).unwrap().spec.y,
            Some(Column::EfficiencyWhkm)
        );
    }

    #[test]
    fn selection_rebinds_only_its_chart() {
        let mut state = loaded_state();
        let before = state.panel(ChartSlot::BodyStyleHistogram).unwrap().spec.clone();

        state.select_metric(ChartSlot::BrandBar, Metric::Range);
        let bar = state.panel(ChartSlot::BrandBar).unwrap();
        assert_eq!(bar.spec.y, Some(Column::RangeKm));
        assert_eq!(bar.spec.title, "Average Range by Brand of EVs");
        assert_eq!(state.panel(ChartSlot::BodyStyleHistogram).unwrap().spec, before);
    }

    #[test]
    fn invalid_scatter_selection_surfaces_a_message() {
        let mut state = loaded_state();
        state.select_metric(ChartSlot::PriceScatter, Metric::Price);
        assert!(state.panel(ChartSlot::PriceScatter).is_none());
        assert!(state.status_message.as_deref().unwrap().contains("Price"));
    }

    #[test]
    fn load_failure_clears_charts() {
        let mut state = loaded_state();
        state.set_loaded(
            Source::File("missing.csv".into()),
            Err(DashboardError::MissingColumn("brand".into())),
        );
        assert!(state.table.is_none());
        assert!(ChartSlot::ALL.iter().all(|&s| state.panel(s).is_none()));
        assert_eq!(state.source.as_ref().unwrap().to_string(), "missing.csv");
    }

    #[test]
    fn histogram_colours_cover_three_body_styles() {
        let state = loaded_state();
        let panel = state.panel(ChartSlot::BodyStyleHistogram).unwrap();
        let ChartData::Histogram(hist) = &panel.data else {
            panic!("expected histogram");
        };
        assert_eq!(hist.series.len(), 3);
        assert_ne!(panel.colors.color_for("SUV"), panel.colors.color_for("Sedan"));
    }

    #[test]
    fn slot_choices_match_selectors() {
        assert_eq!(ChartSlot::BrandBar.choices().len(), 3);
        assert_eq!(
            ChartSlot::PriceScatter.choices(),
            &[Metric::Efficiency, Metric::Range]
        );
    }
}
