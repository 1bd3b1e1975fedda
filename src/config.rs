use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::chart::{ChartOptions, Metric, SCATTER_Y_METRICS};
use crate::data::loader::DEFAULT_SOURCE_URL;
use crate::data::normalize::NormalizeOptions;

pub const SOURCE_URL_VAR: &str = "EV_DASHBOARD_SOURCE_URL";
pub const HISTOGRAM_BINS_VAR: &str = "EV_DASHBOARD_HISTOGRAM_BINS";
pub const TRIM_WHITESPACE_VAR: &str = "EV_DASHBOARD_TRIM_WHITESPACE";
pub const SCATTER_Y_VAR: &str = "EV_DASHBOARD_SCATTER_Y";

/// Startup settings, read once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub source_url: String,
    pub normalize: NormalizeOptions,
    pub chart: ChartOptions,
    /// Initial Y-axis selection of the price scatter.
    pub scatter_y: Metric,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            normalize: NormalizeOptions::default(),
            chart: ChartOptions::default(),
            scatter_y: Metric::Efficiency,
        }
    }
}

impl DashboardConfig {
    /// Read overrides from the process environment; unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = DashboardConfig::default();

        if let Some(url) = lookup(SOURCE_URL_VAR) {
            let url = url.trim();
            if url.is_empty() {
                bail!("{SOURCE_URL_VAR} is set but empty");
            }
            config.source_url = url.to_string();
        }

        if let Some(bins) = parse_var::<usize>(&lookup, HISTOGRAM_BINS_VAR)? {
            if bins == 0 {
                bail!("{HISTOGRAM_BINS_VAR} must be at least 1");
            }
            config.chart.histogram_bins = bins;
        }

        if let Some(trim) = parse_var::<bool>(&lookup, TRIM_WHITESPACE_VAR)? {
            config.normalize.trim_whitespace = trim;
        }

        if let Some(selector) = lookup(SCATTER_Y_VAR) {
            let metric = Metric::from_selector(selector.trim())
                .with_context(|| format!("{SCATTER_Y_VAR}: invalid value"))?;
            if !SCATTER_Y_METRICS.contains(&metric) {
                bail!("{SCATTER_Y_VAR} must be one of Efficiency, Range");
            }
            config.scatter_y = metric;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{name}: invalid value '{raw}'"))
        })
        .transpose()
}
