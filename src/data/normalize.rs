use std::collections::{BTreeMap, HashSet};

use crate::error::DashboardError;

use super::model::{Column, RawTable, VehicleRecord, VehicleTable};

/// Placeholder the source uses for a missing fast-charge figure.
pub const FAST_CHARGE_SENTINEL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Trim surrounding whitespace from every string field on ingestion.
    /// The source carries trailing spaces on brand names ("Tesla ").
    pub trim_whitespace: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
        }
    }
}

/// Turn a raw table into the canonical vehicle table.
///
/// Steps, in order: rename headers, trim strings, coerce numbers (the
/// fast-charge sentinel becomes `None`), drop later duplicates of each
/// (brand, model) pair. Aborts at the first malformed cell.
pub fn normalize(
    raw: &RawTable,
    options: &NormalizeOptions,
) -> Result<VehicleTable, DashboardError> {
    let index = column_index(&raw.headers)?;
    if raw.is_empty() {
        log::warn!("Source has a header row but no data");
    }

    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(raw.len());
    let mut records = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    for (i, row) in raw.rows.iter().enumerate() {
        let cells = RowCells {
            row,
            index: &index,
            row_no: i + 1,
            trim: options.trim_whitespace,
        };
        let record = cells.to_record()?;

        let key = (record.brand.clone(), record.model.clone());
        if !seen.insert(key) {
            log::debug!(
                "Dropping duplicate row {}: {:?} {:?}",
                i + 1,
                record.brand,
                record.model
            );
            dropped += 1;
            continue;
        }
        records.push(record);
    }

    log::info!(
        "Normalized {} vehicles ({dropped} duplicates dropped)",
        records.len()
    );

    Ok(VehicleTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Header renaming
// ---------------------------------------------------------------------------

/// Map each canonical column to its position in the raw headers.
fn column_index(headers: &[String]) -> Result<BTreeMap<Column, usize>, DashboardError> {
    let mut index = BTreeMap::new();
    for (pos, header) in headers.iter().enumerate() {
        match Column::from_header(header.trim()) {
            Some(col) => {
                index.entry(col).or_insert(pos);
            }
            None => log::debug!("Ignoring unknown column '{header}'"),
        }
    }

    if let Some(missing) = Column::ALL.iter().find(|c| !index.contains_key(c)) {
        return Err(DashboardError::MissingColumn(
            missing.canonical_name().to_string(),
        ));
    }
    Ok(index)
}

// ---------------------------------------------------------------------------
// Per-row coercion
// ---------------------------------------------------------------------------

struct RowCells<'a> {
    row: &'a csv::StringRecord,
    index: &'a BTreeMap<Column, usize>,
    row_no: usize,
    trim: bool,
}

impl RowCells<'_> {
    fn raw(&self, col: Column) -> &str {
        self.index
            .get(&col)
            .and_then(|&pos| self.row.get(pos))
            .unwrap_or("")
    }

    fn text(&self, col: Column) -> String {
        let value = self.raw(col);
        if self.trim {
            value.trim().to_string()
        } else {
            value.to_string()
        }
    }

    fn malformed(&self, col: Column, value: &str) -> DashboardError {
        DashboardError::MalformedData {
            column: col.canonical_name().to_string(),
            row: self.row_no,
            value: value.to_string(),
        }
    }

    fn float(&self, col: Column) -> Result<f64, DashboardError> {
        let value = self.raw(col);
        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.malformed(col, value)),
        }
    }

    fn optional_float(&self, col: Column, sentinel: &str) -> Result<Option<f64>, DashboardError> {
        let value = self.raw(col).trim();
        if value.is_empty() || value == sentinel {
            return Ok(None);
        }
        self.float(col).map(Some)
    }

    fn count(&self, col: Column) -> Result<u32, DashboardError> {
        let value = self.raw(col);
        value
            .trim()
            .parse::<u32>()
            .map_err(|_| self.malformed(col, value))
    }

    fn to_record(&self) -> Result<VehicleRecord, DashboardError> {
        Ok(VehicleRecord {
            brand: self.text(Column::Brand),
            model: self.text(Column::Model),
            accel_sec: self.float(Column::AccelSec)?,
            top_speed_kmh: self.float(Column::TopSpeedKmh)?,
            range_km: self.float(Column::RangeKm)?,
            efficiency_whkm: self.float(Column::EfficiencyWhkm)?,
            fast_charge_kmh: self.optional_float(Column::FastChargeKmh, FAST_CHARGE_SENTINEL)?,
            rapid_charge: self.text(Column::RapidCharge),
            power_train: self.text(Column::PowerTrain),
            plug_type: self.text(Column::PlugType),
            body_style: self.text(Column::BodyStyle),
            segment: self.text(Column::Segment),
            seats: self.count(Column::Seats)?,
            price_euro: self.float(Column::PriceEuro)?,
        })
    }
}
