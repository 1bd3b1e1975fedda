use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column – the canonical schema
// ---------------------------------------------------------------------------

/// One column of the normalized vehicle table.
///
/// The rename table is explicit: each column knows the header it carries in
/// the source CSV and its canonical snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Brand,
    Model,
    AccelSec,
    TopSpeedKmh,
    RangeKm,
    EfficiencyWhkm,
    FastChargeKmh,
    RapidCharge,
    PowerTrain,
    PlugType,
    BodyStyle,
    Segment,
    Seats,
    PriceEuro,
}

impl Column {
    /// All columns in source order.
    pub const ALL: [Column; 14] = [
        Column::Brand,
        Column::Model,
        Column::AccelSec,
        Column::TopSpeedKmh,
        Column::RangeKm,
        Column::EfficiencyWhkm,
        Column::FastChargeKmh,
        Column::RapidCharge,
        Column::PowerTrain,
        Column::PlugType,
        Column::BodyStyle,
        Column::Segment,
        Column::Seats,
        Column::PriceEuro,
    ];

    /// Header as it appears in the raw CSV.
    pub fn source_header(self) -> &'static str {
        match self {
            Column::Brand => "Brand",
            Column::Model => "Model",
            Column::AccelSec => "AccelSec",
            Column::TopSpeedKmh => "TopSpeed_KmH",
            Column::RangeKm => "Range_Km",
            Column::EfficiencyWhkm => "Efficiency_WhKm",
            Column::FastChargeKmh => "FastCharge_KmH",
            Column::RapidCharge => "RapidCharge",
            Column::PowerTrain => "PowerTrain",
            Column::PlugType => "PlugType",
            Column::BodyStyle => "BodyStyle",
            Column::Segment => "Segment",
            Column::Seats => "Seats",
            Column::PriceEuro => "PriceEuro",
        }
    }

    /// Canonical snake_case name used after normalization.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Column::Brand => "brand",
            Column::Model => "model",
            Column::AccelSec => "accel_sec",
            Column::TopSpeedKmh => "top_speed_kmh",
            Column::RangeKm => "range_km",
            Column::EfficiencyWhkm => "efficiency_whkm",
            Column::FastChargeKmh => "fast_charge_kmh",
            Column::RapidCharge => "rapid_charge",
            Column::PowerTrain => "power_train",
            Column::PlugType => "plug_type",
            Column::BodyStyle => "body_style",
            Column::Segment => "segment",
            Column::Seats => "seats",
            Column::PriceEuro => "price_euro",
        }
    }

    /// Resolve a raw header. Canonical names resolve to themselves so that
    /// renaming an already-normalized header is a no-op.
    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|c| c.source_header() == header || c.canonical_name() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

// ---------------------------------------------------------------------------
// RawTable – loader output, untouched headers and cells
// ---------------------------------------------------------------------------

/// Tabular data exactly as read from the source.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<csv::StringRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// VehicleRecord – one row of the normalized table
// ---------------------------------------------------------------------------

/// A single electric vehicle after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub brand: String,
    pub model: String,
    pub accel_sec: f64,
    pub top_speed_kmh: f64,
    pub range_km: f64,
    pub efficiency_whkm: f64,
    /// `None` where the source had no fast-charge figure.
    pub fast_charge_kmh: Option<f64>,
    pub rapid_charge: String,
    pub power_train: String,
    pub plug_type: String,
    pub body_style: String,
    pub segment: String,
    pub seats: u32,
    pub price_euro: f64,
}

impl VehicleRecord {
    /// Numeric value of a column, `None` for text columns and absent values.
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::AccelSec => Some(self.accel_sec),
            Column::TopSpeedKmh => Some(self.top_speed_kmh),
            Column::RangeKm => Some(self.range_km),
            Column::EfficiencyWhkm => Some(self.efficiency_whkm),
            Column::FastChargeKmh => self.fast_charge_kmh,
            Column::Seats => Some(f64::from(self.seats)),
            Column::PriceEuro => Some(self.price_euro),
            _ => None,
        }
    }

    /// Text value of a column, `None` for numeric columns.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Brand => Some(&self.brand),
            Column::Model => Some(&self.model),
            Column::RapidCharge => Some(&self.rapid_charge),
            Column::PowerTrain => Some(&self.power_train),
            Column::PlugType => Some(&self.plug_type),
            Column::BodyStyle => Some(&self.body_style),
            Column::Segment => Some(&self.segment),
            _ => None,
        }
    }

    /// Cell rendered for display in the data table.
    pub fn display(&self, column: Column) -> String {
        if let Some(s) = self.text(column) {
            return s.to_string();
        }
        match self.numeric(column) {
            Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
            Some(v) => format!("{v:.1}"),
            None => "–".to_string(),
        }
    }

    /// Interpret `rapid_charge` ("Yes"/"No").
    pub fn has_rapid_charge(&self) -> Option<bool> {
        match self.rapid_charge.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// VehicleTable – the immutable normalized dataset
// ---------------------------------------------------------------------------

/// The normalized dataset. Built once by the normalizer and read-only after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleTable {
    records: Vec<VehicleRecord>,
}

impl VehicleTable {
    pub(crate) fn from_records(records: Vec<VehicleRecord>) -> Self {
        VehicleTable { records }
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&VehicleRecord> {
        self.records.get(index)
    }

    /// Canonical column names, in schema order.
    pub fn column_names(&self) -> Vec<&'static str> {
        Column::ALL.iter().map(|c| c.canonical_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
