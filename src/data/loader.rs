use std::io::Read;
use std::path::Path;

use crate::error::DashboardError;

use super::model::RawTable;

/// Public CSV of electric-vehicle specifications.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/kellyshreeve/Web-App-Project/main/ElectricCarData_Clean.csv";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch the CSV at `url` with a single blocking GET.
///
/// Transport errors, non-success statuses and unparsable bodies all map to
/// [`DashboardError::SourceUnavailable`]. There is no retry.
pub fn load_url(url: &str) -> Result<RawTable, DashboardError> {
    log::info!("Fetching {url}");

    let response = reqwest::blocking::get(url)
        .map_err(|e| DashboardError::source_unavailable(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DashboardError::source_unavailable(url, format!("HTTP {status}")));
    }

    let body = response
        .bytes()
        .map_err(|e| DashboardError::source_unavailable(url, e))?;

    parse_csv(body.as_ref(), url)
}

/// Load a local CSV file (File → Open…).
pub fn load_file(path: &Path) -> Result<RawTable, DashboardError> {
    let name = path.display().to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "csv" {
        return Err(DashboardError::source_unavailable(
            &name,
            format!("unsupported file extension: .{ext}"),
        ));
    }

    let file =
        std::fs::File::open(path).map_err(|e| DashboardError::source_unavailable(&name, e))?;
    parse_csv(file, &name)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Read a header row plus records. Rows whose length differs from the header
/// are a parse failure.
pub fn parse_csv<R: Read>(reader: R, source_name: &str) -> Result<RawTable, DashboardError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DashboardError::source_unavailable(source_name, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(DashboardError::source_unavailable(
            source_name,
            "no header row",
        ));
    }

    let rows = reader
        .records()
        .enumerate()
        .map(|(i, rec)| {
            rec.map_err(|e| {
                DashboardError::source_unavailable(source_name, format!("row {}: {e}", i + 1))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Read {} rows with {} columns from {source_name}",
        rows.len(),
        headers.len()
    );

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_and_rows_in_order() {
        let csv = "Brand,Model\nTesla ,Model 3\nAudi ,e-tron\n";
        let raw = parse_csv(csv.as_bytes(), "inline").unwrap();
        assert_eq!(raw.headers, vec!["Brand", "Model"]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.rows[0].get(0), Some("Tesla "));
        assert_eq!(raw.rows[1].get(1), Some("e-tron"));
    }

    #[test]
    fn empty_input_is_unavailable() {
        let err = parse_csv("".as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable { .. }));
    }

    #[test]
    fn ragged_row_is_unavailable() {
        let csv = "Brand,Model\nTesla ,Model 3,extra\n";
        let err = parse_csv(csv.as_bytes(), "inline").unwrap_err();
        match err {
            DashboardError::SourceUnavailable { source_name, reason } => {
                assert_eq!(source_name, "inline");
                assert!(reason.starts_with("row 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unreachable_url_is_unavailable() {
        let url = "http://127.0.0.1:9/ev.csv";
        match load_url(url).unwrap_err() {
            DashboardError::SourceUnavailable {
                source_name,
                reason,
            } => {
                assert_eq!(source_name, url);
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_csv_extension_is_rejected() {
        let err = load_file(Path::new("vehicles.parquet")).unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable { .. }));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = load_file(Path::new("/nonexistent/ev-dashboard/vehicles.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable { .. }));
    }
}
