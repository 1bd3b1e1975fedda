use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Column, VehicleRecord, VehicleTable};
use crate::data::view::{select, ViewName};

const ROW_HEIGHT: f32 = 18.0;

/// Read-only preview of the normalized table.
pub fn vehicle_table(ui: &mut Ui, table: &VehicleTable) {
    let view = select(table, ViewName::All);
    let headers = table.column_names();

    ui.strong(format!("Data ({} vehicles)", view.len()));
    if view.is_empty() {
        ui.label("No vehicles.");
        return;
    }
    let rows = view.indices();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(TableColumn::auto().at_least(60.0), headers.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in &headers {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let Some(rec) = table.get(rows[row.index()]) else {
                    return;
                };
                for col in Column::ALL {
                    row.col(|ui| {
                        ui.label(cell(rec, col));
                    });
                }
            });
        });
}

fn cell(record: &VehicleRecord, column: Column) -> String {
    match (column, record.has_rapid_charge()) {
        (Column::RapidCharge, Some(true)) => "✔".to_string(),
        (Column::RapidCharge, Some(false)) => "✘".to_string(),
        _ => record.display(column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;

    #[test]
    fn rows_follow_the_full_view() {
        let table = sample_table();
        let view = select(&table, ViewName::All);
        assert!(!view.is_empty());

        let first = table.get(view.indices()[0]).unwrap();
        assert_eq!(cell(first, Column::Brand), "Tesla");
        assert_eq!(cell(first, Column::RapidCharge), "✔");
        assert_eq!(cell(first, Column::Seats), "5");
    }
}
