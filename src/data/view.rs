use std::fmt;

use serde::Serialize;

use super::model::{VehicleRecord, VehicleTable};

/// Brands shown in the per-brand charts, as trimmed names.
pub const TOP_BRANDS: [&str; 15] = [
    "Tesla",
    "Audi",
    "Nissan",
    "Volkswagen",
    "Skoda",
    "Renault",
    "Porsche",
    "BMW",
    "Ford",
    "Kia",
    "Smart",
    "Byton",
    "Mercedes",
    "Hyundai",
    "Opel",
];

/// Body styles compared in the histogram.
pub const TOP_BODY_STYLES: [&str; 3] = ["SUV", "Hatchback", "Sedan"];

// ---------------------------------------------------------------------------
// ViewName – the closed set of derived subsets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    All,
    TopBrands,
    TopBodyStyles,
}

impl ViewName {
    /// Whether a record belongs in this view.
    ///
    /// Brand matching compares trimmed strings, so the result does not depend
    /// on whether whitespace was trimmed at ingestion.
    pub fn includes(self, record: &VehicleRecord) -> bool {
        match self {
            ViewName::All => true,
            ViewName::TopBrands => TOP_BRANDS.contains(&record.brand.trim()),
            ViewName::TopBodyStyles => TOP_BODY_STYLES.contains(&record.body_style.trim()),
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewName::All => "all",
            ViewName::TopBrands => "top_brands",
            ViewName::TopBodyStyles => "top_body_styles",
        })
    }
}

// ---------------------------------------------------------------------------
// View – borrowed, filtered slice of the table
// ---------------------------------------------------------------------------

/// A read-only subset of the table: the source rows that pass the view's
/// filter, kept in table order.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub name: ViewName,
    table: &'a VehicleTable,
    indices: Vec<usize>,
}

impl<'a> View<'a> {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a VehicleRecord> + '_ {
        let table = self.table;
        self.indices.iter().filter_map(move |&i| table.get(i))
    }

    /// Indices of table rows this view leaves out.
    pub fn excluded(&self) -> Vec<usize> {
        let mut kept = self.indices.iter().peekable();
        (0..self.table.len())
            .filter(|i| {
                if kept.peek() == Some(&i) {
                    kept.next();
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Derive the named view from the table. Pure: the table is only read.
pub fn select(table: &VehicleTable, name: ViewName) -> View<'_> {
    let indices = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| name.includes(rec))
        .map(|(i, _)| i)
        .collect();

    View {
        name,
        table,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;
    use crate::data::normalize::{normalize, NormalizeOptions};

    #[test]
    fn top_brands_partitions_the_table() {
        let table = sample_table();
        let view = select(&table, ViewName::TopBrands);

        assert_eq!(view.len(), 15);
        for rec in view.iter() {
            assert!(TOP_BRANDS.contains(&rec.brand.as_str()));
        }
        let excluded = view.excluded();
        assert_eq!(excluded.len() + view.len(), table.len());
        for i in excluded {
            let brand = &table.records()[i].brand;
            assert!(!TOP_BRANDS.contains(&brand.as_str()), "{brand} excluded");
        }
    }

    #[test]
    fn top_brands_match_untrimmed_source_strings() {
        let raw = crate::data::fixtures::raw(crate::data::fixtures::SAMPLE_CSV);
        let untrimmed = normalize(
            &raw,
            &NormalizeOptions {
                trim_whitespace: false,
            },
        )
        .unwrap();
        let trimmed = sample_table();
        assert_eq!(
            select(&untrimmed, ViewName::TopBrands).indices(),
            select(&trimmed, ViewName::TopBrands).indices()
        );
    }

    #[test]
    fn top_body_styles_keeps_three_categories() {
        let table = sample_table();
        let view = select(&table, ViewName::TopBodyStyles);
        assert_eq!(view.len(), 17);
        assert!(view
            .iter()
            .all(|r| TOP_BODY_STYLES.contains(&r.body_style.as_str())));
        for i in view.excluded() {
            let style = &table.records()[i].body_style;
            assert!(style == "Liftback" || style == "Pickup", "{style}");
        }
    }

    #[test]
    fn selection_is_repeatable_and_leaves_table_untouched() {
        let table = sample_table();
        let before = table.clone();
        let a = select(&table, ViewName::TopBrands);
        let b = select(&table, ViewName::TopBrands);
        assert_eq!(a.indices(), b.indices());
        assert_eq!(table, before);

        let all = select(&table, ViewName::All);
        assert_eq!(all.len(), table.len());
        assert!(all.excluded().is_empty());
    }

    #[test]
    fn view_preserves_table_order() {
        let table = sample_table();
        let view = select(&table, ViewName::TopBodyStyles);
        assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
    }
}
