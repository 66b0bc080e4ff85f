// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::coerce::{coerce_price, coerce_quantity, optional_text};

/// Remote column headers, in the positional order the sheet stores them.
pub const COLUMNS: [&str; 6] = [
    "codigo",
    "nombre",
    "modelo_auto",
    "marca",
    "precio",
    "cantidad",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub code: String,
    pub name: String,
    pub car_model: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

impl PartRecord {
    /// Maps the first six cells of a sheet row onto a record. Missing
    /// trailing cells are treated as blank; returns `None` when every cell
    /// is blank.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        let cell = |index: usize| cells.get(index).map_or("", |value| value.as_ref());

        if (0..COLUMNS.len()).all(|index| cell(index).trim().is_empty()) {
            return None;
        }

        Some(Self {
            code: cell(0).trim().to_owned(),
            name: cell(1).trim().to_owned(),
            car_model: optional_text(cell(2)),
            brand: optional_text(cell(3)),
            price: coerce_price(cell(4)),
            quantity: coerce_quantity(cell(5)),
        })
    }

    fn name_matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
    }

    fn brand_matches(&self, needle: &str) -> bool {
        self.brand
            .as_deref()
            .is_some_and(|brand| contains_ignore_case(brand, needle))
    }

    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryTable {
    rows: Vec<PartRecord>,
}

impl InventoryTable {
    pub fn new(rows: Vec<PartRecord>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[PartRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.rows.iter().any(|row| row.code == code)
    }

    /// Returns a copy of the table with `record` as its last row.
    pub fn appended(&self, record: PartRecord) -> Self {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.extend(self.rows.iter().cloned());
        rows.push(record);
        Self { rows }
    }

    /// Case-insensitive substring search over name and brand. An empty query
    /// keeps every row.
    pub fn filter(&self, query: &str) -> Self {
        if query.is_empty() {
            return self.clone();
        }

        let needle = query.to_lowercase();
        Self {
            rows: self
                .rows
                .iter()
                .filter(|row| row.name_matches(&needle) || row.brand_matches(&needle))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<PartRecord> for InventoryTable {
    fn from_iter<I: IntoIterator<Item = PartRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

// `needle` is already lowercased.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(needle)
}
