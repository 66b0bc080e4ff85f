// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use partsheet_app::{Gateway, InventoryTable, PartRecord};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

const PART_NAMES: [&str; 12] = [
    "Oil filter",
    "Air filter",
    "Brake pads",
    "Spark plug",
    "Timing belt",
    "Water pump",
    "Fuel pump",
    "Alternator",
    "Radiator hose",
    "Wiper blade",
    "Headlight bulb",
    "Clutch kit",
];

const BRANDS: [&str; 8] = [
    "Bosch", "NGK", "Gates", "Valeo", "Denso", "Mann", "Brembo", "SKF",
];

const CAR_MODELS: [&str; 8] = [
    "Corolla", "Civic", "Sentra", "Golf", "Hilux", "Spark", "Fiesta", "Yaris",
];

/// In-memory gateway that keeps every table handed to `write` and can be told
/// to fail reads or writes.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    table: Mutex<InventoryTable>,
    writes: Mutex<Vec<InventoryTable>>,
    read_failure: Option<String>,
    write_failure: Option<String>,
}

impl RecordingGateway {
    pub fn new(table: InventoryTable) -> Self {
        Self {
            table: Mutex::new(table),
            ..Self::default()
        }
    }

    pub fn failing_reads(mut self, message: &str) -> Self {
        self.read_failure = Some(message.to_owned());
        self
    }

    pub fn failing_writes(mut self, message: &str) -> Self {
        self.write_failure = Some(message.to_owned());
        self
    }

    pub fn current(&self) -> InventoryTable {
        lock(&self.table).clone()
    }

    pub fn writes(&self) -> Vec<InventoryTable> {
        lock(&self.writes).clone()
    }

    pub fn write_count(&self) -> usize {
        lock(&self.writes).len()
    }
}

impl Gateway for RecordingGateway {
    fn read(&self) -> Result<InventoryTable> {
        if let Some(message) = &self.read_failure {
            return Err(anyhow!("{message}"));
        }
        Ok(self.current())
    }

    fn write(&self, table: &InventoryTable) -> Result<()> {
        if let Some(message) = &self.write_failure {
            return Err(anyhow!("{message}"));
        }
        lock(&self.writes).push(table.clone());
        *lock(&self.table) = table.clone();
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible part rows. Codes are sequential, so a table
/// built from one faker never repeats a code.
#[derive(Debug, Clone)]
pub struct PartFaker {
    rng: DeterministicRng,
    next_code: u32,
}

impl PartFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_code: 1,
        }
    }

    pub fn part(&mut self) -> PartRecord {
        let brand = self.pick(&BRANDS).to_owned();
        let code = format!("{}-{:04}", brand_prefix(&brand), self.next_code);
        self.next_code += 1;

        let car_model = if self.rng.int_n(4) == 0 {
            None
        } else {
            Some(self.pick(&CAR_MODELS).to_owned())
        };
        let cents = 500 + self.rng.int_n(50_000) as i64;

        PartRecord {
            code,
            name: self.pick(&PART_NAMES).to_owned(),
            car_model,
            brand: Some(brand),
            price: cents as f64 / 100.0,
            quantity: 1 + self.rng.int_n(40) as i64,
        }
    }

    pub fn table(&mut self, rows: usize) -> InventoryTable {
        (0..rows).map(|_| self.part()).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// The single-row sheet `A1 | Filter | X | Bosch | 10.5 | 3`.
pub fn bosch_filter() -> PartRecord {
    PartRecord {
        code: "A1".to_owned(),
        name: "Filter".to_owned(),
        car_model: Some("X".to_owned()),
        brand: Some("Bosch".to_owned()),
        price: 10.5,
        quantity: 3,
    }
}

pub fn sample_table() -> InventoryTable {
    InventoryTable::new(vec![
        bosch_filter(),
        PartRecord {
            code: "B7".to_owned(),
            name: "Timing belt".to_owned(),
            car_model: Some("Corolla".to_owned()),
            brand: Some("Gates".to_owned()),
            price: 42.0,
            quantity: 5,
        },
        PartRecord {
            code: "C3".to_owned(),
            name: "Brake pads".to_owned(),
            car_model: None,
            brand: None,
            price: 0.0,
            quantity: 0,
        },
    ])
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let config_path = dir.path().join("config.toml");
    Ok((dir, config_path))
}

pub fn brand_prefix(brand: &str) -> String {
    brand.chars().take(2).collect::<String>().to_uppercase()
}
