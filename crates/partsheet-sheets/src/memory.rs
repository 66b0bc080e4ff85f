// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use partsheet_app::{Gateway, InventoryTable, PartRecord};
use std::sync::Mutex;
use tracing::info;

/// Process-local sheet used by `--demo`. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    table: Mutex<InventoryTable>,
}

impl MemoryGateway {
    pub fn new(table: InventoryTable) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }

    pub fn demo() -> Self {
        let part = |code: &str, name: &str, car_model: &str, brand: &str, price, quantity| {
            PartRecord {
                code: code.to_owned(),
                name: name.to_owned(),
                car_model: Some(car_model.to_owned()),
                brand: Some(brand.to_owned()),
                price,
                quantity,
            }
        };
        Self::new(InventoryTable::new(vec![
            part("BO-0001", "Oil filter", "Corolla", "Bosch", 8.5, 24),
            part("NG-0002", "Spark plug", "Civic", "NGK", 4.75, 60),
            part("GA-0003", "Timing belt", "Golf", "Gates", 39.9, 6),
            part("BR-0004", "Brake pads", "Hilux", "Brembo", 54.0, 10),
            part("DE-0005", "Alternator", "Sentra", "Denso", 189.0, 2),
        ]))
    }
}

impl Gateway for MemoryGateway {
    fn read(&self) -> Result<InventoryTable> {
        let table = self
            .table
            .lock()
            .map_err(|_| anyhow!("demo sheet lock poisoned"))?;
        Ok(table.clone())
    }

    fn write(&self, table: &InventoryTable) -> Result<()> {
        let mut current = self
            .table
            .lock()
            .map_err(|_| anyhow!("demo sheet lock poisoned"))?;
        *current = table.clone();
        info!(rows = table.len(), "replaced demo sheet contents");
        Ok(())
    }
}
