// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::PartRecord;
use crate::coerce::{MIN_PRICE, MIN_QUANTITY, optional_text, price_input, quantity_input};

pub const MISSING_FIELDS_MESSAGE: &str = "Missing code or name.";

/// Raw values as posted by the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartFormFields {
    pub code: String,
    pub name: String,
    pub car_model: String,
    pub brand: String,
    pub price: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartFormInput {
    pub code: String,
    pub name: String,
    pub car_model: String,
    pub brand: String,
    pub price: f64,
    pub quantity: i64,
}

impl PartFormInput {
    pub fn blank() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            car_model: String::new(),
            brand: String::new(),
            price: MIN_PRICE,
            quantity: MIN_QUANTITY,
        }
    }

    pub fn from_fields(fields: &PartFormFields) -> Self {
        Self {
            code: fields.code.clone(),
            name: fields.name.clone(),
            car_model: fields.car_model.clone(),
            brand: fields.brand.clone(),
            price: price_input(&fields.price),
            quantity: quantity_input(&fields.quantity),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() || self.name.trim().is_empty() {
            bail!(MISSING_FIELDS_MESSAGE);
        }
        Ok(())
    }

    pub fn trimmed_code(&self) -> &str {
        self.code.trim()
    }

    pub fn to_record(&self) -> PartRecord {
        PartRecord {
            code: self.code.trim().to_owned(),
            name: self.name.trim().to_owned(),
            car_model: optional_text(&self.car_model),
            brand: optional_text(&self.brand),
            price: self.price,
            quantity: self.quantity,
        }
    }

    /// Two-decimal rendering used to refill the price widget.
    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }
}

impl Default for PartFormInput {
    fn default() -> Self {
        Self::blank()
    }
}
