// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Conversions from raw sheet cells and form fields into typed values.
//!
//! Sheet cells never fail to load: anything that does not read as a number
//! becomes zero. Form fields follow the number widgets instead, falling back to
//! and clamping at the widget minimum.

pub const MIN_PRICE: f64 = 0.0;
pub const MIN_QUANTITY: i64 = 1;

pub fn coerce_price(raw: &str) -> f64 {
    parse_finite(raw).unwrap_or(0.0)
}

/// Integers parse directly; decimals are truncated toward zero.
pub fn coerce_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    parse_finite(trimmed).map_or(0, |value| value.trunc() as i64)
}

pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

pub fn price_input(raw: &str) -> f64 {
    parse_finite(raw).map_or(MIN_PRICE, |value| value.max(MIN_PRICE))
}

/// Decimals outside the `i64` range saturate at its bounds.
pub fn quantity_input(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let value = match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => parse_finite(trimmed).map(|value| value.trunc() as i64),
    };
    value.map_or(MIN_QUANTITY, |value| value.max(MIN_QUANTITY))
}

fn parse_finite(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
