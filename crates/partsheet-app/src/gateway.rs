// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tracing::{info, warn};

use crate::{DUPLICATE_CODE_MESSAGE, InventoryTable, PartFormInput};

/// Whole-table access to the remote sheet. Every `read` fetches fresh data;
/// every `write` replaces the remote contents wholesale.
pub trait Gateway: Send + Sync {
    fn read(&self) -> Result<InventoryTable>;
    fn write(&self, table: &InventoryTable) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedInventory {
    pub table: InventoryTable,
    pub error: Option<String>,
}

/// Reads the table, degrading to an empty table and a displayable message
/// when the sheet cannot be reached.
pub fn load_or_fallback(gateway: &dyn Gateway) -> LoadedInventory {
    match gateway.read() {
        Ok(table) => {
            info!(rows = table.len(), "loaded inventory");
            LoadedInventory { table, error: None }
        }
        Err(error) => {
            warn!(error = %format!("{error:#}"), "inventory read failed; showing empty table");
            LoadedInventory {
                table: InventoryTable::empty(),
                error: Some(format!(
                    "Could not connect to the sheet. Make sure the link is correct and shared with editor access. Detail: {error:#}"
                )),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Required fields were blank; carries the warning to show.
    MissingFields(String),
    /// The code is already taken; carries the error to show.
    DuplicateCode(String),
    /// The row was appended and the full table written back.
    Saved(InventoryTable),
}

/// Validates `form` against `current` and, when it passes, writes
/// `current ++ [record]` through the gateway. Write failures propagate.
pub fn submit_part(
    gateway: &dyn Gateway,
    current: &InventoryTable,
    form: &PartFormInput,
) -> Result<SubmitOutcome> {
    if let Err(error) = form.validate() {
        return Ok(SubmitOutcome::MissingFields(error.to_string()));
    }

    let code = form.trimmed_code();
    if current.contains_code(code) {
        info!(code, "rejected duplicate part code");
        return Ok(SubmitOutcome::DuplicateCode(
            DUPLICATE_CODE_MESSAGE.to_owned(),
        ));
    }

    let updated = current.appended(form.to_record());
    gateway.write(&updated)?;
    info!(code, rows = updated.len(), "saved new part");
    Ok(SubmitOutcome::Saved(updated))
}
