// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

pub const EMPTY_SHEET_MESSAGE: &str = "The sheet is empty.";
pub const SAVED_MESSAGE: &str = "Saved to the cloud sheet!";
pub const DUPLICATE_CODE_MESSAGE: &str = "That code already exists!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    #[default]
    Inventory,
    AddRecord,
}

impl ViewKind {
    pub const ALL: [Self; 2] = [Self::Inventory, Self::AddRecord];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::AddRecord => "add",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Inventory => "View inventory",
            Self::AddRecord => "Register new part",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "inventory" => Some(Self::Inventory),
            "add" => Some(Self::AddRecord),
            _ => None,
        }
    }

    /// Menu selection from a request; anything unrecognized lands on the
    /// first option.
    pub fn from_selection(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(Self::Inventory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}
