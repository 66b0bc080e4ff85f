// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use handlebars::Handlebars;
use partsheet_app::{
    COLUMNS, EMPTY_SHEET_MESSAGE, InventoryTable, Notice, PartFormInput, PartRecord, ViewKind,
};
use serde::Serialize;

const PAGE_TEMPLATE: &str = "page";
pub const PAGE_TITLE: &str = "Parts Control";
pub const PAGE_HEADING: &str = "Parts Management (Cloud)";

pub fn templates() -> Result<Handlebars<'static>> {
    let mut registry = Handlebars::new();
    registry
        .register_template_string(PAGE_TEMPLATE, include_str!("../templates/page.hbs"))
        .context("register page template")?;
    Ok(registry)
}

pub fn render(registry: &Handlebars<'static>, page: &PageContext) -> Result<String> {
    registry
        .render(PAGE_TEMPLATE, page)
        .context("render page template")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext {
    pub title: &'static str,
    pub heading: &'static str,
    pub menu: Vec<MenuOption>,
    pub notices: Vec<NoticeView>,
    pub inventory: Option<InventoryView>,
    pub add_record: Option<AddRecordView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub level: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<RowView>,
    pub query: String,
    pub results: Option<Vec<RowView>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub code: String,
    pub name: String,
    pub car_model: String,
    pub brand: String,
    pub price: String,
    pub quantity: i64,
}

impl From<&PartRecord> for RowView {
    fn from(record: &PartRecord) -> Self {
        Self {
            code: record.code.clone(),
            name: record.name.clone(),
            car_model: record.car_model.clone().unwrap_or_default(),
            brand: record.brand.clone().unwrap_or_default(),
            price: record.display_price(),
            quantity: record.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddRecordView {
    pub code: String,
    pub name: String,
    pub car_model: String,
    pub brand: String,
    pub price: String,
    pub quantity: i64,
}

impl From<&PartFormInput> for AddRecordView {
    fn from(form: &PartFormInput) -> Self {
        Self {
            code: form.code.clone(),
            name: form.name.clone(),
            car_model: form.car_model.clone(),
            brand: form.brand.clone(),
            price: form.display_price(),
            quantity: form.quantity,
        }
    }
}

impl PageContext {
    fn base(view: ViewKind, notices: &[Notice]) -> Self {
        Self {
            title: PAGE_TITLE,
            heading: PAGE_HEADING,
            menu: ViewKind::ALL
                .into_iter()
                .map(|option| MenuOption {
                    value: option.as_str(),
                    label: option.label(),
                    selected: option == view,
                })
                .collect(),
            notices: notices
                .iter()
                .map(|notice| NoticeView {
                    level: notice.level.as_str(),
                    message: notice.message.clone(),
                })
                .collect(),
            inventory: None,
            add_record: None,
        }
    }

    /// An empty table renders only the informational notice: no grid and no
    /// search box.
    pub fn inventory(table: &InventoryTable, query: &str, notices: &[Notice]) -> Self {
        if table.is_empty() {
            let mut notices = notices.to_vec();
            notices.push(Notice::info(EMPTY_SHEET_MESSAGE));
            return Self::base(ViewKind::Inventory, &notices);
        }

        let mut page = Self::base(ViewKind::Inventory, notices);
        page.inventory = Some(InventoryView {
            columns: COLUMNS.to_vec(),
            rows: table.rows().iter().map(RowView::from).collect(),
            query: query.to_owned(),
            results: (!query.is_empty())
                .then(|| table.filter(query).rows().iter().map(RowView::from).collect()),
        });
        page
    }

    pub fn add_record(form: &PartFormInput, notices: &[Notice]) -> Self {
        let mut page = Self::base(ViewKind::AddRecord, notices);
        page.add_record = Some(AddRecordView::from(form));
        page
    }
}
