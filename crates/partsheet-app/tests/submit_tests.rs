// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use partsheet_app::{
    DUPLICATE_CODE_MESSAGE, Gateway, InventoryTable, MISSING_FIELDS_MESSAGE, PartFormInput,
    SubmitOutcome, load_or_fallback, submit_part,
};
use partsheet_testkit::{PartFaker, RecordingGateway, bosch_filter, sample_table};

fn form(code: &str, name: &str) -> PartFormInput {
    PartFormInput {
        code: code.to_owned(),
        name: name.to_owned(),
        car_model: String::new(),
        brand: String::new(),
        price: 5.0,
        quantity: 2,
    }
}

#[test]
fn unique_code_appends_and_writes_once() -> Result<()> {
    let current = sample_table();
    let gateway = RecordingGateway::new(current.clone());

    let outcome = submit_part(&gateway, &current, &form("Z9", "Fuel pump"))?;

    let expected = current.appended(form("Z9", "Fuel pump").to_record());
    assert_eq!(outcome, SubmitOutcome::Saved(expected.clone()));
    assert_eq!(gateway.writes(), vec![expected]);
    Ok(())
}

#[test]
fn appended_row_lands_last_for_generated_tables() -> Result<()> {
    let mut faker = PartFaker::new(11);
    for size in [0, 1, 5, 40] {
        let current = faker.table(size);
        let gateway = RecordingGateway::new(current.clone());

        submit_part(&gateway, &current, &form("NEW-1", "Clutch kit"))?;

        let written = gateway.writes();
        assert_eq!(written.len(), 1, "table size {size}");
        let rows = written[0].rows();
        assert_eq!(rows.len(), size + 1);
        assert_eq!(&rows[..size], current.rows());
        assert_eq!(rows[size].code, "NEW-1");
    }
    Ok(())
}

#[test]
fn duplicate_code_is_rejected_without_writing() -> Result<()> {
    let current = InventoryTable::new(vec![bosch_filter()]);
    let gateway = RecordingGateway::new(current.clone());

    let outcome = submit_part(&gateway, &current, &form("A1", "Filter"))?;

    assert_eq!(
        outcome,
        SubmitOutcome::DuplicateCode(DUPLICATE_CODE_MESSAGE.to_owned())
    );
    assert_eq!(gateway.write_count(), 0);
    assert_eq!(gateway.current(), current);
    Ok(())
}

#[test]
fn duplicate_check_ignores_surrounding_whitespace() -> Result<()> {
    let current = InventoryTable::new(vec![bosch_filter()]);
    let gateway = RecordingGateway::new(current.clone());

    let outcome = submit_part(&gateway, &current, &form(" A1 ", "Filter"))?;

    assert!(matches!(outcome, SubmitOutcome::DuplicateCode(_)));
    assert_eq!(gateway.write_count(), 0);
    Ok(())
}

#[test]
fn missing_code_or_name_warns_without_writing() -> Result<()> {
    let current = sample_table();
    let gateway = RecordingGateway::new(current.clone());

    for candidate in [form("", "Filter"), form("Q1", ""), form(" ", " ")] {
        let outcome = submit_part(&gateway, &current, &candidate)?;
        assert_eq!(
            outcome,
            SubmitOutcome::MissingFields(MISSING_FIELDS_MESSAGE.to_owned())
        );
    }
    assert_eq!(gateway.write_count(), 0);
    Ok(())
}

#[test]
fn write_failure_propagates() {
    let current = sample_table();
    let gateway = RecordingGateway::new(current.clone()).failing_writes("sheet unreachable");

    let error = submit_part(&gateway, &current, &form("Z9", "Fuel pump"))
        .expect_err("write failure should propagate");
    assert!(error.to_string().contains("sheet unreachable"));
}

#[test]
fn load_or_fallback_returns_table_when_reachable() {
    let gateway = RecordingGateway::new(sample_table());

    let loaded = load_or_fallback(&gateway);

    assert_eq!(loaded.table, sample_table());
    assert!(loaded.error.is_none());
}

#[test]
fn load_or_fallback_degrades_to_empty_table_with_detail() {
    let gateway = RecordingGateway::new(sample_table()).failing_reads("permission denied");

    let loaded = load_or_fallback(&gateway);

    assert!(loaded.table.is_empty());
    assert_eq!(loaded.table.columns().len(), 6);
    let message = loaded.error.expect("fallback should carry a message");
    assert!(message.contains("permission denied"));
    assert!(message.contains("editor access"));
}

#[test]
fn saved_table_is_visible_on_next_read() -> Result<()> {
    let current = sample_table();
    let gateway = RecordingGateway::new(current.clone());

    submit_part(&gateway, &current, &form("Z9", "Fuel pump"))?;

    let reloaded = gateway.read()?;
    assert_eq!(reloaded.len(), current.len() + 1);
    assert!(reloaded.contains_code("Z9"));
    Ok(())
}
