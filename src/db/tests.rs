#![allow(clippy::unwrap_used)]

use super::*;
use crate::engine::{compute, DeliveryInput};
use rust_decimal_macros::dec;

fn saved(year: i32, price: Decimal, not_delivered: [i64; 12]) -> SavedYear {
    SavedYear {
        year,
        price_per_kg: price,
        not_delivered,
        saved_at: "2024-06-01T10:00:00+00:00".into(),
    }
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.saved_years().unwrap().is_empty());
    assert!(db.load_year(2024).unwrap().is_none());
}

#[test]
fn test_open_on_disk_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("milkpay.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.save_year(&saved(2024, dec!(55), [0; 12])).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.saved_years().unwrap(), vec![2024]);
}

// ── Save / load ───────────────────────────────────────────────

#[test]
fn test_save_and_load_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let record = saved(2024, dec!(57.25), [1, 2, 0, 0, 12, 0, 0, 0, 3, 0, 0, 31]);
    db.save_year(&record).unwrap();

    let loaded = db.load_year(2024).unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn test_price_precision_survives_storage() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_year(&saved(2024, dec!(55.125), [0; 12])).unwrap();
    let loaded = db.load_year(2024).unwrap().unwrap();
    assert_eq!(loaded.price_per_kg, dec!(55.125));
    assert_eq!(loaded.price_per_kg.to_string(), "55.125");
}

#[test]
fn test_reload_recomputes_identical_table() {
    let mut db = Database::open_in_memory().unwrap();
    let input = DeliveryInput::new(2023, dec!(55)).with_not_delivered(&[
        5, 0, 0, 0, 12, 0, 0, 0, 0, 0, 0, 0,
    ]);
    let original = compute(&input).unwrap();
    db.save_year(&SavedYear::from_table(&original.table)).unwrap();

    let loaded = db.load_year(2023).unwrap().unwrap();
    let reloaded = compute(&loaded.to_input().unwrap()).unwrap();
    assert_eq!(reloaded, original);
    for (a, b) in reloaded.table.rows().iter().zip(original.table.rows()) {
        assert_eq!(a.delivered(), b.delivered());
        assert_eq!(a.amount().to_string(), b.amount().to_string());
    }
}

#[test]
fn test_save_overwrites_previous_record() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_year(&saved(2024, dec!(55), [1; 12])).unwrap();
    db.save_year(&saved(2024, dec!(60), [2; 12])).unwrap();

    let loaded = db.load_year(2024).unwrap().unwrap();
    assert_eq!(loaded.price_per_kg, dec!(60));
    assert_eq!(loaded.not_delivered, [2; 12]);
    assert_eq!(db.saved_years().unwrap(), vec![2024]);
}

#[test]
fn test_years_are_isolated() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_year(&saved(2023, dec!(50), [3; 12])).unwrap();
    db.save_year(&saved(2024, dec!(60), [4; 12])).unwrap();

    assert_eq!(db.load_year(2023).unwrap().unwrap().not_delivered, [3; 12]);
    assert_eq!(db.load_year(2024).unwrap().unwrap().not_delivered, [4; 12]);
    assert_eq!(db.saved_years().unwrap(), vec![2023, 2024]);
}

#[test]
fn test_delete_year() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_year(&saved(2024, dec!(55), [0; 12])).unwrap();
    assert!(db.delete_year(2024).unwrap());
    assert!(!db.delete_year(2024).unwrap());
    assert!(db.load_year(2024).unwrap().is_none());

    let orphans: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM delivery_months", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphans, 0);
}

// ── Corrupt records ───────────────────────────────────────────

#[test]
fn test_load_rejects_missing_month() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_year(&saved(2024, dec!(55), [0; 12])).unwrap();
    db.conn
        .execute(
            "DELETE FROM delivery_months WHERE year = 2024 AND month_index = 6",
            [],
        )
        .unwrap();
    assert!(db.load_year(2024).is_err());
}

#[test]
fn test_load_rejects_unparsable_price() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_year(&saved(2024, dec!(55), [0; 12])).unwrap();
    db.conn
        .execute(
            "UPDATE delivery_years SET price_per_kg = 'fifty' WHERE year = 2024",
            [],
        )
        .unwrap();
    let err = db.load_year(2024).unwrap_err();
    assert!(format!("{err:#}").contains("not a number"));
}

#[test]
fn test_month_index_is_constrained() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_year(&saved(2024, dec!(55), [0; 12])).unwrap();
    let result = db.conn.execute(
        "INSERT INTO delivery_months (year, month_index, not_delivered) VALUES (2024, 12, 0)",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn test_out_of_range_values_load_raw() {
    // The store hands back what it holds; range checks happen in SavedYear::to_input.
    let mut db = Database::open_in_memory().unwrap();
    let mut values = [0; 12];
    values[1] = 30;
    db.save_year(&saved(2023, dec!(55), values)).unwrap();
    let loaded = db.load_year(2023).unwrap().unwrap();
    assert_eq!(loaded.not_delivered[1], 30);
    assert!(loaded.to_input().is_err());
}
