#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::row::compute_row;
use super::*;
use crate::models::Month;

fn all_zero(year: i32, price: Decimal) -> Calculation {
    compute(&DeliveryInput::new(year, price)).unwrap()
}

// ── Calendar ──────────────────────────────────────────────────

#[test]
fn test_leap_year_rule() {
    assert!(is_leap_year(2024));
    assert!(is_leap_year(2000));
    assert!(!is_leap_year(1900));
    assert!(!is_leap_year(2023));
    assert!(!is_leap_year(2100));
    assert!(is_leap_year(2400));
}

#[test]
fn test_february_tracks_leap_years() {
    for year in 1..=2500 {
        let lengths = month_lengths(year).unwrap();
        assert_eq!(lengths[1] == 29, is_leap_year(year), "year {year}");
        assert!(lengths[1] == 28 || lengths[1] == 29);
    }
}

#[test]
fn test_other_months_constant() {
    let reference = month_lengths(2023).unwrap();
    for year in [1, 4, 100, 400, 1999, 2000, 2024, 2030, 9999] {
        let lengths = month_lengths(year).unwrap();
        for i in (0..12).filter(|&i| i != 1) {
            assert_eq!(lengths[i], reference[i], "month {i} of {year}");
        }
    }
    assert_eq!(
        reference,
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    );
}

#[test]
fn test_month_lengths_rejects_non_positive_year() {
    assert!(matches!(month_lengths(0), Err(EngineError::InvalidInput(_))));
    assert!(matches!(month_lengths(-2024), Err(EngineError::InvalidInput(_))));
}

#[test]
fn test_days_in_year() {
    assert_eq!(days_in_year(2024).unwrap(), 366);
    assert_eq!(days_in_year(2023).unwrap(), 365);
}

// ── Row computer ──────────────────────────────────────────────

#[test]
fn test_row_basic() {
    let row = compute_row(31, dec!(55), 5).unwrap();
    assert_eq!(row.not_delivered, 5);
    assert_eq!(row.delivered, 26);
    assert_eq!(row.amount, dec!(1430));
}

#[test]
fn test_row_invariants_hold_for_all_valid_inputs() {
    for days in 28..=31 {
        for nd in 0..=days {
            for price in [dec!(0), dec!(1), dec!(55), dec!(60.25), dec!(199.99)] {
                let row = compute_row(days, price, i64::from(nd)).unwrap();
                assert_eq!(row.delivered + row.not_delivered, days);
                assert_eq!(row.amount, Decimal::from(row.delivered) * price);
                assert!(row.amount >= Decimal::ZERO);
            }
        }
    }
}

#[test]
fn test_row_is_idempotent() {
    let a = compute_row(30, dec!(57.5), 3).unwrap();
    let b = compute_row(30, dec!(57.5), 3).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_row_all_days_missed() {
    let row = compute_row(30, dec!(55), 30).unwrap();
    assert_eq!(row.delivered, 0);
    assert_eq!(row.amount, Decimal::ZERO);
}

#[test]
fn test_row_clamps_above_month_length() {
    let row = compute_row(28, dec!(55), 31).unwrap();
    assert_eq!(row.not_delivered, 28);
    assert_eq!(row.delivered, 0);
    assert_eq!(row.amount, Decimal::ZERO);

    let row = compute_row(31, dec!(55), i64::MAX).unwrap();
    assert_eq!(row.not_delivered, 31);
    assert_eq!(row.delivered, 0);
}

#[test]
fn test_row_clamps_negative_to_zero() {
    let row = compute_row(31, dec!(55), -4).unwrap();
    assert_eq!(row.not_delivered, 0);
    assert_eq!(row.delivered, 31);
    assert_eq!(row.amount, dec!(1705));
}

#[test]
fn test_row_rejects_negative_price() {
    assert!(matches!(
        compute_row(31, dec!(-0.01), 0),
        Err(EngineError::InvalidInput(_))
    ));
}

#[test]
fn test_row_zero_price() {
    let row = compute_row(31, Decimal::ZERO, 1).unwrap();
    assert_eq!(row.delivered, 30);
    assert_eq!(row.amount, Decimal::ZERO);
}

#[test]
fn test_row_rejects_impossible_month_length() {
    assert!(compute_row(27, dec!(55), 0).is_err());
    assert!(compute_row(32, dec!(55), 0).is_err());
}

#[test]
fn test_check_not_delivered_boundaries() {
    assert_eq!(check_not_delivered(Month::April, 30, 0).unwrap(), 0);
    assert_eq!(check_not_delivered(Month::April, 30, 30).unwrap(), 30);
    assert_eq!(
        check_not_delivered(Month::April, 30, 31),
        Err(EngineError::OutOfRangeInput {
            month: "April".into(),
            value: 31,
            days: 30,
        })
    );
    assert!(matches!(
        check_not_delivered(Month::April, 30, -1),
        Err(EngineError::OutOfRangeInput { value: -1, .. })
    ));
}

// ── Table + aggregation ───────────────────────────────────────

#[test]
fn test_leap_year_scenario() {
    let calc = all_zero(2024, dec!(60));
    let feb = calc.table.row(Month::February);
    assert_eq!(feb.label(), "Feb 24");
    assert_eq!(feb.days_in_month(), 29);
    assert_eq!(feb.delivered(), 29);
    assert_eq!(feb.amount(), dec!(1740));
    assert_eq!(calc.summary.total_delivered, 366);
    assert_eq!(calc.summary.total_not_delivered, 0);
}

#[test]
fn test_non_leap_override_scenario() {
    let mut input = DeliveryInput::new(2023, dec!(55));
    input.overrides.insert(0, 5);
    let calc = compute(&input).unwrap();
    let jan = calc.table.row(Month::January);
    assert_eq!(jan.label(), "Jan 23");
    assert_eq!(jan.not_delivered(), 5);
    assert_eq!(jan.delivered(), 26);
    assert_eq!(jan.amount(), dec!(1430));
    assert_eq!(calc.summary.total_not_delivered, 5);
    assert_eq!(calc.summary.total_delivered, 360);
}

#[test]
fn test_all_zero_total_matches_days_times_price() {
    for (year, price) in [(2023, dec!(55)), (2024, dec!(60)), (2100, dec!(47.35))] {
        let calc = all_zero(year, price);
        let days: u32 = month_lengths(year).unwrap().iter().sum();
        assert_eq!(calc.summary.total_amount, Decimal::from(days) * price);
    }
}

#[test]
fn test_table_shape() {
    let calc = all_zero(2025, dec!(55));
    assert_eq!(calc.table.year(), 2025);
    assert_eq!(calc.table.rows().len(), 12);
    for (i, row) in calc.table.rows().iter().enumerate() {
        assert_eq!(row.month().index(), i);
        assert_eq!(row.price_per_kg(), dec!(55));
    }
    assert_eq!(calc.table.rows()[11].label(), "Dec 25");
}

#[test]
fn test_missing_overrides_default_to_zero() {
    let mut input = DeliveryInput::new(2024, dec!(55));
    input.overrides.insert(4, 12);
    let calc = compute(&input).unwrap();
    assert_eq!(calc.table.not_delivered(), [0, 0, 0, 0, 12, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_override_index_out_of_bounds() {
    let mut input = DeliveryInput::new(2024, dec!(55));
    input.overrides.insert(12, 1);
    assert!(matches!(compute(&input), Err(EngineError::InvalidInput(_))));
}

#[test]
fn test_compute_clamps_overrides() {
    let mut input = DeliveryInput::new(2023, dec!(55));
    input.overrides.insert(1, 40);
    let calc = compute(&input).unwrap();
    let feb = calc.table.row(Month::February);
    assert_eq!(feb.not_delivered(), 28);
    assert_eq!(feb.delivered(), 0);
}

#[test]
fn test_compute_rejects_negative_price() {
    assert!(compute(&DeliveryInput::new(2024, dec!(-1))).is_err());
}

#[test]
fn test_recompute_is_identical() {
    let input = DeliveryInput::new(2024, dec!(58.75)).with_not_delivered(&[
        1, 2, 3, 0, 12, 0, 0, 4, 0, 0, 0, 31,
    ]);
    assert_eq!(compute(&input).unwrap(), compute(&input).unwrap());
}

#[test]
fn test_with_not_delivered_round_trips() {
    let values = [3, 0, 1, 0, 12, 0, 7, 0, 0, 2, 0, 31];
    let calc = compute(&DeliveryInput::new(2024, dec!(55)).with_not_delivered(&values)).unwrap();
    assert_eq!(calc.table.not_delivered(), values);
}

#[test]
fn test_average_price_is_weighted() {
    let calc = all_zero(2024, dec!(60));
    assert_eq!(calc.summary.average_price, dec!(60));

    let input = DeliveryInput::new(2023, dec!(55.5)).with_not_delivered(&[
        5, 0, 0, 0, 12, 0, 0, 0, 0, 0, 0, 3,
    ]);
    let calc = compute(&input).unwrap();
    assert_eq!(calc.summary.average_price, dec!(55.5));
    assert_eq!(
        calc.summary.average_price,
        calc.summary.total_amount / Decimal::from(calc.summary.total_delivered)
    );
}

#[test]
fn test_average_price_with_nothing_delivered() {
    let calc = compute(&DeliveryInput::new(2023, dec!(55)).with_not_delivered(&[31; 12])).unwrap();
    assert_eq!(calc.summary.total_delivered, 0);
    assert_eq!(calc.summary.total_amount, Decimal::ZERO);
    assert_eq!(calc.summary.average_price, dec!(55));
}

#[test]
fn test_average_monthly_amount() {
    let calc = all_zero(2024, dec!(60));
    assert_eq!(calc.summary.average_monthly_amount, dec!(1830));
}

#[test]
fn test_aggregate_rejects_wrong_row_count() {
    let calc = all_zero(2024, dec!(55));
    let rows = calc.table.rows();
    assert!(matches!(
        aggregate(&rows[..11]),
        Err(EngineError::InvalidInput(_))
    ));
    assert!(aggregate(&[]).is_err());

    let mut extra = rows.to_vec();
    extra.push(rows[0].clone());
    assert!(aggregate(&extra).is_err());
}

#[test]
fn test_aggregate_rejects_out_of_order_rows() {
    let calc = all_zero(2024, dec!(55));
    let mut rows = calc.table.rows().to_vec();
    rows.swap(0, 1);
    assert!(matches!(aggregate(&rows), Err(EngineError::InvalidInput(_))));
}

#[test]
fn test_aggregate_matches_compute() {
    let input = DeliveryInput::new(2024, dec!(55)).with_not_delivered(&[
        0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6,
    ]);
    let calc = compute(&input).unwrap();
    assert_eq!(aggregate(calc.table.rows()).unwrap(), calc.summary);
    assert_eq!(calc.summary.total_not_delivered, 21);
    assert_eq!(calc.summary.total_delivered, 345);
    assert_eq!(calc.summary.total_amount, dec!(18975));
}

#[test]
fn test_row_rejects_price_that_overflows_amount() {
    assert!(matches!(
        compute_row(31, Decimal::MAX, 0),
        Err(EngineError::InvalidInput(_))
    ));
    // Every day missed: nothing to multiply, so even the largest price is fine.
    assert_eq!(compute_row(31, Decimal::MAX, 31).unwrap().amount, Decimal::ZERO);
}

#[test]
fn test_compute_rejects_price_that_overflows_total() {
    // Each month fits on its own, the yearly sum does not.
    let price = dec!(1000000000000000000000000000);
    assert!(compute_row(31, price, 0).is_ok());
    assert!(matches!(
        compute(&DeliveryInput::new(2024, price)),
        Err(EngineError::InvalidInput(_))
    ));
}
