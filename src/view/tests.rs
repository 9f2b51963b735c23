#![allow(clippy::unwrap_used)]

use chrono::TimeZone;
use rust_decimal_macros::dec;

use super::*;
use crate::models::ExpenseDraft;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn rec(id: i64, amount: &str, category: &str, note: &str, date: DateTime<Utc>) -> ExpenseRecord {
    let mut r = ExpenseRecord::from_draft(&ExpenseDraft::new(amount, category, note), date).unwrap();
    r.id = id;
    r
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56), "$"), "$1,234.56");
}

#[test]
fn test_format_amount_no_commas() {
    assert_eq!(format_amount(dec!(999.99), "$"), "$999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0), "$"), "$0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50), "$"), "-$42.50");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000.00), "$"), "$10,000,000.00");
}

#[test]
fn test_format_amount_pads_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5), "$"), "$1.50");
    assert_eq!(format_amount(dec!(5), "$"), "$5.00");
}

#[test]
fn test_format_amount_rounds_half_up() {
    assert_eq!(format_amount(dec!(0.125), "$"), "$0.13");
}

#[test]
fn test_format_amount_other_symbol() {
    assert_eq!(format_amount(dec!(1500), "€"), "€1,500.00");
    assert_eq!(format_amount(dec!(3), ""), "3.00");
}

#[test]
fn test_format_total() {
    assert_eq!(format_total(dec!(70), "$"), "$70.00");
    assert_eq!(format_total(Decimal::ZERO, "$"), "$0.00");
}

// ── short_date ────────────────────────────────────────────────

#[test]
fn test_short_date() {
    assert_eq!(short_date(at(2026, 10, 19, 12)), "19 Oct");
    assert_eq!(short_date(at(2026, 3, 5, 12)), "5 Mar");
}

// ── list_view ─────────────────────────────────────────────────

#[test]
fn test_list_view_empty() {
    assert_eq!(list_view(&[], "$"), ListView::Empty);
    assert_eq!(ListView::Empty.len(), 0);
    assert!(ListView::Empty.items().is_empty());
}

#[test]
fn test_list_view_snapshot() {
    let records = vec![
        rec(1, "50", "food", "", at(2026, 10, 2, 12)),
        rec(2, "1234.5", "home", "rent share", at(2026, 10, 19, 9)),
        rec(3, "7.25", "transport", "bus pass", at(2026, 10, 11, 18)),
    ];
    let view = list_view(&records, "$");
    assert_eq!(
        view,
        ListView::Items(vec![
            ListItem {
                id: 2,
                glyph: "🏠",
                label: "rent share".into(),
                date: "19 Oct".into(),
                amount: "$1,234.50".into(),
            },
            ListItem {
                id: 3,
                glyph: "🚗",
                label: "bus pass".into(),
                date: "11 Oct".into(),
                amount: "$7.25".into(),
            },
            ListItem {
                id: 1,
                glyph: "🍔",
                label: "food".into(),
                date: "2 Oct".into(),
                amount: "$50.00".into(),
            },
        ])
    );
}

#[test]
fn test_list_view_ties_keep_stored_order() {
    let when = at(2026, 10, 5, 12);
    let records = vec![
        rec(10, "1", "food", "", when),
        rec(11, "2", "food", "", when),
        rec(12, "3", "food", "", when),
    ];
    let ids: Vec<i64> = list_view(&records, "$").items().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![10, 11, 12]);
}

#[test]
fn test_list_view_does_not_reorder_input() {
    let records = vec![
        rec(1, "1", "food", "", at(2026, 10, 1, 12)),
        rec(2, "2", "food", "", at(2026, 10, 9, 12)),
    ];
    let _ = list_view(&records, "$");
    assert_eq!(records[0].id, 1);
}

// ── chart_dataset ─────────────────────────────────────────────

#[test]
fn test_chart_dataset_none_when_empty() {
    assert!(chart_dataset(&BTreeMap::new()).is_none());
}

#[test]
fn test_chart_dataset_snapshot() {
    let mut totals = BTreeMap::new();
    totals.insert(Category::Food, dec!(50));
    totals.insert(Category::Transport, dec!(20));
    let chart = chart_dataset(&totals).unwrap();

    assert_eq!(chart.slices.len(), 2);
    assert_eq!(chart.slices[0].label, "🍔 Food");
    assert_eq!(chart.slices[0].value, dec!(50));
    assert_eq!(chart.slices[0].percent, dec!(71.4));
    assert_eq!(chart.slices[0].color, Category::Food.color());
    assert_eq!(chart.slices[1].label, "🚗 Transport");
    assert_eq!(chart.slices[1].percent, dec!(28.6));
    assert_eq!(chart.total(), dec!(70));
}

#[test]
fn test_chart_single_slice_is_hundred_percent() {
    let mut totals = BTreeMap::new();
    totals.insert(Category::Health, dec!(12.34));
    let chart = chart_dataset(&totals).unwrap();
    assert_eq!(chart.slices[0].percent, dec!(100));
    assert_eq!(chart.slices[0].annotation("$"), "$12.34 (100.0%)");
}

#[test]
fn test_chart_thirds() {
    let mut totals = BTreeMap::new();
    totals.insert(Category::Food, dec!(1));
    totals.insert(Category::Home, dec!(1));
    totals.insert(Category::Other, dec!(1));
    let chart = chart_dataset(&totals).unwrap();
    for slice in &chart.slices {
        assert_eq!(slice.percent, dec!(33.3));
    }
}

#[test]
fn test_chart_annotation() {
    let mut totals = BTreeMap::new();
    totals.insert(Category::Food, dec!(50));
    totals.insert(Category::Transport, dec!(20));
    let chart = chart_dataset(&totals).unwrap();
    assert_eq!(chart.slices[0].annotation("$"), "$50.00 (71.4%)");
    assert_eq!(chart.slices[1].annotation("$"), "$20.00 (28.6%)");
}

#[test]
fn test_chart_of_capped_totals_does_not_overflow() {
    let mut totals = BTreeMap::new();
    totals.insert(Category::Food, Decimal::MAX);
    totals.insert(Category::Home, Decimal::MAX);
    let chart = chart_dataset(&totals).unwrap();
    assert_eq!(chart.total(), Decimal::MAX);
    assert_eq!(chart.slices.len(), 2);
}

#[test]
fn test_format_largest_amount() {
    assert_eq!(format_total(dec!(1000000000), "$"), "$1,000,000,000.00");
    assert_eq!(format_total(dec!(2000000000.50), "$"), "$2,000,000,000.50");
}
