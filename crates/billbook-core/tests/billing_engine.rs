//! End-to-end checks of the computation and aggregation engines, driven the
//! way the form, list and dashboard collaborators use them.

use billbook_core::period::parse_bill_date;
use billbook_core::report::{monthly_series, overview, Metric, MetricValue};
use billbook_core::{
    aggregate_by_month, compute_totals, Bill, BillDraft, BillItem, BillTotals, BillingConfig,
    CoreError, Money, PaymentStatus, TaxRate, TotaledBill,
};
use chrono::NaiveDate;
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn bill(number: &str, date: &str, items: Vec<BillItem>, status: PaymentStatus) -> Bill {
    Bill {
        bill_number: number.to_string(),
        date: parse_bill_date(date).unwrap(),
        gst_rate: TaxRate::from_percent(18),
        items,
        customer_reference: "c_1".to_string(),
        payment_status: status,
        payment_method: None,
        notes: None,
    }
}

/// Demo bills spanning three months.
fn demo_bills() -> Vec<Bill> {
    vec![
        bill(
            "INV-1001",
            "2024-02-14T10:00:00Z",
            vec![
                BillItem::new("Steel Rods", Money::from_major(1200), 5),
                BillItem::new("Nuts & Bolts", Money::from_major(12), 200),
            ],
            PaymentStatus::Paid,
        ),
        bill(
            "INV-1002",
            "2024-03-14",
            vec![BillItem::new("Cement Bags", Money::from_major(380), 50)],
            PaymentStatus::Pending,
        ),
        bill(
            "INV-1003",
            "2024-01-14",
            vec![
                BillItem::new("Brand Identity Design", Money::from_major(40_000), 1),
                BillItem::new("Business Cards", Money::from_major(25), 200),
            ],
            PaymentStatus::Paid,
        ),
    ]
}

#[test]
fn dashboard_from_demo_bills() {
    init_tracing();
    let bills: Vec<TotaledBill> = demo_bills()
        .into_iter()
        .map(|b| TotaledBill::compute(b).unwrap())
        .collect();

    let summaries = aggregate_by_month(&bills).unwrap();
    let keys: Vec<String> = summaries.iter().map(|s| s.period.key()).collect();
    assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);

    // 45000 + 18% = 53100; 8400 + 18% = 9912; 19000 + 18% = 22420
    assert_eq!(summaries[0].revenue_total, Money::from_major(53_100));
    assert_eq!(summaries[1].revenue_total, Money::from_major(9_912));
    assert_eq!(summaries[2].revenue_total, Money::from_major(22_420));
    assert_eq!(summaries[2].tax_total, Money::from_major(3_420));

    let counts = monthly_series(&bills, Metric::Count).unwrap();
    assert!(counts.iter().all(|p| p.value == MetricValue::Count(1)));

    let stats = overview(&bills).unwrap();
    assert_eq!(stats.bill_count, 3);
    assert_eq!(stats.revenue_total, Money::from_major(85_432));
    assert_eq!(stats.pending_total, Money::from_major(22_420));
}

#[test]
fn stored_totals_round_trip_through_json() {
    init_tracing();
    let fresh = TotaledBill::compute(demo_bills().remove(0)).unwrap();
    let row = serde_json::to_value(&fresh).unwrap();

    // What the persistence layer hands back: the bill and its cached totals.
    let bill: Bill = serde_json::from_value(row.clone()).unwrap();
    let stored: BillTotals = serde_json::from_value(row["totals"].clone()).unwrap();

    let restored = TotaledBill::from_stored(bill, stored).unwrap();
    assert_eq!(restored, fresh);
}

#[test]
fn stale_stored_totals_are_rejected() {
    init_tracing();
    let bill = demo_bills().remove(0);
    // A total computed with a different formula drifts by a paisa.
    let stored = BillTotals {
        subtotal: Money::from_major(8_400),
        tax_amount: Money::from_major(1_512),
        total: Money::from_cents(991_201),
    };

    let err = TotaledBill::from_stored(bill, stored).unwrap_err();
    assert!(matches!(
        err,
        CoreError::TotalsMismatch {
            component: "total",
            ..
        }
    ));
}

#[test]
fn draft_preview_agrees_with_persisted_totals() {
    init_tracing();
    let config = BillingConfig::from_toml_str("default_gst_rate = \"12.5\"").unwrap();
    let mut draft = BillDraft::new(&config, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    draft.bill_number = "INV-3001".to_string();
    draft.customer_reference = "c_2".to_string();
    *draft.item_mut(0).unwrap() = BillItem::new("Paint", "199.99".parse().unwrap(), 3);

    let preview = draft.preview().unwrap();
    let saved = draft.finish().unwrap();
    let (bill, stored) = saved.into_parts();

    // 599.97 × 12.5% = 74.99625 → 75.00
    assert_eq!(preview.tax_amount, Money::from_cents(7_500));
    assert_eq!(stored, preview);
    assert_eq!(TotaledBill::from_stored(bill, stored).unwrap().totals(), &preview);
}

#[test]
fn concurrent_callers_see_identical_results() {
    let bills = demo_bills();
    let expected = billbook_core::aggregate_bills(&bills).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| billbook_core::aggregate_bills(&bills).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// =============================================================================
// Properties
// =============================================================================

fn arb_item() -> impl Strategy<Value = BillItem> {
    (0i64..10_000_000, 1i64..10_000)
        .prop_map(|(rate, qty)| BillItem::new("item", Money::from_cents(rate), qty))
}

proptest! {
    #[test]
    fn totals_follow_the_formula(
        items in prop::collection::vec(arb_item(), 1..20),
        bps in 0i32..10_000,
    ) {
        let totals = compute_totals(&items, TaxRate::from_bps(bps)).unwrap();

        let subtotal: i128 = items
            .iter()
            .map(|i| i.rate.cents() as i128 * i.quantity as i128)
            .sum();
        let tax = (subtotal * bps as i128 + 5_000) / 10_000;

        prop_assert_eq!(totals.subtotal.cents() as i128, subtotal);
        prop_assert_eq!(totals.tax_amount.cents() as i128, tax);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn totals_are_idempotent(
        items in prop::collection::vec(arb_item(), 1..20),
        bps in 0i32..10_000,
    ) {
        let rate = TaxRate::from_bps(bps);
        let first = compute_totals(&items, rate).unwrap();
        for _ in 0..3 {
            prop_assert_eq!(compute_totals(&items, rate).unwrap(), first);
        }
    }

    #[test]
    fn item_order_does_not_change_totals(
        items in prop::collection::vec(arb_item(), 1..20),
        bps in 0i32..10_000,
        rotate_by in 0usize..20,
    ) {
        let rate = TaxRate::from_bps(bps);
        let mut permuted = items.clone();
        permuted.reverse();
        let len = permuted.len();
        permuted.rotate_left(rotate_by % len);

        prop_assert_eq!(
            compute_totals(&items, rate).unwrap(),
            compute_totals(&permuted, rate).unwrap()
        );
    }

    #[test]
    fn invalid_input_never_yields_totals(
        items in prop::collection::vec(arb_item(), 1..10),
        victim in 0usize..10,
        bad_qty in -5i64..1,
    ) {
        let mut items = items;
        let idx = victim % items.len();
        items[idx].quantity = bad_qty;

        let err = compute_totals(&items, TaxRate::from_percent(18)).unwrap_err();
        let expected_field = format!("items[{}].quantity", idx);
        prop_assert_eq!(err.validation().map(|v| v.field()), Some(expected_field.as_str()));
    }
}
