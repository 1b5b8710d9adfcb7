mod common;

use chrono::{Duration, NaiveDate};
use common::ManualClock;
use forecourt::{
    aggregate, ConfigBuilder, Facility, FacilityError, MembershipPlan, PaymentKind, VehicleClass,
    VehicleDirectory,
};

fn facility_at(
    year: i32,
    month: u32,
    day: u32,
) -> (
    Facility<forecourt::InMemoryRegistry, forecourt::PaymentLedger<ManualClock>, ManualClock>,
    ManualClock,
) {
    let clock = ManualClock::at_date(year, month, day);
    let config = ConfigBuilder::new().with_capacity(2, 2, 1).build().unwrap();
    let facility = Facility::with_config_and_clock(config, clock.clone()).unwrap();
    (facility, clock)
}

#[test]
fn test_capacity_is_enforced_per_class() {
    let (facility, _) = facility_at(2024, 5, 1);
    let lot = facility.occupancy();

    lot.check_in(VehicleClass::Car, "CAR1", "Blue", "2021").unwrap();
    lot.check_in(VehicleClass::Car, "CAR2", "Red", "2022").unwrap();
    let err = lot
        .check_in(VehicleClass::Car, "CAR3", "Green", "2023")
        .unwrap_err();
    assert!(matches!(err, FacilityError::CapacityExhausted(_)));

    // A full car lot does not block the other classes.
    lot.check_in(VehicleClass::Truck, "TRK1", "White", "2019").unwrap();

    let status = lot.status();
    assert_eq!(status.class(VehicleClass::Car).available, 0);
    assert_eq!(status.class(VehicleClass::Truck).available, 0);
    assert_eq!(status.class(VehicleClass::Motorcycle).available, 2);
    assert_eq!(status.total_occupied, 3);
    assert_eq!(status.total_capacity, 5);

    // Freeing a space admits the vehicle that was turned away.
    lot.check_out("CAR1").unwrap();
    lot.check_in(VehicleClass::Car, "CAR3", "Green", "2023").unwrap();
}

#[test]
fn test_stay_is_billed_by_rounded_up_hours() {
    let (facility, clock) = facility_at(2024, 5, 1);
    let lot = facility.occupancy();

    lot.check_in(VehicleClass::Car, "CAR1", "Blue", "2021").unwrap();
    clock.advance(Duration::minutes(150));
    let receipt = lot.check_out("CAR1").unwrap();
    assert_eq!(receipt.hours_billed, 3);
    assert_eq!(receipt.amount_due, 6_000);
    assert!(!receipt.had_active_membership);

    // A momentary stay still pays the one-hour minimum.
    lot.check_in(VehicleClass::Motorcycle, "MOTO1", "Black", "2020").unwrap();
    let receipt = lot.check_out("MOTO1").unwrap();
    assert_eq!(receipt.hours_billed, 1);
    assert_eq!(receipt.amount_due, 1_000);

    let payments = facility.payments().all();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.kind == PaymentKind::Stay));
}

#[test]
fn test_member_checkout_is_exempt_until_expiry() {
    let (facility, clock) = facility_at(2024, 5, 1);
    facility.directory().upsert_customer("c1", "Ada").unwrap();
    let lot = facility.occupancy();

    lot.check_in(VehicleClass::Car, "CAR1", "Blue", "2021").unwrap();
    facility
        .memberships()
        .register("CAR1", "c1", MembershipPlan::Monthly)
        .unwrap();

    clock.advance(Duration::hours(5));
    let receipt = lot.check_out("CAR1").unwrap();
    assert_eq!(receipt.amount_due, 0);
    assert!(receipt.had_active_membership);

    // Past the end date the same vehicle pays the hourly rate again.
    clock.advance(Duration::days(45));
    lot.check_in(VehicleClass::Car, "CAR1", "Blue", "2021").unwrap();
    clock.advance(Duration::hours(2));
    let receipt = lot.check_out("CAR1").unwrap();
    assert!(!receipt.had_active_membership);
    assert_eq!(receipt.amount_due, 4_000);
}

#[test]
fn test_unknown_plate_checkout_changes_nothing() {
    let (facility, _) = facility_at(2024, 5, 1);
    let lot = facility.occupancy();
    lot.check_in(VehicleClass::Car, "CAR1", "Blue", "2021").unwrap();

    let err = lot.check_out("GHOST").unwrap_err();
    assert!(matches!(err, FacilityError::NotFound(_)));
    assert_eq!(lot.status().total_occupied, 1);
    assert!(facility.payments().all().is_empty());
}

#[test]
fn test_list_current_is_sorted_and_status_reads_are_pure() {
    let (facility, _) = facility_at(2024, 5, 1);
    let lot = facility.occupancy();
    lot.check_in(VehicleClass::Car, "zzz9", "Blue", "2021").unwrap();
    lot.check_in(VehicleClass::Car, "aaa1", "Red", "2022").unwrap();

    let parked = lot.list_current().unwrap();
    let plates: Vec<&str> = parked.iter().map(|v| v.plate.as_str()).collect();
    assert_eq!(plates, ["AAA1", "ZZZ9"]);

    let before = lot.status();
    let _ = lot.list_current().unwrap();
    assert_eq!(lot.status(), before);
}

#[test]
fn test_ledger_queries_and_aggregation() {
    let (facility, clock) = facility_at(2024, 5, 1);
    facility.directory().upsert_customer("c1", "Ada").unwrap();
    let lot = facility.occupancy();

    // Day one: a 3h car stay.
    lot.check_in(VehicleClass::Car, "CAR1", "Blue", "2021").unwrap();
    clock.advance(Duration::hours(3));
    lot.check_out("CAR1").unwrap();

    // Next month: a motorcycle membership.
    clock.advance(Duration::days(31));
    lot.check_in(VehicleClass::Motorcycle, "MOTO1", "Black", "2020").unwrap();
    facility
        .memberships()
        .register("MOTO1", "c1", MembershipPlan::Monthly)
        .unwrap();

    let ledger = facility.payments();
    let may_day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    assert_eq!(ledger.on_day(may_day).len(), 1);
    assert_eq!(ledger.in_month(5, 2024).len(), 1);
    assert_eq!(ledger.in_month(6, 2024).len(), 1);
    assert_eq!(ledger.in_year(2024).len(), 2);
    assert!(ledger.in_month(13, 2024).is_empty());
    assert!(ledger.in_year(-5).is_empty());

    let totals = aggregate(&ledger.all());
    assert_eq!(totals.total_stay, 6_000);
    assert_eq!(totals.total_membership, 50_000);
    assert_eq!(totals.total, 56_000);
    assert_eq!(totals.by_class.car, 6_000);
    assert_eq!(totals.by_class.motorcycle, 50_000);
}
