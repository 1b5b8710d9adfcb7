//! Membership lifecycle: registration, renewal with date rollover, expiry,
//! and cancellation, plus the active-membership report.
//!
//! A vehicle either carries a [`Membership`] or it doesn't; Active versus
//! Expired is a pure function of today's date against the interval, never a
//! stored flag.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{FacilityError, Result};
use crate::payments::{NewPayment, PaymentKind, PaymentRecorder};
use crate::registry::{normalize_plate, MembershipRecord, Vehicle, VehicleDirectory};
use crate::tariff::{MembershipPlan, RateKind, TariffTable, VehicleClass};

/// Default near-expiry proximity window in days (inclusive).
pub const DEFAULT_NEAR_EXPIRY_DAYS: i64 = 30;

/// A vehicle's current membership interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub plan: MembershipPlan,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Lifecycle state, derived from the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Expired,
}

impl Membership {
    /// Whether the membership covers `today`. The end date is inclusive, and
    /// a renewed-ahead interval (start still in the future) counts as
    /// covered: coverage only lapses once `today` passes the end date.
    #[must_use]
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        today <= self.end
    }

    /// Derived lifecycle state. Fields are retained after expiry; only the
    /// date comparison distinguishes the two states.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> MembershipStatus {
        if self.is_valid_on(today) {
            MembershipStatus::Active
        } else {
            MembershipStatus::Expired
        }
    }

    /// Whole days until the end date; negative once expired.
    #[must_use]
    pub fn days_remaining_on(&self, today: NaiveDate) -> i64 {
        (self.end - today).num_days()
    }
}

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// Registration does not overwrite; use renewal instead.
    AlreadyHasPlan { plate: String },
    /// Nothing to renew, cancel, or report on.
    NoActivePlan { plate: String },
    /// The plate is not known to the registry.
    UnknownVehicle { plate: String },
    /// The customer is not known to the registry.
    UnknownCustomer { customer_id: String },
    /// The report requires at least one customer.
    NoCustomers,
}

impl fmt::Display for MembershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyHasPlan { plate } => {
                write!(f, "Vehicle {} already has a membership plan", plate)
            }
            Self::NoActivePlan { plate } => {
                write!(f, "Vehicle {} has no membership plan", plate)
            }
            Self::UnknownVehicle { plate } => write!(f, "Unknown vehicle: {}", plate),
            Self::UnknownCustomer { customer_id } => {
                write!(f, "Unknown customer: {}", customer_id)
            }
            Self::NoCustomers => write!(f, "No customers registered"),
        }
    }
}

impl std::error::Error for MembershipError {}

impl From<MembershipError> for FacilityError {
    fn from(err: MembershipError) -> Self {
        match &err {
            MembershipError::AlreadyHasPlan { .. } | MembershipError::NoActivePlan { .. } => {
                FacilityError::Conflict(err.to_string())
            }
            MembershipError::UnknownVehicle { .. } | MembershipError::UnknownCustomer { .. } => {
                FacilityError::NotFound(err.to_string())
            }
            MembershipError::NoCustomers => FacilityError::Unavailable(err.to_string()),
        }
    }
}

/// Validity summary for one vehicle's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityReport {
    pub plan: MembershipPlan,
    pub end_date: NaiveDate,
    pub is_valid: bool,
    /// Whole days until expiry; zero once expired (validity carries the
    /// expired signal, not a negative count).
    pub days_remaining: i64,
    pub message: String,
}

/// Facility-wide active-membership aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipReport {
    pub customers_with_active: usize,
    pub vehicles_active: usize,
    pub vehicles_near_expiry: usize,
    /// Plates with a currently valid membership, per counted customer.
    pub active_by_customer: BTreeMap<String, Vec<String>>,
    /// Subset of the active plates that fall inside the proximity window.
    pub near_expiry_by_customer: BTreeMap<String, Vec<String>>,
}

/// The membership state machine per vehicle.
pub struct MembershipLifecycle<D: VehicleDirectory, P: PaymentRecorder, C: Clock> {
    directory: D,
    payments: P,
    tariffs: TariffTable,
    clock: C,
    near_expiry_days: i64,
}

impl<D: VehicleDirectory, P: PaymentRecorder, C: Clock> MembershipLifecycle<D, P, C> {
    /// Create a lifecycle manager with the default proximity window.
    #[must_use]
    pub fn new(directory: D, payments: P, tariffs: TariffTable, clock: C) -> Self {
        Self {
            directory,
            payments,
            tariffs,
            clock,
            near_expiry_days: DEFAULT_NEAR_EXPIRY_DAYS,
        }
    }

    /// Override the near-expiry window (days, inclusive).
    #[must_use]
    pub fn with_near_expiry_window(mut self, days: i64) -> Self {
        self.near_expiry_days = days;
        self
    }

    /// The plan price for a vehicle class. Total over all class/plan pairs,
    /// never errors.
    #[must_use]
    pub fn price_for(&self, class: VehicleClass, plan: MembershipPlan) -> i64 {
        self.tariffs.rate(class, RateKind::Plan(plan))
    }

    /// Register a new membership starting today.
    ///
    /// Fails with a conflict when the vehicle already has a plan (active or
    /// expired); renewal is the operation for that. On success the payment is
    /// recorded first, then the vehicle's fields and the customer's history
    /// are updated as one unit.
    pub fn register(
        &self,
        plate: &str,
        customer_id: &str,
        plan: MembershipPlan,
    ) -> Result<Membership> {
        let plate = normalize_plate(plate);
        let vehicle = self.require_vehicle(&plate)?;
        if vehicle.membership.is_some() {
            return Err(MembershipError::AlreadyHasPlan { plate }.into());
        }
        self.require_customer(customer_id)?;

        let start = self.clock.today();
        let end = plan.extend(start);
        self.charge_and_apply(&vehicle, customer_id, plan, start, end, "registered")
    }

    /// Renew using the vehicle's current plan.
    ///
    /// Rollover: when the current interval has not yet lapsed, the new one
    /// starts at the old end date (no gap, no double charge for the overlap);
    /// otherwise it starts today.
    pub fn renew(&self, plate: &str, customer_id: &str) -> Result<Membership> {
        self.renew_inner(plate, customer_id, None)
    }

    /// Renew onto a different plan, same rollover rule.
    pub fn renew_with_plan(
        &self,
        plate: &str,
        customer_id: &str,
        new_plan: MembershipPlan,
    ) -> Result<Membership> {
        self.renew_inner(plate, customer_id, Some(new_plan))
    }

    fn renew_inner(
        &self,
        plate: &str,
        customer_id: &str,
        plan_override: Option<MembershipPlan>,
    ) -> Result<Membership> {
        let plate = normalize_plate(plate);
        let vehicle = self.require_vehicle(&plate)?;
        let current = vehicle
            .membership
            .ok_or(MembershipError::NoActivePlan {
                plate: plate.clone(),
            })?;
        self.require_customer(customer_id)?;

        let plan = plan_override.unwrap_or(current.plan);
        let today = self.clock.today();
        let start = if current.end >= today {
            current.end
        } else {
            today
        };
        let end = plan.extend(start);
        self.charge_and_apply(&vehicle, customer_id, plan, start, end, "renewed")
    }

    /// Cancel the vehicle's membership, clearing plan and dates.
    pub fn cancel(&self, plate: &str) -> Result<()> {
        let plate = normalize_plate(plate);
        let vehicle = self.require_vehicle(&plate)?;
        if vehicle.membership.is_none() {
            return Err(MembershipError::NoActivePlan { plate }.into());
        }

        self.directory.update_membership(&plate, None)?;
        tracing::info!(
            target: "forecourt::membership",
            plate = %plate,
            "membership cancelled"
        );
        Ok(())
    }

    /// Validity summary for the vehicle's current plan.
    pub fn check_validity(&self, plate: &str) -> Result<ValidityReport> {
        let plate = normalize_plate(plate);
        let vehicle = self.require_vehicle(&plate)?;
        let membership = vehicle.membership.ok_or(MembershipError::NoActivePlan {
            plate: plate.clone(),
        })?;

        let today = self.clock.today();
        let is_valid = membership.is_valid_on(today);
        let days = membership.days_remaining_on(today);
        let message = if is_valid {
            format!("{} plan expires in {} days", membership.plan, days)
        } else {
            format!("{} plan expired on {}", membership.plan, membership.end)
        };
        Ok(ValidityReport {
            plan: membership.plan,
            end_date: membership.end,
            is_valid,
            days_remaining: days.max(0),
            message,
        })
    }

    /// Whole days of validity remaining, or `-1` when the vehicle has no
    /// plan or the plan has already expired.
    #[must_use]
    pub fn days_remaining(&self, vehicle: &Vehicle) -> i64 {
        let today = self.clock.today();
        match &vehicle.membership {
            Some(m) if m.is_valid_on(today) => m.days_remaining_on(today),
            _ => -1,
        }
    }

    /// Whether the vehicle's plan is valid and inside the proximity window
    /// (boundary inclusive: exactly the window's day count is near expiry).
    #[must_use]
    pub fn is_near_expiry(&self, vehicle: &Vehicle) -> bool {
        let days = self.days_remaining(vehicle);
        days >= 0 && days <= self.near_expiry_days
    }

    /// Aggregate active memberships across all customers.
    ///
    /// A customer counts only when their own membership history holds a
    /// currently valid snapshot; their vehicles are then partitioned into
    /// active and, among those, near-expiry. Errors (no customers, registry
    /// unavailable) are returned, never thrown.
    pub fn active_membership_report(&self) -> Result<MembershipReport> {
        let customers = self.directory.all_customers()?;
        if customers.is_empty() {
            return Err(MembershipError::NoCustomers.into());
        }

        let today = self.clock.today();
        let mut report = MembershipReport::default();
        for customer in customers {
            if !customer.has_active_membership(today) {
                continue;
            }
            report.customers_with_active += 1;

            let vehicles = self.directory.vehicles_of(&customer.id)?;
            let active: Vec<String> = vehicles
                .iter()
                .filter(|v| {
                    v.membership
                        .as_ref()
                        .map(|m| m.is_valid_on(today))
                        .unwrap_or(false)
                })
                .map(|v| v.plate.clone())
                .collect();
            let near: Vec<String> = vehicles
                .iter()
                .filter(|v| self.is_near_expiry(v))
                .map(|v| v.plate.clone())
                .collect();

            report.vehicles_active += active.len();
            report.vehicles_near_expiry += near.len();
            report.active_by_customer.insert(customer.id.clone(), active);
            report.near_expiry_by_customer.insert(customer.id, near);
        }
        Ok(report)
    }

    fn require_vehicle(&self, plate: &str) -> Result<Vehicle> {
        self.directory
            .find_vehicle(plate)?
            .ok_or_else(|| {
                MembershipError::UnknownVehicle {
                    plate: plate.to_string(),
                }
                .into()
            })
    }

    fn require_customer(&self, customer_id: &str) -> Result<()> {
        self.directory
            .find_customer(customer_id)?
            .map(|_| ())
            .ok_or_else(|| {
                MembershipError::UnknownCustomer {
                    customer_id: customer_id.to_string(),
                }
                .into()
            })
    }

    /// Price the plan, record the payment, then apply the snapshot and the
    /// vehicle's fields as one registry unit. The payment comes first so the
    /// vehicle's dates can never be updated without a corresponding payment.
    fn charge_and_apply(
        &self,
        vehicle: &Vehicle,
        customer_id: &str,
        plan: MembershipPlan,
        start: NaiveDate,
        end: NaiveDate,
        action: &str,
    ) -> Result<Membership> {
        let price = self.price_for(vehicle.class, plan);
        self.payments.record(
            NewPayment::new(
                PaymentKind::Membership,
                vehicle.class,
                vehicle.plate.clone(),
                price,
                format!("{} membership {}", plan, action),
            )
            .for_customer(customer_id),
        )?;

        let record = MembershipRecord {
            plan,
            start,
            end,
            price,
        };
        self.directory
            .apply_membership(customer_id, &vehicle.plate, record)?;

        tracing::info!(
            target: "forecourt::membership",
            plate = %vehicle.plate,
            customer = %customer_id,
            plan = %plan,
            start = %start,
            end = %end,
            price,
            "membership {}", action
        );
        Ok(Membership { plan, start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test::FixedClock;
    use crate::payments::PaymentLedger;
    use crate::registry::InMemoryRegistry;
    use chrono::Duration;

    type TestLifecycle =
        MembershipLifecycle<InMemoryRegistry, PaymentLedger<FixedClock>, FixedClock>;

    fn setup() -> (TestLifecycle, InMemoryRegistry, PaymentLedger<FixedClock>, FixedClock) {
        let clock = FixedClock::at_date(2024, 3, 15);
        let registry = InMemoryRegistry::new();
        let payments = PaymentLedger::new(clock.clone());
        registry.upsert_customer("c1", "Ada").unwrap();
        registry
            .ensure_vehicle(VehicleClass::Car, "ABC123", "Red", "2023")
            .unwrap();
        let lifecycle = MembershipLifecycle::new(
            registry.clone(),
            payments.clone(),
            TariffTable::new(),
            clock.clone(),
        );
        (lifecycle, registry, payments, clock)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn set_membership(
        registry: &InMemoryRegistry,
        plate: &str,
        plan: MembershipPlan,
        start: NaiveDate,
        end: NaiveDate,
    ) {
        registry
            .update_membership(plate, Some(Membership { plan, start, end }))
            .unwrap();
    }

    #[test]
    fn test_register_sets_interval_and_records_payment() {
        let (lifecycle, registry, payments, _) = setup();

        let membership = lifecycle
            .register("abc123", "c1", MembershipPlan::Monthly)
            .unwrap();
        assert_eq!(membership.start, date(2024, 3, 15));
        assert_eq!(membership.end, date(2024, 4, 15));

        let vehicle = registry.find_vehicle("ABC123").unwrap().unwrap();
        assert_eq!(vehicle.membership, Some(membership));
        assert_eq!(vehicle.customer_id.as_deref(), Some("c1"));

        let recorded = payments.all();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, PaymentKind::Membership);
        assert_eq!(recorded[0].amount, 100_000);
        assert_eq!(recorded[0].customer_id.as_deref(), Some("c1"));

        let customer = registry.find_customer("c1").unwrap().unwrap();
        assert_eq!(customer.memberships.len(), 1);
        assert_eq!(customer.memberships[0].price, 100_000);
    }

    #[test]
    fn test_register_rejects_existing_plan() {
        let (lifecycle, _, payments, _) = setup();
        lifecycle.register("ABC123", "c1", MembershipPlan::Monthly).unwrap();

        let err = lifecycle
            .register("ABC123", "c1", MembershipPlan::Yearly)
            .unwrap_err();
        assert!(matches!(err, FacilityError::Conflict(_)));
        assert_eq!(payments.all().len(), 1);
    }

    #[test]
    fn test_register_unknown_vehicle_or_customer() {
        let (lifecycle, _, payments, _) = setup();

        let err = lifecycle
            .register("GHOST", "c1", MembershipPlan::Monthly)
            .unwrap_err();
        assert!(matches!(err, FacilityError::NotFound(_)));

        let err = lifecycle
            .register("ABC123", "nobody", MembershipPlan::Monthly)
            .unwrap_err();
        assert!(matches!(err, FacilityError::NotFound(_)));

        // Neither failure recorded a payment.
        assert!(payments.all().is_empty());
    }

    #[test]
    fn test_renew_expired_plan_starts_today() {
        let (lifecycle, registry, _, clock) = setup();
        let today = clock.today();
        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Monthly,
            today - Duration::days(45),
            today - Duration::days(15),
        );

        let renewed = lifecycle.renew("ABC123", "c1").unwrap();
        assert_eq!(renewed.start, today);
        assert_eq!(renewed.end, date(2024, 4, 15));
    }

    #[test]
    fn test_renew_valid_plan_starts_at_old_end() {
        let (lifecycle, registry, _, clock) = setup();
        let today = clock.today();
        let old_end = today + Duration::days(15); // 2024-03-30
        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Monthly,
            today - Duration::days(15),
            old_end,
        );

        let renewed = lifecycle.renew("ABC123", "c1").unwrap();
        assert_eq!(renewed.start, old_end);
        assert_eq!(renewed.end, date(2024, 4, 30));
    }

    #[test]
    fn test_renew_without_plan_is_a_conflict() {
        let (lifecycle, ..) = setup();
        let err = lifecycle.renew("ABC123", "c1").unwrap_err();
        assert!(matches!(err, FacilityError::Conflict(_)));
    }

    #[test]
    fn test_renew_with_plan_switches_duration_and_price() {
        let (lifecycle, registry, payments, clock) = setup();
        let today = clock.today();
        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Monthly,
            today - Duration::days(15),
            today + Duration::days(15),
        );

        let renewed = lifecycle
            .renew_with_plan("ABC123", "c1", MembershipPlan::Yearly)
            .unwrap();
        assert_eq!(renewed.plan, MembershipPlan::Yearly);
        assert_eq!(renewed.start, today + Duration::days(15));
        assert_eq!(renewed.end, date(2025, 3, 30));

        // Charged the yearly car rate.
        assert_eq!(payments.all()[0].amount, 960_000);
    }

    #[test]
    fn test_cancel_clears_plan_and_dates() {
        let (lifecycle, registry, _, clock) = setup();
        let today = clock.today();
        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Monthly,
            today,
            today + Duration::days(30),
        );

        lifecycle.cancel("ABC123").unwrap();

        let vehicle = registry.find_vehicle("ABC123").unwrap().unwrap();
        assert!(vehicle.membership.is_none());
        assert!(vehicle.customer_id.is_none());

        let err = lifecycle.check_validity("ABC123").unwrap_err();
        assert!(matches!(err, FacilityError::Conflict(_)));

        let err = lifecycle.cancel("ABC123").unwrap_err();
        assert!(matches!(err, FacilityError::Conflict(_)));
    }

    #[test]
    fn test_check_validity_active_and_expired() {
        let (lifecycle, registry, _, clock) = setup();
        let today = clock.today();

        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Quarterly,
            today - Duration::days(10),
            today + Duration::days(20),
        );
        let report = lifecycle.check_validity("ABC123").unwrap();
        assert!(report.is_valid);
        assert_eq!(report.days_remaining, 20);
        assert_eq!(report.plan, MembershipPlan::Quarterly);

        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Quarterly,
            today - Duration::days(100),
            today - Duration::days(10),
        );
        let report = lifecycle.check_validity("ABC123").unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.days_remaining, 0);
        assert!(report.message.contains("expired"));
    }

    #[test]
    fn test_days_remaining_sentinel() {
        let (lifecycle, registry, _, clock) = setup();
        let today = clock.today();

        let vehicle = registry.find_vehicle("ABC123").unwrap().unwrap();
        assert_eq!(lifecycle.days_remaining(&vehicle), -1);

        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Monthly,
            today - Duration::days(45),
            today - Duration::days(15),
        );
        let vehicle = registry.find_vehicle("ABC123").unwrap().unwrap();
        assert_eq!(lifecycle.days_remaining(&vehicle), -1);

        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Monthly,
            today,
            today + Duration::days(7),
        );
        let vehicle = registry.find_vehicle("ABC123").unwrap().unwrap();
        assert_eq!(lifecycle.days_remaining(&vehicle), 7);
    }

    #[test]
    fn test_near_expiry_boundaries() {
        let (lifecycle, registry, _, clock) = setup();
        let today = clock.today();

        for (days_left, expected) in [(30, true), (31, false), (0, true)] {
            set_membership(
                &registry,
                "ABC123",
                MembershipPlan::Monthly,
                today - Duration::days(5),
                today + Duration::days(days_left),
            );
            let vehicle = registry.find_vehicle("ABC123").unwrap().unwrap();
            assert_eq!(
                lifecycle.is_near_expiry(&vehicle),
                expected,
                "{} days left",
                days_left
            );
        }

        // Expired is never near-expiry.
        set_membership(
            &registry,
            "ABC123",
            MembershipPlan::Monthly,
            today - Duration::days(40),
            today - Duration::days(1),
        );
        let vehicle = registry.find_vehicle("ABC123").unwrap().unwrap();
        assert!(!lifecycle.is_near_expiry(&vehicle));
    }

    #[test]
    fn test_membership_status_is_derived_from_date() {
        let membership = Membership {
            plan: MembershipPlan::Monthly,
            start: date(2024, 3, 1),
            end: date(2024, 4, 1),
        };
        assert_eq!(membership.status(date(2024, 3, 20)), MembershipStatus::Active);
        assert_eq!(membership.status(date(2024, 4, 1)), MembershipStatus::Active);
        assert_eq!(membership.status(date(2024, 4, 2)), MembershipStatus::Expired);
    }

    #[test]
    fn test_report_counts_customers_and_partitions_vehicles() {
        let (lifecycle, registry, _, clock) = setup();
        let today = clock.today();

        // c1: one vehicle far from expiry, one near expiry.
        registry
            .ensure_vehicle(VehicleClass::Truck, "TRK1", "White", "2019")
            .unwrap();
        lifecycle.register("ABC123", "c1", MembershipPlan::Yearly).unwrap();
        lifecycle.register("TRK1", "c1", MembershipPlan::Monthly).unwrap();

        // c2: registered then lapsed (no currently valid snapshot).
        registry.upsert_customer("c2", "Grace").unwrap();
        registry
            .ensure_vehicle(VehicleClass::Motorcycle, "MOTO1", "Black", "2020")
            .unwrap();
        set_membership(
            &registry,
            "MOTO1",
            MembershipPlan::Monthly,
            today - Duration::days(60),
            today - Duration::days(30),
        );

        let report = lifecycle.active_membership_report().unwrap();
        assert_eq!(report.customers_with_active, 1);
        assert_eq!(report.vehicles_active, 2);
        assert_eq!(report.vehicles_near_expiry, 1);
        assert_eq!(
            report.active_by_customer.get("c1").unwrap(),
            &vec!["ABC123".to_string(), "TRK1".to_string()]
        );
        assert_eq!(
            report.near_expiry_by_customer.get("c1").unwrap(),
            &vec!["TRK1".to_string()]
        );
        assert!(report.active_by_customer.get("c2").is_none());
    }

    #[test]
    fn test_report_requires_customers() {
        let clock = FixedClock::at_date(2024, 3, 15);
        let registry = InMemoryRegistry::new();
        let payments = PaymentLedger::new(clock.clone());
        let lifecycle = MembershipLifecycle::new(
            registry,
            payments,
            TariffTable::new(),
            clock,
        );

        let err = lifecycle.active_membership_report().unwrap_err();
        assert!(matches!(err, FacilityError::Unavailable(_)));
    }

    #[test]
    fn test_customer_predicate_survives_vehicle_cancellation() {
        let (lifecycle, registry, ..) = setup();
        lifecycle.register("ABC123", "c1", MembershipPlan::Monthly).unwrap();
        lifecycle.cancel("ABC123").unwrap();

        // The customer's own history still holds a valid snapshot even though
        // the vehicle's fields were cleared; the two predicates are
        // intentionally independent.
        let report = lifecycle.active_membership_report().unwrap();
        assert_eq!(report.customers_with_active, 1);
        assert_eq!(report.vehicles_active, 0);
    }
}
