//! Tariff configuration: the single source of truth for all monetary rates.
//!
//! Rates are keyed by vehicle class and billing kind (hourly stay or a
//! membership plan). Amounts are currency-agnostic integer units.

use std::sync::{Arc, RwLock};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{FacilityError, Result};

/// Vehicle classification. Determines the capacity bucket and tariff rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Car,
    Motorcycle,
    Truck,
}

impl VehicleClass {
    /// All classes, in display order.
    pub const ALL: [VehicleClass; 3] = [Self::Car, Self::Motorcycle, Self::Truck];

    /// Convert to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Motorcycle => "motorcycle",
            Self::Truck => "truck",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Membership plan duration.
///
/// "No plan" is not a variant: an unsubscribed vehicle carries no
/// [`Membership`](crate::membership::Membership) at all, so an invalid-plan
/// input is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipPlan {
    Monthly,
    Quarterly,
    Yearly,
}

impl MembershipPlan {
    /// Plan duration in calendar months.
    #[must_use]
    pub fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        }
    }

    /// Add this plan's duration to a date using calendar arithmetic
    /// (a monthly plan started 2024-01-31 ends 2024-02-29, not +30 days).
    #[must_use]
    pub fn extend(&self, from: NaiveDate) -> NaiveDate {
        from.checked_add_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Convert to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for MembershipPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a rate is charged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// Per-hour transient parking.
    Hourly,
    /// Membership plan price (one charge per interval).
    Plan(MembershipPlan),
}

/// Rates for a single vehicle class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRates {
    pub hourly: i64,
    pub monthly: i64,
    pub quarterly: i64,
    pub yearly: i64,
}

impl ClassRates {
    fn rate(&self, kind: RateKind) -> i64 {
        match kind {
            RateKind::Hourly => self.hourly,
            RateKind::Plan(MembershipPlan::Monthly) => self.monthly,
            RateKind::Plan(MembershipPlan::Quarterly) => self.quarterly,
            RateKind::Plan(MembershipPlan::Yearly) => self.yearly,
        }
    }

    fn all_positive(&self) -> bool {
        self.hourly > 0 && self.monthly > 0 && self.quarterly > 0 && self.yearly > 0
    }
}

/// The full rate sheet across all vehicle classes.
///
/// `Default` carries the documented out-of-the-box rates, in effect until
/// explicitly reconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSheet {
    pub car: ClassRates,
    pub motorcycle: ClassRates,
    pub truck: ClassRates,
}

impl Default for RateSheet {
    fn default() -> Self {
        Self {
            car: ClassRates {
                hourly: 2_000,
                monthly: 100_000,
                quarterly: 270_000,
                yearly: 960_000,
            },
            motorcycle: ClassRates {
                hourly: 1_000,
                monthly: 50_000,
                quarterly: 135_000,
                yearly: 480_000,
            },
            truck: ClassRates {
                hourly: 3_000,
                monthly: 150_000,
                quarterly: 405_000,
                yearly: 1_440_000,
            },
        }
    }
}

impl RateSheet {
    /// Whether every rate in the sheet is positive.
    #[must_use]
    pub fn all_positive(&self) -> bool {
        VehicleClass::ALL
            .iter()
            .all(|class| self.class(*class).all_positive())
    }

    fn class(&self, class: VehicleClass) -> &ClassRates {
        match class {
            VehicleClass::Car => &self.car,
            VehicleClass::Motorcycle => &self.motorcycle,
            VehicleClass::Truck => &self.truck,
        }
    }

    fn class_mut(&mut self, class: VehicleClass) -> &mut ClassRates {
        match class {
            VehicleClass::Car => &mut self.car,
            VehicleClass::Motorcycle => &mut self.motorcycle,
            VehicleClass::Truck => &mut self.truck,
        }
    }
}

/// Shared tariff table.
///
/// Owned once by the facility and handed to both ledgers; clones share the
/// same underlying sheet, so reconfiguration is visible everywhere. Rates are
/// mutable only through the explicit configure operations below.
#[derive(Debug, Clone, Default)]
pub struct TariffTable {
    inner: Arc<RwLock<RateSheet>>,
}

impl TariffTable {
    /// Create a table with the documented default rates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from a pre-built rate sheet, validating every rate.
    pub fn from_sheet(sheet: RateSheet) -> Result<Self> {
        for class in VehicleClass::ALL {
            if !sheet.class(class).all_positive() {
                return Err(FacilityError::validation(format!(
                    "all {} rates must be positive",
                    class
                )));
            }
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(sheet)),
        })
    }

    /// Look up the configured rate for a class and billing kind.
    #[must_use]
    pub fn rate(&self, class: VehicleClass, kind: RateKind) -> i64 {
        self.inner.read().unwrap().class(class).rate(kind)
    }

    /// Replace the three hourly-stay rates.
    pub fn set_hourly_rates(&self, car: i64, motorcycle: i64, truck: i64) -> Result<()> {
        if car <= 0 || motorcycle <= 0 || truck <= 0 {
            return Err(FacilityError::validation(
                "hourly rates must be positive".to_string(),
            ));
        }
        let mut sheet = self.inner.write().unwrap();
        sheet.car.hourly = car;
        sheet.motorcycle.hourly = motorcycle;
        sheet.truck.hourly = truck;
        tracing::info!(
            target: "forecourt::tariff",
            car, motorcycle, truck,
            "hourly rates reconfigured"
        );
        Ok(())
    }

    /// Replace a single plan rate.
    pub fn set_plan_rate(&self, class: VehicleClass, plan: MembershipPlan, rate: i64) -> Result<()> {
        if rate <= 0 {
            return Err(FacilityError::validation(format!(
                "{} {} rate must be positive",
                class, plan
            )));
        }
        let mut sheet = self.inner.write().unwrap();
        let rates = sheet.class_mut(class);
        match plan {
            MembershipPlan::Monthly => rates.monthly = rate,
            MembershipPlan::Quarterly => rates.quarterly = rate,
            MembershipPlan::Yearly => rates.yearly = rate,
        }
        tracing::info!(
            target: "forecourt::tariff",
            class = %class,
            plan = %plan,
            rate,
            "plan rate reconfigured"
        );
        Ok(())
    }

    /// Read a copy of the full sheet.
    #[must_use]
    pub fn snapshot(&self) -> RateSheet {
        self.inner.read().unwrap().clone()
    }
}
