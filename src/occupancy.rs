//! Admission control and time-based billing for transient parking.
//!
//! Tracks the vehicles currently inside the facility, enforces per-class
//! capacity, and bills elapsed time at checkout unless an active membership
//! exempts the vehicle.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{FacilityError, Result};
use crate::membership::Membership;
use crate::payments::{NewPayment, PaymentKind, PaymentRecorder};
use crate::registry::{normalize_plate, VehicleDirectory};
use crate::tariff::{RateKind, TariffTable, VehicleClass};

/// Occupancy-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccupancyError {
    /// A required check-in field was empty.
    InvalidInput { field: &'static str },
    /// The class's occupancy already equals its capacity.
    CapacityFull { class: VehicleClass, capacity: u32 },
    /// The plate already has an active occupancy entry.
    AlreadyParked { plate: String },
    /// No active occupancy entry for the plate.
    NotParked { plate: String },
}

impl fmt::Display for OccupancyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field } => write!(f, "Field '{}' must not be empty", field),
            Self::CapacityFull { class, capacity } => {
                write!(f, "No {} spaces available (capacity {})", class, capacity)
            }
            Self::AlreadyParked { plate } => write!(f, "Vehicle {} is already parked", plate),
            Self::NotParked { plate } => write!(f, "Vehicle {} is not parked here", plate),
        }
    }
}

impl std::error::Error for OccupancyError {}

impl From<OccupancyError> for FacilityError {
    fn from(err: OccupancyError) -> Self {
        match &err {
            OccupancyError::InvalidInput { .. } => FacilityError::Validation(err.to_string()),
            OccupancyError::CapacityFull { .. } => {
                FacilityError::CapacityExhausted(err.to_string())
            }
            OccupancyError::AlreadyParked { .. } => FacilityError::Conflict(err.to_string()),
            OccupancyError::NotParked { .. } => FacilityError::NotFound(err.to_string()),
        }
    }
}

/// Per-class capacity limits. Defaults to zero everywhere until configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLimits {
    pub car: u32,
    pub motorcycle: u32,
    pub truck: u32,
}

impl CapacityLimits {
    fn limit(&self, class: VehicleClass) -> u32 {
        match class {
            VehicleClass::Car => self.car,
            VehicleClass::Motorcycle => self.motorcycle,
            VehicleClass::Truck => self.truck,
        }
    }

    fn total(&self) -> u32 {
        self.car + self.motorcycle + self.truck
    }
}

/// A vehicle currently inside the facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkedVehicle {
    pub plate: String,
    pub class: VehicleClass,
    pub color: String,
    pub model: String,
    pub checked_in_at: DateTime<Utc>,
    /// The vehicle's current membership interval at snapshot time, if any.
    pub membership: Option<Membership>,
}

/// Result of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub plate: String,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: DateTime<Utc>,
    /// Whole hours billed; never less than one.
    pub hours_billed: i64,
    /// Zero when an active membership covered the stay.
    pub amount_due: i64,
    pub had_active_membership: bool,
}

/// Occupancy counts for one vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassOccupancy {
    pub current: u32,
    pub capacity: u32,
    /// `capacity - current`, saturating at zero when over capacity.
    pub available: u32,
}

/// Snapshot of facility occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyStatus {
    pub car: ClassOccupancy,
    pub motorcycle: ClassOccupancy,
    pub truck: ClassOccupancy,
    pub total_capacity: u32,
    pub total_occupied: u32,
}

impl OccupancyStatus {
    /// Per-class counts by class value.
    #[must_use]
    pub fn class(&self, class: VehicleClass) -> ClassOccupancy {
        match class {
            VehicleClass::Car => self.car,
            VehicleClass::Motorcycle => self.motorcycle,
            VehicleClass::Truck => self.truck,
        }
    }
}

#[derive(Debug, Clone)]
struct OccupancyEntry {
    plate: String,
    class: VehicleClass,
    color: String,
    model: String,
    checked_in_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LedgerState {
    limits: CapacityLimits,
    entries: HashMap<String, OccupancyEntry>,
}

/// Occupancy ledger: the live set of parked vehicles.
///
/// Capacity check and entry insertion happen under one write lock, so two
/// concurrent check-ins cannot both observe a free space and both succeed
/// past the limit.
pub struct OccupancyLedger<D: VehicleDirectory, P: PaymentRecorder, C: Clock> {
    directory: D,
    payments: P,
    tariffs: TariffTable,
    clock: C,
    state: Arc<RwLock<LedgerState>>,
}

impl<D: VehicleDirectory, P: PaymentRecorder, C: Clock> OccupancyLedger<D, P, C> {
    /// Create a ledger with zero capacity everywhere.
    #[must_use]
    pub fn new(directory: D, payments: P, tariffs: TariffTable, clock: C) -> Self {
        Self {
            directory,
            payments,
            tariffs,
            clock,
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    /// Replace the per-class capacity limits.
    ///
    /// Currently parked vehicles are untouched; lowering a limit below the
    /// current occupancy simply blocks further admissions for that class
    /// until occupancy drops.
    pub fn configure_capacity(&self, car: u32, motorcycle: u32, truck: u32) {
        let mut state = self.state.write().unwrap();
        state.limits = CapacityLimits {
            car,
            motorcycle,
            truck,
        };
        tracing::info!(
            target: "forecourt::occupancy",
            car, motorcycle, truck,
            "capacity limits reconfigured"
        );
    }

    /// Update the hourly-stay rates on the shared tariff table.
    pub fn configure_hourly_rates(&self, car: i64, motorcycle: i64, truck: i64) -> Result<()> {
        self.tariffs.set_hourly_rates(car, motorcycle, truck)
    }

    /// Admit a vehicle.
    ///
    /// Creates the vehicle in the registry when it is not yet known, then
    /// opens an occupancy entry stamped with the current time.
    pub fn check_in(
        &self,
        class: VehicleClass,
        plate: &str,
        color: &str,
        model: &str,
    ) -> Result<ParkedVehicle> {
        for (field, value) in [("plate", plate), ("color", color), ("model", model)] {
            if value.trim().is_empty() {
                return Err(OccupancyError::InvalidInput { field }.into());
            }
        }
        let plate = normalize_plate(plate);

        let mut state = self.state.write().unwrap();
        if state.entries.contains_key(&plate) {
            return Err(OccupancyError::AlreadyParked { plate }.into());
        }

        let capacity = state.limits.limit(class);
        let occupied = state
            .entries
            .values()
            .filter(|e| e.class == class)
            .count() as u32;
        if occupied >= capacity {
            return Err(OccupancyError::CapacityFull { class, capacity }.into());
        }

        let vehicle = self.directory.ensure_vehicle(class, &plate, color, model)?;
        let entry = OccupancyEntry {
            plate: plate.clone(),
            class,
            color: color.to_string(),
            model: model.to_string(),
            checked_in_at: self.clock.now(),
        };
        let parked = ParkedVehicle {
            plate: entry.plate.clone(),
            class: entry.class,
            color: entry.color.clone(),
            model: entry.model.clone(),
            checked_in_at: entry.checked_in_at,
            membership: vehicle.membership,
        };
        state.entries.insert(plate.clone(), entry);

        tracing::info!(
            target: "forecourt::occupancy",
            plate = %plate,
            class = %class,
            occupied = occupied + 1,
            capacity,
            "vehicle checked in"
        );
        Ok(parked)
    }

    /// Release a vehicle and bill the stay.
    ///
    /// Billed hours are the elapsed time rounded up to the next whole hour,
    /// with a minimum of one hour. A vehicle whose membership interval covers
    /// today owes nothing and no payment is recorded; the entry is removed
    /// either way.
    pub fn check_out(&self, plate: &str) -> Result<CheckoutReceipt> {
        let plate = normalize_plate(plate);

        let mut state = self.state.write().unwrap();
        let entry = state
            .entries
            .get(&plate)
            .cloned()
            .ok_or(OccupancyError::NotParked {
                plate: plate.clone(),
            })?;

        let now = self.clock.now();
        let elapsed_secs = (now - entry.checked_in_at).num_seconds().max(0);
        let hours_billed = ((elapsed_secs + 3599) / 3600).max(1);

        let membership_active = self
            .directory
            .find_vehicle(&plate)?
            .and_then(|v| v.membership)
            .map(|m| m.is_valid_on(now.date_naive()))
            .unwrap_or(false);

        let amount_due = if membership_active {
            0
        } else {
            let rate = self.tariffs.rate(entry.class, RateKind::Hourly);
            let amount = hours_billed * rate;
            self.payments.record(
                NewPayment::new(
                    PaymentKind::Stay,
                    entry.class,
                    plate.clone(),
                    amount,
                    format!("parking stay, {}h at {}/h", hours_billed, rate),
                )
            )?;
            amount
        };

        state.entries.remove(&plate);
        tracing::info!(
            target: "forecourt::occupancy",
            plate = %plate,
            hours = hours_billed,
            amount = amount_due,
            membership = membership_active,
            "vehicle checked out"
        );

        Ok(CheckoutReceipt {
            plate,
            checked_in_at: entry.checked_in_at,
            checked_out_at: now,
            hours_billed,
            amount_due,
            had_active_membership: membership_active,
        })
    }

    /// Current occupancy counts. Pure read.
    #[must_use]
    pub fn status(&self) -> OccupancyStatus {
        let state = self.state.read().unwrap();
        let count = |class: VehicleClass| {
            state.entries.values().filter(|e| e.class == class).count() as u32
        };
        let class_status = |class: VehicleClass| {
            let current = count(class);
            let capacity = state.limits.limit(class);
            ClassOccupancy {
                current,
                capacity,
                available: capacity.saturating_sub(current),
            }
        };
        OccupancyStatus {
            car: class_status(VehicleClass::Car),
            motorcycle: class_status(VehicleClass::Motorcycle),
            truck: class_status(VehicleClass::Truck),
            total_capacity: state.limits.total(),
            total_occupied: state.entries.len() as u32,
        }
    }

    /// Snapshot of all currently parked vehicles, ordered by plate.
    pub fn list_current(&self) -> Result<Vec<ParkedVehicle>> {
        let entries: Vec<OccupancyEntry> = {
            let state = self.state.read().unwrap();
            state.entries.values().cloned().collect()
        };

        let mut parked = Vec::with_capacity(entries.len());
        for entry in entries {
            let membership = self
                .directory
                .find_vehicle(&entry.plate)?
                .and_then(|v| v.membership);
            parked.push(ParkedVehicle {
                plate: entry.plate,
                class: entry.class,
                color: entry.color,
                model: entry.model,
                checked_in_at: entry.checked_in_at,
                membership,
            });
        }
        parked.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(parked)
    }
}
