//! Facility assembly: wires the registry, the payment ledger, the tariff
//! table, and a clock into the occupancy and membership managers.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::membership::MembershipLifecycle;
use crate::occupancy::OccupancyLedger;
use crate::payments::{PaymentLedger, PaymentRecorder};
use crate::registry::{InMemoryRegistry, VehicleDirectory};
use crate::tariff::TariffTable;

/// The facility wired with the default in-memory backends.
pub type DefaultFacility = Facility<InMemoryRegistry, PaymentLedger<SystemClock>, SystemClock>;

/// A parking facility: one shared registry, one shared payment ledger, one
/// shared tariff table, and the two managers built on top of them.
///
/// Cloneable collaborators are handed to both managers, so an occupancy
/// check-out and a membership renewal observe the same vehicles, payments,
/// and rates.
pub struct Facility<D, P, C>
where
    D: VehicleDirectory + Clone,
    P: PaymentRecorder + Clone,
    C: Clock + Clone,
{
    directory: D,
    payments: P,
    tariffs: TariffTable,
    occupancy: OccupancyLedger<D, P, C>,
    memberships: MembershipLifecycle<D, P, C>,
}

impl DefaultFacility {
    /// Build a facility from configuration with the default backends.
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_clock(config, SystemClock)
    }
}

impl<C: Clock + Clone> Facility<InMemoryRegistry, PaymentLedger<C>, C> {
    /// Build a facility from configuration with an explicit clock and the
    /// default in-memory backends.
    pub fn with_config_and_clock(config: Config, clock: C) -> Result<Self> {
        let directory = InMemoryRegistry::new();
        let payments = PaymentLedger::new(clock.clone());
        let tariffs = TariffTable::from_sheet(config.rates.clone())?;
        let facility = Self::new(directory, payments, tariffs, clock)
            .with_near_expiry_window(config.near_expiry_days);
        facility.occupancy.configure_capacity(
            config.capacity.car,
            config.capacity.motorcycle,
            config.capacity.truck,
        );
        Ok(facility)
    }
}

impl<D, P, C> Facility<D, P, C>
where
    D: VehicleDirectory + Clone,
    P: PaymentRecorder + Clone,
    C: Clock + Clone,
{
    /// Wire a facility from its collaborators.
    #[must_use]
    pub fn new(directory: D, payments: P, tariffs: TariffTable, clock: C) -> Self {
        let occupancy = OccupancyLedger::new(
            directory.clone(),
            payments.clone(),
            tariffs.clone(),
            clock.clone(),
        );
        let memberships =
            MembershipLifecycle::new(directory.clone(), payments.clone(), tariffs.clone(), clock);
        Self {
            directory,
            payments,
            tariffs,
            occupancy,
            memberships,
        }
    }

    /// Override the membership near-expiry window (days, inclusive).
    #[must_use]
    pub fn with_near_expiry_window(mut self, days: i64) -> Self {
        self.memberships = self.memberships.with_near_expiry_window(days);
        self
    }

    /// Check-in, check-out, capacity, and status operations.
    #[must_use]
    pub fn occupancy(&self) -> &OccupancyLedger<D, P, C> {
        &self.occupancy
    }

    /// Registration, renewal, cancellation, and membership reports.
    #[must_use]
    pub fn memberships(&self) -> &MembershipLifecycle<D, P, C> {
        &self.memberships
    }

    /// The payment backend, for recording and (with the default ledger)
    /// querying payments.
    #[must_use]
    pub fn payments(&self) -> &P {
        &self.payments
    }

    /// The vehicle and customer registry.
    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// The shared tariff table.
    #[must_use]
    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }
}
