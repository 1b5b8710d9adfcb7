//! Forecourt is an in-process engine for running a parking facility:
//! per-class occupancy with hard capacity limits, hourly stay billing,
//! date-bounded membership plans with rollover renewal, and an append-only
//! payment ledger.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use forecourt::{ConfigBuilder, Facility, MembershipPlan, VehicleClass, VehicleDirectory};
//!
//! fn main() -> forecourt::Result<()> {
//!     forecourt::init_tracing();
//!
//!     let config = ConfigBuilder::new()
//!         .with_capacity(50, 20, 10)
//!         .build()?;
//!     let facility = Facility::with_config(config)?;
//!
//!     facility
//!         .occupancy()
//!         .check_in(VehicleClass::Car, "ABC123", "Blue", "2021")?;
//!     facility.directory().upsert_customer("c1", "Ada")?;
//!     facility
//!         .memberships()
//!         .register("ABC123", "c1", MembershipPlan::Monthly)?;
//!     let receipt = facility.occupancy().check_out("ABC123")?;
//!     assert_eq!(receipt.amount_due, 0);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod facility;
pub mod membership;
pub mod occupancy;
pub mod payments;
pub mod registry;
pub mod tariff;

pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigBuilder, LoggingConfig};
pub use error::{ErrorKind, FacilityError, Result};
pub use facility::{DefaultFacility, Facility};
pub use membership::{
    Membership, MembershipError, MembershipLifecycle, MembershipReport, MembershipStatus,
    ValidityReport,
};
pub use occupancy::{
    CapacityLimits, CheckoutReceipt, ClassOccupancy, OccupancyError, OccupancyLedger,
    OccupancyStatus, ParkedVehicle,
};
pub use payments::{
    aggregate, ClassTotals, NewPayment, Payment, PaymentError, PaymentKind, PaymentLedger,
    PaymentRecorder, PaymentTotals,
};
pub use registry::{Customer, InMemoryRegistry, MembershipRecord, Vehicle, VehicleDirectory};
pub use tariff::{ClassRates, MembershipPlan, RateKind, RateSheet, TariffTable, VehicleClass};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, before building the
/// facility.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "forecourt=debug")
/// - `FORECOURT_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("FORECOURT_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
