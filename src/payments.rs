//! Append-only payment history and reporting aggregation.
//!
//! Every completed charge (stay or membership) is recorded here. Records are
//! never mutated once created; reporting is filtering plus aggregation over
//! the recorded timestamps.

use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{FacilityError, Result};
use crate::tariff::VehicleClass;

/// What a payment was charged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Time-based transient parking charge.
    Stay,
    /// Membership plan registration or renewal.
    Membership,
}

impl PaymentKind {
    /// Convert to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stay => "stay",
            Self::Membership => "membership",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed payment. Append-only; never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    /// Positive amount in currency-agnostic units.
    pub amount: i64,
    pub recorded_at: DateTime<Utc>,
    pub kind: PaymentKind,
    pub plate: String,
    pub class: VehicleClass,
    pub customer_id: Option<String>,
    pub description: String,
}

/// A payment about to be recorded.
///
/// `id` and `recorded_at` are assigned by the ledger when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub amount: i64,
    pub kind: PaymentKind,
    pub plate: String,
    pub class: VehicleClass,
    pub customer_id: Option<String>,
    pub description: String,
    pub id: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl NewPayment {
    /// Create a payment draft with ledger-assigned id and timestamp.
    #[must_use]
    pub fn new(
        kind: PaymentKind,
        class: VehicleClass,
        plate: impl Into<String>,
        amount: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            kind,
            plate: plate.into(),
            class,
            customer_id: None,
            description: description.into(),
            id: None,
            recorded_at: None,
        }
    }

    /// Attach the customer the charge belongs to.
    #[must_use]
    pub fn for_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
}

/// Capability to record a completed payment.
///
/// Decided at assembly time and injected into both ledgers; there is no
/// set-later wiring.
pub trait PaymentRecorder: Send + Sync {
    /// Append a payment, assigning id and timestamp when not supplied.
    fn record(&self, payment: NewPayment) -> Result<Payment>;
}

/// Payment-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Payment amounts must be positive.
    InvalidAmount { amount: i64 },
    /// No payment with the given id.
    NotFound { id: String },
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount { amount } => {
                write!(f, "Payment amount must be positive, got {}", amount)
            }
            Self::NotFound { id } => write!(f, "Payment not found: {}", id),
        }
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for FacilityError {
    fn from(err: PaymentError) -> Self {
        match &err {
            PaymentError::InvalidAmount { .. } => FacilityError::Validation(err.to_string()),
            PaymentError::NotFound { .. } => FacilityError::NotFound(err.to_string()),
        }
    }
}

/// In-memory append-only payment ledger.
///
/// Wraps data in `Arc` for cheap cloning; clones share the same history.
#[derive(Debug, Clone)]
pub struct PaymentLedger<C: Clock> {
    payments: Arc<RwLock<Vec<Payment>>>,
    clock: C,
}

impl<C: Clock> PaymentLedger<C> {
    /// Create an empty ledger stamping records with the given clock.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            payments: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Fetch a payment by id.
    pub fn find_by_id(&self, id: &str) -> Result<Payment> {
        self.payments
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound { id: id.to_string() }.into())
    }

    /// All payments ordered by timestamp.
    #[must_use]
    pub fn all(&self) -> Vec<Payment> {
        let mut payments = self.payments.read().unwrap().clone();
        payments.sort_by_key(|p| p.recorded_at);
        payments
    }

    /// Payments recorded on a calendar day.
    #[must_use]
    pub fn on_day(&self, date: NaiveDate) -> Vec<Payment> {
        self.filtered(|p| p.recorded_at.date_naive() == date)
    }

    /// Payments recorded in a month. Months outside `[1, 12]` or negative
    /// years yield an empty result rather than an error.
    #[must_use]
    pub fn in_month(&self, month: u32, year: i32) -> Vec<Payment> {
        if !(1..=12).contains(&month) || year < 0 {
            return Vec::new();
        }
        self.filtered(|p| {
            let d = p.recorded_at.date_naive();
            d.month() == month && d.year() == year
        })
    }

    /// Payments recorded in a year.
    #[must_use]
    pub fn in_year(&self, year: i32) -> Vec<Payment> {
        if year < 0 {
            return Vec::new();
        }
        self.filtered(|p| p.recorded_at.date_naive().year() == year)
    }

    /// Payments recorded within `[start, end]` (inclusive). An inverted range
    /// yields an empty result rather than an error.
    #[must_use]
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Payment> {
        if start > end {
            return Vec::new();
        }
        self.filtered(|p| {
            let d = p.recorded_at.date_naive();
            start <= d && d <= end
        })
    }

    fn filtered(&self, predicate: impl Fn(&Payment) -> bool) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .payments
            .read()
            .unwrap()
            .iter()
            .filter(|p| predicate(p))
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.recorded_at);
        payments
    }
}

impl<C: Clock> PaymentRecorder for PaymentLedger<C> {
    fn record(&self, payment: NewPayment) -> Result<Payment> {
        if payment.amount <= 0 {
            return Err(PaymentError::InvalidAmount {
                amount: payment.amount,
            }
            .into());
        }

        let payment = Payment {
            id: payment
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            amount: payment.amount,
            recorded_at: payment.recorded_at.unwrap_or_else(|| self.clock.now()),
            kind: payment.kind,
            plate: payment.plate,
            class: payment.class,
            customer_id: payment.customer_id,
            description: payment.description,
        };

        tracing::info!(
            target: "forecourt::payments",
            id = %payment.id,
            kind = %payment.kind,
            class = %payment.class,
            plate = %payment.plate,
            amount = payment.amount,
            "payment recorded"
        );

        self.payments.write().unwrap().push(payment.clone());
        Ok(payment)
    }
}

/// Per-class amount buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTotals {
    pub car: i64,
    pub motorcycle: i64,
    pub truck: i64,
}

impl ClassTotals {
    fn add(&mut self, class: VehicleClass, amount: i64) {
        match class {
            VehicleClass::Car => self.car += amount,
            VehicleClass::Motorcycle => self.motorcycle += amount,
            VehicleClass::Truck => self.truck += amount,
        }
    }
}

/// Aggregated totals over a set of payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTotals {
    pub total_stay: i64,
    pub total_membership: i64,
    pub by_class: ClassTotals,
    /// `total_stay + total_membership`.
    pub total: i64,
}

/// Aggregate a set of payments into stay/membership and per-class totals.
///
/// Every payment contributes to exactly one kind bucket and, regardless of
/// kind, to its class bucket.
#[must_use]
pub fn aggregate(payments: &[Payment]) -> PaymentTotals {
    let mut totals = PaymentTotals::default();
    for payment in payments {
        match payment.kind {
            PaymentKind::Stay => totals.total_stay += payment.amount,
            PaymentKind::Membership => totals.total_membership += payment.amount,
        }
        totals.by_class.add(payment.class, payment.amount);
    }
    totals.total = totals.total_stay + totals.total_membership;
    totals
}
