//! Vehicle and customer directory seam.
//!
//! The engine does not own registry CRUD; it consumes this narrow interface
//! and mutates only a vehicle's membership fields. An in-memory
//! implementation is provided for assembly and testing.

use serde::{Deserialize, Serialize};

use crate::error::{FacilityError, Result};
use crate::membership::Membership;
use crate::tariff::{MembershipPlan, VehicleClass};

/// Normalize a plate for case-insensitive identity.
pub(crate) fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// A vehicle known to the facility.
///
/// The engine reads `class` and `plate` and writes only `membership` and
/// `customer_id`; everything else belongs to the registry collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Normalized (uppercase) plate; the vehicle's identity.
    pub plate: String,
    pub color: String,
    pub model: String,
    pub class: VehicleClass,
    /// Current membership interval, absent when unsubscribed.
    pub membership: Option<Membership>,
    /// The customer the current membership was registered against.
    pub customer_id: Option<String>,
}

/// Immutable snapshot appended to a customer's history whenever a membership
/// is registered or renewed. Distinct from the mutable fields on [`Vehicle`],
/// which hold only the current interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub plan: MembershipPlan,
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
    pub price: i64,
}

/// A customer with their membership history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub memberships: Vec<MembershipRecord>,
}

impl Customer {
    /// Whether any membership in this customer's own history covers `today`.
    ///
    /// Deliberately independent of vehicle state: a customer's snapshot can
    /// remain valid after the vehicle it belonged to was cancelled. The two
    /// predicates are not reconciled.
    #[must_use]
    pub fn has_active_membership(&self, today: chrono::NaiveDate) -> bool {
        self.memberships.iter().any(|m| today <= m.end && m.start <= today)
    }
}

/// Directory of vehicles and customers.
///
/// Implement this to back the engine with your own registry. The in-memory
/// implementation below is used by [`Facility`](crate::facility::Facility)
/// by default.
pub trait VehicleDirectory: Send + Sync {
    /// Find a vehicle by plate (case-insensitive).
    fn find_vehicle(&self, plate: &str) -> Result<Option<Vehicle>>;

    /// Find a vehicle by plate, creating it when absent.
    ///
    /// An existing vehicle is returned unchanged (its class and membership
    /// fields win over the arguments).
    fn ensure_vehicle(
        &self,
        class: VehicleClass,
        plate: &str,
        color: &str,
        model: &str,
    ) -> Result<Vehicle>;

    /// Overwrite a vehicle's current membership fields.
    fn update_membership(&self, plate: &str, membership: Option<Membership>) -> Result<()>;

    /// Apply a registration/renewal as one logical unit: set the vehicle's
    /// membership fields and append the snapshot to the customer's history.
    fn apply_membership(
        &self,
        customer_id: &str,
        plate: &str,
        record: MembershipRecord,
    ) -> Result<()>;

    /// Find a customer by id.
    fn find_customer(&self, customer_id: &str) -> Result<Option<Customer>>;

    /// All customers, in stable order.
    fn all_customers(&self) -> Result<Vec<Customer>>;

    /// All vehicles whose current membership was registered by this customer,
    /// in stable order.
    fn vehicles_of(&self, customer_id: &str) -> Result<Vec<Vehicle>>;

    /// Create or rename a customer.
    fn upsert_customer(&self, customer_id: &str, name: &str) -> Result<Customer>;
}

pub use self::memory::InMemoryRegistry;

mod memory {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, RwLock};

    /// In-memory vehicle/customer registry.
    ///
    /// Wraps data in `Arc` for cheap cloning; clones share state.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryRegistry {
        inner: Arc<Inner>,
    }

    #[derive(Debug, Default)]
    struct Inner {
        // Lock order: customers before vehicles (apply_membership takes both).
        customers: RwLock<BTreeMap<String, Customer>>,
        vehicles: RwLock<HashMap<String, Vehicle>>,
    }

    impl InMemoryRegistry {
        /// Create an empty registry.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of known vehicles.
        #[must_use]
        pub fn vehicle_count(&self) -> usize {
            self.inner.vehicles.read().unwrap().len()
        }
    }

    impl VehicleDirectory for InMemoryRegistry {
        fn find_vehicle(&self, plate: &str) -> Result<Option<Vehicle>> {
            let plate = normalize_plate(plate);
            Ok(self.inner.vehicles.read().unwrap().get(&plate).cloned())
        }

        fn ensure_vehicle(
            &self,
            class: VehicleClass,
            plate: &str,
            color: &str,
            model: &str,
        ) -> Result<Vehicle> {
            let plate = normalize_plate(plate);
            let mut vehicles = self.inner.vehicles.write().unwrap();
            let vehicle = vehicles.entry(plate.clone()).or_insert_with(|| Vehicle {
                plate,
                color: color.to_string(),
                model: model.to_string(),
                class,
                membership: None,
                customer_id: None,
            });
            Ok(vehicle.clone())
        }

        fn update_membership(&self, plate: &str, membership: Option<Membership>) -> Result<()> {
            let plate = normalize_plate(plate);
            let mut vehicles = self.inner.vehicles.write().unwrap();
            let vehicle = vehicles
                .get_mut(&plate)
                .ok_or_else(|| FacilityError::not_found(format!("vehicle {}", plate)))?;
            vehicle.membership = membership;
            if vehicle.membership.is_none() {
                vehicle.customer_id = None;
            }
            Ok(())
        }

        fn apply_membership(
            &self,
            customer_id: &str,
            plate: &str,
            record: MembershipRecord,
        ) -> Result<()> {
            let plate = normalize_plate(plate);
            let mut customers = self.inner.customers.write().unwrap();
            let mut vehicles = self.inner.vehicles.write().unwrap();

            let customer = customers
                .get_mut(customer_id)
                .ok_or_else(|| FacilityError::not_found(format!("customer {}", customer_id)))?;
            let vehicle = vehicles
                .get_mut(&plate)
                .ok_or_else(|| FacilityError::not_found(format!("vehicle {}", plate)))?;

            vehicle.membership = Some(Membership {
                plan: record.plan,
                start: record.start,
                end: record.end,
            });
            vehicle.customer_id = Some(customer_id.to_string());
            customer.memberships.push(record);
            Ok(())
        }

        fn find_customer(&self, customer_id: &str) -> Result<Option<Customer>> {
            Ok(self.inner.customers.read().unwrap().get(customer_id).cloned())
        }

        fn all_customers(&self) -> Result<Vec<Customer>> {
            Ok(self.inner.customers.read().unwrap().values().cloned().collect())
        }

        fn vehicles_of(&self, customer_id: &str) -> Result<Vec<Vehicle>> {
            let vehicles = self.inner.vehicles.read().unwrap();
            let mut owned: Vec<Vehicle> = vehicles
                .values()
                .filter(|v| v.customer_id.as_deref() == Some(customer_id))
                .cloned()
                .collect();
            owned.sort_by(|a, b| a.plate.cmp(&b.plate));
            Ok(owned)
        }

        fn upsert_customer(&self, customer_id: &str, name: &str) -> Result<Customer> {
            let mut customers = self.inner.customers.write().unwrap();
            let customer = customers
                .entry(customer_id.to_string())
                .or_insert_with(|| Customer {
                    id: customer_id.to_string(),
                    name: String::new(),
                    memberships: Vec::new(),
                });
            customer.name = name.to_string();
            Ok(customer.clone())
        }
    }
}
