//! The payroll service.
//!
//! [`PayrollService`] is the entry point for every payroll action. Each call
//! resolves the actor's capabilities, then runs inside a single record store
//! transaction so that a failure leaves no partial writes behind.

mod compensation;
mod inputs;
mod penalties;
mod runs;

use std::sync::Arc;

use tracing::{info, warn};

use crate::access::{Capability, CapabilityResolver, CapabilitySet};
use crate::clock::Clock;
use crate::config::{ConfigLoader, PayrollSettings};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, RecordId};
use crate::store::RecordStore;

pub use inputs::{
    EmployeePayItemInput, MONEY_DIGITS, MONEY_SCALE, PayItemTypeInput, PenaltyInput, SalaryStructureInput,
};

/// Payroll operations over a record store.
pub struct PayrollService {
    store: RecordStore,
    access: CapabilityResolver,
    clock: Arc<dyn Clock>,
    settings: PayrollSettings,
}

impl PayrollService {
    /// Creates a service over an existing store.
    pub fn new(
        store: RecordStore,
        access: CapabilityResolver,
        clock: Arc<dyn Clock>,
        settings: PayrollSettings,
    ) -> Self {
        Self {
            store,
            access,
            clock,
            settings,
        }
    }

    /// Creates a service whose store is seeded with the configured employee
    /// directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use payroll_engine::clock::SystemClock;
    /// use payroll_engine::config::ConfigLoader;
    /// use payroll_engine::service::PayrollService;
    ///
    /// let config = ConfigLoader::load("./config/default")?;
    /// let service = PayrollService::from_config(&config, Arc::new(SystemClock))?;
    /// # Ok::<(), payroll_engine::error::PayrollError>(())
    /// ```
    pub fn from_config(config: &ConfigLoader, clock: Arc<dyn Clock>) -> PayrollResult<Self> {
        let store = RecordStore::default();
        let seeded = store.transaction(|tables| {
            for employee in config.employees() {
                tables.insert_employee(employee.clone())?;
            }
            Ok(config.employees().len())
        })?;
        info!(employees = seeded, "Employee directory loaded");

        Ok(Self::new(
            store,
            CapabilityResolver::new(config.access().clone()),
            clock,
            config.settings().clone(),
        ))
    }

    /// Returns the organisation settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Returns the underlying record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Looks up the acting employee.
    ///
    /// An unknown id is reported as [`PayrollError::Unauthenticated`].
    pub fn resolve_actor(&self, actor_id: RecordId) -> PayrollResult<Employee> {
        self.store
            .read(|tables| tables.employee(actor_id))?
            .map_err(|err| match err {
                PayrollError::NotFound { .. } => {
                    warn!(actor_id, "Unknown actor");
                    PayrollError::Unauthenticated {
                        message: format!("no employee with id {}", actor_id),
                    }
                }
                other => other,
            })
    }

    /// Returns the capabilities held by `actor`.
    pub fn capabilities(&self, actor: &Employee) -> CapabilitySet {
        self.access.resolve(actor)
    }

    fn authorize(&self, actor: &Employee, capability: Capability) -> PayrollResult<()> {
        self.access.require(actor, capability)
    }
}
