//! Capabilities and capability sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named permission required by a payroll action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create and lock payroll runs.
    ManagePayroll,
    /// Clear salary vouchers for disbursement.
    ClearVouchers,
    /// Export cleared vouchers for the bank.
    ExportPayroll,
    /// Maintain salary structures, pay item types and pay items.
    ManageCompensation,
    /// Record and settle penalties.
    ManagePenalties,
    /// Read payroll runs, payslips and compensation records.
    ViewPayroll,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 6] = [
        Capability::ManagePayroll,
        Capability::ClearVouchers,
        Capability::ExportPayroll,
        Capability::ManageCompensation,
        Capability::ManagePenalties,
        Capability::ViewPayroll,
    ];

    /// Returns the configuration name of the capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManagePayroll => "manage_payroll",
            Capability::ClearVouchers => "clear_vouchers",
            Capability::ExportPayroll => "export_payroll",
            Capability::ManageCompensation => "manage_compensation",
            Capability::ManagePenalties => "manage_penalties",
            Capability::ViewPayroll => "view_payroll",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capabilities resolved for one actor.
///
/// # Example
///
/// ```
/// use payroll_engine::access::{Capability, CapabilitySet};
///
/// let set: CapabilitySet = [Capability::ViewPayroll].into_iter().collect();
/// assert!(set.contains(Capability::ViewPayroll));
/// assert!(!set.contains(Capability::ClearVouchers));
/// assert!(CapabilitySet::all().contains(Capability::ClearVouchers));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// Returns a set holding every capability.
    pub fn all() -> Self {
        Capability::ALL.into_iter().collect()
    }

    /// Returns true if the set grants `capability`.
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Returns true if the set grants nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the granted capabilities in order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Capability> for CapabilitySet {
    fn extend<I: IntoIterator<Item = Capability>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
