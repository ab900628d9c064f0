//! Capability-based access control.
//!
//! Every payroll action requires a [`Capability`]. A [`CapabilityResolver`]
//! derives the capabilities of an actor once, from their superuser flag,
//! coarse role, groups and active business roles, using an
//! [`AccessPolicy`](crate::config::AccessPolicy) loaded from configuration.

mod capability;
mod resolver;

pub use capability::{Capability, CapabilitySet};
pub use resolver::CapabilityResolver;
