//! Resolution of an actor's capabilities.

use tracing::warn;

use crate::config::AccessPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::Employee;

use super::capability::{Capability, CapabilitySet};

/// Derives capabilities from an [`AccessPolicy`].
///
/// Superusers hold every capability. Any other actor holds the union of the
/// capabilities granted to their role, each of their groups and each of
/// their active business roles.
///
/// # Example
///
/// ```
/// use payroll_engine::access::{Capability, CapabilityResolver};
/// use payroll_engine::config::AccessPolicy;
/// use payroll_engine::models::{Employee, Role};
///
/// let resolver = CapabilityResolver::new(AccessPolicy::default());
/// let manager = Employee {
///     id: 1,
///     username: "hr".to_string(),
///     full_name: String::new(),
///     role: Role::HrManager,
///     is_superuser: false,
///     groups: vec![],
///     department_roles: vec![],
///     profile: None,
/// };
/// assert!(resolver.require(&manager, Capability::ClearVouchers).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapabilityResolver {
    policy: AccessPolicy,
}

impl CapabilityResolver {
    /// Creates a resolver for `policy`.
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy the resolver applies.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Resolves the capabilities held by `actor`.
    pub fn resolve(&self, actor: &Employee) -> CapabilitySet {
        if actor.is_superuser {
            return CapabilitySet::all();
        }

        let mut set = CapabilitySet::default();
        if let Some(granted) = self.policy.roles.get(&actor.role) {
            set.extend(granted.iter().copied());
        }
        for group in &actor.groups {
            if let Some(granted) = self.policy.groups.get(group) {
                set.extend(granted.iter().copied());
            }
        }
        for business_role in actor.department_roles.iter().filter(|r| r.is_active) {
            if let Some(granted) = self.policy.business_roles.get(&business_role.code) {
                set.extend(granted.iter().copied());
            }
        }
        set
    }

    /// Returns true if `actor` holds `capability`.
    pub fn allows(&self, actor: &Employee, capability: Capability) -> bool {
        self.resolve(actor).contains(capability)
    }

    /// Fails with [`PayrollError::PermissionDenied`] unless `actor` holds
    /// `capability`.
    pub fn require(&self, actor: &Employee, capability: Capability) -> PayrollResult<()> {
        if self.allows(actor, capability) {
            return Ok(());
        }
        warn!(
            actor_id = actor.id,
            actor = %actor.username,
            capability = %capability,
            "Permission denied"
        );
        Err(PayrollError::PermissionDenied {
            actor: actor.username.clone(),
            capability: capability.to_string(),
        })
    }
}
