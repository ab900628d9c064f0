//! Penalty records and their clearance attribution.

use tracing::info;

use crate::access::Capability;
use crate::calculation::first_of_month;
use crate::error::PayrollResult;
use crate::models::{Employee, Penalty, RecordId};

use super::PayrollService;
use super::inputs::PenaltyInput;

impl PayrollService {
    /// Lists penalties, latest month first, then latest incident first.
    pub fn list_penalties(&self, actor: &Employee) -> PayrollResult<Vec<Penalty>> {
        self.authorize(actor, Capability::ViewPayroll)?;
        let mut penalties = self.store.read(|tables| tables.penalties())?;
        penalties.sort_by(|a, b| {
            (b.applies_to_month, b.incident_date).cmp(&(a.applies_to_month, a.incident_date))
        });
        Ok(penalties)
    }

    /// Records a penalty.
    ///
    /// The month is normalized to its first day. A penalty created already
    /// cleared or waived is attributed to `actor` at the current time.
    pub fn create_penalty(&self, input: PenaltyInput, actor: &Employee) -> PayrollResult<Penalty> {
        self.authorize(actor, Capability::ManagePenalties)?;
        input.validate()?;
        let now = self.clock.now();
        let settled = input.status.is_settled();

        let penalty = Penalty {
            id: 0,
            employee_id: input.employee_id,
            department: input.department,
            incident_date: input.incident_date.unwrap_or_else(|| self.clock.today()),
            applies_to_month: first_of_month(input.applies_to_month),
            amount: input.amount,
            reason: input.reason,
            status: input.status,
            created_by: Some(actor.id),
            created_at: now,
            cleared_by: settled.then_some(actor.id),
            cleared_at: settled.then_some(now),
            clearance_notes: input.clearance_notes,
        };
        let penalty = self
            .store
            .transaction(|tables| tables.insert_penalty(penalty))?;
        info!(
            penalty_id = penalty.id,
            employee_id = penalty.employee_id,
            amount = %penalty.amount,
            status = ?penalty.status,
            actor = %actor.username,
            "Penalty recorded"
        );
        Ok(penalty)
    }

    /// Overwrites the editable fields of a penalty.
    ///
    /// A penalty that becomes cleared or waived is attributed to `actor`
    /// unless it already carries a clearance time. A penalty set back to
    /// pending loses its attribution.
    pub fn update_penalty(
        &self,
        id: RecordId,
        input: PenaltyInput,
        actor: &Employee,
    ) -> PayrollResult<Penalty> {
        self.authorize(actor, Capability::ManagePenalties)?;
        input.validate()?;
        let now = self.clock.now();

        let penalty = self.store.transaction(|tables| {
            let existing = tables.penalty(id)?;
            let mut penalty = Penalty {
                employee_id: input.employee_id,
                department: input.department,
                incident_date: input.incident_date.unwrap_or(existing.incident_date),
                applies_to_month: first_of_month(input.applies_to_month),
                amount: input.amount,
                reason: input.reason,
                status: input.status,
                clearance_notes: input.clearance_notes,
                ..existing
            };
            if penalty.status.is_settled() {
                if penalty.cleared_at.is_none() {
                    penalty.cleared_by = Some(actor.id);
                    penalty.cleared_at = Some(now);
                }
            } else {
                penalty.cleared_by = None;
                penalty.cleared_at = None;
            }
            tables.update_penalty(penalty.clone())?;
            Ok(penalty)
        })?;
        info!(
            penalty_id = id,
            status = ?penalty.status,
            actor = %actor.username,
            "Penalty updated"
        );
        Ok(penalty)
    }
}
