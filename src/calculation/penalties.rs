//! Penalty aggregation for a payroll month.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Penalty, PenaltyStatus, RecordId};

/// Penalty totals for one employee and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenaltySummary {
    /// Sum of cleared penalties, deducted from pay.
    pub penalty_total: Decimal,
    /// Whether any penalty is still pending; pending penalties hold the voucher.
    pub penalties_pending: bool,
}

/// Summarizes the penalties of `employee_id` applying to `month`.
///
/// Only cleared penalties are summed. Waived penalties neither reduce pay
/// nor hold the voucher. Penalties for other employees or months are ignored.
pub fn summarize_penalties<'a, I>(penalties: I, employee_id: RecordId, month: NaiveDate) -> PenaltySummary
where
    I: IntoIterator<Item = &'a Penalty>,
{
    penalties
        .into_iter()
        .filter(|p| p.applies_to(employee_id, month))
        .fold(PenaltySummary::default(), |mut summary, penalty| {
            match penalty.status {
                PenaltyStatus::Cleared => summary.penalty_total += penalty.amount,
                PenaltyStatus::Pending => summary.penalties_pending = true,
                PenaltyStatus::Waived => {}
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn penalty(employee_id: RecordId, month: NaiveDate, amount: i64, status: PenaltyStatus) -> Penalty {
        Penalty {
            id: 1,
            employee_id,
            department: None,
            incident_date: month,
            applies_to_month: month,
            amount: Decimal::new(amount, 0),
            reason: "Absent without leave".to_string(),
            status,
            created_by: None,
            created_at: Utc::now(),
            cleared_by: None,
            cleared_at: None,
            clearance_notes: String::new(),
        }
    }

    #[test]
    fn test_no_penalties() {
        let summary = summarize_penalties(&[], 1, march());
        assert_eq!(summary, PenaltySummary::default());
    }

    #[test]
    fn test_pending_penalty_holds_without_deducting() {
        let penalties = vec![penalty(1, march(), 50_000, PenaltyStatus::Pending)];
        let summary = summarize_penalties(&penalties, 1, march());
        assert_eq!(summary.penalty_total, Decimal::ZERO);
        assert!(summary.penalties_pending);
    }

    #[test]
    fn test_cleared_penalties_are_summed() {
        let penalties = vec![
            penalty(1, march(), 50_000, PenaltyStatus::Cleared),
            penalty(1, march(), 25_000, PenaltyStatus::Cleared),
        ];
        let summary = summarize_penalties(&penalties, 1, march());
        assert_eq!(summary.penalty_total, Decimal::new(75_000, 0));
        assert!(!summary.penalties_pending);
    }

    #[test]
    fn test_waived_penalty_has_no_effect() {
        let penalties = vec![penalty(1, march(), 50_000, PenaltyStatus::Waived)];
        let summary = summarize_penalties(&penalties, 1, march());
        assert_eq!(summary, PenaltySummary::default());
    }

    #[test]
    fn test_other_employee_and_month_ignored() {
        let april = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let penalties = vec![
            penalty(2, march(), 50_000, PenaltyStatus::Pending),
            penalty(1, april, 10_000, PenaltyStatus::Cleared),
        ];
        let summary = summarize_penalties(&penalties, 1, march());
        assert_eq!(summary, PenaltySummary::default());
    }
}
