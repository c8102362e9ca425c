//! Shift totals over a set of work records

use serde::Serialize;

use crate::models::{WorkCategory, WorkRecord};

/// Shift totals per category plus the emergency and holiday cross-cuts
///
/// `total_shifts` is the sum of the three category buckets only; the
/// emergency and holiday buckets overlap them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub shift_lead_shifts: f64,
    pub inbound_shifts: f64,
    pub outbound_shifts: f64,
    pub emergency_shifts: f64,
    pub holiday_shifts: f64,
    pub total_shifts: f64,
    pub record_count: usize,
}

pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a WorkRecord>,
{
    let mut summary = records
        .into_iter()
        .fold(Summary::default(), |mut acc, record| {
            let shifts = record.working_shifts;

            match record.category {
                WorkCategory::ShiftLead => acc.shift_lead_shifts += shifts,
                WorkCategory::Inbound => acc.inbound_shifts += shifts,
                WorkCategory::Outbound => acc.outbound_shifts += shifts,
            }
            if record.emergency_call {
                acc.emergency_shifts += shifts;
            }
            if record.holiday_call {
                acc.holiday_shifts += shifts;
            }

            acc.record_count += 1;
            acc
        });

    summary.total_shifts =
        summary.shift_lead_shifts + summary.inbound_shifts + summary.outbound_shifts;
    summary
}
