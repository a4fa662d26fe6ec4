//! Attachment lifecycle state machine and derived progress metrics.
//!
//! Progress values are never stored; they are pure functions of
//! (today, start_date, end_date, status) recomputed on every read.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Minimum attachment duration in days.
pub const MIN_DURATION_DAYS: i64 = 30;

/// Maximum attachment duration in days.
pub const MAX_DURATION_DAYS: i64 = 365;

/// Attachment lifecycle states.
///
/// `pending → {approved, cancelled}`, `approved → {ongoing, cancelled}`,
/// `ongoing → {completed, cancelled}`. `completed` and `cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentStatus {
    Pending,
    Approved,
    Ongoing,
    Completed,
    Cancelled,
}

impl AttachmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentStatus::Pending => "pending",
            AttachmentStatus::Approved => "approved",
            AttachmentStatus::Ongoing => "ongoing",
            AttachmentStatus::Completed => "completed",
            AttachmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending" => Ok(AttachmentStatus::Pending),
            "approved" => Ok(AttachmentStatus::Approved),
            "ongoing" => Ok(AttachmentStatus::Ongoing),
            "completed" => Ok(AttachmentStatus::Completed),
            "cancelled" => Ok(AttachmentStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid attachment status '{other}'"
            ))),
        }
    }

    /// An attachment counts as active while approved or ongoing.
    pub fn is_active(self) -> bool {
        matches!(self, AttachmentStatus::Approved | AttachmentStatus::Ongoing)
    }

    /// Students may edit attachment details only while pending or approved.
    pub fn is_editable(self) -> bool {
        matches!(self, AttachmentStatus::Pending | AttachmentStatus::Approved)
    }

    /// Check whether `self → next` is a legal lifecycle transition.
    ///
    /// Illegal transitions (e.g. rejecting a completed attachment) fail
    /// loudly with a conflict instead of silently no-opping.
    pub fn transition(self, next: AttachmentStatus) -> Result<AttachmentStatus, CoreError> {
        use AttachmentStatus::*;
        let legal = matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Cancelled)
                | (Approved, Ongoing)
                | (Approved, Cancelled)
                | (Ongoing, Completed)
                | (Ongoing, Cancelled)
        );
        if legal {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl std::fmt::Display for AttachmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate attachment dates at creation/edit time.
///
/// Rules carried over from the intake form: end not before start, start not
/// in the past, duration within [30, 365] days.
pub fn validate_dates(start: Date, end: Date, today: Date) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(
            "End date cannot be before start date".into(),
        ));
    }
    if start < today {
        return Err(CoreError::Validation(
            "Start date cannot be in the past".into(),
        ));
    }
    let duration = (end - start).num_days();
    if duration < MIN_DURATION_DAYS {
        return Err(CoreError::Validation(format!(
            "Attachment must be at least {MIN_DURATION_DAYS} days long"
        )));
    }
    if duration > MAX_DURATION_DAYS {
        return Err(CoreError::Validation(
            "Attachment cannot exceed 1 year".into(),
        ));
    }
    Ok(())
}

/// Derived progress metrics for an attachment, recomputed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total_days: i64,
    pub days_completed: i64,
    pub days_remaining: i64,
    /// 0..=100, rounded to the nearest integer.
    pub progress_percentage: u8,
}

/// Compute progress metrics for the given state of the world.
///
/// - Pending and cancelled attachments report zero progress.
/// - Completed attachments report 100%.
/// - Active attachments interpolate linearly between start and end, with
///   days and percentage clamped so the value is 0 before the start date
///   and 100 at or after the end date.
pub fn progress(today: Date, start: Date, end: Date, status: AttachmentStatus) -> Progress {
    let total_days = (end - start).num_days().max(0);

    match status {
        AttachmentStatus::Pending | AttachmentStatus::Cancelled => Progress {
            total_days,
            days_completed: 0,
            days_remaining: total_days,
            progress_percentage: 0,
        },
        AttachmentStatus::Completed => Progress {
            total_days,
            days_completed: total_days,
            days_remaining: 0,
            progress_percentage: 100,
        },
        AttachmentStatus::Approved | AttachmentStatus::Ongoing => {
            let days_completed = (today - start).num_days().clamp(0, total_days);
            let days_remaining = total_days - days_completed;
            let progress_percentage = if total_days > 0 {
                ((days_completed as f64 / total_days as f64) * 100.0).round() as u8
            } else {
                // Degenerate zero-length attachment: done once the day arrives.
                if today >= start {
                    100
                } else {
                    0
                }
            };
            Progress {
                total_days,
                days_completed,
                days_remaining,
                progress_percentage,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn legal_transitions() {
        use AttachmentStatus::*;
        assert_eq!(Pending.transition(Approved).unwrap(), Approved);
        assert_eq!(Pending.transition(Cancelled).unwrap(), Cancelled);
        assert_eq!(Approved.transition(Ongoing).unwrap(), Ongoing);
        assert_eq!(Approved.transition(Cancelled).unwrap(), Cancelled);
        assert_eq!(Ongoing.transition(Completed).unwrap(), Completed);
        assert_eq!(Ongoing.transition(Cancelled).unwrap(), Cancelled);
    }

    #[test]
    fn terminal_states_reject_all_transitions() {
        use AttachmentStatus::*;
        for next in [Pending, Approved, Ongoing, Completed, Cancelled] {
            assert!(Completed.transition(next).is_err());
            assert!(Cancelled.transition(next).is_err());
        }
    }

    #[test]
    fn rejecting_completed_attachment_fails_loudly() {
        let err = AttachmentStatus::Completed
            .transition(AttachmentStatus::Cancelled)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: "completed",
                to: "cancelled"
            }
        ));
    }

    #[test]
    fn skipping_states_is_illegal() {
        use AttachmentStatus::*;
        assert!(Pending.transition(Ongoing).is_err());
        assert!(Pending.transition(Completed).is_err());
        assert!(Approved.transition(Completed).is_err());
    }

    #[test]
    fn date_validation_rules() {
        let today = date(2024, 1, 1);
        // End before start.
        assert!(validate_dates(date(2024, 2, 1), date(2024, 1, 15), today).is_err());
        // Start in the past.
        assert!(validate_dates(date(2023, 12, 1), date(2024, 3, 1), today).is_err());
        // Too short.
        assert!(validate_dates(date(2024, 1, 2), date(2024, 1, 20), today).is_err());
        // Too long.
        assert!(validate_dates(date(2024, 1, 2), date(2025, 6, 1), today).is_err());
        // Three months is fine.
        assert!(validate_dates(date(2024, 1, 2), date(2024, 4, 2), today).is_ok());
    }

    #[test]
    fn progress_halfway_through() {
        // 2024-01-01 .. 2024-01-11 is a 10-day attachment; halfway on the 6th.
        let p = progress(
            date(2024, 1, 6),
            date(2024, 1, 1),
            date(2024, 1, 11),
            AttachmentStatus::Ongoing,
        );
        assert_eq!(p.total_days, 10);
        assert_eq!(p.days_completed, 5);
        assert_eq!(p.days_remaining, 5);
        assert_eq!(p.progress_percentage, 50);
    }

    #[test]
    fn progress_boundaries() {
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 11);
        let before = progress(date(2023, 12, 25), start, end, AttachmentStatus::Ongoing);
        assert_eq!(before.progress_percentage, 0);
        assert_eq!(before.days_completed, 0);
        assert_eq!(before.days_remaining, 10);

        let at_end = progress(end, start, end, AttachmentStatus::Ongoing);
        assert_eq!(at_end.progress_percentage, 100);
        assert_eq!(at_end.days_remaining, 0);

        let after = progress(date(2024, 3, 1), start, end, AttachmentStatus::Ongoing);
        assert_eq!(after.progress_percentage, 100);
        assert_eq!(after.days_completed, 10);
    }

    #[test]
    fn progress_is_monotonic_across_the_window() {
        let start = date(2024, 1, 1);
        let end = date(2024, 4, 1);
        let mut last = 0u8;
        let mut day = start;
        while day <= end {
            let p = progress(day, start, end, AttachmentStatus::Ongoing);
            assert!(p.progress_percentage >= last, "regressed on {day}");
            last = p.progress_percentage;
            day = day.succ_opt().unwrap();
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn pending_and_cancelled_report_zero() {
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 11);
        let today = date(2024, 1, 6);
        for status in [AttachmentStatus::Pending, AttachmentStatus::Cancelled] {
            let p = progress(today, start, end, status);
            assert_eq!(p.progress_percentage, 0);
            assert_eq!(p.days_completed, 0);
        }
        let done = progress(today, start, end, AttachmentStatus::Completed);
        assert_eq!(done.progress_percentage, 100);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        // 1 of 3 days = 33.3% → 33; 2 of 3 days = 66.7% → 67.
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 4);
        let p1 = progress(date(2024, 1, 2), start, end, AttachmentStatus::Ongoing);
        assert_eq!(p1.progress_percentage, 33);
        let p2 = progress(date(2024, 1, 3), start, end, AttachmentStatus::Ongoing);
        assert_eq!(p2.progress_percentage, 67);
    }
}
