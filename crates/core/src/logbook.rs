//! Logbook entry editing policy.
//!
//! One entry per (attachment, calendar date), enforced by the application
//! with `uq_logbook_attachment_date` as the database backstop. Each entry
//! carries an edit counter; once it reaches [`MAX_EDITS`] the entry is
//! immutable to the student. Supervisor comments live in a separate field
//! and are not subject to the cap.

use crate::error::CoreError;
use crate::types::Date;

/// Maximum number of student edits per logbook entry.
pub const MAX_EDITS: i32 = 2;

/// Lower/upper bounds on hours worked in a single day.
pub const MIN_HOURS: f64 = 0.5;
pub const MAX_HOURS: f64 = 24.0;

/// Whether a student may still edit an entry with the given edit count.
pub fn can_edit(edit_count: i32) -> bool {
    edit_count < MAX_EDITS
}

/// Guard a student edit attempt, returning the incremented edit count.
pub fn record_edit(edit_count: i32) -> Result<i32, CoreError> {
    if !can_edit(edit_count) {
        return Err(CoreError::EditLimitReached { max: MAX_EDITS });
    }
    Ok(edit_count + 1)
}

/// Validate a new entry's date: entries are for today or earlier, never the
/// future.
pub fn validate_entry_date(entry_date: Date, today: Date) -> Result<(), CoreError> {
    if entry_date > today {
        return Err(CoreError::Validation(
            "Entry date cannot be in the future".into(),
        ));
    }
    Ok(())
}

/// Validate the hours-worked figure for a single day.
pub fn validate_hours(hours: f64) -> Result<(), CoreError> {
    if !(MIN_HOURS..=MAX_HOURS).contains(&hours) {
        return Err(CoreError::Validation(format!(
            "Hours worked must be between {MIN_HOURS} and {MAX_HOURS}"
        )));
    }
    Ok(())
}
