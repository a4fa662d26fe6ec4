//! Student-to-lecturer auto-assignment engine.
//!
//! The engine is a pure function over in-memory snapshots: the caller loads
//! unassigned students and lecturer capacities, gets back a plan, and
//! persists it inside a single transaction. Capacity is tracked in-pass so
//! a lecturer is never over-assigned within one invocation regardless of
//! how many students a department feeds in.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// A student needing an assignment for the current academic year.
#[derive(Debug, Clone)]
pub struct UnassignedStudent {
    pub account_id: DbId,
    pub department_id: Option<DbId>,
}

/// A lecturer's capacity snapshot at planning time.
#[derive(Debug, Clone)]
pub struct LecturerSlot {
    pub lecturer_id: DbId,
    pub department_id: DbId,
    /// Assignments already held this academic year, used for least-loaded
    /// ordering.
    pub assigned_count: i32,
    pub max_students: i32,
}

impl LecturerSlot {
    fn remaining(&self) -> i32 {
        self.max_students - self.assigned_count
    }
}

/// One planned (student, lecturer) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAssignment {
    pub student_account_id: DbId,
    pub lecturer_id: DbId,
    /// True when no lecturer in the student's own department had capacity
    /// and the student overflowed to another department.
    pub cross_department: bool,
}

/// Why a student could not be planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No lecturer anywhere has a free slot.
    NoCapacity,
}

/// A student the engine could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignableStudent {
    pub student_account_id: DbId,
    pub reason: SkipReason,
}

/// The engine's output: pairings to persist plus per-student failures,
/// reported in aggregate so a batch never aborts on one bad item.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentPlan {
    pub assignments: Vec<PlannedAssignment>,
    pub unassignable: Vec<UnassignableStudent>,
}

/// Guard shared by the manual and bulk variants: a lecturer must have spare
/// capacity before accepting an explicit pairing.
pub fn check_capacity(slot: &LecturerSlot) -> Result<(), CoreError> {
    if slot.remaining() <= 0 {
        return Err(CoreError::Conflict(format!(
            "Lecturer {} has no remaining capacity ({} of {} slots used)",
            slot.lecturer_id, slot.assigned_count, slot.max_students
        )));
    }
    Ok(())
}

/// Distribute unassigned students across lecturers with spare capacity.
///
/// Students and lecturers are partitioned by department. Within a
/// department, lecturers are ordered ascending by current load and students
/// are dealt round-robin (`lecturer[i mod n]`), with in-pass capacity
/// decrements so no lecturer exceeds `max_students`. Students whose own
/// department has no spare capacity fall back to the least-loaded lecturer
/// anywhere; if none exists they are reported unassignable.
pub fn plan_auto_assignment(
    students: &[UnassignedStudent],
    lecturers: &[LecturerSlot],
) -> AssignmentPlan {
    let mut slots: Vec<LecturerSlot> = lecturers.to_vec();

    // Department → indexes into `slots`, least-loaded first. BTreeMap keeps
    // iteration deterministic.
    let mut by_department: BTreeMap<DbId, Vec<usize>> = BTreeMap::new();
    for (idx, slot) in slots.iter().enumerate() {
        by_department.entry(slot.department_id).or_default().push(idx);
    }
    for indexes in by_department.values_mut() {
        indexes.sort_by_key(|&i| (slots[i].assigned_count, slots[i].lecturer_id));
    }

    let mut plan = AssignmentPlan::default();
    let mut overflow: Vec<&UnassignedStudent> = Vec::new();

    // Pass 1: within-department round-robin.
    let mut grouped: BTreeMap<DbId, Vec<&UnassignedStudent>> = BTreeMap::new();
    for student in students {
        match student.department_id {
            Some(dept) => grouped.entry(dept).or_default().push(student),
            None => overflow.push(student),
        }
    }

    for (dept, dept_students) in &grouped {
        let indexes = by_department.get(dept).cloned().unwrap_or_default();
        let mut cursor = 0usize;
        for student in dept_students {
            match next_with_capacity(&slots, &indexes, &mut cursor) {
                Some(slot_idx) => {
                    slots[slot_idx].assigned_count += 1;
                    plan.assignments.push(PlannedAssignment {
                        student_account_id: student.account_id,
                        lecturer_id: slots[slot_idx].lecturer_id,
                        cross_department: false,
                    });
                }
                None => overflow.push(student),
            }
        }
    }

    // Pass 2: cross-department overflow, least-loaded lecturer anywhere.
    for student in overflow {
        let candidate = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining() > 0)
            .min_by_key(|(_, s)| (s.assigned_count, s.lecturer_id))
            .map(|(i, _)| i);
        match candidate {
            Some(slot_idx) => {
                slots[slot_idx].assigned_count += 1;
                plan.assignments.push(PlannedAssignment {
                    student_account_id: student.account_id,
                    lecturer_id: slots[slot_idx].lecturer_id,
                    cross_department: true,
                });
            }
            None => plan.unassignable.push(UnassignableStudent {
                student_account_id: student.account_id,
                reason: SkipReason::NoCapacity,
            }),
        }
    }

    plan
}

/// Advance the round-robin cursor to the next lecturer with spare capacity,
/// wrapping once. Returns `None` when the whole department is full.
fn next_with_capacity(
    slots: &[LecturerSlot],
    indexes: &[usize],
    cursor: &mut usize,
) -> Option<usize> {
    if indexes.is_empty() {
        return None;
    }
    for _ in 0..indexes.len() {
        let idx = indexes[*cursor % indexes.len()];
        *cursor += 1;
        if slots[idx].remaining() > 0 {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: DbId, dept: Option<DbId>) -> UnassignedStudent {
        UnassignedStudent {
            account_id: id,
            department_id: dept,
        }
    }

    fn slot(id: DbId, dept: DbId, assigned: i32, max: i32) -> LecturerSlot {
        LecturerSlot {
            lecturer_id: id,
            department_id: dept,
            assigned_count: assigned,
            max_students: max,
        }
    }

    #[test]
    fn three_students_two_lecturers_balance() {
        // Department 7: 3 unassigned students, 2 lecturers with max 2 each.
        let students = [student(1, Some(7)), student(2, Some(7)), student(3, Some(7))];
        let lecturers = [slot(10, 7, 0, 2), slot(11, 7, 0, 2)];

        let plan = plan_auto_assignment(&students, &lecturers);

        assert_eq!(plan.assignments.len(), 3);
        assert!(plan.unassignable.is_empty());

        let count = |l: DbId| {
            plan.assignments
                .iter()
                .filter(|a| a.lecturer_id == l)
                .count() as i32
        };
        assert!(count(10) <= 2 && count(11) <= 2);
        assert!((count(10) - count(11)).abs() <= 1, "distribution must differ by at most 1");
        assert!(plan.assignments.iter().all(|a| !a.cross_department));
    }

    #[test]
    fn capacity_is_respected_within_one_pass() {
        // One lecturer, capacity 2, three students: the third must not fit.
        let students = [student(1, Some(7)), student(2, Some(7)), student(3, Some(7))];
        let lecturers = [slot(10, 7, 0, 2)];

        let plan = plan_auto_assignment(&students, &lecturers);

        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.unassignable.len(), 1);
        assert_eq!(plan.unassignable[0].student_account_id, 3);
        assert_eq!(plan.unassignable[0].reason, SkipReason::NoCapacity);
    }

    #[test]
    fn least_loaded_lecturer_receives_first() {
        let students = [student(1, Some(7))];
        let lecturers = [slot(10, 7, 3, 5), slot(11, 7, 1, 5)];

        let plan = plan_auto_assignment(&students, &lecturers);

        assert_eq!(plan.assignments[0].lecturer_id, 11);
    }

    #[test]
    fn cross_department_overflow() {
        // Department 7 has a student but its lecturer is full; department 8
        // has spare capacity.
        let students = [student(1, Some(7))];
        let lecturers = [slot(10, 7, 2, 2), slot(20, 8, 0, 4)];

        let plan = plan_auto_assignment(&students, &lecturers);

        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].lecturer_id, 20);
        assert!(plan.assignments[0].cross_department);
    }

    #[test]
    fn everyone_full_reports_unassignable() {
        let students = [student(1, Some(7)), student(2, Some(8))];
        let lecturers = [slot(10, 7, 2, 2), slot(20, 8, 4, 4)];

        let plan = plan_auto_assignment(&students, &lecturers);

        assert!(plan.assignments.is_empty());
        assert_eq!(plan.unassignable.len(), 2);
        assert!(plan
            .unassignable
            .iter()
            .all(|u| u.reason == SkipReason::NoCapacity));
    }

    #[test]
    fn round_robin_alternates_between_lecturers() {
        let students: Vec<_> = (1..=4).map(|i| student(i, Some(7))).collect();
        let lecturers = [slot(10, 7, 0, 10), slot(11, 7, 0, 10)];

        let plan = plan_auto_assignment(&students, &lecturers);

        let sequence: Vec<DbId> = plan.assignments.iter().map(|a| a.lecturer_id).collect();
        assert_eq!(sequence, vec![10, 11, 10, 11]);
    }

    #[test]
    fn manual_capacity_guard() {
        assert!(check_capacity(&slot(10, 7, 1, 2)).is_ok());
        let err = check_capacity(&slot(10, 7, 2, 2)).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn batch_continues_past_individual_failures() {
        // Mixed batch: two placeable, one not.
        let students = [student(1, Some(7)), student(2, Some(9)), student(3, Some(7))];
        let lecturers = [slot(10, 7, 0, 2)];

        let plan = plan_auto_assignment(&students, &lecturers);

        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.unassignable.len(), 1);
        assert_eq!(plan.unassignable[0].student_account_id, 2);
    }
}
