//! Admin handlers: dashboard, lecturer management, and assignments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use intrack_core::assignment::{check_capacity, plan_auto_assignment, UnassignableStudent};
use intrack_core::attachment::AttachmentStatus;
use intrack_core::error::CoreError;
use intrack_core::types::DbId;
use intrack_core::Role;
use intrack_db::models::account::{CreateAccount, RoleProfile};
use intrack_db::models::assignment::{AssignmentPairing, CreateAssignment, StudentAssignment};
use intrack_db::models::lecturer::{CreateLecturer, Lecturer, LecturerWorkload, UpdateLecturer};
use intrack_db::models::placement_form::PlacementForm;
use intrack_db::repositories::{
    AccountRepo, AssignmentRepo, AttachmentRepo, LecturerRepo, PlacementRepo,
};
use intrack_events::notifier::EVENT_LECTURER_CREDENTIALS;
use intrack_events::PlatformEvent;

use crate::auth::password::{generate_temp_password, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

pub const DEFAULT_MAX_STUDENTS: i32 = 10;

// ---------------------------------------------------------------------------
// Response / request types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub active_lecturers: i64,
    pub placement_forms: i64,
    pub pending_attachments: i64,
    pub assignments: i64,
    pub academic_year: i32,
}

/// Lecturer creation result. The temporary password is included (with a
/// warning) when no email notifier is configured, so the admin can hand the
/// credentials over manually.
#[derive(Debug, Serialize)]
pub struct LecturerCreated {
    pub lecturer: Lecturer,
    pub email: String,
    pub staff_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkAssignRequest {
    pub pairings: Vec<AssignmentPairing>,
}

/// Per-pairing outcome of a manual/bulk assignment. Failures never abort
/// the batch; each item reports its own result.
#[derive(Debug, Serialize)]
pub struct AssignmentOutcome {
    pub student_account_id: DbId,
    pub lecturer_id: DbId,
    pub assigned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkAssignResponse {
    pub outcomes: Vec<AssignmentOutcome>,
}

/// Body for the auto-assignment run. An empty body runs platform-wide;
/// `department_id` restricts both the student and lecturer snapshots.
#[derive(Debug, Default, Deserialize)]
pub struct AutoAssignRequest {
    pub department_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct AutoAssignResponse {
    pub assigned: Vec<StudentAssignment>,
    pub unassignable: Vec<UnassignableStudent>,
}

#[derive(Debug, Deserialize)]
pub struct PlacementQuery {
    pub department_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let year = state.config.current_academic_year();
    let stats = DashboardStats {
        total_students: AccountRepo::count_by_role(&state.pool, Role::Student).await?,
        active_lecturers: LecturerRepo::count_active(&state.pool).await?,
        placement_forms: PlacementRepo::count_for_cycle(&state.pool, year).await?,
        pending_attachments: AttachmentRepo::count_by_status(&state.pool, AttachmentStatus::Pending)
            .await?,
        assignments: AssignmentRepo::count_for_year(&state.pool, year).await?,
        academic_year: year,
    };
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// Lecturer management
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/lecturers
///
/// Create a lecturer account with a generated temporary password. The
/// account and lecturer rows are inserted in one transaction; the
/// credentials are emailed, or returned inline when email is not
/// configured.
pub async fn create_lecturer(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(input): Json<CreateLecturer>,
) -> AppResult<(StatusCode, Json<DataResponse<LecturerCreated>>)> {
    if input.email.trim().is_empty() || input.staff_id.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email and staff ID are required".into(),
        )));
    }
    if AccountRepo::email_exists(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "An account with email '{}' already exists",
            input.email
        ))));
    }
    if AccountRepo::staff_id_taken(&state.pool, &input.staff_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Staff ID '{}' is already taken",
            input.staff_id
        ))));
    }

    let temp_password = generate_temp_password();
    let password_hash = hash_password(&temp_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let mut tx = state.pool.begin().await?;
    let account = AccountRepo::create(
        &mut *tx,
        &CreateAccount {
            email: input.email.clone(),
            password_hash,
            role: Role::Lecturer,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone: input.phone.clone(),
            profile: RoleProfile::Lecturer {
                staff_id: input.staff_id.clone(),
                faculty: input.faculty.clone(),
            },
        },
    )
    .await?;
    let lecturer = LecturerRepo::create(
        &mut *tx,
        account.id,
        input.department_id,
        input.max_students.unwrap_or(DEFAULT_MAX_STUDENTS),
    )
    .await?;
    tx.commit().await?;

    let (temp_password, warning) = if state.email_enabled {
        state.event_bus.publish(
            PlatformEvent::new(EVENT_LECTURER_CREDENTIALS)
                .with_source("account", account.id)
                .with_actor(user.account_id)
                .with_payload(serde_json::json!({
                    "email": account.email,
                    "first_name": account.first_name,
                    "temp_password": temp_password,
                })),
        );
        (None, None)
    } else {
        (
            Some(temp_password),
            Some("Email is not configured; share these credentials manually".to_string()),
        )
    };

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: LecturerCreated {
                lecturer,
                email: account.email,
                staff_id: input.staff_id,
                temp_password,
                warning,
            },
        }),
    ))
}

/// GET /api/v1/admin/lecturers
pub async fn list_lecturers(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<LecturerWorkload>>>> {
    let year = state.config.current_academic_year();
    let workloads = LecturerRepo::list_workloads(&state.pool, year).await?;
    Ok(Json(DataResponse { data: workloads }))
}

/// PUT /api/v1/admin/lecturers/{id}
pub async fn update_lecturer(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLecturer>,
) -> AppResult<Json<DataResponse<Lecturer>>> {
    if let Some(max) = input.max_students {
        if max < 0 {
            return Err(AppError::Core(CoreError::Validation(
                "Capacity cannot be negative".into(),
            )));
        }
    }
    let lecturer = LecturerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "lecturer",
            id,
        }))?;
    Ok(Json(DataResponse { data: lecturer }))
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/assignments
///
/// Manually assign one student to one lecturer. The lecturer's row is
/// locked for the capacity check so concurrent assigners cannot overshoot
/// `max_students`.
pub async fn assign_student(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<AssignmentPairing>,
) -> AppResult<(StatusCode, Json<DataResponse<StudentAssignment>>)> {
    let year = state.config.current_academic_year();
    let mut tx = state.pool.begin().await?;
    let assignment = assign_in_tx(&mut tx, &state, &input, year).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// POST /api/v1/admin/assignments/bulk
///
/// Assign a batch of explicit pairings. Each pairing runs in its own
/// transaction and reports its own outcome; the batch always returns 200.
pub async fn bulk_assign(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<BulkAssignRequest>,
) -> AppResult<Json<DataResponse<BulkAssignResponse>>> {
    let year = state.config.current_academic_year();
    let mut outcomes = Vec::with_capacity(input.pairings.len());
    for pairing in &input.pairings {
        let result = async {
            let mut tx = state.pool.begin().await?;
            let assignment = assign_in_tx(&mut tx, &state, pairing, year).await?;
            tx.commit().await?;
            Ok::<_, AppError>(assignment)
        }
        .await;
        outcomes.push(match result {
            Ok(_) => AssignmentOutcome {
                student_account_id: pairing.student_account_id,
                lecturer_id: pairing.lecturer_id,
                assigned: true,
                error: None,
            },
            Err(e) => AssignmentOutcome {
                student_account_id: pairing.student_account_id,
                lecturer_id: pairing.lecturer_id,
                assigned: false,
                error: Some(e.to_string()),
            },
        });
    }
    Ok(Json(DataResponse {
        data: BulkAssignResponse { outcomes },
    }))
}

/// POST /api/v1/admin/assignments/auto
///
/// Plan and persist assignments for every unassigned student, platform-wide
/// or scoped to one department. The whole run is one transaction: lecturer
/// rows are locked, the plan is computed over the locked snapshot, and the
/// inserts commit atomically. Students the planner cannot place are
/// reported, not failed.
pub async fn auto_assign(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<AutoAssignRequest>,
) -> AppResult<Json<DataResponse<AutoAssignResponse>>> {
    let year = state.config.current_academic_year();
    let mut tx = state.pool.begin().await?;

    let students =
        AssignmentRepo::list_unassigned_students(&mut *tx, year, input.department_id).await?;
    let slots = LecturerRepo::all_slots_for_update(&mut *tx, year, input.department_id).await?;
    let plan = plan_auto_assignment(&students, &slots);

    let mut assigned = Vec::with_capacity(plan.assignments.len());
    for planned in &plan.assignments {
        let placement =
            PlacementRepo::find_for_cycle(&state.pool, planned.student_account_id, year).await?;
        let assignment = AssignmentRepo::create(
            &mut *tx,
            &CreateAssignment {
                student_account_id: planned.student_account_id,
                lecturer_id: planned.lecturer_id,
                academic_year: year,
                placement_form_id: placement.map(|p| p.id),
            },
        )
        .await?;
        assigned.push(assignment);
    }
    tx.commit().await?;

    tracing::info!(
        assigned = assigned.len(),
        unassignable = plan.unassignable.len(),
        year,
        "Auto-assignment run finished"
    );
    Ok(Json(DataResponse {
        data: AutoAssignResponse {
            assigned,
            unassignable: plan.unassignable,
        },
    }))
}

/// DELETE /api/v1/admin/assignments/{id}
pub async fn unassign(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AssignmentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "assignment",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Placement forms
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/placements
///
/// Current-cycle placement forms, optionally filtered by department.
pub async fn list_placements(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(query): Query<PlacementQuery>,
) -> AppResult<Json<DataResponse<Vec<PlacementForm>>>> {
    let year = state.config.current_academic_year();
    let forms = match query.department_id {
        Some(department_id) => {
            PlacementRepo::list_by_department(&state.pool, department_id, year).await?
        }
        None => PlacementRepo::list_for_cycle(&state.pool, year).await?,
    };
    Ok(Json(DataResponse { data: forms }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One student-to-lecturer pairing with the capacity check under a row
/// lock. Shared by the manual and bulk endpoints.
async fn assign_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    state: &AppState,
    pairing: &AssignmentPairing,
    year: i32,
) -> AppResult<StudentAssignment> {
    let student = AccountRepo::find_by_id(&state.pool, pairing.student_account_id)
        .await?
        .filter(|a| a.role == Role::Student)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "student",
            id: pairing.student_account_id,
        }))?;

    if AssignmentRepo::exists_for_year(&mut **tx, student.id, year).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Student {} is already assigned for {year}",
            student.id
        ))));
    }

    let slot = LecturerRepo::slot_for_update(&mut **tx, pairing.lecturer_id, year)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "lecturer",
            id: pairing.lecturer_id,
        }))?;
    check_capacity(&slot).map_err(AppError::Core)?;

    let placement = PlacementRepo::find_for_cycle(&state.pool, student.id, year).await?;
    let assignment = AssignmentRepo::create(
        &mut **tx,
        &CreateAssignment {
            student_account_id: student.id,
            lecturer_id: pairing.lecturer_id,
            academic_year: year,
            placement_form_id: placement.map(|p| p.id),
        },
    )
    .await?;
    Ok(assignment)
}
