//! HTTP-level integration tests for the admin portal: lecturer management,
//! assignments, and the dashboard.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth};
use sqlx::PgPool;
use tower::ServiceExt;

use intrack_api::auth::password::hash_password;
use intrack_core::types::DbId;
use intrack_core::Role;
use intrack_db::models::account::{Account, CreateAccount, RoleProfile};
use intrack_db::models::department::CreateDepartment;
use intrack_db::repositories::{AccountRepo, DepartmentRepo, LecturerRepo};

/// Matches the fixed academic year in `common::test_config`.
const YEAR: i32 = 2026;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn token_for(account: &Account) -> String {
    common::test_config()
        .jwt
        .sign_access_token(account.id, account.role.name())
        .expect("token generation should succeed")
}

async fn create_admin(pool: &PgPool) -> Account {
    AccountRepo::create(
        pool,
        &CreateAccount {
            email: "admin@uni.edu".to_string(),
            password_hash: hash_password("test_password_123!").expect("hashing should succeed"),
            role: Role::Admin,
            first_name: "Grace".to_string(),
            last_name: "Njeri".to_string(),
            phone: String::new(),
            profile: RoleProfile::Admin,
        },
    )
    .await
    .expect("account creation should succeed")
}

async fn create_student(pool: &PgPool, email: &str, department_id: Option<DbId>) -> Account {
    AccountRepo::create(
        pool,
        &CreateAccount {
            email: email.to_string(),
            password_hash: hash_password("test_password_123!").expect("hashing should succeed"),
            role: Role::Student,
            first_name: "Test".to_string(),
            last_name: "Student".to_string(),
            phone: String::new(),
            profile: RoleProfile::Student {
                student_id: format!("S-{email}"),
                course: "BSc Computer Science".to_string(),
                year_of_study: 3,
                department_id,
            },
        },
    )
    .await
    .expect("account creation should succeed")
}

async fn create_department(pool: &PgPool, name: &str) -> DbId {
    DepartmentRepo::create(
        pool,
        &CreateDepartment {
            name: name.to_string(),
            university: "Test University".to_string(),
        },
    )
    .await
    .expect("department creation should succeed")
    .id
}

/// Create a lecturer through the admin API and return the lecturer id.
async fn create_lecturer_via_api(
    pool: PgPool,
    admin_token: &str,
    staff_id: &str,
    department_id: DbId,
    max_students: i32,
) -> DbId {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/lecturers",
        admin_token,
        serde_json::json!({
            "email": format!("{staff_id}@uni.edu"),
            "first_name": "Joan",
            "last_name": "Kimani",
            "staff_id": staff_id,
            "department_id": department_id,
            "max_students": max_students,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["lecturer"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Lecturer management
// ---------------------------------------------------------------------------

/// Without SMTP configured the credentials come back inline with a warning.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_lecturer_returns_credentials_without_email(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/lecturers",
        &token_for(&admin),
        serde_json::json!({
            "email": "joan@uni.edu",
            "first_name": "Joan",
            "last_name": "Kimani",
            "staff_id": "L200",
            "department_id": dept,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["temp_password"].as_str().unwrap().len(), 12);
    assert!(json["data"]["warning"].is_string());
}

/// A duplicate staff ID is rejected before the transaction starts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_lecturer_duplicate_staff_id(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    create_lecturer_via_api(pool.clone(), &token, "L200", dept, 10).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/lecturers",
        &token,
        serde_json::json!({
            "email": "other@uni.edu",
            "first_name": "Other",
            "last_name": "Person",
            "staff_id": "L200",
            "department_id": dept,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Students cannot reach the admin portal.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_routes_require_admin_role(pool: PgPool) {
    let student = create_student(&pool, "ann@uni.edu", None).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/dashboard", &token_for(&student)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// A manual assignment links a student to a lecturer for the fixed year.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_manual_assignment(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    let lecturer_id = create_lecturer_via_api(pool.clone(), &token, "L200", dept, 10).await;
    let student = create_student(&pool, "ann@uni.edu", Some(dept)).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments",
        &token,
        serde_json::json!({
            "student_account_id": student.id,
            "lecturer_id": lecturer_id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["academic_year"], YEAR);
}

/// A lecturer at capacity rejects further manual assignments.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_manual_assignment_respects_capacity(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    let lecturer_id = create_lecturer_via_api(pool.clone(), &token, "L200", dept, 1).await;
    let first = create_student(&pool, "one@uni.edu", Some(dept)).await;
    let second = create_student(&pool, "two@uni.edu", Some(dept)).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments",
        &token,
        serde_json::json!({ "student_account_id": first.id, "lecturer_id": lecturer_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments",
        &token,
        serde_json::json!({ "student_account_id": second.id, "lecturer_id": lecturer_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Bulk assignment reports per-item outcomes without aborting the batch.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_assignment_partial_failure(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    let lecturer_id = create_lecturer_via_api(pool.clone(), &token, "L200", dept, 1).await;
    let first = create_student(&pool, "one@uni.edu", Some(dept)).await;
    let second = create_student(&pool, "two@uni.edu", Some(dept)).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments/bulk",
        &token,
        serde_json::json!({ "pairings": [
            { "student_account_id": first.id, "lecturer_id": lecturer_id },
            { "student_account_id": second.id, "lecturer_id": lecturer_id },
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let outcomes = json["data"]["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["assigned"], true);
    assert_eq!(outcomes[1]["assigned"], false);
    assert!(outcomes[1]["error"].is_string());
}

/// Auto-assignment distributes a department's students evenly and reports
/// the overflow as unassignable.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_auto_assignment(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    create_lecturer_via_api(pool.clone(), &token, "L200", dept, 2).await;
    create_lecturer_via_api(pool.clone(), &token, "L201", dept, 2).await;
    for i in 0..5 {
        create_student(&pool, &format!("s{i}@uni.edu"), Some(dept)).await;
    }

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments/auto",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    // Four seats total, five students: one is left over.
    assert_eq!(json["data"]["assigned"].as_array().unwrap().len(), 4);
    assert_eq!(json["data"]["unassignable"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["unassignable"][0]["reason"], "no_capacity");
}

/// A department-scoped run leaves other departments' students untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_auto_assignment_scoped_to_department(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let computing = create_department(&pool, "Computing").await;
    let mechanical = create_department(&pool, "Mechanical").await;
    let token = token_for(&admin);
    create_lecturer_via_api(pool.clone(), &token, "L200", computing, 10).await;
    create_lecturer_via_api(pool.clone(), &token, "L201", mechanical, 10).await;
    let inside = create_student(&pool, "ann@uni.edu", Some(computing)).await;
    create_student(&pool, "ben@uni.edu", Some(mechanical)).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments/auto",
        &token,
        serde_json::json!({ "department_id": computing }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let assigned = json["data"]["assigned"].as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["student_account_id"], inside.id);
    assert!(json["data"]["unassignable"].as_array().unwrap().is_empty());
}

/// Unassigning frees the seat for reuse.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unassign(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    let lecturer_id = create_lecturer_via_api(pool.clone(), &token, "L200", dept, 1).await;
    let student = create_student(&pool, "ann@uni.edu", Some(dept)).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments",
        &token,
        serde_json::json!({ "student_account_id": student.id, "lecturer_id": lecturer_id }),
    )
    .await;
    let json = body_json(response).await;
    let assignment_id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/admin/assignments/{assignment_id}"))
                .header(
                    axum::http::header::AUTHORIZATION,
                    format!("Bearer {token}"),
                )
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The seat is free again.
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/assignments",
        &token,
        serde_json::json!({ "student_account_id": student.id, "lecturer_id": lecturer_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Dashboard aggregates reflect the seeded data.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_counts(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    create_lecturer_via_api(pool.clone(), &token, "L200", dept, 10).await;
    create_student(&pool, "ann@uni.edu", Some(dept)).await;
    create_student(&pool, "ben@uni.edu", Some(dept)).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_students"], 2);
    assert_eq!(json["data"]["active_lecturers"], 1);
    assert_eq!(json["data"]["academic_year"], YEAR);
}

/// Lecturer workloads expose remaining capacity.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_lecturer_workloads(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let dept = create_department(&pool, "Computing").await;
    let token = token_for(&admin);
    let lecturer_id = create_lecturer_via_api(pool.clone(), &token, "L200", dept, 3).await;
    let student = create_student(&pool, "ann@uni.edu", Some(dept)).await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/v1/admin/assignments",
        &token,
        serde_json::json!({ "student_account_id": student.id, "lecturer_id": lecturer_id }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/lecturers", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["assigned_count"], 1);
    assert_eq!(json["data"][0]["max_students"], 3);

    let workload = LecturerRepo::workload_by_id(&pool, lecturer_id, YEAR)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(workload.available_slots(), 2);
}
