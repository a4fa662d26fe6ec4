//! HTTP-level integration tests for attachments, logbook entries, and
//! exports.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, post_json_auth, put_json_auth};
use http_body_util::BodyExt;
use sqlx::PgPool;

use intrack_api::auth::password::hash_password;
use intrack_core::attachment::AttachmentStatus;
use intrack_core::Role;
use intrack_db::models::account::{Account, CreateAccount, RoleProfile};
use intrack_db::models::attachment::{Attachment, CreateAttachment};
use intrack_db::repositories::{AccountRepo, AttachmentRepo};

const SUPERVISOR_EMAIL: &str = "peter@safari.co.ke";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn token_for(account: &Account) -> String {
    common::test_config()
        .jwt
        .sign_access_token(account.id, account.role.name())
        .expect("token generation should succeed")
}

async fn create_account(pool: &PgPool, role: Role, email: &str) -> Account {
    let profile = match role {
        Role::Student => RoleProfile::Student {
            student_id: format!("S-{email}"),
            course: "BSc Computer Science".to_string(),
            year_of_study: 3,
            department_id: None,
        },
        Role::Supervisor => RoleProfile::Supervisor {
            organization: "Safari Systems".to_string(),
            position: "Engineering Lead".to_string(),
            department: None,
        },
        Role::Lecturer => RoleProfile::Lecturer {
            staff_id: format!("L-{email}"),
            faculty: None,
        },
        Role::Admin => RoleProfile::Admin,
    };
    AccountRepo::create(
        pool,
        &CreateAccount {
            email: email.to_string(),
            password_hash: hash_password("test_password_123!").expect("hashing should succeed"),
            role,
            first_name: "Test".to_string(),
            last_name: "Account".to_string(),
            phone: String::new(),
            profile,
        },
    )
    .await
    .expect("account creation should succeed")
}

fn attachment_body() -> serde_json::Value {
    let start = Utc::now().date_naive();
    let end = start + Duration::days(90);
    serde_json::json!({
        "organization": "Safari Systems",
        "department": "Engineering",
        "supervisor_name": "Peter Otieno",
        "supervisor_email": SUPERVISOR_EMAIL,
        "start_date": start.to_string(),
        "end_date": end.to_string(),
    })
}

/// Seed an attachment directly and push it to the given status.
async fn seed_attachment(pool: &PgPool, student: &Account, status: AttachmentStatus) -> Attachment {
    let start = Utc::now().date_naive();
    let attachment = AttachmentRepo::create(
        pool,
        student.id,
        &CreateAttachment {
            organization: "Safari Systems".to_string(),
            department: "Engineering".to_string(),
            supervisor_name: "Peter Otieno".to_string(),
            supervisor_email: SUPERVISOR_EMAIL.to_string(),
            supervisor_phone: String::new(),
            start_date: start,
            end_date: start + Duration::days(90),
        },
    )
    .await
    .expect("attachment creation should succeed");
    if status == AttachmentStatus::Pending {
        return attachment;
    }
    AttachmentRepo::set_status(pool, attachment.id, status)
        .await
        .expect("status update should succeed")
        .expect("attachment should exist")
}

fn entry_body(tasks: &str) -> serde_json::Value {
    serde_json::json!({
        "department_section": "Backend team",
        "tasks": tasks,
        "skills_learned": "Code review",
        "hours_worked": 8.0,
    })
}

// ---------------------------------------------------------------------------
// Attachment lifecycle
// ---------------------------------------------------------------------------

/// Creating an attachment returns 201 with pending status and progress.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_attachment(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/api/v1/attachments", &token_for(&student), attachment_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["progress"]["days_completed"], 0);
}

/// A second application conflicts and names the existing attachment.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_one_attachment_per_student(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/api/v1/attachments", &token_for(&student), attachment_body()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Supervisors cannot create attachments.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_requires_student_role(pool: PgPool) {
    let supervisor = create_account(&pool, Role::Supervisor, SUPERVISOR_EMAIL).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/attachments",
        &token_for(&supervisor),
        attachment_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Approval moves a pending attachment straight to ongoing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_supervisor_approval_starts_attachment(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let supervisor = create_account(&pool, Role::Supervisor, SUPERVISOR_EMAIL).await;
    let attachment = seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/v1/attachments/{}/status", attachment.id),
        &token_for(&supervisor),
        serde_json::json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ongoing");
}

/// Only the supervisor named on the attachment may approve it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unrelated_supervisor_cannot_approve(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let other = create_account(&pool, Role::Supervisor, "other@firm.com").await;
    let attachment = seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/v1/attachments/{}/status", attachment.id),
        &token_for(&other),
        serde_json::json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The owning student may cancel their own attachment.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_student_can_cancel(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let attachment = seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/v1/attachments/{}/status", attachment.id),
        &token_for(&student),
        serde_json::json!({ "action": "cancel" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "cancelled");
}

/// Completing from pending is an invalid transition.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_complete_requires_ongoing(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let supervisor = create_account(&pool, Role::Supervisor, SUPERVISOR_EMAIL).await;
    let attachment = seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/v1/attachments/{}/status", attachment.id),
        &token_for(&supervisor),
        serde_json::json!({ "action": "complete" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Details are editable while pending, frozen once ongoing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_edit_window(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let token = token_for(&student);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/attachments/me",
        &token,
        serde_json::json!({ "department": "Platform" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["department"], "Platform");

    let attachment = AttachmentRepo::find_by_student(&pool, student.id)
        .await
        .unwrap()
        .unwrap();
    AttachmentRepo::set_status(&pool, attachment.id, AttachmentStatus::Ongoing)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        "/api/v1/attachments/me",
        &token,
        serde_json::json!({ "department": "Data" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The supervisor listing returns attachments naming their email.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_supervisor_attachment_listing(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let supervisor = create_account(&pool, Role::Supervisor, SUPERVISOR_EMAIL).await;
    seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/supervisor/attachments", &token_for(&supervisor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Logbook
// ---------------------------------------------------------------------------

/// A first entry for today succeeds; a second one conflicts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_one_entry_per_day(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    seed_attachment(&pool, &student, AttachmentStatus::Ongoing).await;
    let token = token_for(&student);

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/logbook/entries", &token, entry_body("Wrote tests")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["edit_count"], 0);

    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/logbook/entries", &token, entry_body("Again")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Entries can only be added while the attachment is running.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_entry_requires_active_attachment(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    seed_attachment(&pool, &student, AttachmentStatus::Pending).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/logbook/entries",
        &token_for(&student),
        entry_body("Too early"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The third edit of an entry is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_edit_cap(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    seed_attachment(&pool, &student, AttachmentStatus::Ongoing).await;
    let token = token_for(&student);

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/logbook/entries", &token, entry_body("v0")).await;
    let json = body_json(response).await;
    let entry_id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/logbook/entries/{entry_id}");

    for (i, expected) in [(1, StatusCode::OK), (2, StatusCode::OK)] {
        let app = common::build_test_app(pool.clone());
        let response = put_json_auth(
            app,
            &uri,
            &token,
            serde_json::json!({ "tasks": format!("v{i}") }),
        )
        .await;
        assert_eq!(response.status(), expected);
        let json = body_json(response).await;
        assert_eq!(json["data"]["edit_count"], i);
    }

    let app = common::build_test_app(pool);
    let response =
        put_json_auth(app, &uri, &token, serde_json::json!({ "tasks": "v3" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Supervisor comments do not touch the student's edit counter.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_supervisor_comment_exempt_from_cap(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let supervisor = create_account(&pool, Role::Supervisor, SUPERVISOR_EMAIL).await;
    seed_attachment(&pool, &student, AttachmentStatus::Ongoing).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/logbook/entries",
        &token_for(&student),
        entry_body("Wired metrics"),
    )
    .await;
    let json = body_json(response).await;
    let entry_id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/logbook/entries/{entry_id}/comment"),
        &token_for(&supervisor),
        serde_json::json!({ "comments": "Good progress" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["supervisor_comments"], "Good progress");
    assert_eq!(json["data"]["edit_count"], 0);
}

/// Out-of-range hours are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_hours_bounds(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    seed_attachment(&pool, &student, AttachmentStatus::Ongoing).await;
    let app = common::build_test_app(pool);

    let mut body = entry_body("Late night");
    body["hours_worked"] = serde_json::json!(25.0);
    let response =
        post_json_auth(app, "/api/v1/logbook/entries", &token_for(&student), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// CSV export streams a text/csv attachment with the entry rows.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_csv_export(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let attachment = seed_attachment(&pool, &student, AttachmentStatus::Ongoing).await;
    let token = token_for(&student);

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/v1/logbook/entries",
        &token,
        entry_body("Shipped, tested"),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/attachments/{}/export/csv", attachment.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/csv; charset=utf-8"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("Date,"));
    // Fields containing commas are quoted.
    assert!(csv.contains("\"Shipped, tested\""));
}

/// PDF rendering is delegated elsewhere; asking for it is a 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_pdf_export_unsupported(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let attachment = seed_attachment(&pool, &student, AttachmentStatus::Ongoing).await;
    let app = common::build_test_app(pool);

    let response = get_auth(
        app,
        &format!("/api/v1/attachments/{}/export/pdf", attachment.id),
        &token_for(&student),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Another student cannot export someone else's logbook.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_export_requires_access(pool: PgPool) {
    let student = create_account(&pool, Role::Student, "ann@uni.edu").await;
    let intruder = create_account(&pool, Role::Student, "mallory@uni.edu").await;
    let attachment = seed_attachment(&pool, &student, AttachmentStatus::Ongoing).await;
    let app = common::build_test_app(pool);

    let response = get_auth(
        app,
        &format!("/api/v1/attachments/{}/export/json", attachment.id),
        &token_for(&intruder),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
