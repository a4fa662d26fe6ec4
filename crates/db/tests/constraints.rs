//! Schema-level guarantees the application relies on: the unique
//! constraints that back duplicate detection must exist and fire.

use sqlx::PgPool;

async fn insert_account(pool: &PgPool, email: &str, role: i16) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO accounts (email, password_hash, role) VALUES ($1, 'x', $2) RETURNING id",
    )
    .bind(email)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

async fn insert_attachment(pool: &PgPool, student_account_id: i64) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO attachments (student_account_id, organization, supervisor_name, start_date, end_date)
         VALUES ($1, 'Safari Systems', 'Peter Otieno', '2026-09-01', '2026-12-01')
         RETURNING id",
    )
    .bind(student_account_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

fn constraint_name(err: sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => db.constraint().unwrap_or_default().to_string(),
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    insert_account(&pool, "ann@uni.edu", 1).await;
    let err = sqlx::query("INSERT INTO accounts (email, password_hash, role) VALUES ($1, 'x', 2)")
        .bind("ann@uni.edu")
        .execute(&pool)
        .await
        .unwrap_err();
    assert_eq!(constraint_name(err), "uq_accounts_email");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_attachment_per_student(pool: PgPool) {
    let student = insert_account(&pool, "ann@uni.edu", 1).await;
    insert_attachment(&pool, student).await.unwrap();
    let err = insert_attachment(&pool, student).await.unwrap_err();
    assert_eq!(constraint_name(err), "uq_attachments_student");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_logbook_entry_per_day(pool: PgPool) {
    let student = insert_account(&pool, "ann@uni.edu", 1).await;
    let attachment = insert_attachment(&pool, student).await.unwrap();

    let insert = "INSERT INTO logbook_entries
         (attachment_id, entry_date, department_section, tasks, skills_learned, hours_worked)
         VALUES ($1, '2026-09-02', 'Engineering', 'Setup', 'Git', 8.0)";
    sqlx::query(insert)
        .bind(attachment)
        .execute(&pool)
        .await
        .unwrap();
    let err = sqlx::query(insert)
        .bind(attachment)
        .execute(&pool)
        .await
        .unwrap_err();
    assert_eq!(constraint_name(err), "uq_logbook_attachment_date");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_edit_count_capped_by_check(pool: PgPool) {
    let student = insert_account(&pool, "ann@uni.edu", 1).await;
    let attachment = insert_attachment(&pool, student).await.unwrap();
    let err = sqlx::query(
        "INSERT INTO logbook_entries
         (attachment_id, entry_date, department_section, tasks, skills_learned, hours_worked, edit_count)
         VALUES ($1, '2026-09-02', 'Engineering', 'Setup', 'Git', 8.0, 3)",
    )
    .bind(attachment)
    .execute(&pool)
    .await
    .unwrap_err();
    assert_eq!(constraint_name(err), "ck_logbook_edit_count");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_assignment_per_student_per_year(pool: PgPool) {
    let student = insert_account(&pool, "ann@uni.edu", 1).await;
    let lecturer_account = insert_account(&pool, "joan@uni.edu", 3).await;
    let (dept,): (i64,) =
        sqlx::query_as("INSERT INTO departments (name) VALUES ('Computing') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
    let (lecturer,): (i64,) = sqlx::query_as(
        "INSERT INTO lecturers (account_id, department_id, max_students)
         VALUES ($1, $2, 10) RETURNING id",
    )
    .bind(lecturer_account)
    .bind(dept)
    .fetch_one(&pool)
    .await
    .unwrap();

    let insert = "INSERT INTO student_assignments (student_account_id, lecturer_id, academic_year)
         VALUES ($1, $2, 2026)";
    sqlx::query(insert)
        .bind(student)
        .bind(lecturer)
        .execute(&pool)
        .await
        .unwrap();
    let err = sqlx::query(insert)
        .bind(student)
        .bind(lecturer)
        .execute(&pool)
        .await
        .unwrap_err();
    assert_eq!(constraint_name(err), "uq_assignment_student_year");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_account_cascades_to_attachment(pool: PgPool) {
    let student = insert_account(&pool, "ann@uni.edu", 1).await;
    let attachment = insert_attachment(&pool, student).await.unwrap();

    sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(student)
        .execute(&pool)
        .await
        .unwrap();

    let remaining: Option<(i64,)> = sqlx::query_as("SELECT id FROM attachments WHERE id = $1")
        .bind(attachment)
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert!(remaining.is_none());
}
