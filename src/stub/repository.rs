use chrono::{SecondsFormat, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::models::{Course, EnrolledCourse, Enrollment, RegistrationRequest, Student, StudentProfile};

#[derive(Debug, FromRow)]
pub struct StudentCredentials {
    pub id: String,
    pub password_hash: String,
}

pub async fn insert_student(
    db: &SqlitePool,
    req: &RegistrationRequest,
    password_hash: &str,
) -> Result<Student, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    sqlx::query(
        r#"
        INSERT INTO students (id, name, email, nic, phone_number, password_hash, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&id)
    .bind(req.name.trim())
    .bind(req.email.trim())
    .bind(&req.nic)
    .bind(&req.phone_number)
    .bind(password_hash)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Student {
        id,
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        nic: req.nic.clone(),
        phone_number: req.phone_number.clone(),
    })
}

pub async fn email_taken(
    db: &SqlitePool,
    email: &str,
    except_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT id FROM students WHERE email = ?1")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(matches!(row, Some((id,)) if Some(id.as_str()) != except_id))
}

pub async fn fetch_credentials(
    db: &SqlitePool,
    email: &str,
) -> Result<Option<StudentCredentials>, sqlx::Error> {
    sqlx::query_as::<_, StudentCredentials>(
        "SELECT id, password_hash FROM students WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn fetch_student(db: &SqlitePool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, email, nic, phone_number FROM students WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn update_student(
    db: &SqlitePool,
    id: &str,
    profile: &StudentProfile,
) -> Result<Option<Student>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET name = ?1, email = ?2, nic = ?3, phone_number = ?4
        WHERE id = ?5
        "#,
    )
    .bind(profile.name.trim())
    .bind(profile.email.trim())
    .bind(&profile.nic)
    .bind(&profile.phone_number)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    fetch_student(db, id).await
}

pub async fn create_session(db: &SqlitePool, student_id: &str) -> Result<String, sqlx::Error> {
    let token = Uuid::new_v4().simple().to_string();
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    sqlx::query("INSERT INTO sessions (token, student_id, created_at) VALUES (?1, ?2, ?3)")
        .bind(&token)
        .bind(student_id)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(token)
}

pub async fn student_for_token(
    db: &SqlitePool,
    token: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        r#"
        SELECT s.id, s.name, s.email, s.nic, s.phone_number
        FROM sessions t
        JOIN students s ON s.id = t.student_id
        WHERE t.token = ?1
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await
}

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT id, name, description FROM courses ORDER BY name")
        .fetch_all(db)
        .await
}

pub async fn course_exists(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT id FROM courses WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

pub async fn insert_course(
    db: &SqlitePool,
    name: &str,
    description: &str,
) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO courses (id, name, description) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(name)
        .bind(description)
        .execute(db)
        .await?;

    Ok(Course {
        id,
        name: name.to_string(),
        description: description.to_string(),
    })
}

pub async fn count_courses(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn fetch_enrollments(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT student_id, course_id, enrollment_date
        FROM enrollments
        WHERE student_id = ?1
        ORDER BY enrollment_date, rowid
        "#,
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

/// Records the enrollment, or returns `None` when the student already takes
/// the course.
pub async fn insert_enrollment(
    db: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    let result = sqlx::query(
        "INSERT INTO enrollments (student_id, course_id, enrollment_date) VALUES (?1, ?2, ?3)",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(&now)
    .execute(db)
    .await;

    match result {
        Ok(_) => Ok(Some(Enrollment {
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            enrollment_date: Some(now),
        })),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn fetch_enrolled_courses(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<EnrolledCourse>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledCourse>(
        r#"
        SELECT c.id, c.name, c.description, e.enrollment_date
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.student_id = ?1
        ORDER BY e.enrollment_date, e.rowid
        "#,
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn delete_enrollment(
    db: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE student_id = ?1 AND course_id = ?2")
        .bind(student_id)
        .bind(course_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
