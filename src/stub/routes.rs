use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::models::*;
use crate::stub::{StubState, repository, security};
use crate::validation;

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct RegisteredResponse {
    message: String,
    student: Student,
}

pub fn router(state: StubState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/students/register", post(register))
        .route("/students/login", post(login))
        .route("/students/studentdetails", get(student_details))
        .route("/students/update/{id}", put(update_student))
        .route("/courses", get(list_courses))
        .route("/courses/", get(list_courses))
        .route("/enrollments/", post(create_enrollment))
        .route("/enrollments/{student_id}", get(list_enrollments))
        .route(
            "/enrollments/enrolledCourses/{student_id}",
            get(list_enrolled_courses),
        )
        .route(
            "/enrollments/unroll/{student_id}/{course_id}",
            delete(unenroll),
        )
        .with_state(state)
}

async fn health(State(state): State<StubState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

/// Resolves the `Authorization: Bearer …` header to its student.
async fn authenticate(state: &StubState, headers: &HeaderMap) -> Result<Student, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthenticated)?;

    repository::student_for_token(&state.db, token)
        .await?
        .ok_or(AppError::Unauthenticated)
}

fn ensure_owner(student: &Student, student_id: &str) -> Result<(), AppError> {
    if student.id == student_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

async fn register(
    State(state): State<StubState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegisteredResponse>), AppError> {
    validation::validate_registration(&req).map_err(AppError::Validation)?;

    if repository::email_taken(&state.db, req.email.trim(), None).await? {
        return Err(AppError::Conflict(
            "A student with this email already exists".to_string(),
        ));
    }

    let hash = security::hash_password(&req.password)?;
    let student = repository::insert_student(&state.db, &req, &hash).await?;
    info!("registered student {}", student.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "Student registered successfully".to_string(),
            student,
        }),
    ))
}

async fn login(
    State(state): State<StubState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid = || AppError::Api {
        status: StatusCode::UNAUTHORIZED.as_u16(),
        message: "Invalid email or password".to_string(),
    };

    let creds = repository::fetch_credentials(&state.db, req.email.trim())
        .await?
        .ok_or_else(invalid)?;
    if !security::verify_password(&req.password, &creds.password_hash)? {
        return Err(invalid());
    }

    let token = repository::create_session(&state.db, &creds.id).await?;
    info!("student {} signed in", creds.id);
    Ok(Json(LoginResponse { token }))
}

async fn student_details(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> Result<Json<StudentDetails>, AppError> {
    let student = authenticate(&state, &headers).await?;
    Ok(Json(StudentDetails { student }))
}

async fn update_student(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<StudentDetails>, AppError> {
    let student = authenticate(&state, &headers).await?;
    ensure_owner(&student, &id)?;

    if let Some(msg) = validation::validate_profile(&profile).into_values().next() {
        return Err(AppError::Validation(msg));
    }
    if repository::email_taken(&state.db, profile.email.trim(), Some(&id)).await? {
        return Err(AppError::Conflict(
            "A student with this email already exists".to_string(),
        ));
    }

    let student = repository::update_student(&state.db, &id, &profile)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(StudentDetails { student }))
}

async fn list_courses(State(state): State<StubState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;
    Ok(Json(courses))
}

async fn create_enrollment(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(req): Json<NewEnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let student = authenticate(&state, &headers).await?;
    ensure_owner(&student, &req.student_id)?;

    if !repository::course_exists(&state.db, &req.course_id).await? {
        return Err(AppError::NotFound);
    }
    let enrollment = repository::insert_enrollment(&state.db, &req.student_id, &req.course_id)
        .await?
        .ok_or_else(|| AppError::Conflict("Already enrolled in this course".to_string()))?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn list_enrollments(
    State(state): State<StubState>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    let student = authenticate(&state, &headers).await?;
    ensure_owner(&student, &student_id)?;

    let enrollments = repository::fetch_enrollments(&state.db, &student_id).await?;
    Ok(Json(enrollments))
}

async fn list_enrolled_courses(
    State(state): State<StubState>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<EnrolledCourse>>, AppError> {
    let student = authenticate(&state, &headers).await?;
    ensure_owner(&student, &student_id)?;

    let courses = repository::fetch_enrolled_courses(&state.db, &student_id).await?;
    Ok(Json(courses))
}

async fn unenroll(
    State(state): State<StubState>,
    Path((student_id, course_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let student = authenticate(&state, &headers).await?;
    ensure_owner(&student, &student_id)?;

    if repository::delete_enrollment(&state.db, &student_id, &course_id).await? {
        Ok(Json(MessageResponse {
            message: "Unenrolled successfully".to_string(),
        }))
    } else {
        Err(AppError::NotFound)
    }
}
