use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use edux_portal::models::RegistrationRequest;
use edux_portal::stub::{self, StubState, repository, security};
use serde_json::Value;
use tower::ServiceExt;

async fn app() -> axum::Router {
    let db = stub::connect("sqlite::memory:")
        .await
        .expect("Failed to open stub database");
    stub::router(StubState { db })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("body is not JSON")
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .await
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_courses_with_and_without_trailing_slash() {
    let app = app().await;
    for uri in ["/courses", "/courses/"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = json_body(response).await;
        assert_eq!(
            body.as_array().map(Vec::len),
            Some(stub::SEED_COURSES.len())
        );
    }
}

#[tokio::test]
async fn test_missing_token_is_401_with_message() {
    let response = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/students/studentdetails")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_invalid_registration_is_400() {
    let payload = serde_json::json!({
        "name": "Nimal",
        "email": "nimal@example.com",
        "nic": "200012345678",
        "phoneNumber": "0771234567",
        "password": "correcthorse",
        "confirmPassword": "correcthorsf"
    });

    let response = app()
        .await
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/students/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Passwords do not match.");
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let db = stub::connect("sqlite::memory:").await.unwrap();
    stub::seed_courses(&db).await.unwrap();
    let courses = repository::fetch_courses(&db).await.unwrap();
    assert_eq!(courses.len(), stub::SEED_COURSES.len());
}

#[tokio::test]
async fn test_simultaneous_duplicate_enrollments_conflict() {
    let db = stub::connect("sqlite::memory:").await.unwrap();
    let req = RegistrationRequest {
        name: "Nimal Perera".to_string(),
        email: "nimal@example.com".to_string(),
        nic: "200012345678".to_string(),
        phone_number: "0771234567".to_string(),
        password: "correcthorse".to_string(),
        confirm_password: "correcthorse".to_string(),
    };
    let hash = security::hash_password(&req.password).unwrap();
    let student = repository::insert_student(&db, &req, &hash).await.unwrap();
    let token = repository::create_session(&db, &student.id).await.unwrap();
    let course = repository::fetch_courses(&db).await.unwrap().remove(0);
    let app = stub::router(StubState { db: db.clone() });

    let enroll = || {
        let payload = serde_json::json!({
            "studentId": student.id,
            "courseId": course.id,
        });
        app.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/enrollments/")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
    };
    let (first, second) = tokio::join!(enroll(), enroll());

    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    // a repeated insert reports the duplicate instead of failing
    let again = repository::insert_enrollment(&db, &student.id, &course.id)
        .await
        .unwrap();
    assert!(again.is_none());
}
