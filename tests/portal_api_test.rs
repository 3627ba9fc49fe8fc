mod common;

use edux_portal::api::PortalApi;
use edux_portal::error::AppError;
use edux_portal::models::{LoginRequest, NewEnrollmentRequest, StudentProfile};
use edux_portal::stub::SEED_COURSES;

use common::{PASSWORD, http_client, register_and_login, registration, start_stub};

#[tokio::test]
async fn test_catalog_is_public_and_seeded() {
    let addr = start_stub().await;
    let api = http_client(addr);

    let courses = api.fetch_courses().await.expect("Failed to fetch courses");
    assert_eq!(courses.len(), SEED_COURSES.len());
    assert!(courses.iter().all(|c| !c.id.is_empty() && !c.name.is_empty()));
}

#[tokio::test]
async fn test_register_then_fetch_details() {
    let addr = start_stub().await;
    let api = http_client(addr);

    let token = register_and_login(&api, "nimal@example.com").await;
    let details = api
        .fetch_student_details(&token)
        .await
        .expect("Failed to fetch details");

    assert_eq!(details.student.email, "nimal@example.com");
    assert_eq!(details.student.phone_number, "0771234567");
    assert!(!details.student.id.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_reports_server_message() {
    let addr = start_stub().await;
    let api = http_client(addr);

    api.register(&registration("dup@example.com")).await.unwrap();
    let err = api
        .register(&registration("dup@example.com"))
        .await
        .expect_err("second registration should fail");

    match &err {
        AppError::Api { status, .. } => assert_eq!(*status, 409),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.user_message("fallback"),
        "A student with this email already exists"
    );
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let addr = start_stub().await;
    let api = http_client(addr);
    api.register(&registration("nimal@example.com")).await.unwrap();

    let err = api
        .login(&LoginRequest {
            email: "nimal@example.com".to_string(),
            password: "not-the-password".to_string(),
        })
        .await
        .expect_err("login should fail");

    assert_eq!(err.user_message("fallback"), "Invalid email or password");
}

#[tokio::test]
async fn test_details_require_a_valid_token() {
    let addr = start_stub().await;
    let api = http_client(addr);

    let err = api
        .fetch_student_details("bogus")
        .await
        .expect_err("bogus token should be rejected");
    match err {
        AppError::Api { status, .. } => assert_eq!(status, 401),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_enrollment_lifecycle() {
    let addr = start_stub().await;
    let api = http_client(addr);
    let token = register_and_login(&api, "nimal@example.com").await;
    let student = api.fetch_student_details(&token).await.unwrap().student;
    let course = api.fetch_courses().await.unwrap().remove(0);

    let req = NewEnrollmentRequest {
        student_id: student.id.clone(),
        course_id: course.id.clone(),
    };
    let enrollment = api.enroll(&token, &req).await.expect("Failed to enroll");
    assert_eq!(enrollment.course_id, course.id);
    assert!(enrollment.enrollment_date.is_some());

    let again = api.enroll(&token, &req).await.expect_err("duplicate enroll");
    assert_eq!(again.user_message("fallback"), "Already enrolled in this course");

    let ids: Vec<String> = api
        .fetch_enrollments(&token, &student.id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.course_id)
        .collect();
    assert_eq!(ids, vec![course.id.clone()]);

    let enrolled = api.fetch_enrolled_courses(&token, &student.id).await.unwrap();
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].name, course.name);

    api.unenroll(&token, &student.id, &course.id)
        .await
        .expect("Failed to unenroll");
    assert!(
        api.fetch_enrolled_courses(&token, &student.id)
            .await
            .unwrap()
            .is_empty()
    );

    let missing = api
        .unenroll(&token, &student.id, &course.id)
        .await
        .expect_err("second unenroll should fail");
    match missing {
        AppError::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_cannot_act_for_another_student() {
    let addr = start_stub().await;
    let api = http_client(addr);
    let alice = register_and_login(&api, "alice@example.com").await;
    let bob = register_and_login(&api, "bob@example.com").await;
    let bob_id = api.fetch_student_details(&bob).await.unwrap().student.id;
    let course = api.fetch_courses().await.unwrap().remove(0);

    let err = api
        .enroll(
            &alice,
            &NewEnrollmentRequest {
                student_id: bob_id.clone(),
                course_id: course.id,
            },
        )
        .await
        .expect_err("enrolling someone else should fail");
    match err {
        AppError::Api { status, .. } => assert_eq!(status, 403),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(api.fetch_enrolled_courses(&alice, &bob_id).await.is_err());
}

#[tokio::test]
async fn test_update_student_profile() {
    let addr = start_stub().await;
    let api = http_client(addr);
    let token = register_and_login(&api, "nimal@example.com").await;
    let student = api.fetch_student_details(&token).await.unwrap().student;

    let profile = StudentProfile {
        name: "Nimal Silva".to_string(),
        email: "nimal.silva@example.com".to_string(),
        nic: "123456789V".to_string(),
        phone_number: "0712345678".to_string(),
    };
    api.update_student(&token, &student.id, &profile)
        .await
        .expect("Failed to update");

    let updated = api.fetch_student_details(&token).await.unwrap().student;
    assert_eq!(updated.profile(), profile);
    assert_eq!(updated.id, student.id);

    // the new email signs in with the old password
    api.login(&LoginRequest {
        email: profile.email.clone(),
        password: PASSWORD.to_string(),
    })
    .await
    .expect("Failed to log in with updated email");
}
