#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use edux_portal::api::{PortalApi, PortalHttpClient};
use edux_portal::config::PortalConfig;
use edux_portal::error::AppError;
use edux_portal::models::*;
use edux_portal::session::{MemoryTokenStore, SessionStore};
use edux_portal::stub;

pub const PASSWORD: &str = "correcthorse";

/// A fresh stub on an ephemeral port, backed by its own in-memory database.
pub async fn start_stub() -> SocketAddr {
    let (addr, _handle) = stub::spawn(SocketAddr::from(([127, 0, 0, 1], 0)), "sqlite::memory:")
        .await
        .expect("Failed to start portal stub");
    addr
}

pub fn http_client(addr: SocketAddr) -> PortalHttpClient {
    let config = PortalConfig {
        api_url: format!("http://{}", addr),
        ..PortalConfig::default()
    };
    PortalHttpClient::new(&config).expect("Failed to build portal client")
}

pub fn registration(email: &str) -> RegistrationRequest {
    RegistrationRequest {
        name: "Nimal Perera".to_string(),
        email: email.to_string(),
        nic: "200012345678".to_string(),
        phone_number: "0771234567".to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
    }
}

/// Registers `email` and returns a login token for it.
pub async fn register_and_login(api: &dyn PortalApi, email: &str) -> String {
    api.register(&registration(email))
        .await
        .expect("Failed to register");
    api.login(&LoginRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
    })
    .await
    .expect("Failed to log in")
    .token
}

/// Session wired to a counting client and an in-memory token store.
pub async fn session_for(addr: SocketAddr) -> (Arc<SessionStore>, Arc<CountingApi>) {
    let api = Arc::new(CountingApi::new(http_client(addr)));
    let session = Arc::new(SessionStore::new(
        api.clone(),
        Arc::new(MemoryTokenStore::new()),
    ));
    (session, api)
}

/// Session already signed in as a freshly registered student.
pub async fn signed_in_session(
    addr: SocketAddr,
    email: &str,
) -> (Arc<SessionStore>, Arc<CountingApi>) {
    let (session, api) = session_for(addr).await;
    let token = register_and_login(api.as_ref(), email).await;
    session.sign_in(&token).await.expect("Failed to store token");
    (session, api)
}

/// Passes every call through to the real client and counts them.
pub struct CountingApi {
    inner: PortalHttpClient,
    pub registrations: AtomicUsize,
    pub detail_fetches: AtomicUsize,
    pub updates: AtomicUsize,
    pub enrollments: AtomicUsize,
}

impl CountingApi {
    pub fn new(inner: PortalHttpClient) -> Self {
        Self {
            inner,
            registrations: AtomicUsize::new(0),
            detail_fetches: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            enrollments: AtomicUsize::new(0),
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortalApi for CountingApi {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        self.inner.login(req).await
    }

    async fn register(&self, req: &RegistrationRequest) -> Result<(), AppError> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.inner.register(req).await
    }

    async fn fetch_student_details(&self, token: &str) -> Result<StudentDetails, AppError> {
        self.detail_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_student_details(token).await
    }

    async fn update_student(
        &self,
        token: &str,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<(), AppError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_student(token, student_id, profile).await
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        self.inner.fetch_courses().await
    }

    async fn fetch_enrollments(
        &self,
        token: &str,
        student_id: &str,
    ) -> Result<Vec<Enrollment>, AppError> {
        self.inner.fetch_enrollments(token, student_id).await
    }

    async fn enroll(&self, token: &str, req: &NewEnrollmentRequest) -> Result<Enrollment, AppError> {
        self.enrollments.fetch_add(1, Ordering::SeqCst);
        self.inner.enroll(token, req).await
    }

    async fn fetch_enrolled_courses(
        &self,
        token: &str,
        student_id: &str,
    ) -> Result<Vec<EnrolledCourse>, AppError> {
        self.inner.fetch_enrolled_courses(token, student_id).await
    }

    async fn unenroll(
        &self,
        token: &str,
        student_id: &str,
        course_id: &str,
    ) -> Result<(), AppError> {
        self.inner.unenroll(token, student_id, course_id).await
    }
}
