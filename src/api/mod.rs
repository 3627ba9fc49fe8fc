pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::PortalConfig;
use crate::error::AppError;
use crate::models::{
    Course, EnrolledCourse, Enrollment, LoginRequest, LoginResponse, NewEnrollmentRequest,
    RegistrationRequest, StudentDetails, StudentProfile,
};

/// Remote portal operations used by the session store and the views.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError>;
    async fn register(&self, req: &RegistrationRequest) -> Result<(), AppError>;
    async fn fetch_student_details(&self, token: &str) -> Result<StudentDetails, AppError>;
    async fn update_student(
        &self,
        token: &str,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<(), AppError>;
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn fetch_enrollments(
        &self,
        token: &str,
        student_id: &str,
    ) -> Result<Vec<Enrollment>, AppError>;
    async fn enroll(&self, token: &str, req: &NewEnrollmentRequest) -> Result<Enrollment, AppError>;
    async fn fetch_enrolled_courses(
        &self,
        token: &str,
        student_id: &str,
    ) -> Result<Vec<EnrolledCourse>, AppError>;
    async fn unenroll(&self, token: &str, student_id: &str, course_id: &str)
    -> Result<(), AppError>;
}

pub struct PortalHttpClient {
    client: Client,
    base_url: String,
}

impl PortalHttpClient {
    pub fn new(config: &PortalConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("portal responded {} for {}", status, response.url().path());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<dto::ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or_default();
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = self.send(request).await?;
        let body_text = response.text().await?;
        serde_json::from_str::<T>(&body_text).map_err(|e| {
            tracing::error!("Failed to parse portal response: {}", e);
            AppError::Json(e)
        })
    }
}

#[async_trait]
impl PortalApi for PortalHttpClient {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let request = self.client.post(self.url("/students/login")).json(req);
        self.send_json(request).await
    }

    async fn register(&self, req: &RegistrationRequest) -> Result<(), AppError> {
        let request = self.client.post(self.url("/students/register")).json(req);
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_student_details(&self, token: &str) -> Result<StudentDetails, AppError> {
        let request = self
            .client
            .get(self.url("/students/studentdetails"))
            .bearer_auth(token);
        self.send_json(request).await
    }

    async fn update_student(
        &self,
        token: &str,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<(), AppError> {
        let request = self
            .client
            .put(self.url(&format!("/students/update/{}", student_id)))
            .bearer_auth(token)
            .json(profile);
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        let request = self.client.get(self.url("/courses/"));
        self.send_json(request).await
    }

    async fn fetch_enrollments(
        &self,
        token: &str,
        student_id: &str,
    ) -> Result<Vec<Enrollment>, AppError> {
        let request = self
            .client
            .get(self.url(&format!("/enrollments/{}", student_id)))
            .bearer_auth(token);
        self.send_json(request).await
    }

    async fn enroll(&self, token: &str, req: &NewEnrollmentRequest) -> Result<Enrollment, AppError> {
        let request = self
            .client
            .post(self.url("/enrollments/"))
            .bearer_auth(token)
            .json(req);
        self.send_json(request).await
    }

    async fn fetch_enrolled_courses(
        &self,
        token: &str,
        student_id: &str,
    ) -> Result<Vec<EnrolledCourse>, AppError> {
        let request = self
            .client
            .get(self.url(&format!("/enrollments/enrolledCourses/{}", student_id)))
            .bearer_auth(token);
        self.send_json(request).await
    }

    async fn unenroll(
        &self,
        token: &str,
        student_id: &str,
        course_id: &str,
    ) -> Result<(), AppError> {
        let request = self
            .client
            .delete(self.url(&format!(
                "/enrollments/unroll/{}/{}",
                student_id, course_id
            )))
            .bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }
}
