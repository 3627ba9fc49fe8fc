use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub student_id: String,
    pub course_id: String,
    #[serde(default)]
    pub enrollment_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnrollmentRequest {
    pub student_id: String,
    pub course_id: String,
}

/// A course as listed on the student's own page, with the date they joined it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enrollment_date: Option<String>,
}

impl EnrolledCourse {
    /// Local calendar date of the enrollment. Missing or unparseable dates
    /// show as today.
    pub fn enrolled_on(&self) -> NaiveDate {
        self.enrollment_date
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Local).date_naive())
            .unwrap_or_else(|| Local::now().date_naive())
    }
}
