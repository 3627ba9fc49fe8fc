use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::models::{Course, NewEnrollmentRequest};
use crate::session::SessionStore;
use crate::views::{Notification, ViewState, visible};

pub const LOGIN_REQUIRED: &str = "Please log in to enroll in courses.";
pub const ENROLL_SUCCEEDED: &str = "Successfully enrolled in the course!";
pub const ENROLL_FAILED: &str = "Failed to enroll in the course.";
pub const LOAD_FAILED: &str = "Failed to load courses";
pub const EMPTY_CATALOG: &str = "No courses are currently available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollAction {
    Available,
    Enrolling,
    Enrolled,
}

impl EnrollAction {
    pub fn is_disabled(self) -> bool {
        !matches!(self, EnrollAction::Available)
    }

    pub fn label(self) -> &'static str {
        match self {
            EnrollAction::Available => "Enroll Now",
            EnrollAction::Enrolling => "Enrolling...",
            EnrollAction::Enrolled => "Enrolled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow<'a> {
    pub course: &'a Course,
    pub action: EnrollAction,
}

pub struct CourseCatalogView {
    session: Arc<SessionStore>,
    courses: ViewState<Vec<Course>>,
    enrolled: HashSet<String>,
    enrolling_course_id: Option<String>,
    notification: Option<Notification>,
}

impl CourseCatalogView {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            courses: ViewState::Loading,
            enrolled: HashSet::new(),
            enrolling_course_id: None,
            notification: None,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Course>> {
        &self.courses
    }

    pub fn notification(&self) -> Option<&Notification> {
        visible(&self.notification)
    }

    /// `No courses are currently available.` once an empty catalog has loaded.
    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.courses {
            ViewState::Ready(courses) if courses.is_empty() => Some(EMPTY_CATALOG),
            _ => None,
        }
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled.contains(course_id)
    }

    pub fn action_for(&self, course_id: &str) -> EnrollAction {
        if self.enrolling_course_id.as_deref() == Some(course_id) {
            EnrollAction::Enrolling
        } else if self.enrolled.contains(course_id) {
            EnrollAction::Enrolled
        } else {
            EnrollAction::Available
        }
    }

    pub fn rows(&self) -> Vec<CourseRow<'_>> {
        self.courses
            .ready()
            .map(|courses| {
                courses
                    .iter()
                    .map(|course| CourseRow {
                        course,
                        action: self.action_for(&course.id),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fetches the catalog and, for a signed-in student, which courses they
    /// already take. The catalog is shown even when the student is unknown.
    pub async fn load(&mut self) {
        self.courses = ViewState::Loading;
        self.session.fetch_student_details().await;

        self.courses = match self.session.api().fetch_courses().await {
            Ok(courses) => ViewState::Ready(courses),
            Err(e) => ViewState::Failed(e.user_message(LOAD_FAILED)),
        };

        self.refresh_enrolled().await;
    }

    async fn refresh_enrolled(&mut self) {
        let Some(student_id) = self.session.student_id().await else {
            return;
        };
        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(e) => {
                warn!("cannot fetch enrollments: {}", e);
                return;
            }
        };

        match self
            .session
            .api()
            .fetch_enrollments(&token, &student_id)
            .await
        {
            Ok(enrollments) => {
                self.enrolled = enrollments.into_iter().map(|e| e.course_id).collect();
            }
            Err(e) => warn!("Error fetching enrolled courses: {}", e),
        }
    }

    /// Enrolls the signed-in student. The row flips to enrolled straight
    /// away and flips back if the portal refuses.
    pub async fn enroll(&mut self, course_id: &str) {
        let Some(student_id) = self.session.student_id().await else {
            self.notification = Some(Notification::error(LOGIN_REQUIRED));
            return;
        };
        if self.action_for(course_id).is_disabled() {
            return;
        }

        self.enrolling_course_id = Some(course_id.to_string());
        self.enrolled.insert(course_id.to_string());

        let req = NewEnrollmentRequest {
            student_id,
            course_id: course_id.to_string(),
        };
        let result = match self.session.require_token() {
            Ok(token) => self.session.api().enroll(&token, &req).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                self.notification = Some(Notification::success(ENROLL_SUCCEEDED));
                self.enrolling_course_id = None;
                self.refresh_enrolled().await;
                // a lagging enrollment list must not undo a confirmed enroll
                self.enrolled.insert(course_id.to_string());
            }
            Err(e) => {
                self.enrolled.remove(course_id);
                self.notification = Some(Notification::error(e.user_message(ENROLL_FAILED)));
            }
        }
        self.enrolling_course_id = None;
    }
}
