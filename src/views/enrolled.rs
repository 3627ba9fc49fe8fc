use std::sync::Arc;

use tracing::{info, warn};

use crate::models::EnrolledCourse;
use crate::session::{FETCH_DETAILS_FAILED, SessionStore};
use crate::views::{Notification, ViewState, visible};

pub const LOAD_FAILED: &str = "Failed to fetch enrolled courses";
pub const UNENROLL_SUCCEEDED: &str = "Successfully unrolled from the course";
pub const UNENROLL_FAILED: &str = "Failed to unroll from the course";
pub const NO_ENROLLMENTS: &str = "You haven't enrolled in any courses yet. Browse our course catalog to get started.";

pub struct EnrolledCoursesView {
    session: Arc<SessionStore>,
    courses: ViewState<Vec<EnrolledCourse>>,
    unenrolling_course_id: Option<String>,
    notification: Option<Notification>,
}

impl EnrolledCoursesView {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            courses: ViewState::Loading,
            unenrolling_course_id: None,
            notification: None,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<EnrolledCourse>> {
        &self.courses
    }

    pub fn notification(&self) -> Option<&Notification> {
        visible(&self.notification)
    }

    pub fn is_unenrolling(&self, course_id: &str) -> bool {
        self.unenrolling_course_id.as_deref() == Some(course_id)
    }

    pub async fn load(&mut self) {
        self.courses = ViewState::Loading;

        let Some(student) = self.session.fetch_student_details().await else {
            let msg = self
                .session
                .error()
                .await
                .unwrap_or_else(|| FETCH_DETAILS_FAILED.to_string());
            self.courses = ViewState::Failed(msg);
            return;
        };

        let result = match self.session.require_token() {
            Ok(token) => {
                self.session
                    .api()
                    .fetch_enrolled_courses(&token, &student.id)
                    .await
            }
            Err(e) => Err(e),
        };

        self.courses = match result {
            Ok(courses) => ViewState::Ready(courses),
            Err(e) => {
                warn!("fetching enrolled courses failed: {}", e);
                ViewState::Failed(LOAD_FAILED.to_string())
            }
        };
    }

    /// Drops the course from the list at once; it is put back in place if
    /// the portal refuses.
    pub async fn unenroll(&mut self, course_id: &str) {
        let Some(student_id) = self.session.student_id().await else {
            self.notification = Some(Notification::error(FETCH_DETAILS_FAILED));
            return;
        };
        if self.is_unenrolling(course_id) {
            return;
        }
        let Some(courses) = self.courses.ready_mut() else {
            return;
        };
        let Some(position) = courses.iter().position(|c| c.id == course_id) else {
            return;
        };

        let removed = courses.remove(position);
        self.unenrolling_course_id = Some(course_id.to_string());

        let result = match self.session.require_token() {
            Ok(token) => {
                self.session
                    .api()
                    .unenroll(&token, &student_id, course_id)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!("unenrolled from {}", course_id);
                self.notification = Some(Notification::success(UNENROLL_SUCCEEDED));
            }
            Err(e) => {
                if let Some(courses) = self.courses.ready_mut() {
                    let at = position.min(courses.len());
                    courses.insert(at, removed);
                }
                self.notification = Some(Notification::error(e.user_message(UNENROLL_FAILED)));
            }
        }
        self.unenrolling_course_id = None;
    }
}
