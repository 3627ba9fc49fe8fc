use std::sync::Arc;

use tracing::info;

use crate::models::{Student, StudentProfile};
use crate::session::SessionStore;
use crate::validation::{self, FieldErrors, ProfileField};
use crate::views::{Notification, visible};

pub const UPDATE_SUCCEEDED: &str = "Student details updated successfully!";
pub const UPDATE_FAILED: &str = "Error updating student details";
pub const NO_STUDENT_DATA: &str = "No student data available.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStatus {
    Loading,
    Failed(String),
    Empty,
    Ready(Student),
}

pub struct ProfileView {
    session: Arc<SessionStore>,
    is_editing: bool,
    draft: StudentProfile,
    errors: FieldErrors,
    update_error: Option<String>,
    update_success: Option<Notification>,
}

impl ProfileView {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            is_editing: false,
            draft: StudentProfile::default(),
            errors: FieldErrors::new(),
            update_error: None,
            update_success: None,
        }
    }

    pub async fn load(&mut self) {
        if let Some(student) = self.session.fetch_student_details().await {
            self.draft = student.profile();
        }
    }

    /// Same as [`load`](Self::load); offered after a failed fetch.
    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub async fn status(&self) -> ProfileStatus {
        let state = self.session.snapshot().await;
        if state.is_loading {
            ProfileStatus::Loading
        } else if let Some(err) = state.error {
            ProfileStatus::Failed(err)
        } else if let Some(student) = state.student {
            ProfileStatus::Ready(student)
        } else {
            ProfileStatus::Empty
        }
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn draft(&self) -> &StudentProfile {
        &self.draft
    }

    pub fn field_error(&self, field: ProfileField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn update_error(&self) -> Option<&str> {
        self.update_error.as_deref()
    }

    pub fn update_success(&self) -> Option<&Notification> {
        visible(&self.update_success)
    }

    pub async fn begin_edit(&mut self) {
        if let Some(student) = self.session.student().await {
            self.draft = student.profile();
        }
        self.errors.clear();
        self.is_editing = true;
    }

    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        field.set(&mut self.draft, value.into());
        self.errors.remove(&field);
    }

    pub fn cancel(&mut self) {
        self.is_editing = false;
        self.errors.clear();
    }

    /// Validates the draft and sends it. Returns whether the update went through.
    pub async fn save(&mut self) -> bool {
        self.errors = validation::validate_profile(&self.draft);
        if !self.errors.is_empty() {
            return false;
        }

        let Some(mut student) = self.session.student().await else {
            self.update_error = Some(UPDATE_FAILED.to_string());
            return false;
        };

        let result = match self.session.require_token() {
            Ok(token) => {
                self.session
                    .api()
                    .update_student(&token, &student.id, &self.draft)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!("updated profile of {}", student.id);
                student.apply(&self.draft);
                self.session.set_student(Some(student)).await;
                self.update_error = None;
                self.update_success = Some(Notification::success(UPDATE_SUCCEEDED));
                self.is_editing = false;
                true
            }
            Err(e) => {
                self.update_error = Some(e.user_message(UPDATE_FAILED));
                self.update_success = None;
                false
            }
        }
    }
}
