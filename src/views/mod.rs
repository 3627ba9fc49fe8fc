//! Screen state for each page of the portal.
//!
//! A view owns its loading/error/success flags and talks to the API and the
//! shared [`SessionStore`](crate::session::SessionStore). Rendering is left to
//! the front-end.

pub mod catalog;
pub mod enrolled;
pub mod help;
pub mod login;
pub mod profile;
pub mod registration;

use std::time::{Duration, Instant};

pub use catalog::{CourseCatalogView, CourseRow, EnrollAction};
pub use enrolled::EnrolledCoursesView;
pub use help::HelpView;
pub use login::LoginView;
pub use profile::{ProfileStatus, ProfileView};
pub use registration::RegistrationView;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    shown_at: Instant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < NOTIFICATION_TTL
    }
}

/// Returns the notification only while it has not expired.
pub(crate) fn visible(notification: &Option<Notification>) -> Option<&Notification> {
    notification
        .as_ref()
        .filter(|n| n.is_visible_at(Instant::now()))
}
