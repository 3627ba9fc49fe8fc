//! Shared holder of the signed-in student.
//!
//! Every view keeps an `Arc<SessionStore>`; whichever view loads the student
//! first fills it in for the rest.

pub mod token;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::api::PortalApi;
use crate::error::AppError;
use crate::models::Student;

pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

pub const FETCH_DETAILS_FAILED: &str = "Failed to fetch student details";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub student: Option<Student>,
    pub error: Option<String>,
    pub is_loading: bool,
}

pub struct SessionStore {
    api: Arc<dyn PortalApi>,
    tokens: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
    // held for the whole of a details fetch
    fetching: Mutex<()>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn PortalApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            state: RwLock::new(SessionState::default()),
            fetching: Mutex::new(()),
        }
    }

    pub fn api(&self) -> Arc<dyn PortalApi> {
        self.api.clone()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn student(&self) -> Option<Student> {
        self.state.read().await.student.clone()
    }

    pub async fn student_id(&self) -> Option<String> {
        self.state.read().await.student.as_ref().map(|s| s.id.clone())
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn set_student(&self, student: Option<Student>) {
        self.state.write().await.student = student;
    }

    pub fn token(&self) -> Result<Option<String>, AppError> {
        self.tokens.load()
    }

    /// Token for an authenticated call, or `Unauthenticated` when signed out.
    pub fn require_token(&self) -> Result<String, AppError> {
        self.tokens.load()?.ok_or(AppError::Unauthenticated)
    }

    /// Loads the student behind the stored token. Does nothing when a
    /// student is already held; concurrent callers wait for the fetch in
    /// flight and share its student.
    pub async fn fetch_student_details(&self) -> Option<Student> {
        let _fetching = self.fetching.lock().await;
        {
            let mut state = self.state.write().await;
            if let Some(student) = &state.student {
                return Some(student.clone());
            }
            state.error = None;
            state.is_loading = true;
        }

        let result = match self.tokens.load() {
            Ok(Some(token)) => self.api.fetch_student_details(&token).await,
            Ok(None) => Err(AppError::Unauthenticated),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(details) => {
                info!("loaded student {}", details.student.id);
                state.student = Some(details.student.clone());
                Some(details.student)
            }
            Err(e) => {
                warn!("fetching student details failed: {}", e);
                state.error = Some(FETCH_DETAILS_FAILED.to_string());
                None
            }
        }
    }

    pub async fn sign_in(&self, token: &str) -> Result<(), AppError> {
        self.tokens.save(token)?;
        let mut state = self.state.write().await;
        state.student = None;
        state.error = None;
        Ok(())
    }

    /// Logout: forget the token and the held student.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        self.tokens.clear()?;
        *self.state.write().await = SessionState::default();
        info!("signed out");
        Ok(())
    }
}
