use std::sync::Arc;

use tracing::info;

use crate::models::LoginRequest;
use crate::router::{Navigation, Route};
use crate::session::SessionStore;
use crate::validation;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials and try again.";

pub struct LoginView {
    session: Arc<SessionStore>,
    pub email: String,
    pub password: String,
    error: Option<String>,
    is_loading: bool,
}

impl LoginView {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            email: String::new(),
            password: String::new(),
            error: None,
            is_loading: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Signs in and returns where to go next; `None` leaves the form on
    /// screen with an error.
    pub async fn submit(&mut self) -> Option<Navigation> {
        self.error = None;

        if let Err(msg) = validation::validate_login(&self.email, &self.password) {
            self.error = Some(msg);
            return None;
        }

        self.is_loading = true;
        let req = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let result = self.session.api().login(&req).await;
        self.is_loading = false;

        let outcome = match result {
            Ok(resp) => self.session.sign_in(&resp.token).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                info!("signed in as {}", req.email);
                self.password.clear();
                Some(Navigation::now(Route::Courses))
            }
            Err(e) => {
                self.error = Some(e.user_message(LOGIN_FAILED));
                None
            }
        }
    }
}
