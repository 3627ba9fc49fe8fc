use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::api::PortalApi;
use crate::models::RegistrationRequest;
use crate::router::{Navigation, Route};
use crate::validation;

pub const REGISTRATION_FAILED: &str = "An error occurred. Please try again.";
pub const REGISTRATION_SUCCEEDED: &str = "Registration successful! Redirecting to login page...";
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub struct RegistrationView {
    api: Arc<dyn PortalApi>,
    pub form: RegistrationRequest,
    error: Option<String>,
    success_message: Option<String>,
    is_loading: bool,
}

impl RegistrationView {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            form: RegistrationRequest::default(),
            error: None,
            success_message: None,
            is_loading: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Validates the form and registers the student. Invalid input never
    /// reaches the API.
    pub async fn submit(&mut self) -> Option<Navigation> {
        self.error = None;
        self.success_message = None;

        if let Err(msg) = validation::validate_registration(&self.form) {
            self.error = Some(msg);
            return None;
        }

        self.is_loading = true;
        let result = self.api.register(&self.form).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                info!("registered {}", self.form.email);
                self.success_message = Some(REGISTRATION_SUCCEEDED.to_string());
                Some(Navigation::after(Route::Login, REDIRECT_DELAY))
            }
            Err(e) => {
                self.error = Some(e.user_message(REGISTRATION_FAILED));
                None
            }
        }
    }
}
