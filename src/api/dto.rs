use serde::Deserialize;

/// Error body returned by the portal API on any non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
