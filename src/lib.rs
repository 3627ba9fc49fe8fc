pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod router;
pub mod session;
pub mod stub;
pub mod validation;
pub mod views;

pub use error::AppError;

/// Installs the `tracing` subscriber used by both binaries. `RUST_LOG`
/// overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
