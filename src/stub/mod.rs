//! Local stand-in for the portal API, used for development and by the
//! integration tests.

pub mod repository;
pub mod routes;
pub mod security;

use std::net::SocketAddr;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::AppError;

pub use routes::router;

#[derive(Clone)]
pub struct StubState {
    pub db: SqlitePool,
}

pub const SEED_COURSES: [(&str, &str); 4] = [
    (
        "Introduction to Programming",
        "Variables, control flow and functions using a modern language.",
    ),
    (
        "Data Structures",
        "Lists, trees, hash tables and the trade-offs between them.",
    ),
    (
        "Database Systems",
        "Relational modelling, SQL and transactions.",
    ),
    (
        "Web Development",
        "Building and deploying client-server applications.",
    ),
];

/// Opens the database, applies migrations and seeds the course catalog
/// when it is empty.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = pool_options(database_url).connect_with(options).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(sqlx::Error::from)?;

    seed_courses(&pool).await?;
    Ok(pool)
}

/// Every connection to `sqlite::memory:` opens its own empty database, so an
/// in-memory pool holds exactly one connection and never lets it close.
pub fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

pub async fn seed_courses(db: &SqlitePool) -> Result<(), AppError> {
    if repository::count_courses(db).await? > 0 {
        return Ok(());
    }
    for (name, description) in SEED_COURSES {
        repository::insert_course(db, name, description).await?;
    }
    info!("seeded {} courses", SEED_COURSES.len());
    Ok(())
}

/// Binds `addr` and serves the stub in the background. Port 0 picks a free
/// port; the bound address is returned.
pub async fn spawn(
    addr: SocketAddr,
    database_url: &str,
) -> Result<(SocketAddr, JoinHandle<()>), AppError> {
    let db = connect(database_url).await?;
    serve(addr, db).await
}

/// Serves the stub over an already opened database.
pub async fn serve(
    addr: SocketAddr,
    db: SqlitePool,
) -> Result<(SocketAddr, JoinHandle<()>), AppError> {
    let app = router(StubState { db });

    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!("portal stub listening on http://{}", local_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("portal stub stopped: {}", e);
        }
    });

    Ok((local_addr, handle))
}
