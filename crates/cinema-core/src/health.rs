use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

/// Handler for `GET /healthz`: the process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness of a database-backed service: `503` until the database
/// answers a ping.
pub async fn database_ready(db: &DatabaseConnection) -> StatusCode {
    match db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
