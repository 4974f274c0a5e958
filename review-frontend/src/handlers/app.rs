use crate::services::metrics::get_metrics;
use service_core::error::AppError;

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn metrics() -> Result<String, AppError> {
    get_metrics().map_err(AppError::InternalError)
}
