pub mod auth;
pub mod metrics;
pub mod role_guard;
