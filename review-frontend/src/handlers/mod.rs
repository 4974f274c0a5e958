pub mod app;
pub mod auth;
pub mod dashboard;
pub mod dialogs;
pub mod documents;
pub mod session;
