pub mod api_client;
pub mod auth;
pub mod auth_client;
pub mod document_client;
pub mod error_reporter;
pub mod identity;
pub mod metrics;
pub mod navigation;

pub use api_client::BackendClient;
pub use auth::{AuthService, TokenStore};
pub use auth_client::AccountApi;
pub use document_client::DocumentApi;
pub use error_reporter::{ErrorReporter, Notification, NotificationCenter};
pub use identity::{IdentityState, UserService};
pub use navigation::{Navigator, SessionNavigator};
