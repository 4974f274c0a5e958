use crate::error::ClientError;
use crate::models::{Credentials, LoginResponse, User};
use crate::services::api_client::BackendClient;
use async_trait::async_trait;

/// Login and profile endpoints.
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError>;

    /// Profile of the user the current token belongs to.
    async fn current_user(&self) -> Result<User, ClientError>;
}

#[async_trait]
impl AccountApi for BackendClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let path = "/auth/login";
        self.send_json(self.post(path).json(credentials), path).await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        let path = "/user";
        self.send_json(self.get(path), path).await
    }
}
