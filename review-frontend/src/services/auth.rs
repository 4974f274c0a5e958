use crate::error::ClientError;
use crate::models::Credentials;
use crate::services::auth_client::AccountApi;
use crate::services::navigation::Navigator;
use crate::utils::jwt::decode_jwt_claims;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use tokio::sync::watch;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/dashboard";

/// Access token of one client session.
///
/// Kept in a watch channel so the identity service can follow login and logout.
pub struct TokenStore {
    token: watch::Sender<Option<Secret<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            token: watch::channel(None).0,
        }
    }

    pub fn set(&self, token: String) {
        self.token.send_replace(Some(Secret::new(token)));
    }

    pub fn clear(&self) {
        self.token.send_replace(None);
    }

    pub fn access_token(&self) -> Option<String> {
        self.token
            .borrow()
            .as_ref()
            .map(|token| token.expose_secret().clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Secret<String>>> {
        self.token.subscribe()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AuthService {
    tokens: Arc<TokenStore>,
    accounts: Arc<dyn AccountApi>,
    navigator: Arc<dyn Navigator>,
    accept_tokens_without_expiry: bool,
}

impl AuthService {
    pub fn new(
        tokens: Arc<TokenStore>,
        accounts: Arc<dyn AccountApi>,
        navigator: Arc<dyn Navigator>,
        accept_tokens_without_expiry: bool,
    ) -> Self {
        Self {
            tokens,
            accounts,
            navigator,
            accept_tokens_without_expiry,
        }
    }

    /// Exchange credentials for an access token and go to the dashboard.
    ///
    /// A token whose claims cannot be read is refused and nothing is stored.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let response = self.accounts.login(credentials).await?;

        let claims = decode_jwt_claims(&response.access_token).map_err(|e| {
            tracing::error!(error = %e, "Login returned an unreadable access token");
            ClientError::InvalidResponse(format!("access token: {}", e))
        })?;

        tracing::info!(user_id = %claims.sub, "User logged in");

        self.tokens.set(response.access_token);
        self.navigator.navigate_to(HOME_ROUTE);
        Ok(())
    }

    pub fn logout(&self) {
        self.tokens.clear();
        self.navigator.navigate_to(LOGIN_ROUTE);
        tracing::info!("User logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(chrono::Utc::now().timestamp())
    }

    pub fn is_authenticated_at(&self, now: i64) -> bool {
        let Some(token) = self.tokens.access_token() else {
            return false;
        };

        match decode_jwt_claims(&token) {
            Ok(claims) => claims.is_valid_at(now, self.accept_tokens_without_expiry),
            Err(e) => {
                tracing::warn!(error = %e, "Stored access token is not decodable");
                false
            }
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }
}
