use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl JwtClaims {
    /// Expiry check against `now` (unix seconds).
    ///
    /// A token without `exp` is valid only when `accept_missing_expiry` is set.
    pub fn is_valid_at(&self, now: i64, accept_missing_expiry: bool) -> bool {
        match self.exp {
            Some(exp) => exp > now,
            None => accept_missing_expiry,
        }
    }
}

/// Decode JWT claims without validation.
///
/// The signature is not checked here: the backend validates every request the
/// token is attached to. The claims only drive client-side session state.
pub fn decode_jwt_claims(token: &str) -> Result<JwtClaims> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(anyhow::anyhow!("Invalid JWT format"));
    }

    // Some issuers pad the payload segment.
    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| anyhow::anyhow!("Failed to decode JWT payload: {}", e))?;

    let claims: JwtClaims = serde_json::from_slice(&payload)
        .map_err(|e| anyhow::anyhow!("Failed to parse JWT claims: {}", e))?;

    Ok(claims)
}

#[cfg(test)]
pub(crate) fn unsigned_token(payload: &serde_json::Value) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}
