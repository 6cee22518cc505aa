//! E-mail/password authentication
//!
//! [`IdentityToolkitAuth`] speaks the hosted Identity Toolkit REST API.
//! [`AuthService`] pairs a provider with the [`SessionContext`] so a
//! successful sign-in is persisted and sign-out clears it.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{FurMedsError, FurMedsResult};
use crate::session::{Session, SessionContext};
use crate::types::EmailAddress;

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session>;

    async fn sign_up(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session>;

    /// Send a password reset e-mail
    async fn reset_password(&self, email: &EmailAddress) -> FurMedsResult<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
    refresh_token: Option<String>,
    /// Seconds, as a decimal string
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &EmailAddress) -> Session {
        let expires_at = self
            .expires_in
            .and_then(|s| s.parse::<i64>().ok())
            .map(|secs| Utc::now().timestamp() + secs);

        Session {
            user_uid: self.local_id,
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

/// Map an error response body to the provider's message
/// (`EMAIL_NOT_FOUND`, `INVALID_PASSWORD`, ...).
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Identity Toolkit client
#[derive(Clone)]
pub struct IdentityToolkitAuth {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl IdentityToolkitAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(IDENTITY_TOOLKIT_URL, api_key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/accounts:{}", self.endpoint, method)
    }

    async fn post<B: Serialize + Sync>(&self, method: &str, body: &B) -> FurMedsResult<String> {
        let response = self
            .http
            .post(self.url(method))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, method, "Identity provider unreachable");
                FurMedsError::Auth(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FurMedsError::Auth(e.to_string()))?;

        if !status.is_success() {
            let message = provider_message(&text);
            error!(status = %status, method, message = %message, "Identity provider rejected request");
            return Err(FurMedsError::Auth(message));
        }
        Ok(text)
    }

    async fn password_call(
        &self,
        method: &str,
        email: &EmailAddress,
        password: &str,
    ) -> FurMedsResult<Session> {
        let body = PasswordRequest {
            email: email.as_str(),
            password,
            return_secure_token: true,
        };
        let text = self.post(method, &body).await?;
        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| FurMedsError::Auth(format!("invalid response: {e}")))?;
        Ok(token.into_session(email))
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitAuth {
    async fn sign_in(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session> {
        self.password_call("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session> {
        self.password_call("signUp", email, password).await
    }

    async fn reset_password(&self, email: &EmailAddress) -> FurMedsResult<()> {
        let body = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email: email.as_str(),
        };
        self.post("sendOobCode", &body).await.map(drop)
    }
}

/// Authentication bound to the session context
pub struct AuthService<P> {
    provider: P,
    session: SessionContext,
}

impl<P: AuthProvider> AuthService<P> {
    pub fn new(provider: P, session: SessionContext) -> Self {
        Self { provider, session }
    }

    pub async fn sign_in(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session> {
        let session = self.provider.sign_in(email, password).await?;
        self.session.set_session(session.clone())?;
        info!(user_uid = %session.user_uid, "Signed in");
        Ok(session)
    }

    /// Register and sign in the new account
    pub async fn sign_up(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session> {
        let session = self.provider.sign_up(email, password).await?;
        self.session.set_session(session.clone())?;
        info!(user_uid = %session.user_uid, "Registered new account");
        Ok(session)
    }

    pub async fn reset_password(&self, email: &EmailAddress) -> FurMedsResult<()> {
        self.provider.reset_password(email).await
    }

    pub fn sign_out(&self) -> FurMedsResult<()> {
        self.session.clear_session()?;
        info!("Signed out");
        Ok(())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProvider;

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn sign_in(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session> {
            if password != "hunter2" {
                return Err(FurMedsError::Auth("INVALID_PASSWORD".to_string()));
            }
            Ok(Session {
                user_uid: "u1".to_string(),
                email: email.to_string(),
                id_token: "token".to_string(),
                refresh_token: None,
                expires_at: None,
            })
        }

        async fn sign_up(&self, email: &EmailAddress, password: &str) -> FurMedsResult<Session> {
            self.sign_in(email, password).await
        }

        async fn reset_password(&self, _email: &EmailAddress) -> FurMedsResult<()> {
            Ok(())
        }
    }

    fn email() -> EmailAddress {
        EmailAddress::parse("owner@example.com").unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_stores_session() {
        let ctx = SessionContext::ephemeral();
        let auth = AuthService::new(FakeProvider, ctx.clone());

        auth.sign_in(&email(), "hunter2").await.unwrap();

        assert_eq!(ctx.access_token().as_deref(), Some("token"));
        assert_eq!(auth.current_session().unwrap().email, "owner@example.com");
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_signed_out() {
        let ctx = SessionContext::ephemeral();
        let auth = AuthService::new(FakeProvider, ctx.clone());

        let result = auth.sign_in(&email(), "wrong").await;

        assert!(matches!(result, Err(FurMedsError::Auth(m)) if m == "INVALID_PASSWORD"));
        assert!(!ctx.is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let ctx = SessionContext::ephemeral();
        let auth = AuthService::new(FakeProvider, ctx.clone());
        auth.sign_in(&email(), "hunter2").await.unwrap();

        auth.sign_out().unwrap();

        assert!(auth.current_session().is_none());
    }

    #[test]
    fn test_provider_message_extraction() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND","errors":[]}}"#;
        assert_eq!(provider_message(body), "EMAIL_NOT_FOUND");
        assert_eq!(provider_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_token_response_to_session() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"localId":"abc","idToken":"t","refreshToken":"r","expiresIn":"3600"}"#,
        )
        .unwrap();
        let before = Utc::now().timestamp();
        let session = token.into_session(&email());

        assert_eq!(session.user_uid, "abc");
        assert_eq!(session.email, "owner@example.com");
        assert!(session.expires_at.unwrap() >= before + 3600);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_auth_error() {
        let auth = IdentityToolkitAuth::with_endpoint("http://127.0.0.1:9/v1", "key");
        let result = auth.reset_password(&email()).await;
        assert!(matches!(result, Err(FurMedsError::Auth(_))));
    }
}
