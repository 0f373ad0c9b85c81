//! Supabase REST Client
//!
//! GoTrue (`/auth/v1`) for accounts and PostgREST (`/rest/v1`) for the
//! handshake table. Each `SupabaseBackend` holds the access token of at most
//! one signed-in user; the underlying HTTP client is shared.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Backend, BackendError, BackendProvider, HandshakeMessage, NewHandshake, User};

/// Connection settings for a Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://abcd.supabase.co")
    pub url: String,
    /// Public anon key, sent as `apikey` on every request
    pub anon_key: String,
    /// Table holding handshake rows
    pub table: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            table: "handshakes".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl SupabaseConfig {
    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base(), path)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base(), self.table)
    }
}

/// Hands out one `SupabaseBackend` per view, sharing the HTTP client
pub struct SupabaseProvider {
    client: Client,
    config: Arc<SupabaseConfig>,
}

impl SupabaseProvider {
    pub fn new(config: SupabaseConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl BackendProvider for SupabaseProvider {
    fn name(&self) -> &str {
        "supabase"
    }

    fn connect(&self) -> Arc<dyn Backend> {
        Arc::new(SupabaseBackend::new(
            self.client.clone(),
            Arc::clone(&self.config),
        ))
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.config.auth_url("health"))
            .header("apikey", &self.config.anon_key)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }
}

/// A single client-side Supabase session
pub struct SupabaseBackend {
    client: Client,
    config: Arc<SupabaseConfig>,
    access_token: RwLock<Option<String>>,
}

impl SupabaseBackend {
    pub fn new(client: Client, config: Arc<SupabaseConfig>) -> Self {
        Self {
            client,
            config,
            access_token: RwLock::new(None),
        }
    }

    /// Attach `apikey` and bearer headers; the anon key stands in when signed out
    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.config.anon_key.clone());

        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn password_auth(
        &self,
        url: String,
        email: &str,
        password: &str,
    ) -> Result<Response, BackendError> {
        let body = PasswordCredentials { email, password };

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn hold_token(&self, token: String) {
        *self.access_token.write().await = Some(token);
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn current_user(&self) -> Option<User> {
        if self.access_token.read().await.is_none() {
            return None;
        }

        let request = self.authorized(self.client.get(self.config.auth_url("user"))).await;

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Current user lookup failed: {}", e);
                return None;
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            // Expired or revoked
            self.access_token.write().await.take();
            return None;
        }

        if !response.status().is_success() {
            tracing::debug!("Current user lookup returned {}", response.status());
            return None;
        }

        response.json::<User>().await.ok()
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let response = self
            .password_auth(self.config.auth_url("signup"), email, password)
            .await?;

        let body: SignUpResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        match body {
            SignUpResponse::Session(session) => {
                self.hold_token(session.access_token).await;
                Ok(session.user)
            }
            // Email confirmation pending: account exists, no session yet
            SignUpResponse::User(user) => Ok(user),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let response = self
            .password_auth(
                self.config.auth_url("token?grant_type=password"),
                email,
                password,
            )
            .await?;

        let session: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        self.hold_token(session.access_token).await;
        Ok(session.user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let Some(token) = self.access_token.write().await.take() else {
            return Ok(());
        };

        let response = self
            .client
            .post(self.config.auth_url("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn insert_message(&self, owner_id: &str, text: &str) -> Result<(), BackendError> {
        let row = NewHandshake {
            user_id: owner_id,
            message: text,
        };

        let request = self
            .authorized(self.client.post(self.config.table_url()))
            .await
            .header("Prefer", "return=minimal")
            .json(&row);

        let response = request.send().await.map_err(BackendError::from_transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn query_messages(&self, owner_id: &str) -> Result<Vec<HandshakeMessage>, BackendError> {
        let owner_filter = format!("eq.{}", owner_id);

        let request = self
            .authorized(self.client.get(self.config.table_url()))
            .await
            .query(&[
                ("select", "*"),
                ("user_id", owner_filter.as_str()),
                ("order", "created_at.desc"),
            ]);

        let response = request.send().await.map_err(BackendError::from_transport)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(User),
}

/// Error bodies from GoTrue (`msg`, `error_description`) and PostgREST (`message`)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

async fn error_from_response(response: Response) -> BackendError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    BackendError::rejected(status.as_u16(), error_message(status, &text))
}

fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        })
}
