//! Form and response types for the HTTP surface

use serde::{Deserialize, Serialize};

use crate::session::Credentials;

/// Credential form (`POST /auth`, `POST /auth/mode`)
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<CredentialsForm> for Credentials {
    fn from(form: CredentialsForm) -> Self {
        Credentials::new(form.email, form.password)
    }
}

/// Composer form (`POST /handshakes`)
#[derive(Debug, Default, Deserialize)]
pub struct HandshakeForm {
    #[serde(default)]
    pub message: String,
}

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or degraded
    pub status: String,
    /// Which backend is configured
    pub backend: String,
    /// Backend status: ok or error
    pub backend_status: String,
    /// Live browser views
    pub views: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
