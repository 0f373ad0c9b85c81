//! Backend Collaborator
//!
//! The hosted authentication + record store the page talks to. Only the
//! client side lives here; the service itself is external.
//!
//! ## Architecture
//!
//! - **Backend**: one connection, holding at most one signed-in credential
//! - **BackendProvider**: hands out a fresh connection per browser view
//! - **SupabaseBackend**: GoTrue + PostgREST over HTTP
//! - **MemoryBackend**: in-process store with the same contract

mod memory;
mod models;
mod supabase;

pub use memory::{MemoryBackend, MemoryStore};
pub use models::{HandshakeMessage, MessageId, NewHandshake, User};
pub use supabase::{SupabaseBackend, SupabaseConfig, SupabaseProvider};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Auth and data operations consumed by the page
#[async_trait]
pub trait Backend: Send + Sync {
    /// User for the credential currently held, if any
    async fn current_user(&self) -> Option<User>;

    /// Register a new account and hold its credential
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, BackendError>;

    /// Sign in with email + password and hold the credential
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError>;

    /// Revoke the held credential. The local credential is dropped even on error.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Store a handshake owned by `owner_id`
    async fn insert_message(&self, owner_id: &str, text: &str) -> Result<(), BackendError>;

    /// All handshakes owned by `owner_id`, newest first
    async fn query_messages(&self, owner_id: &str) -> Result<Vec<HandshakeMessage>, BackendError>;
}

/// Creates one backend connection per browser view
#[async_trait]
pub trait BackendProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    fn connect(&self) -> Arc<dyn Backend>;

    /// Check the service is reachable
    async fn health_check(&self) -> Result<(), BackendError>;
}

/// Errors returned by backend calls
#[derive(Error, Debug)]
pub enum BackendError {
    /// The service answered but refused the operation
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Backend unavailable")]
    Unavailable,

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        BackendError::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Text shown to the user in a notice
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if e.is_connect() {
            BackendError::Unavailable
        } else {
            BackendError::Request(e)
        }
    }
}
