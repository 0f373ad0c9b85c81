//! In-Memory Backend
//!
//! Process-local stand-in for the hosted service: accounts with passwords
//! and a handshake table with server-assigned ids and timestamps. All views
//! connected to the same `MemoryStore` see the same accounts and rows.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Backend, BackendError, BackendProvider, HandshakeMessage, MessageId, User};

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user: User,
    password: String,
}

/// Shared accounts and handshake rows
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<String, Account>>,
    messages: RwLock<Vec<HandshakeMessage>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Total number of stored handshakes across all users
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl BackendProvider for Arc<MemoryStore> {
    fn name(&self) -> &str {
        "memory"
    }

    fn connect(&self) -> Arc<dyn Backend> {
        Arc::new(MemoryBackend::new(Arc::clone(self)))
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// One client session against a `MemoryStore`
pub struct MemoryBackend {
    store: Arc<MemoryStore>,
    current: RwLock<Option<User>>,
}

impl MemoryBackend {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    async fn require_owner(&self, owner_id: &str) -> Result<(), BackendError> {
        match self.current.read().await.as_ref() {
            Some(user) if user.id == owner_id => Ok(()),
            Some(_) => Err(BackendError::rejected(
                403,
                "new row violates row-level security policy",
            )),
            None => Err(BackendError::rejected(401, "Not authenticated")),
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let email = email.trim().to_lowercase();

        if email.is_empty() || !email.contains('@') {
            return Err(BackendError::rejected(400, "Unable to validate email address: invalid format"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(BackendError::rejected(
                422,
                format!("Password should be at least {} characters.", MIN_PASSWORD_LEN),
            ));
        }

        let mut accounts = self.store.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(BackendError::rejected(422, "User already registered"));
        }

        let user = User::new(uuid::Uuid::new_v4().to_string(), email.clone());
        accounts.insert(
            email,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        drop(accounts);

        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let email = email.trim().to_lowercase();

        let user = {
            let accounts = self.store.accounts.read().await;
            match accounts.get(&email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(BackendError::rejected(400, "Invalid login credentials")),
            }
        };

        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.current.write().await.take();
        Ok(())
    }

    async fn insert_message(&self, owner_id: &str, text: &str) -> Result<(), BackendError> {
        self.require_owner(owner_id).await?;

        if text.is_empty() {
            return Err(BackendError::rejected(
                400,
                "null value in column \"message\" violates not-null constraint",
            ));
        }

        let id = self.store.next_id.fetch_add(1, Ordering::SeqCst) + 1;

        self.store.messages.write().await.push(HandshakeMessage {
            id: MessageId::Number(id),
            user_id: owner_id.to_string(),
            message: text.to_string(),
            created_at: Utc::now(),
        });

        Ok(())
    }

    async fn query_messages(&self, owner_id: &str) -> Result<Vec<HandshakeMessage>, BackendError> {
        self.require_owner(owner_id).await?;

        let mut rows: Vec<HandshakeMessage> = self
            .store
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.user_id == owner_id)
            .cloned()
            .collect();

        // Later inserts win ties on equal timestamps
        rows.reverse();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(rows)
    }
}
