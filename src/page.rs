//! Home Page Controller
//!
//! Everything one browser view knows: its backend connection, session,
//! feed and pending notices. Event handlers take `&mut self`, so a view
//! processes one event at a time.

use std::sync::Arc;

use crate::backend::Backend;
use crate::feed::{CreateOutcome, MessageFeed};
use crate::notice::Notices;
use crate::session::{Credentials, Session};
use crate::ui::PageModel;

pub struct HomePage {
    backend: Arc<dyn Backend>,
    session: Session,
    feed: MessageFeed,
    notices: Notices,
}

impl HomePage {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            session: Session::new(),
            feed: MessageFeed::new(),
            notices: Notices::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn feed(&self) -> &MessageFeed {
        &self.feed
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Resolve the initial session state; loads the feed if signed in
    pub async fn initialize(&mut self) {
        if self.session.initialize(self.backend.as_ref()).await {
            self.on_authenticated().await;
        }
    }

    /// Credential form submitted
    pub async fn submit_auth(&mut self, credentials: Credentials) {
        if self.session.state().is_authenticated() {
            tracing::debug!("Ignoring credential form while signed in");
            return;
        }

        self.session.set_credentials(credentials);
        if self
            .session
            .submit(self.backend.as_ref(), &mut self.notices)
            .await
        {
            self.on_authenticated().await;
        }
    }

    /// Login/Sign Up switch clicked; keeps what was typed so far
    pub fn toggle_mode(&mut self, credentials: Credentials) {
        self.session.set_credentials(credentials);
        self.session.toggle_mode();
    }

    /// Composer submitted
    pub async fn send_handshake(&mut self, text: String) -> Option<CreateOutcome> {
        let Some(user_id) = self.session.user().map(|u| u.id.clone()) else {
            tracing::debug!("Ignoring handshake from anonymous view");
            return None;
        };

        self.feed.set_draft(text.clone());
        let outcome = self
            .feed
            .create(self.backend.as_ref(), &user_id, &text, &mut self.notices)
            .await;

        Some(outcome)
    }

    pub async fn log_out(&mut self) {
        self.session.sign_out(self.backend.as_ref()).await;
        self.feed.clear();
    }

    /// Snapshot for rendering; pending notices move into the snapshot
    pub fn take_model(&mut self, timestamp_format: &str) -> PageModel {
        let credentials = self.session.credentials();

        PageModel {
            session: self.session.state().clone(),
            mode: self.session.mode(),
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            draft: self.feed.draft().to_string(),
            feed: self.feed.items().to_vec(),
            notices: self.notices.take(),
            timestamp_format: timestamp_format.to_string(),
        }
    }

    async fn on_authenticated(&mut self) {
        let Some(user_id) = self.session.user().map(|u| u.id.clone()) else {
            return;
        };
        self.feed.refresh(self.backend.as_ref(), &user_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendError, BackendProvider, HandshakeMessage, MemoryStore, MessageId, User,
    };
    use crate::session::{AuthMode, SessionState};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Memory backend with call counters and switchable failures
    struct ScriptedBackend {
        inner: Arc<dyn Backend>,
        queries: AtomicUsize,
        inserts: AtomicUsize,
        fail_inserts: AtomicBool,
        fail_sign_out: AtomicBool,
        canned_rows: Option<Vec<HandshakeMessage>>,
    }

    impl ScriptedBackend {
        fn new() -> Arc<Self> {
            Self::with_rows(None)
        }

        fn with_rows(canned_rows: Option<Vec<HandshakeMessage>>) -> Arc<Self> {
            Arc::new(Self {
                inner: MemoryStore::new().connect(),
                queries: AtomicUsize::new(0),
                inserts: AtomicUsize::new(0),
                fail_inserts: AtomicBool::new(false),
                fail_sign_out: AtomicBool::new(false),
                canned_rows,
            })
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        async fn current_user(&self) -> Option<User> {
            self.inner.current_user().await
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<User, BackendError> {
            self.inner.sign_up(email, password).await
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError> {
            self.inner.sign_in(email, password).await
        }

        async fn sign_out(&self) -> Result<(), BackendError> {
            let result = self.inner.sign_out().await;
            if self.fail_sign_out.load(Ordering::SeqCst) {
                return Err(BackendError::Unavailable);
            }
            result
        }

        async fn insert_message(&self, owner_id: &str, text: &str) -> Result<(), BackendError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(BackendError::rejected(500, "insert refused"));
            }
            self.inner.insert_message(owner_id, text).await
        }

        async fn query_messages(
            &self,
            owner_id: &str,
        ) -> Result<Vec<HandshakeMessage>, BackendError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            match &self.canned_rows {
                Some(rows) => Ok(rows.clone()),
                None => self.inner.query_messages(owner_id).await,
            }
        }
    }

    async fn signed_in_page(backend: Arc<ScriptedBackend>) -> HomePage {
        let mut page = HomePage::new(backend);
        page.toggle_mode(Credentials::new("ada@example.com", "secret123"));
        page.submit_auth(Credentials::new("ada@example.com", "secret123"))
            .await;
        page.notices.take();
        page
    }

    #[tokio::test]
    async fn test_sign_up_authenticates_and_refreshes_once() {
        let backend = ScriptedBackend::new();
        let mut page = HomePage::new(backend.clone());
        page.initialize().await;
        assert_eq!(page.session().state(), &SessionState::Anonymous);
        assert_eq!(backend.queries.load(Ordering::SeqCst), 0);

        page.toggle_mode(Credentials::default());
        assert_eq!(page.session().mode(), AuthMode::SignUp);
        page.submit_auth(Credentials::new("ada@example.com", "secret123"))
            .await;

        assert!(page.session().state().is_authenticated());
        assert_eq!(backend.queries.load(Ordering::SeqCst), 1);
        assert_eq!(page.notices().pending()[0].text, "Signed up as ada@example.com");
    }

    #[tokio::test]
    async fn test_initialize_with_live_credential_loads_feed() {
        let backend = ScriptedBackend::new();
        let user = backend.sign_up("ada@example.com", "secret123").await.unwrap();
        backend.insert_message(&user.id, "earlier").await.unwrap();

        let mut page = HomePage::new(backend.clone());
        page.initialize().await;

        assert_eq!(page.session().user(), Some(&user));
        assert_eq!(page.feed().items().len(), 1);
        assert_eq!(backend.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_handshake_sends_nothing() {
        let backend = ScriptedBackend::new();
        let mut page = signed_in_page(backend.clone()).await;
        let queries_before = backend.queries.load(Ordering::SeqCst);

        let outcome = page.send_handshake(String::new()).await;

        assert_eq!(outcome, Some(CreateOutcome::Empty));
        assert_eq!(backend.inserts.load(Ordering::SeqCst), 0);
        assert_eq!(backend.queries.load(Ordering::SeqCst), queries_before);
        assert!(page.feed().items().is_empty());
        assert_eq!(page.notices().pending()[0].text, "Enter a handshake message.");
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_draft_and_skips_refresh() {
        let backend = ScriptedBackend::new();
        let mut page = signed_in_page(backend.clone()).await;
        let queries_before = backend.queries.load(Ordering::SeqCst);
        backend.fail_inserts.store(true, Ordering::SeqCst);

        let outcome = page.send_handshake("deal?".to_string()).await;

        assert_eq!(outcome, Some(CreateOutcome::Failed));
        assert_eq!(page.feed().draft(), "deal?");
        assert_eq!(backend.queries.load(Ordering::SeqCst), queries_before);
        assert_eq!(page.notices().pending()[0].text, "insert refused");
    }

    #[tokio::test]
    async fn test_successful_insert_clears_draft_and_refreshes() {
        let backend = ScriptedBackend::new();
        let mut page = signed_in_page(backend.clone()).await;
        let queries_before = backend.queries.load(Ordering::SeqCst);

        let outcome = page.send_handshake("deal".to_string()).await;

        assert_eq!(outcome, Some(CreateOutcome::Created));
        assert_eq!(page.feed().draft(), "");
        assert_eq!(backend.queries.load(Ordering::SeqCst), queries_before + 1);
        assert_eq!(page.feed().items()[0].message, "deal");
    }

    #[tokio::test]
    async fn test_feed_is_newest_first_and_owner_only() {
        let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
        let row = |id, owner: &str, secs| HandshakeMessage {
            id: MessageId::Number(id),
            user_id: owner.to_string(),
            message: format!("m{}", id),
            created_at: at(secs),
        };

        // Backend answers out of order and leaks a foreign row
        let rows = vec![row(1, "me", 100), row(3, "me", 300), row(9, "other", 999), row(2, "me", 200)];
        let backend = ScriptedBackend::with_rows(Some(rows));
        let user = backend.sign_up("ada@example.com", "secret123").await.unwrap();
        let mut feed = MessageFeed::new();

        // Rows are keyed to "me", not the generated id
        assert!(feed.refresh(&*backend, "me").await);
        let ids: Vec<String> = feed.items().iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);

        assert!(feed.refresh(&*backend, &user.id).await);
        assert!(feed.items().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_is_unconditional() {
        let backend = ScriptedBackend::new();
        let mut page = signed_in_page(backend.clone()).await;
        page.send_handshake("bye".to_string()).await;
        backend.fail_sign_out.store(true, Ordering::SeqCst);

        page.log_out().await;

        assert_eq!(page.session().state(), &SessionState::Anonymous);
        assert!(page.session().credentials().is_empty());
        assert!(page.feed().items().is_empty());
    }

    #[tokio::test]
    async fn test_handshake_from_anonymous_view_ignored() {
        let backend = ScriptedBackend::new();
        let mut page = HomePage::new(backend.clone());

        assert_eq!(page.send_handshake("hi".to_string()).await, None);
        assert_eq!(backend.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_take_model_drains_notices() {
        let backend = ScriptedBackend::new();
        let mut page = HomePage::new(backend);
        page.submit_auth(Credentials::new("ghost@example.com", "nope123"))
            .await;

        let model = page.take_model("%Y");
        assert_eq!(model.notices.len(), 1);
        assert_eq!(model.email, "ghost@example.com");
        assert!(page.take_model("%Y").notices.is_empty());
    }
}
