//! Session State
//!
//! Which user, if any, this view is signed in as, plus the credential form
//! that gets it there.
//!
//! ```text
//!   Anonymous ──sign in / sign up ok──▶ Authenticated(user)
//!       ▲                                      │
//!       └──────────── sign out (always) ───────┘
//! ```

use std::fmt;

use crate::backend::{Backend, User};
use crate::notice::Notices;

/// Two-state session machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Which backend operation the credential form submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
        }
    }

    /// Form heading and submit label
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::SignUp => "Sign Up",
        }
    }

    /// Helper text next to the mode switch
    pub fn prompt(self) -> &'static str {
        match self {
            AuthMode::Login => "Don't have an account?",
            AuthMode::SignUp => "Already have an account?",
        }
    }

    /// Label of the control that switches to the other mode
    pub fn switch_label(self) -> &'static str {
        self.toggled().title()
    }

    pub fn slug(self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::SignUp => "signup",
        }
    }

    fn completed(self) -> &'static str {
        match self {
            AuthMode::Login => "Logged in",
            AuthMode::SignUp => "Signed up",
        }
    }
}

/// Contents of the credential form
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session holder for one view
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    mode: AuthMode,
    credentials: Credentials,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    /// Flip Login/Sign Up; entered credentials are kept
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Adopt whatever user the backend already holds a credential for.
    ///
    /// Returns `true` if the session is now authenticated.
    pub async fn initialize(&mut self, backend: &dyn Backend) -> bool {
        match backend.current_user().await {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.state = SessionState::Authenticated(user);
                true
            }
            None => {
                tracing::debug!("No active session");
                self.state = SessionState::Anonymous;
                false
            }
        }
    }

    /// Sign in or sign up depending on `mode`.
    ///
    /// On failure the backend's message is queued as a notice and the state
    /// is left alone. Returns `true` if the session became authenticated.
    pub async fn sign_in_or_sign_up(
        &mut self,
        backend: &dyn Backend,
        email: &str,
        password: &str,
        mode: AuthMode,
        notices: &mut Notices,
    ) -> bool {
        let result = match mode {
            AuthMode::Login => backend.sign_in(email, password).await,
            AuthMode::SignUp => backend.sign_up(email, password).await,
        };

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, mode = mode.slug(), "Authenticated");
                self.state = SessionState::Authenticated(user);
                notices.info(format!("{} as {}", mode.completed(), email));
                true
            }
            Err(e) => {
                tracing::warn!(mode = mode.slug(), "Authentication failed: {}", e);
                notices.error(e.user_message());
                false
            }
        }
    }

    /// Submit the stored credentials in the current mode
    pub async fn submit(&mut self, backend: &dyn Backend, notices: &mut Notices) -> bool {
        let Credentials { email, password } = self.credentials.clone();
        let mode = self.mode;
        self.sign_in_or_sign_up(backend, &email, &password, mode, notices)
            .await
    }

    /// Sign out. The session ends up anonymous with an empty form no matter
    /// what the backend answers.
    pub async fn sign_out(&mut self, backend: &dyn Backend) {
        if let Err(e) = backend.sign_out().await {
            tracing::warn!("Backend sign-out failed: {}", e);
        }

        if let Some(user) = self.state.user() {
            tracing::info!(user_id = %user.id, "Signed out");
        }

        self.state = SessionState::Anonymous;
        self.credentials = Credentials::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendProvider, MemoryStore};

    #[test]
    fn test_mode_labels() {
        assert_eq!(AuthMode::Login.title(), "Login");
        assert_eq!(AuthMode::Login.switch_label(), "Sign Up");
        assert_eq!(AuthMode::SignUp.title(), "Sign Up");
        assert_eq!(AuthMode::SignUp.prompt(), "Already have an account?");
        assert_eq!(AuthMode::SignUp.switch_label(), "Login");
    }

    #[test]
    fn test_toggle_twice_restores_mode_and_keeps_credentials() {
        let mut session = Session::new();
        session.set_credentials(Credentials::new("ada@example.com", "secret123"));

        session.toggle_mode();
        assert_eq!(session.mode(), AuthMode::SignUp);
        session.toggle_mode();

        assert_eq!(session.mode(), AuthMode::Login);
        assert_eq!(session.mode().title(), "Login");
        assert_eq!(session.credentials().email, "ada@example.com");
        assert_eq!(session.credentials().password, "secret123");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("ada@example.com", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ada@example.com"));
        assert!(!debug.contains("secret123"));
    }

    #[tokio::test]
    async fn test_initialize_without_credential_is_anonymous() {
        let store = MemoryStore::new();
        let backend = store.connect();
        let mut session = Session::new();

        assert!(!session.initialize(backend.as_ref()).await);
        assert_eq!(session.state(), &SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_sign_up_authenticates_and_notifies() {
        let store = MemoryStore::new();
        let backend = store.connect();
        let mut session = Session::new();
        let mut notices = Notices::default();

        let ok = session
            .sign_in_or_sign_up(
                backend.as_ref(),
                "ada@example.com",
                "secret123",
                AuthMode::SignUp,
                &mut notices,
            )
            .await;

        assert!(ok);
        assert_eq!(session.user().unwrap().display_name(), "ada");
        assert_eq!(notices.pending()[0].text, "Signed up as ada@example.com");
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_unchanged() {
        let store = MemoryStore::new();
        let backend = store.connect();
        let mut session = Session::new();
        let mut notices = Notices::default();

        let ok = session
            .sign_in_or_sign_up(
                backend.as_ref(),
                "nobody@example.com",
                "whatever",
                AuthMode::Login,
                &mut notices,
            )
            .await;

        assert!(!ok);
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(notices.pending()[0].text, "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_sign_out_clears_state_and_form() {
        let store = MemoryStore::new();
        let backend = store.connect();
        let mut session = Session::new();
        let mut notices = Notices::default();

        session.set_credentials(Credentials::new("ada@example.com", "secret123"));
        session.toggle_mode();
        assert!(session.submit(backend.as_ref(), &mut notices).await);

        session.sign_out(backend.as_ref()).await;

        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(session.credentials().is_empty());
        assert!(backend.current_user().await.is_none());
    }
}
