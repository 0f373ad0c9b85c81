//! # Absolute Handshake
//!
//! A single-page app for recording handshake messages: sign up or log in
//! against a hosted auth + data service, then post short messages and see
//! your own, newest first.
//!
//! ## Modules
//!
//! - [`backend`]: The hosted service client (Supabase) and an in-memory stand-in
//! - [`session`]: Authentication state and the login/sign-up form
//! - [`feed`]: The signed-in user's handshake list and composer
//! - [`page`]: One browser view tying session, feed and notices together
//! - [`ui`]: Leptos server-side rendering of the page
//! - [`web`]: Axum server, one view per browser cookie
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use handshake::backend::{BackendProvider, MemoryStore};
//! use handshake::page::HomePage;
//! use handshake::session::Credentials;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!     let mut page = HomePage::new(store.connect());
//!     page.initialize().await;
//!
//!     page.toggle_mode(Credentials::new("ada@example.com", "secret123"));
//!     page.submit_auth(Credentials::new("ada@example.com", "secret123")).await;
//!     page.send_handshake("Deal!".to_string()).await;
//!
//!     println!("{} handshakes", page.feed().items().len());
//! }
//! ```

pub mod backend;
pub mod config;
pub mod feed;
pub mod notice;
pub mod page;
pub mod session;
pub mod ui;
pub mod web;

pub use backend::{Backend, BackendError, BackendProvider, HandshakeMessage, User};
pub use config::Config;
pub use page::HomePage;
