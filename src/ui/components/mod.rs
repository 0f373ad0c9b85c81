//! UI Components
//!
//! Leptos components that make up the page.

pub mod auth_form;
pub mod dashboard;
pub mod nav;
pub mod notice_dialog;
pub mod sections;

pub use auth_form::AuthForm;
pub use dashboard::Dashboard;
pub use nav::Nav;
pub use notice_dialog::NoticeDialog;
pub use sections::{AboutSection, ContactSection};
