//! Page Rendering
//!
//! Server-side Leptos rendering of the single Absolute Handshake page.
//! `render_page` is a pure function of a `PageModel` snapshot.

pub mod components;

use leptos::*;

use crate::backend::HandshakeMessage;
use crate::notice::Notice;
use crate::session::{AuthMode, SessionState};

use components::{AboutSection, AuthForm, ContactSection, Dashboard, Nav, NoticeDialog};

/// Default timestamp layout (en-US `toLocaleString` shape)
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Everything the page shows, captured at render time
#[derive(Debug, Clone)]
pub struct PageModel {
    pub session: SessionState,
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub draft: String,
    pub feed: Vec<HandshakeMessage>,
    pub notices: Vec<Notice>,
    pub timestamp_format: String,
}

impl Default for PageModel {
    fn default() -> Self {
        Self {
            session: SessionState::Anonymous,
            mode: AuthMode::Login,
            email: String::new(),
            password: String::new(),
            draft: String::new(),
            feed: Vec::new(),
            notices: Vec::new(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Render the full HTML document for `model`
pub fn render_page(model: PageModel) -> String {
    let body = leptos::ssr::render_to_string(move || view! { <HomeView model=model.clone() /> });

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
         <title>Absolute Handshake</title>\n\
         </head>\n<body>\n{}\n</body>\n</html>\n",
        body
    )
}

/// Page root: nav, the session-dependent section, then the static sections
#[component]
fn HomeView(model: PageModel) -> impl IntoView {
    let PageModel {
        session,
        mode,
        email,
        password,
        draft,
        feed,
        notices,
        timestamp_format,
    } = model;

    let main_section = match session {
        SessionState::Anonymous => view! {
            <AuthForm mode=mode email=email password=password />
        }
        .into_view(),
        SessionState::Authenticated(user) => view! {
            <Dashboard
                user=user
                draft=draft
                feed=feed
                timestamp_format=timestamp_format
            />
        }
        .into_view(),
    };

    view! {
        <div id="home" class="min-h-screen bg-gray-50">
            <Nav />

            {main_section}

            <AboutSection />
            <ContactSection />

            <NoticeDialog notices=notices />
        </div>
    }
}
