//! Handshake Routes
//!
//! - POST /handshakes - Create a handshake
//! - POST /logout - Sign out

use axum::{extract::State, response::Redirect, Form};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::web::dto::HandshakeForm;
use crate::web::routes::open_view;
use crate::web::state::AppState;

/// POST /handshakes
pub async fn create_handshake(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<HandshakeForm>,
) -> (CookieJar, Redirect) {
    let (jar, slot) = open_view(&state, jar).await;

    {
        let mut view = slot.lock().await;
        view.touch();
        if let Some(outcome) = view.page.send_handshake(form.message).await {
            tracing::debug!(?outcome, "Handshake submitted");
        }
    }

    (jar, Redirect::to("/"))
}

/// POST /logout
pub async fn log_out(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, slot) = open_view(&state, jar).await;

    {
        let mut view = slot.lock().await;
        view.touch();
        view.page.log_out().await;
    }

    (jar, Redirect::to("/"))
}
