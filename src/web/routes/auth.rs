//! Auth Routes
//!
//! - POST /auth - Sign in or sign up per the current mode
//! - POST /auth/mode - Toggle between login and sign up

use axum::{extract::State, response::Redirect, Form};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::web::dto::CredentialsForm;
use crate::web::routes::open_view;
use crate::web::state::AppState;

/// POST /auth
pub async fn submit_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> (CookieJar, Redirect) {
    let (jar, slot) = open_view(&state, jar).await;

    {
        let mut view = slot.lock().await;
        view.touch();
        view.page.submit_auth(form.into()).await;
    }

    (jar, Redirect::to("/"))
}

/// POST /auth/mode
///
/// Keeps the typed email and password so they survive the switch.
pub async fn toggle_mode(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> (CookieJar, Redirect) {
    let (jar, slot) = open_view(&state, jar).await;

    {
        let mut view = slot.lock().await;
        view.touch();
        view.page.toggle_mode(form.into());
    }

    (jar, Redirect::to("/"))
}
