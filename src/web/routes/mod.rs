//! Route handlers organized by functionality.

pub mod auth;
pub mod handshakes;
pub mod health;
pub mod page;

use axum::http::Uri;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::page::HomePage;
use crate::web::error::WebError;
use crate::web::state::{AppState, ViewSlot};

/// Cookie naming the caller's view
pub const VIEW_COOKIE: &str = "handshake_view";

/// Find the caller's view, or create and initialize a new one.
///
/// The returned jar carries the cookie for a newly created view.
pub(crate) async fn open_view(
    state: &AppState,
    jar: CookieJar,
) -> (CookieJar, Arc<Mutex<ViewSlot>>) {
    let known = jar
        .get(VIEW_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    if let Some(id) = known {
        if let Some(slot) = state.views.get(&id).await {
            return (jar, slot);
        }
        tracing::debug!(view = %id, "Unknown or expired view, opening a new one");
    }

    let id = Uuid::new_v4();
    let mut page = HomePage::new(state.provider.connect());
    page.initialize().await;

    let slot = state.views.insert(id, page).await;
    tracing::debug!(view = %id, backend = state.provider.name(), "Opened view");

    let cookie = Cookie::build((VIEW_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), slot)
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> WebError {
    WebError::NotFound(uri.path().to_string())
}
