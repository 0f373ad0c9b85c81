//! Page Route
//!
//! - GET / - Render the caller's view

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::ui::render_page;
use crate::web::routes::open_view;
use crate::web::state::AppState;

/// GET /
///
/// Renders the view's current state. Pending notices are shown once.
pub async fn home(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, slot) = open_view(&state, jar).await;

    let model = {
        let mut view = slot.lock().await;
        view.touch();
        view.page.take_model(&state.config.timestamp_format)
    };

    (
        jar,
        [(header::CACHE_CONTROL, "no-store")],
        Html(render_page(model)),
    )
}
