//! Dashboard Component
//!
//! Signed-in view: greeting, composer, the user's handshakes and sign-out.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use leptos::*;

use crate::backend::{HandshakeMessage, User};
use crate::ui::DEFAULT_TIMESTAMP_FORMAT;

#[component]
pub fn Dashboard(
    user: User,
    #[prop(into)]
    draft: String,
    feed: Vec<HandshakeMessage>,
    #[prop(into)]
    timestamp_format: String,
) -> impl IntoView {
    let greeting = format!("Welcome, {} 👋", user.display_name());

    view! {
        <section class="p-6 bg-white mt-10 rounded-lg shadow max-w-2xl mx-auto">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">{greeting}</h2>

            // Composer
            <form method="post" action="/handshakes" class="space-y-4 mb-6">
                <input
                    type="text"
                    name="message"
                    placeholder="Enter handshake message..."
                    value=draft
                    class="w-full border rounded-lg px-3 py-2"
                />
                <button
                    type="submit"
                    class="bg-green-600 hover:bg-green-700 text-white w-full rounded-lg py-2"
                >
                    "Send Handshake"
                </button>
            </form>

            <div class="mb-6">
                <h3 class="text-lg font-semibold mb-2">"Your Handshakes"</h3>
                <HandshakeList feed=feed timestamp_format=timestamp_format />
            </div>

            <form method="post" action="/logout">
                <button type="submit" class="border rounded-lg px-4 py-2">
                    "Log Out"
                </button>
            </form>
        </section>
    }
}

/// Feed items in the order given (the feed keeps them newest first)
#[component]
fn HandshakeList(
    feed: Vec<HandshakeMessage>,
    #[prop(into)]
    timestamp_format: String,
) -> impl IntoView {
    if feed.is_empty() {
        return view! {
            <p class="text-gray-500 text-sm">"No handshakes yet."</p>
        }
        .into_view();
    }

    view! {
        <ul class="space-y-2">
            {feed
                .into_iter()
                .map(|h| {
                    let when = format_timestamp(&h.created_at, &timestamp_format);
                    let id = h.id.to_string();
                    let text = h.message;
                    view! {
                        <li class="bg-gray-100 p-2 rounded-lg shadow text-sm" data-id=id>
                            {text}
                            " "
                            <span class="text-xs text-gray-500">{format!("({})", when)}</span>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_view()
}

/// Render in the server's local zone; a malformed format falls back to the default
pub fn format_timestamp(at: &DateTime<Utc>, format: &str) -> String {
    let format = if is_valid_timestamp_format(format) {
        format
    } else {
        DEFAULT_TIMESTAMP_FORMAT
    };

    at.with_timezone(&Local).format(format).to_string()
}

pub fn is_valid_timestamp_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_format_shape() {
        let at = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        let text = format_timestamp(&at, DEFAULT_TIMESTAMP_FORMAT);

        assert!(text.contains("/2024, "));
        assert!(text.ends_with("AM") || text.ends_with("PM"));
    }

    #[test]
    fn test_invalid_format_falls_back() {
        assert!(!is_valid_timestamp_format("%Q"));
        assert!(is_valid_timestamp_format("%Y-%m-%d %H:%M"));

        let at = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        assert_eq!(
            format_timestamp(&at, "%Q"),
            format_timestamp(&at, DEFAULT_TIMESTAMP_FORMAT)
        );
    }
}
