//! Notice Dialog Component
//!
//! Modal that must be dismissed before the page can be used again.

use leptos::*;

use crate::notice::{Notice, NoticeKind};

#[component]
pub fn NoticeDialog(notices: Vec<Notice>) -> impl IntoView {
    if notices.is_empty() {
        return ().into_view();
    }

    view! {
        <dialog open=true class="rounded-lg shadow-lg p-6 max-w-md">
            <ul class="space-y-2 mb-4">
                {notices
                    .into_iter()
                    .map(|notice| view! {
                        <li class=notice_class(notice.kind)>{notice.text}</li>
                    })
                    .collect_view()}
            </ul>
            <form method="dialog">
                <button type="submit" class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-lg">
                    "OK"
                </button>
            </form>
        </dialog>
    }
    .into_view()
}

fn notice_class(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Info => "text-gray-800",
        NoticeKind::Error => "text-red-600",
    }
}
