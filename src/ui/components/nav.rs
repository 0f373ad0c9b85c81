//! Navigation Component
//!
//! Header bar with the brand and in-page anchors.

use leptos::*;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="bg-white shadow p-4 flex justify-between items-center">
            <div class="flex items-center gap-2">
                <span class="text-blue-600 text-2xl">"🤝"</span>
                <span class="text-xl font-bold text-gray-800">
                    "Absolute "
                    <span class="text-blue-600">"Handshake"</span>
                </span>
            </div>

            <div class="space-x-4">
                <NavLink href="#home" label="Home" />
                <NavLink href="#about" label="About" />
                <NavLink href="#contact" label="Contact" />
            </div>
        </nav>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <a href=href class="text-gray-600 hover:text-blue-600">
            {label}
        </a>
    }
}
