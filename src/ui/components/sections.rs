//! Static Sections
//!
//! About and Contact, shown whether or not anyone is signed in.

use leptos::*;

pub const CONTACT_EMAIL: &str = "contact@absolutehandshake.com";
pub const CONTACT_PHONE: &str = "+234 123 456 7890";

#[component]
pub fn AboutSection() -> impl IntoView {
    view! {
        <section id="about" class="p-6 bg-white mt-10 rounded-lg shadow max-w-3xl mx-auto">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">"About Us"</h2>
            <p class="text-gray-600">
                "Absolute Handshake is a platform built to bring integrity to digital agreements. \
                 We provide a trusted space for users to initiate, verify, and record commitments."
            </p>
        </section>
    }
}

#[component]
pub fn ContactSection() -> impl IntoView {
    view! {
        <section id="contact" class="p-6 bg-white mt-10 rounded-lg shadow max-w-3xl mx-auto mb-10">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">"Contact Us"</h2>
            <p class="text-gray-600 mb-2">{format!("Email: {}", CONTACT_EMAIL)}</p>
            <p class="text-gray-600">{format!("Phone: {}", CONTACT_PHONE)}</p>
        </section>
    }
}
