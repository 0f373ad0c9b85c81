//! Credential Form Component
//!
//! Login / Sign Up form shown to anonymous visitors. The mode switch posts
//! the typed fields along so nothing is lost when flipping modes.

use leptos::*;

use crate::session::AuthMode;

#[component]
pub fn AuthForm(
    mode: AuthMode,
    #[prop(into)]
    email: String,
    #[prop(into)]
    password: String,
) -> impl IntoView {
    let password_autocomplete = match mode {
        AuthMode::Login => "current-password",
        AuthMode::SignUp => "new-password",
    };

    view! {
        <section class="p-6 bg-white mt-10 rounded-lg shadow max-w-md mx-auto">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">{mode.title()}</h2>

            <form method="post" action="/auth" data-mode=mode.slug() class="space-y-4">
                <input
                    type="text"
                    name="email"
                    placeholder="Email"
                    autocomplete="email"
                    value=email
                    class="w-full border rounded-lg px-3 py-2"
                />
                <input
                    type="password"
                    name="password"
                    placeholder="Password"
                    autocomplete=password_autocomplete
                    value=password
                    class="w-full border rounded-lg px-3 py-2"
                />

                <button
                    type="submit"
                    class="bg-blue-600 text-white hover:bg-blue-700 w-full rounded-lg py-2"
                >
                    {mode.title()}
                </button>

                <p class="text-center text-sm text-gray-600">
                    {mode.prompt()}
                    " "
                    <button
                        type="submit"
                        formaction="/auth/mode"
                        class="text-blue-600 hover:underline"
                    >
                        {mode.switch_label()}
                    </button>
                </p>
            </form>
        </section>
    }
}
