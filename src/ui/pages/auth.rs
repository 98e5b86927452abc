//! Auth page component
//!
//! Hosts the sign-in and sign-up forms and routes freshly authenticated
//! users to role selection or their dashboard.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::ui::auth::{AuthState, LoginForm, RegisterForm, use_auth_context};
use crate::ui::icon::{Icon, icons};
use crate::ui::pages::shell::Logo;
use crate::ui::theme::{ThemeMode, use_theme_context};

/// Which form is currently shown
#[derive(Clone, Copy, PartialEq)]
enum AuthMode {
    Login,
    Register,
}

/// Auth page with login/register switcher
#[component]
pub fn AuthPage() -> impl IntoView {
    let auth = use_auth_context();
    let theme = use_theme_context();
    let navigate = use_navigate();

    let mode = RwSignal::new(AuthMode::Login);

    // Covers both already signed-in visitors and fresh logins: once the
    // auth state flips to Authenticated this effect reruns and redirects
    Effect::new(move |_| {
        if matches!(auth.state.get(), AuthState::Authenticated(_)) {
            match auth.role.get() {
                Some(role) => navigate(role.dashboard_path(), Default::default()),
                None => navigate("/select-role", Default::default()),
            }
        }
    });

    view! {
        <div class="min-h-screen bg-theme-primary flex flex-col">
            // Header
            <header class="border-b border-theme/50">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                    <div class="flex items-center justify-between h-16">
                        <A href="/" attr:class="flex items-center gap-3 hover:opacity-80 transition-opacity">
                            <Logo />
                            <span class="text-xl font-bold text-theme-primary">"FoodBridge"</span>
                        </A>
                        <button
                            class="p-2 rounded-lg hover:bg-gray-200 dark:hover:bg-gray-700 transition-colors text-gray-600 dark:text-gray-300
                                   border border-gray-300 dark:border-gray-600"
                            on:click=move |_| theme.toggle()
                            aria-label="Toggle theme"
                        >
                            {move || {
                                if theme.mode.get() == ThemeMode::Dark {
                                    view! { <Icon name=icons::SUN class="w-5 h-5" /> }
                                } else {
                                    view! { <Icon name=icons::MOON class="w-5 h-5" /> }
                                }
                            }}
                        </button>
                    </div>
                </div>
            </header>

            // Centered form
            <main class="flex-1 flex items-center justify-center px-4 py-12">
                {move || {
                    match mode.get() {
                        AuthMode::Login => view! {
                            <LoginForm
                                on_register_click=Callback::new(move |_: ()| mode.set(AuthMode::Register))
                            />
                        }
                        .into_any(),
                        AuthMode::Register => view! {
                            <RegisterForm
                                on_login_click=Callback::new(move |_: ()| mode.set(AuthMode::Login))
                            />
                        }
                        .into_any(),
                    }
                }}
            </main>

            // Footer
            <footer class="py-6 text-center">
                <p class="text-sm text-theme-tertiary">
                    "© 2026 FoodBridge. Good food belongs on plates."
                </p>
            </footer>
        </div>
    }
}
