//! Shared dashboard chrome
//!
//! Provides the authenticated page shell (header with logo, theme toggle,
//! and sign-out) plus the role guard that keeps each dashboard reachable
//! only by users holding the matching role.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::core::UserRole;
use crate::ui::auth::{AuthState, use_auth_context};
use crate::ui::icon::{Icon, icons};
use crate::ui::theme::{ThemeMode, use_theme_context};

/// Authenticated page shell with role guard
///
/// Renders its children only when the signed-in user holds `required_role`.
/// Everyone else gets redirected: anonymous visitors to the auth page,
/// users without a role to role selection, and users with a different
/// role to their own dashboard.
#[component]
pub fn DashboardShell(
    required_role: UserRole,
    title: &'static str,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_auth_context();
    let navigate = use_navigate();

    Effect::new(move |_| match auth.state.get() {
        AuthState::Loading => {}
        AuthState::Unauthenticated => navigate("/auth", Default::default()),
        AuthState::Authenticated(_) => match auth.role.get() {
            None => navigate("/select-role", Default::default()),
            Some(role) if role != required_role => {
                navigate(role.dashboard_path(), Default::default())
            }
            Some(_) => {}
        },
    });

    let authorized = move || {
        matches!(auth.state.get(), AuthState::Authenticated(_))
            && auth.role.get() == Some(required_role)
    };

    view! {
        <div class="min-h-screen bg-theme-primary">
            <PageHeader title=title />

            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                {move || {
                    if authorized() {
                        children().into_any()
                    } else {
                        view! {
                            <div class="flex items-center justify-center py-24">
                                <Icon name=icons::LOADER class="w-8 h-8 animate-spin text-accent-primary" />
                            </div>
                        }
                        .into_any()
                    }
                }}
            </main>
        </div>
    }
}

/// Header bar shared by all authenticated pages
#[component]
pub fn PageHeader(title: &'static str) -> impl IntoView {
    let auth = use_auth_context();
    let navigate = use_navigate();

    let on_logout = move |_| {
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            crate::ui::auth::logout().await;
            navigate("/", Default::default());
        });
    };

    view! {
        <header class="sticky top-0 z-40 bg-theme-primary/80 backdrop-blur-md border-b border-theme/50">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex items-center justify-between h-16">
                    <div class="flex items-center gap-3">
                        <A href="/" attr:class="flex items-center gap-3 hover:opacity-80 transition-opacity">
                            <Logo />
                            <span class="text-xl font-bold text-theme-primary">"FoodBridge"</span>
                        </A>
                        <span class="hidden sm:inline text-theme-tertiary">"/"</span>
                        <span class="hidden sm:inline text-sm font-medium text-theme-secondary">{title}</span>
                    </div>

                    <div class="flex items-center gap-3">
                        <ThemeToggle />
                        {move || {
                            auth.user().map(|user| {
                                view! {
                                    <span class="hidden sm:inline text-sm text-theme-secondary">
                                        {user.full_name.clone()}
                                    </span>
                                }
                            })
                        }}
                        <button
                            class="flex items-center gap-1.5 px-3 py-1.5 text-sm font-medium text-red-500
                                   border border-red-300 dark:border-red-700 rounded-lg
                                   hover:bg-red-50 dark:hover:bg-red-900/20 transition-colors"
                            on:click=on_logout
                        >
                            <Icon name=icons::LOGOUT class="w-4 h-4" />
                            "Sign Out"
                        </button>
                    </div>
                </div>
            </div>
        </header>
    }
}

/// Dark/light theme toggle button
#[component]
fn ThemeToggle() -> impl IntoView {
    let theme = use_theme_context();
    view! {
        <button
            class="p-2 rounded-lg hover:bg-gray-200 dark:hover:bg-gray-700 transition-colors
                   text-gray-600 dark:text-gray-300 border border-gray-300 dark:border-gray-600"
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
    }
}

/// FoodBridge logo mark
#[component]
pub fn Logo() -> impl IntoView {
    view! {
        <div class="w-10 h-10 bg-gradient-to-br from-green-500 to-emerald-600 rounded-xl
                    flex items-center justify-center shadow-lg">
            <Icon name=icons::HEART class="w-6 h-6" />
        </div>
    }
}

/// Small stat summary card used on all three dashboards
#[component]
pub fn StatCard(
    label: &'static str,
    value: String,
    icon: &'static str,
) -> impl IntoView {
    view! {
        <div class="bg-theme-primary p-5 rounded-xl border border-theme flex items-center gap-4">
            <div class="w-11 h-11 rounded-lg bg-accent-primary/10 flex items-center justify-center flex-shrink-0">
                <Icon name=icon class="w-5 h-5 text-accent-primary" />
            </div>
            <div class="min-w-0">
                <p class="text-2xl font-bold text-theme-primary leading-tight">{value}</p>
                <p class="text-sm text-theme-secondary truncate">{label}</p>
            </div>
        </div>
    }
}

/// Colored status pill for donation cards
#[component]
pub fn StatusBadge(status: crate::core::DonationStatus) -> impl IntoView {
    use crate::core::DonationStatus;

    let (label, class) = match status {
        DonationStatus::Available => ("Available", "bg-green-500/10 text-green-500"),
        DonationStatus::Accepted => ("Accepted", "bg-blue-500/10 text-blue-500"),
        DonationStatus::PickedUp => ("In Transit", "bg-yellow-500/10 text-yellow-500"),
        DonationStatus::Delivered => ("Delivered", "bg-emerald-500/10 text-emerald-500"),
        DonationStatus::Cancelled => ("Cancelled", "bg-red-500/10 text-red-500"),
    };

    view! {
        <span class=format!("px-2.5 py-0.5 text-xs font-medium rounded-full {}", class)>
            {label}
        </span>
    }
}

/// Placeholder shown when a list has nothing to render
#[component]
pub fn EmptyState(message: &'static str) -> impl IntoView {
    view! {
        <div class="text-center py-12 border border-dashed border-theme rounded-xl">
            <p class="text-theme-tertiary">{message}</p>
        </div>
    }
}
