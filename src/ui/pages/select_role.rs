//! Role selection page component
//!
//! One-time onboarding step: a freshly registered user picks whether they
//! act as a donor, an NGO, or a volunteer. NGOs must also name their
//! organization. The choice is permanent and decides which dashboard the
//! user lands on.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::core::UserRole;
use crate::ui::api::{RoleInfo, SelectRoleBody, api_post};
use crate::ui::auth::{AuthState, use_auth_context};
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::pages::shell::Logo;

/// Role selection page
#[component]
pub fn SelectRolePage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let navigate = use_navigate();

    let selected = RwSignal::new(None::<UserRole>);
    let organization_name = RwSignal::new(String::new());
    let org_error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    // Anonymous visitors go to auth; users with a role go straight to their dashboard
    let navigate_guard = navigate.clone();
    Effect::new(move |_| match auth.state.get() {
        AuthState::Unauthenticated => navigate_guard("/auth", Default::default()),
        AuthState::Authenticated(_) => {
            if let Some(role) = auth.role.get() {
                navigate_guard(role.dashboard_path(), Default::default());
            }
        }
        AuthState::Loading => {}
    });

    let on_confirm = move |_| {
        let Some(role) = selected.get() else {
            return;
        };

        let org = organization_name.get().trim().to_string();
        if role == UserRole::Ngo && org.is_empty() {
            org_error.set(Some("Organization name is required".to_string()));
            return;
        }
        org_error.set(None);

        let Some(token) = auth.access_token() else {
            return;
        };

        let body = SelectRoleBody {
            role,
            organization_name: if role == UserRole::Ngo { Some(org) } else { None },
        };

        submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api_post::<SelectRoleBody, RoleInfo>("/api/roles", &token, &body).await {
                Ok(info) => {
                    auth.role.set(Some(info.role));
                    notifications.success(
                        "Welcome aboard",
                        format!("You're set up as a {}", info.role.as_str()),
                    );
                    navigate(info.role.dashboard_path(), Default::default());
                }
                Err(e) => {
                    notifications.error("Could not save role", e);
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-theme-primary flex flex-col items-center justify-center px-4 py-12">
            <div class="w-full max-w-3xl">
                // Header
                <div class="text-center mb-10">
                    <div class="flex justify-center mb-4">
                        <Logo />
                    </div>
                    <h1 class="text-3xl font-bold text-theme-primary mb-2">
                        "How will you use FoodBridge?"
                    </h1>
                    <p class="text-theme-secondary">
                        "Pick the role that fits you. This choice is permanent and shapes your dashboard."
                    </p>
                </div>

                // Role cards
                <div class="grid sm:grid-cols-3 gap-4 mb-6">
                    <RoleCard
                        role=UserRole::Donor
                        icon=icons::HEART
                        title="Donor"
                        description="I have surplus food to give away"
                        selected=selected
                    />
                    <RoleCard
                        role=UserRole::Ngo
                        icon=icons::BOX
                        title="NGO"
                        description="My organization distributes food to communities"
                        selected=selected
                    />
                    <RoleCard
                        role=UserRole::Volunteer
                        icon=icons::TRUCK
                        title="Volunteer"
                        description="I can pick up and deliver donations"
                        selected=selected
                    />
                </div>

                // Organization name, NGOs only
                {move || {
                    (selected.get() == Some(UserRole::Ngo)).then(|| {
                        view! {
                            <div class="max-w-md mx-auto mb-6">
                                <label for="organization_name" class="block text-sm font-medium text-theme-primary mb-1">
                                    "Organization Name"
                                </label>
                                <input
                                    type="text"
                                    id="organization_name"
                                    name="organization_name"
                                    placeholder="Helping Hands Foundation"
                                    class="w-full px-3 py-2 bg-theme-secondary border border-theme rounded-lg
                                           text-theme-primary placeholder-theme-tertiary
                                           focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                                           transition-colors"
                                    class:border-red-500=move || org_error.get().is_some()
                                    prop:value=move || organization_name.get()
                                    on:input=move |ev| {
                                        organization_name.set(event_target_value(&ev));
                                        org_error.set(None);
                                    }
                                />
                                {move || {
                                    org_error.get().map(|error| {
                                        view! {
                                            <p class="mt-1 text-sm text-red-500">{error}</p>
                                        }
                                    })
                                }}
                            </div>
                        }
                    })
                }}

                // Confirm button
                <div class="text-center">
                    <button
                        class="px-8 py-3 bg-accent-primary hover:bg-accent-primary-hover text-white font-medium rounded-lg
                               focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-accent-primary
                               disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                        disabled=move || selected.get().is_none() || submitting.get()
                        on:click=on_confirm
                    >
                        {move || {
                            if submitting.get() {
                                view! {
                                    <span class="flex items-center justify-center">
                                        <Icon name=icons::LOADER class="animate-spin -ml-1 mr-2 h-4 w-4" />
                                        "Saving..."
                                    </span>
                                }
                                .into_any()
                            } else {
                                view! { <span class="block">"Continue"</span> }.into_any()
                            }
                        }}
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Selectable role card
#[component]
fn RoleCard(
    role: UserRole,
    icon: &'static str,
    title: &'static str,
    description: &'static str,
    selected: RwSignal<Option<UserRole>>,
) -> impl IntoView {
    let is_selected = move || selected.get() == Some(role);

    view! {
        <button
            type="button"
            class="text-left p-6 rounded-xl border-2 transition-all duration-200 bg-theme-primary
                   hover:border-accent-primary/60 hover:shadow-lg"
            class:border-accent-primary=is_selected
            class:border-theme=move || !is_selected()
            on:click=move |_| selected.set(Some(role))
            aria-pressed=move || is_selected()
        >
            <div class="w-12 h-12 rounded-lg bg-accent-primary/10 flex items-center justify-center mb-4">
                <Icon name=icon class="w-6 h-6 text-accent-primary" />
            </div>
            <div class="flex items-center gap-2 mb-2">
                <h3 class="text-lg font-semibold text-theme-primary">{title}</h3>
                {move || {
                    is_selected().then(|| {
                        view! {
                            <Icon name=icons::CHECK class="w-4 h-4 text-accent-primary" />
                        }
                    })
                }}
            </div>
            <p class="text-sm text-theme-secondary leading-relaxed">{description}</p>
        </button>
    }
}
