//! NGO dashboard page
//!
//! Shows verified organizations the donations available in their area,
//! lets them accept a donation (first NGO wins) or file a request with a
//! message, and tracks everything they have already accepted.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::{NgoStats, UserRole};
use crate::ui::api::{
    DonationItem, DonationList, FileRequestBody, RequestItem, api_get, api_post, api_post_empty,
};
use crate::ui::auth::use_auth_context;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::pages::shell::{DashboardShell, EmptyState, StatCard, StatusBadge};

/// NGO dashboard page
#[component]
pub fn NgoDashboardPage() -> impl IntoView {
    view! {
        <DashboardShell required_role=UserRole::Ngo title="NGO Dashboard">
            <NgoContent />
        </DashboardShell>
    }
}

/// Dashboard body, rendered only for authorized NGOs
#[component]
fn NgoContent() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let stats = RwSignal::new(NgoStats::default());
    let available = RwSignal::new(Vec::<DonationItem>::new());
    let accepted = RwSignal::new(Vec::<DonationItem>::new());
    let loading = RwSignal::new(true);

    let reload = move || {
        let Some(token) = auth.access_token() else {
            return;
        };
        spawn_local(async move {
            match api_get::<NgoStats>("/api/donations/stats/ngo", &token).await {
                Ok(s) => stats.set(s),
                Err(e) => notifications.error("Failed to load stats", e),
            }
            match api_get::<DonationList>("/api/donations?status=available", &token).await {
                Ok(list) => available.set(list.donations),
                Err(e) => notifications.error("Failed to load donations", e),
            }
            match api_get::<DonationList>("/api/donations/accepted", &token).await {
                Ok(list) => accepted.set(list.donations),
                Err(e) => notifications.error("Failed to load accepted donations", e),
            }
            loading.set(false);
        });
    };

    // Initial load after hydration
    Effect::new(move |_| reload());

    let on_accept = move |id: String| {
        let Some(token) = auth.access_token() else {
            return;
        };
        spawn_local(async move {
            match api_post_empty::<DonationItem>(&format!("/api/donations/{}/accept", id), &token)
                .await
            {
                Ok(_) => {
                    notifications
                        .success("Donation accepted", "Volunteers can now claim the pickup");
                    reload();
                }
                Err(e) => notifications.error("Could not accept", e),
            }
        });
    };

    let on_request = move |(id, message): (String, String)| {
        let Some(token) = auth.access_token() else {
            return;
        };
        let body = FileRequestBody {
            distance_km: None,
            request_message: (!message.is_empty()).then_some(message),
        };
        spawn_local(async move {
            match api_post::<FileRequestBody, RequestItem>(
                &format!("/api/donations/{}/requests", id),
                &token,
                &body,
            )
            .await
            {
                Ok(_) => {
                    notifications.success("Request sent", "The donor can see your interest")
                }
                Err(e) => notifications.error("Could not send request", e),
            }
        });
    };

    view! {
        // Stats row
        <div class="grid sm:grid-cols-3 gap-4 mb-8">
            {move || {
                let s = stats.get();
                view! {
                    <StatCard label="Accepted" value=s.accepted.to_string() icon=icons::BOX />
                    <StatCard label="In Transit" value=s.in_transit.to_string() icon=icons::TRUCK />
                    <StatCard label="Delivered" value=s.delivered.to_string() icon=icons::CHECK />
                }
            }}
        </div>

        {move || {
            if loading.get() {
                view! {
                    <div class="flex justify-center py-12">
                        <Icon name=icons::LOADER class="w-8 h-8 animate-spin text-accent-primary" />
                    </div>
                }
                .into_any()
            } else {
                view! {
                    // Available donations
                    <section class="mb-10">
                        <h2 class="text-xl font-semibold text-theme-primary mb-4">
                            "Available Donations"
                        </h2>
                        {move || {
                            if available.get().is_empty() {
                                view! {
                                    <EmptyState message="Nothing available right now. Check back soon." />
                                }
                                .into_any()
                            } else {
                                view! {
                                    <div class="space-y-4">
                                        {available
                                            .get()
                                            .into_iter()
                                            .map(|donation| {
                                                view! {
                                                    <AvailableDonationCard
                                                        donation=donation
                                                        on_accept=Callback::new(on_accept)
                                                        on_request=Callback::new(on_request)
                                                    />
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                }
                                .into_any()
                            }
                        }}
                    </section>

                    // Accepted donations
                    <section>
                        <h2 class="text-xl font-semibold text-theme-primary mb-4">
                            "Accepted by Us"
                        </h2>
                        {move || {
                            if accepted.get().is_empty() {
                                view! {
                                    <EmptyState message="You haven't accepted any donations yet." />
                                }
                                .into_any()
                            } else {
                                view! {
                                    <div class="space-y-4">
                                        {accepted
                                            .get()
                                            .into_iter()
                                            .map(|donation| {
                                                view! { <AcceptedDonationCard donation=donation /> }
                                            })
                                            .collect_view()}
                                    </div>
                                }
                                .into_any()
                            }
                        }}
                    </section>
                }
                .into_any()
            }
        }}
    }
}

/// Card for a donation the NGO can accept or request
#[component]
fn AvailableDonationCard(
    donation: DonationItem,
    on_accept: Callback<String>,
    on_request: Callback<(String, String)>,
) -> impl IntoView {
    let show_request = RwSignal::new(false);
    let message = RwSignal::new(String::new());

    let id_for_accept = donation.id.clone();
    let id_for_request = donation.id.clone();

    view! {
        <div class="bg-theme-primary p-5 rounded-xl border border-theme">
            <div class="flex items-start justify-between gap-4">
                <DonationSummary donation=donation.clone() />

                <div class="flex flex-col items-end gap-2 flex-shrink-0">
                    <button
                        class="px-4 py-1.5 text-sm font-medium text-white bg-accent-primary
                               hover:bg-accent-primary-hover rounded-lg transition-colors"
                        on:click=move |_| on_accept.run(id_for_accept.clone())
                    >
                        "Accept"
                    </button>
                    <button
                        class="px-3 py-1.5 text-sm font-medium text-theme-secondary border border-theme
                               rounded-lg hover:bg-theme-secondary transition-colors"
                        on:click=move |_| show_request.update(|v| *v = !*v)
                    >
                        {move || if show_request.get() { "Close" } else { "Send Request" }}
                    </button>
                </div>
            </div>

            // Request message input
            {move || {
                show_request.get().then(|| {
                    let id = id_for_request.clone();
                    view! {
                        <div class="mt-4 pt-4 border-t border-theme flex gap-2">
                            <input
                                type="text"
                                placeholder="We can distribute this tonight at our shelter"
                                class="flex-1 px-3 py-2 bg-theme-secondary border border-theme rounded-lg
                                       text-theme-primary placeholder-theme-tertiary
                                       focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                                       transition-colors"
                                prop:value=move || message.get()
                                on:input=move |ev| message.set(event_target_value(&ev))
                            />
                            <button
                                class="px-4 py-2 text-sm font-medium text-white bg-accent-primary
                                       hover:bg-accent-primary-hover rounded-lg transition-colors"
                                on:click=move |_| {
                                    on_request.run((id.clone(), message.get_untracked().trim().to_string()));
                                    show_request.set(false);
                                    message.set(String::new());
                                }
                            >
                                "Send"
                            </button>
                        </div>
                    }
                })
            }}
        </div>
    }
}

/// Card for a donation this NGO already accepted
#[component]
fn AcceptedDonationCard(donation: DonationItem) -> impl IntoView {
    let volunteer_assigned = donation.assigned_volunteer.is_some();

    view! {
        <div class="bg-theme-primary p-5 rounded-xl border border-theme">
            <div class="flex items-start justify-between gap-4">
                <DonationSummary donation=donation.clone() />
                <div class="flex-shrink-0 text-right">
                    {if volunteer_assigned {
                        view! {
                            <span class="flex items-center gap-1.5 text-sm text-theme-secondary">
                                <Icon name=icons::TRUCK class="w-4 h-4 text-accent-primary" />
                                "Volunteer assigned"
                            </span>
                        }
                        .into_any()
                    } else {
                        view! {
                            <span class="flex items-center gap-1.5 text-sm text-theme-tertiary">
                                <Icon name=icons::CLOCK class="w-4 h-4" />
                                "Waiting for a volunteer"
                            </span>
                        }
                        .into_any()
                    }}
                </div>
            </div>
        </div>
    }
}

/// Shared title/category/location block for donation cards
#[component]
fn DonationSummary(donation: DonationItem) -> impl IntoView {
    view! {
        <div class="min-w-0">
            <div class="flex items-center gap-3 mb-1">
                <h3 class="text-lg font-semibold text-theme-primary truncate">
                    {donation.title.clone()}
                </h3>
                <StatusBadge status=donation.status />
            </div>
            <p class="text-sm text-theme-secondary mb-2">
                {donation.food_category.display_name()}
                " · "
                {donation.quantity.clone()}
                {donation.unit.clone().map(|u| format!(" {}", u)).unwrap_or_default()}
            </p>
            <div class="flex items-center gap-4 text-xs text-theme-tertiary">
                <span class="flex items-center gap-1">
                    <Icon name=icons::MAP_PIN class="w-3.5 h-3.5" />
                    {format!("{}, {}", donation.pickup_address, donation.pickup_city)}
                </span>
                <span class="flex items-center gap-1">
                    <Icon name=icons::CLOCK class="w-3.5 h-3.5" />
                    {format!("Expires {}", donation.expire_at)}
                </span>
            </div>
        </div>
    }
}
