//! Volunteer dashboard page
//!
//! Volunteers browse accepted donations waiting for a courier, claim one,
//! walk it through pickup and delivery, and rate the donor and NGO once
//! the food has arrived.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::{DeliveryStatus, UserRole, VolunteerStats};
use crate::ui::api::{
    ClaimBody, DeliveryItem, DeliveryList, DonationItem, DonationList, RateBody, api_get,
    api_post, api_post_empty,
};
use crate::ui::auth::use_auth_context;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::pages::shell::{DashboardShell, EmptyState, StatCard};

/// Volunteer dashboard page
#[component]
pub fn VolunteerDashboardPage() -> impl IntoView {
    view! {
        <DashboardShell required_role=UserRole::Volunteer title="Volunteer Dashboard">
            <VolunteerContent />
        </DashboardShell>
    }
}

/// Dashboard body, rendered only for authorized volunteers
#[component]
fn VolunteerContent() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let stats = RwSignal::new(VolunteerStats::default());
    let ready = RwSignal::new(Vec::<DonationItem>::new());
    let deliveries = RwSignal::new(Vec::<DeliveryItem>::new());
    let loading = RwSignal::new(true);

    let reload = move || {
        let Some(token) = auth.access_token() else {
            return;
        };
        spawn_local(async move {
            match api_get::<VolunteerStats>("/api/deliveries/stats", &token).await {
                Ok(s) => stats.set(s),
                Err(e) => notifications.error("Failed to load stats", e),
            }
            match api_get::<DonationList>("/api/donations/ready", &token).await {
                Ok(list) => ready.set(list.donations),
                Err(e) => notifications.error("Failed to load pickups", e),
            }
            match api_get::<DeliveryList>("/api/deliveries/mine", &token).await {
                Ok(list) => deliveries.set(list.deliveries),
                Err(e) => notifications.error("Failed to load deliveries", e),
            }
            loading.set(false);
        });
    };

    // Initial load after hydration
    Effect::new(move |_| reload());

    let on_claim = move |donation_id: String| {
        let Some(token) = auth.access_token() else {
            return;
        };
        let body = ClaimBody { donation_id };
        spawn_local(async move {
            match api_post::<ClaimBody, DeliveryItem>("/api/deliveries", &token, &body).await {
                Ok(_) => {
                    notifications.success("Pickup claimed", "The donation is yours to deliver");
                    reload();
                }
                Err(e) => notifications.error("Could not claim", e),
            }
        });
    };

    // Shared by pickup/deliver/rate actions
    let on_action = move |(path, ok_title, ok_message): (String, &'static str, &'static str)| {
        let Some(token) = auth.access_token() else {
            return;
        };
        spawn_local(async move {
            match api_post_empty::<DeliveryItem>(&path, &token).await {
                Ok(_) => {
                    notifications.success(ok_title, ok_message);
                    reload();
                }
                Err(e) => notifications.error("Action failed", e),
            }
        });
    };

    let on_rate = move |(delivery_id, target, rating): (String, &'static str, i16)| {
        let Some(token) = auth.access_token() else {
            return;
        };
        let body = RateBody { target, rating };
        spawn_local(async move {
            match api_post::<RateBody, DeliveryItem>(
                &format!("/api/deliveries/{}/rate", delivery_id),
                &token,
                &body,
            )
            .await
            {
                Ok(_) => {
                    notifications.success("Thanks for rating", "Your feedback was recorded");
                    reload();
                }
                Err(e) => notifications.error("Could not submit rating", e),
            }
        });
    };

    view! {
        // Stats row
        <div class="grid sm:grid-cols-4 gap-4 mb-8">
            {move || {
                let s = stats.get();
                view! {
                    <StatCard label="Total Deliveries" value=s.total.to_string() icon=icons::TRUCK />
                    <StatCard label="Pending" value=s.pending.to_string() icon=icons::CLOCK />
                    <StatCard label="Completed" value=s.completed.to_string() icon=icons::CHECK />
                    <StatCard label="Rating" value=format!("{:.1}", s.rating) icon=icons::STAR />
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
                    // Pickups waiting for a volunteer
                    <section class="mb-10">
                        <h2 class="text-xl font-semibold text-theme-primary mb-4">
                            "Ready for Pickup"
                        </h2>
                        {move || {
                            if ready.get().is_empty() {
                                view! {
                                    <EmptyState message="No pickups waiting right now. Check back soon." />
                                }
                                .into_any()
                            } else {
                                view! {
                                    <div class="space-y-4">
                                        {ready
                                            .get()
                                            .into_iter()
                                            .map(|donation| {
                                                view! {
                                                    <ReadyDonationCard
                                                        donation=donation
                                                        on_claim=Callback::new(on_claim)
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

                    // The volunteer's own deliveries
                    <section>
                        <h2 class="text-xl font-semibold text-theme-primary mb-4">
                            "My Deliveries"
                        </h2>
                        {move || {
                            if deliveries.get().is_empty() {
                                view! {
                                    <EmptyState message="Claim a pickup above to start delivering." />
                                }
                                .into_any()
                            } else {
                                view! {
                                    <div class="space-y-4">
                                        {deliveries
                                            .get()
                                            .into_iter()
                                            .map(|delivery| {
                                                view! {
                                                    <DeliveryCard
                                                        delivery=delivery
                                                        on_action=Callback::new(on_action)
                                                        on_rate=Callback::new(on_rate)
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
                }
                .into_any()
            }
        }}
    }
}

/// Card for an accepted donation awaiting a courier
#[component]
fn ReadyDonationCard(donation: DonationItem, on_claim: Callback<String>) -> impl IntoView {
    let id = donation.id.clone();

    view! {
        <div class="bg-theme-primary p-5 rounded-xl border border-theme flex items-start justify-between gap-4">
            <div class="min-w-0">
                <h3 class="text-lg font-semibold text-theme-primary truncate mb-1">
                    {donation.title.clone()}
                </h3>
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
            <button
                class="flex-shrink-0 px-4 py-1.5 text-sm font-medium text-white bg-accent-primary
                       hover:bg-accent-primary-hover rounded-lg transition-colors"
                on:click=move |_| on_claim.run(id.clone())
            >
                "Claim Pickup"
            </button>
        </div>
    }
}

/// Card for one of the volunteer's deliveries with status actions
#[component]
fn DeliveryCard(
    delivery: DeliveryItem,
    on_action: Callback<(String, &'static str, &'static str)>,
    on_rate: Callback<(String, &'static str, i16)>,
) -> impl IntoView {
    let auth = use_auth_context();

    // Donation details are fetched lazily per card
    let donation = RwSignal::new(None::<DonationItem>);
    let donation_path = format!("/api/donations/{}", delivery.donation_id);
    Effect::new(move |_| {
        let Some(token) = auth.access_token() else {
            return;
        };
        let path = donation_path.clone();
        spawn_local(async move {
            if let Ok(d) = api_get::<DonationItem>(&path, &token).await {
                donation.set(Some(d));
            }
        });
    });

    let id_for_pickup = delivery.id.clone();
    let id_for_deliver = delivery.id.clone();
    let id_for_rate_donor = delivery.id.clone();
    let id_for_rate_ngo = delivery.id.clone();

    let status = delivery.status;
    let donor_rated = delivery.donor_rating.is_some();
    let ngo_rated = delivery.ngo_rating.is_some();

    let (status_label, status_class) = match status {
        DeliveryStatus::Assigned => ("Assigned", "bg-blue-500/10 text-blue-500"),
        DeliveryStatus::PickedUp => ("Picked Up", "bg-yellow-500/10 text-yellow-500"),
        DeliveryStatus::Delivered => ("Delivered", "bg-emerald-500/10 text-emerald-500"),
    };

    view! {
        <div class="bg-theme-primary p-5 rounded-xl border border-theme">
            <div class="flex items-start justify-between gap-4">
                <div class="min-w-0">
                    <div class="flex items-center gap-3 mb-1">
                        <h3 class="text-lg font-semibold text-theme-primary truncate">
                            {move || {
                                donation
                                    .get()
                                    .map(|d| d.title)
                                    .unwrap_or_else(|| "Delivery".to_string())
                            }}
                        </h3>
                        <span class=format!("px-2.5 py-0.5 text-xs font-medium rounded-full {}", status_class)>
                            {status_label}
                        </span>
                    </div>
                    {move || {
                        donation.get().map(|d| {
                            view! {
                                <div class="flex items-center gap-4 text-xs text-theme-tertiary mb-1">
                                    <span class="flex items-center gap-1">
                                        <Icon name=icons::MAP_PIN class="w-3.5 h-3.5" />
                                        {format!("{}, {}", d.pickup_address, d.pickup_city)}
                                    </span>
                                </div>
                            }
                        })
                    }}
                    {delivery
                        .pickup_time
                        .clone()
                        .map(|t| {
                            view! {
                                <p class="text-xs text-theme-tertiary">{format!("Picked up {}", t)}</p>
                            }
                        })}
                    {delivery
                        .delivery_time
                        .clone()
                        .map(|t| {
                            view! {
                                <p class="text-xs text-theme-tertiary">{format!("Delivered {}", t)}</p>
                            }
                        })}
                </div>

                // Status actions
                <div class="flex-shrink-0">
                    {match status {
                        DeliveryStatus::Assigned => {
                            view! {
                                <button
                                    class="px-4 py-1.5 text-sm font-medium text-white bg-accent-primary
                                           hover:bg-accent-primary-hover rounded-lg transition-colors"
                                    on:click=move |_| {
                                        on_action
                                            .run((
                                                format!("/api/deliveries/{}/pickup", id_for_pickup),
                                                "Pickup confirmed",
                                                "Safe travels to the NGO",
                                            ))
                                    }
                                >
                                    "Mark Picked Up"
                                </button>
                            }
                            .into_any()
                        }
                        DeliveryStatus::PickedUp => {
                            view! {
                                <button
                                    class="px-4 py-1.5 text-sm font-medium text-white bg-accent-primary
                                           hover:bg-accent-primary-hover rounded-lg transition-colors"
                                    on:click=move |_| {
                                        on_action
                                            .run((
                                                format!("/api/deliveries/{}/deliver", id_for_deliver),
                                                "Delivery confirmed",
                                                "Another meal reached its destination",
                                            ))
                                    }
                                >
                                    "Mark Delivered"
                                </button>
                            }
                            .into_any()
                        }
                        DeliveryStatus::Delivered => {
                            view! {
                                <span class="flex items-center gap-1.5 text-sm text-emerald-500">
                                    <Icon name=icons::CHECK class="w-4 h-4" />
                                    "Done"
                                </span>
                            }
                            .into_any()
                        }
                    }}
                </div>
            </div>

            // Rating row, shown after delivery
            {(status == DeliveryStatus::Delivered && (!donor_rated || !ngo_rated)).then(|| {
                view! {
                    <div class="mt-4 pt-4 border-t border-theme space-y-2">
                        {(!donor_rated).then(|| {
                            let id = id_for_rate_donor.clone();
                            view! {
                                <RatingRow
                                    label="Rate the donor"
                                    on_pick=Callback::new(move |rating: i16| {
                                        on_rate.run((id.clone(), "donor", rating))
                                    })
                                />
                            }
                        })}
                        {(!ngo_rated).then(|| {
                            let id = id_for_rate_ngo.clone();
                            view! {
                                <RatingRow
                                    label="Rate the NGO"
                                    on_pick=Callback::new(move |rating: i16| {
                                        on_rate.run((id.clone(), "ngo", rating))
                                    })
                                />
                            }
                        })}
                    </div>
                }
            })}
        </div>
    }
}

/// One-to-five star picker
#[component]
fn RatingRow(label: &'static str, on_pick: Callback<i16>) -> impl IntoView {
    view! {
        <div class="flex items-center gap-3">
            <span class="text-sm text-theme-secondary w-28">{label}</span>
            <div class="flex items-center gap-1">
                {(1i16..=5)
                    .map(|rating| {
                        view! {
                            <button
                                class="p-1 rounded hover:bg-theme-secondary transition-colors"
                                aria-label=format!("{} stars", rating)
                                on:click=move |_| on_pick.run(rating)
                            >
                                <Icon name=icons::STAR class="w-4 h-4" />
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
