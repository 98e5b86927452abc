//! Donor dashboard page
//!
//! Lets donors post surplus food, track their donations through the
//! status chain, review NGO requests, and cancel listings that are
//! still available.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::{DonationStatus, DonorStats, FoodCategory, UserRole};
use crate::ui::api::{
    CreateDonationBody, DonationItem, DonationList, RequestList, api_get, api_post,
    api_post_empty,
};
use crate::ui::auth::use_auth_context;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::pages::shell::{DashboardShell, EmptyState, StatCard, StatusBadge};

/// Donor dashboard page
#[component]
pub fn DonorDashboardPage() -> impl IntoView {
    view! {
        <DashboardShell required_role=UserRole::Donor title="Donor Dashboard">
            <DonorContent />
        </DashboardShell>
    }
}

/// Dashboard body, rendered only for authorized donors
#[component]
fn DonorContent() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let stats = RwSignal::new(DonorStats::default());
    let donations = RwSignal::new(Vec::<DonationItem>::new());
    let loading = RwSignal::new(true);
    let show_form = RwSignal::new(false);

    let reload = move || {
        let Some(token) = auth.access_token() else {
            return;
        };
        spawn_local(async move {
            match api_get::<DonorStats>("/api/donations/stats/donor", &token).await {
                Ok(s) => stats.set(s),
                Err(e) => notifications.error("Failed to load stats", e),
            }
            match api_get::<DonationList>("/api/donations/mine", &token).await {
                Ok(list) => donations.set(list.donations),
                Err(e) => notifications.error("Failed to load donations", e),
            }
            loading.set(false);
        });
    };

    // Initial load after hydration
    Effect::new(move |_| reload());

    let on_cancel = move |id: String| {
        let Some(token) = auth.access_token() else {
            return;
        };
        spawn_local(async move {
            match api_post_empty::<DonationItem>(&format!("/api/donations/{}/cancel", id), &token)
                .await
            {
                Ok(_) => {
                    notifications.success("Donation cancelled", "The listing was taken down");
                    reload();
                }
                Err(e) => notifications.error("Could not cancel", e),
            }
        });
    };

    view! {
        // Stats row
        <div class="grid sm:grid-cols-3 gap-4 mb-8">
            {move || {
                let s = stats.get();
                view! {
                    <StatCard label="Total Donations" value=s.total.to_string() icon=icons::HEART />
                    <StatCard label="Active" value=s.active.to_string() icon=icons::CLOCK />
                    <StatCard label="Completed" value=s.completed.to_string() icon=icons::CHECK />
                }
            }}
        </div>

        // New donation toggle
        <div class="flex items-center justify-between mb-4">
            <h2 class="text-xl font-semibold text-theme-primary">"Recent Donations"</h2>
            <button
                class="flex items-center gap-1.5 px-4 py-2 bg-accent-primary hover:bg-accent-primary-hover
                       text-white text-sm font-medium rounded-lg transition-colors"
                on:click=move |_| show_form.update(|v| *v = !*v)
            >
                {move || {
                    if show_form.get() {
                        view! {
                            <Icon name=icons::X class="w-4 h-4" />
                            "Close"
                        }
                        .into_any()
                    } else {
                        view! {
                            <Icon name=icons::PLUS class="w-4 h-4" />
                            "Post Donation"
                        }
                        .into_any()
                    }
                }}
            </button>
        </div>

        // Create form
        {move || {
            show_form.get().then(|| {
                view! {
                    <CreateDonationForm on_created=Callback::new(move |_: ()| {
                        show_form.set(false);
                        reload();
                    }) />
                }
            })
        }}

        // Donation list
        {move || {
            if loading.get() {
                view! {
                    <div class="flex justify-center py-12">
                        <Icon name=icons::LOADER class="w-8 h-8 animate-spin text-accent-primary" />
                    </div>
                }
                .into_any()
            } else if donations.get().is_empty() {
                view! {
                    <EmptyState message="No donations yet. Post your first one to get food moving." />
                }
                .into_any()
            } else {
                view! {
                    <div class="space-y-4">
                        // Newest first from the server; the dashboard shows
                        // the five most recent
                        {donations
                            .get()
                            .into_iter()
                            .take(5)
                            .map(|donation| {
                                view! {
                                    <DonationCard donation=donation on_cancel=Callback::new(on_cancel) />
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_any()
            }
        }}
    }
}

/// Single donation card with cancel and request review actions
#[component]
fn DonationCard(donation: DonationItem, on_cancel: Callback<String>) -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let show_requests = RwSignal::new(false);
    let requests = RwSignal::new(None::<RequestList>);

    let id = donation.id.clone();
    let id_for_requests = donation.id.clone();
    let can_cancel = donation.status == DonationStatus::Available;
    let category = donation.food_category.display_name();

    let on_toggle_requests = move |_| {
        let next = !show_requests.get_untracked();
        show_requests.set(next);

        if next && requests.get_untracked().is_none() {
            let Some(token) = auth.access_token() else {
                return;
            };
            let path = format!("/api/donations/{}/requests", id_for_requests);
            spawn_local(async move {
                match api_get::<RequestList>(&path, &token).await {
                    Ok(list) => requests.set(Some(list)),
                    Err(e) => notifications.error("Failed to load requests", e),
                }
            });
        }
    };

    view! {
        <div class="bg-theme-primary p-5 rounded-xl border border-theme">
            <div class="flex items-start justify-between gap-4">
                <div class="min-w-0">
                    <div class="flex items-center gap-3 mb-1">
                        <h3 class="text-lg font-semibold text-theme-primary truncate">
                            {donation.title.clone()}
                        </h3>
                        <StatusBadge status=donation.status />
                    </div>
                    <p class="text-sm text-theme-secondary mb-2">
                        {category}
                        " · "
                        {donation.quantity.clone()}
                        {donation.unit.clone().map(|u| format!(" {}", u)).unwrap_or_default()}
                    </p>
                    {donation
                        .description
                        .clone()
                        .map(|d| {
                            view! { <p class="text-sm text-theme-secondary mb-2">{d}</p> }
                        })}
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

                <div class="flex flex-col items-end gap-2 flex-shrink-0">
                    {can_cancel.then(|| {
                        let id = id.clone();
                        view! {
                            <button
                                class="px-3 py-1.5 text-sm font-medium text-red-500 border border-red-300 dark:border-red-700
                                       rounded-lg hover:bg-red-50 dark:hover:bg-red-900/20 transition-colors"
                                on:click=move |_| on_cancel.run(id.clone())
                            >
                                "Cancel"
                            </button>
                        }
                    })}
                    <button
                        class="px-3 py-1.5 text-sm font-medium text-theme-secondary border border-theme
                               rounded-lg hover:bg-theme-secondary transition-colors"
                        on:click=on_toggle_requests
                    >
                        {move || if show_requests.get() { "Hide Requests" } else { "View Requests" }}
                    </button>
                </div>
            </div>

            // NGO requests, loaded on demand
            {move || {
                show_requests.get().then(|| {
                    match requests.get() {
                        None => view! {
                            <div class="mt-4 pt-4 border-t border-theme flex justify-center">
                                <Icon name=icons::LOADER class="w-5 h-5 animate-spin text-accent-primary" />
                            </div>
                        }
                        .into_any(),
                        Some(list) if list.requests.is_empty() => view! {
                            <div class="mt-4 pt-4 border-t border-theme">
                                <p class="text-sm text-theme-tertiary">"No NGO requests yet."</p>
                            </div>
                        }
                        .into_any(),
                        Some(list) => view! {
                            <div class="mt-4 pt-4 border-t border-theme space-y-2">
                                {list
                                    .requests
                                    .into_iter()
                                    .map(|req| {
                                        view! {
                                            <div class="text-sm text-theme-secondary flex items-center gap-2">
                                                <Icon name=icons::BOX class="w-4 h-4 text-accent-primary flex-shrink-0" />
                                                <span>
                                                    {req
                                                        .request_message
                                                        .unwrap_or_else(|| "Requested this donation".to_string())}
                                                </span>
                                                {req
                                                    .distance_km
                                                    .map(|km| {
                                                        view! {
                                                            <span class="text-xs text-theme-tertiary">
                                                                {format!("{:.1} km away", km)}
                                                            </span>
                                                        }
                                                    })}
                                            </div>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                        .into_any(),
                    }
                })
            }}
        </div>
    }
}

/// Inline form for posting a new donation
#[component]
fn CreateDonationForm(on_created: Callback<()>) -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let category = RwSignal::new(FoodCategory::CookedFood);
    let quantity = RwSignal::new(String::new());
    let unit = RwSignal::new(String::new());
    let expire_at = RwSignal::new(String::new());
    let pickup_address = RwSignal::new(String::new());
    let pickup_city = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let form_error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let title_val = title.get().trim().to_string();
        let quantity_val = quantity.get().trim().to_string();
        let expire_val = expire_at.get();
        let address_val = pickup_address.get().trim().to_string();
        let city_val = pickup_city.get().trim().to_string();

        if title_val.is_empty()
            || quantity_val.is_empty()
            || expire_val.is_empty()
            || address_val.is_empty()
            || city_val.is_empty()
        {
            form_error.set(Some(
                "Title, quantity, expiry, address, and city are required".to_string(),
            ));
            return;
        }
        form_error.set(None);

        let Some(token) = auth.access_token() else {
            return;
        };

        let description_val = description.get().trim().to_string();
        let unit_val = unit.get().trim().to_string();

        let body = CreateDonationBody {
            title: title_val,
            description: (!description_val.is_empty()).then_some(description_val),
            food_category: category.get(),
            quantity: quantity_val,
            unit: (!unit_val.is_empty()).then_some(unit_val),
            // datetime-local gives minute precision without a zone
            expire_at: format!("{}:00Z", expire_val),
            pickup_address: address_val,
            pickup_city: city_val,
        };

        submitting.set(true);
        spawn_local(async move {
            match api_post::<CreateDonationBody, DonationItem>("/api/donations", &token, &body)
                .await
            {
                Ok(_) => {
                    notifications.success("Donation posted", "NGOs in your city can now see it");
                    title.set(String::new());
                    description.set(String::new());
                    quantity.set(String::new());
                    unit.set(String::new());
                    expire_at.set(String::new());
                    pickup_address.set(String::new());
                    pickup_city.set(String::new());
                    on_created.run(());
                }
                Err(e) => notifications.error("Could not post donation", e),
            }
            submitting.set(false);
        });
    };

    let input_class = "w-full px-3 py-2 bg-theme-secondary border border-theme rounded-lg \
                       text-theme-primary placeholder-theme-tertiary \
                       focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent \
                       transition-colors";

    view! {
        <div class="bg-theme-primary p-6 rounded-xl border border-theme mb-6">
            <form on:submit=on_submit class="space-y-4">
                {move || {
                    form_error.get().map(|error| {
                        view! {
                            <div class="p-3 bg-red-100 dark:bg-red-900/30 border border-red-300 dark:border-red-700 rounded-lg">
                                <p class="text-sm text-red-700 dark:text-red-300">{error}</p>
                            </div>
                        }
                    })
                }}

                <div class="grid sm:grid-cols-2 gap-4">
                    <div>
                        <label for="donation_title" class="block text-sm font-medium text-theme-primary mb-1">
                            "Title"
                        </label>
                        <input
                            type="text"
                            id="donation_title"
                            placeholder="20 portions of vegetable biryani"
                            class=input_class
                            prop:value=move || title.get()
                            on:input=move |ev| title.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label for="donation_category" class="block text-sm font-medium text-theme-primary mb-1">
                            "Category"
                        </label>
                        <select
                            id="donation_category"
                            class=input_class
                            on:change=move |ev| {
                                if let Ok(parsed) = event_target_value(&ev).parse::<FoodCategory>() {
                                    category.set(parsed);
                                }
                            }
                        >
                            {FoodCategory::ALL
                                .into_iter()
                                .map(|c| {
                                    view! {
                                        <option value=c.as_str() selected=move || category.get() == c>
                                            {c.display_name()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <div>
                        <label for="donation_quantity" class="block text-sm font-medium text-theme-primary mb-1">
                            "Quantity"
                        </label>
                        <input
                            type="text"
                            id="donation_quantity"
                            placeholder="20"
                            class=input_class
                            prop:value=move || quantity.get()
                            on:input=move |ev| quantity.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label for="donation_unit" class="block text-sm font-medium text-theme-primary mb-1">
                            "Unit (optional)"
                        </label>
                        <input
                            type="text"
                            id="donation_unit"
                            placeholder="portions"
                            class=input_class
                            prop:value=move || unit.get()
                            on:input=move |ev| unit.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label for="donation_expire" class="block text-sm font-medium text-theme-primary mb-1">
                            "Good Until"
                        </label>
                        <input
                            type="datetime-local"
                            id="donation_expire"
                            class=input_class
                            prop:value=move || expire_at.get()
                            on:input=move |ev| expire_at.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label for="donation_city" class="block text-sm font-medium text-theme-primary mb-1">
                            "City"
                        </label>
                        <input
                            type="text"
                            id="donation_city"
                            placeholder="Mumbai"
                            class=input_class
                            prop:value=move || pickup_city.get()
                            on:input=move |ev| pickup_city.set(event_target_value(&ev))
                        />
                    </div>
                </div>

                <div>
                    <label for="donation_address" class="block text-sm font-medium text-theme-primary mb-1">
                        "Pickup Address"
                    </label>
                    <input
                        type="text"
                        id="donation_address"
                        placeholder="12 Hill Road, Bandra West"
                        class=input_class
                        prop:value=move || pickup_address.get()
                        on:input=move |ev| pickup_address.set(event_target_value(&ev))
                    />
                </div>

                <div>
                    <label for="donation_description" class="block text-sm font-medium text-theme-primary mb-1">
                        "Description (optional)"
                    </label>
                    <textarea
                        id="donation_description"
                        rows="2"
                        placeholder="Freshly cooked today, packed in foil containers"
                        class=input_class
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                </div>

                <button
                    type="submit"
                    class="w-full sm:w-auto px-6 py-2.5 bg-accent-primary hover:bg-accent-primary-hover
                           text-white font-medium rounded-lg
                           disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                    disabled=move || submitting.get()
                >
                    {move || {
                        if submitting.get() {
                            view! {
                                <span class="flex items-center justify-center">
                                    <Icon name=icons::LOADER class="animate-spin -ml-1 mr-2 h-4 w-4" />
                                    "Posting..."
                                </span>
                            }
                            .into_any()
                        } else {
                            view! { <span class="block">"Post Donation"</span> }.into_any()
                        }
                    }}
                </button>
            </form>
        </div>
    }
}
