//! Application root component and router
//!
//! Wires up the global contexts (theme, auth, notifications) and maps
//! routes to pages: the public landing and auth pages, the one-time role
//! selection step, and the three role dashboards.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::ui::notifications::{NotificationsContainer, provide_notification_context};
use crate::ui::pages::{
    AuthPage, DonorDashboardPage, LandingPage, NgoDashboardPage, NotFoundPage, SelectRolePage,
    VolunteerDashboardPage,
};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provides a context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    // Global contexts, in dependency order: theme first, then auth
    // (its restore effect must run before any page guard), then toasts
    crate::ui::theme::provide_theme_context();
    crate::ui::auth::provide_auth_context();
    let notifications = provide_notification_context();

    view! {
        // Injects a stylesheet into the document <head>
        <Stylesheet id="leptos" href="/pkg/foodbridge.css" />

        // Sets the document title
        <Title text="FoodBridge - Surplus Food Redistribution" />

        // Toasts render above every page
        <NotificationsContainer notifications=notifications.notifications() />

        <Router>
            <main>
                <Routes fallback=NotFoundPage>
                    <Route path=path!("") view=LandingPage />
                    <Route path=path!("/auth") view=AuthPage />
                    <Route path=path!("/select-role") view=SelectRolePage />
                    <Route path=path!("/dashboard/donor") view=DonorDashboardPage />
                    <Route path=path!("/dashboard/ngo") view=NgoDashboardPage />
                    <Route path=path!("/dashboard/volunteer") view=VolunteerDashboardPage />
                </Routes>
            </main>
        </Router>
    }
}
