//! Landing page component
//!
//! The public home page for FoodBridge featuring:
//! - SEO meta tags for search engine optimization
//! - Hero section with a get-started button
//! - "How it works" section walking through the donor, NGO, and volunteer flow
//! - Features section with benefit cards
//! - Call-to-action and footer sections

use leptos::prelude::*;
use leptos_meta::{Link, Meta, Title};
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::ui::auth::{AuthState, use_auth_context};
use crate::ui::icon::{Icon, icons};
use crate::ui::pages::shell::Logo;
use crate::ui::theme::{ThemeMode, use_theme_context};

/// Landing page component
#[component]
pub fn LandingPage() -> impl IntoView {
    let auth = use_auth_context();
    let navigate = use_navigate();

    // Get Started button handler
    let on_get_started = move |_| {
        if matches!(auth.state.get(), AuthState::Authenticated(_)) {
            match auth.role.get() {
                Some(role) => navigate(role.dashboard_path(), Default::default()),
                None => navigate("/select-role", Default::default()),
            }
        } else {
            navigate("/auth", Default::default());
        }
    };

    view! {
        <SeoMeta />

        <div class="min-h-screen bg-theme-primary overflow-x-hidden">
            <Header />

            // Hero Section
            <section class="min-h-screen flex items-center justify-center relative pt-16">
                <div class="text-center px-4 max-w-4xl mx-auto">
                    <h1 class="text-5xl sm:text-6xl lg:text-7xl font-bold text-theme-primary mb-6 tracking-tight
                               landing-fade-in-up">
                        "FoodBridge"
                    </h1>
                    <p class="text-xl sm:text-2xl text-theme-secondary max-w-2xl mx-auto mb-10 leading-relaxed
                              landing-fade-in-up landing-delay-200">
                        "Surplus food shouldn't end up in landfills. Connect restaurants and households with NGOs and volunteers who get it to people in need."
                    </p>

                    <div class="flex flex-col sm:flex-row items-center justify-center gap-4 landing-fade-in-up landing-delay-400">
                        <button
                            class="landing-btn-primary"
                            on:click=on_get_started
                            aria-label="Get started with FoodBridge"
                        >
                            "Get Started"
                        </button>
                        <a
                            href="#how-it-works"
                            class="landing-btn-secondary"
                            aria-label="Learn how FoodBridge works"
                        >
                            "How It Works"
                        </a>
                    </div>
                </div>

                // Background decoration
                <div class="absolute inset-0 -z-10 overflow-hidden" aria-hidden="true">
                    <div class="absolute top-1/4 left-1/4 w-96 h-96 bg-green-500/5 rounded-full blur-3xl"></div>
                    <div class="absolute bottom-1/4 right-1/4 w-96 h-96 bg-emerald-500/5 rounded-full blur-3xl"></div>
                </div>
            </section>

            // How It Works Section
            <section id="how-it-works" class="py-20 px-4 bg-theme-secondary/10">
                <div class="max-w-6xl mx-auto">
                    <div class="text-center mb-16 landing-scroll-animate">
                        <h2 class="text-3xl sm:text-4xl font-bold text-theme-primary mb-4">
                            "How It Works"
                        </h2>
                        <p class="text-lg text-theme-secondary max-w-2xl mx-auto">
                            "Three roles, one bridge. Every donation moves from a kitchen to a community in three steps."
                        </p>
                    </div>

                    <div class="grid md:grid-cols-3 gap-8">
                        <StepCard
                            step="1"
                            icon=icons::HEART
                            title="Donors Post"
                            description="Restaurants, grocers, and households post surplus food with quantity, pickup address, and expiry."
                        />
                        <StepCard
                            step="2"
                            icon=icons::BOX
                            title="NGOs Accept"
                            description="Verified organizations browse nearby donations and accept the ones their communities need."
                        />
                        <StepCard
                            step="3"
                            icon=icons::TRUCK
                            title="Volunteers Deliver"
                            description="Volunteers claim accepted donations, pick them up, and confirm delivery to the NGO."
                        />
                    </div>
                </div>
            </section>

            // Features Section
            <section class="py-20 px-4">
                <div class="max-w-6xl mx-auto">
                    <div class="text-center mb-16 landing-scroll-animate">
                        <h2 class="text-3xl sm:text-4xl font-bold text-theme-primary mb-4">
                            "Why FoodBridge?"
                        </h2>
                        <p class="text-lg text-theme-secondary max-w-2xl mx-auto">
                            "Built so that food already cooked or harvested never goes to waste."
                        </p>
                    </div>

                    <div class="grid md:grid-cols-3 gap-8">
                        <FeatureCard
                            icon=icons::CLOCK
                            title="Expiry-Aware"
                            description="Donations carry expiry windows so time-sensitive food gets matched first."
                        />
                        <FeatureCard
                            icon=icons::MAP_PIN
                            title="Local First"
                            description="Every listing shows its pickup address and city, keeping trips short and food fresh."
                        />
                        <FeatureCard
                            icon=icons::CHECK
                            title="Tracked End to End"
                            description="Every donation moves through a clear status chain from posted to delivered."
                        />
                        <FeatureCard
                            icon=icons::STAR
                            title="Mutual Ratings"
                            description="Volunteers, donors, and NGOs rate each other after every delivery."
                        />
                        <FeatureCard
                            icon=icons::USER
                            title="One Role, One Focus"
                            description="Pick donor, NGO, or volunteer once and get a dashboard built for that job."
                        />
                        <FeatureCard
                            icon=icons::BOX
                            title="Seven Food Categories"
                            description="From cooked meals to bakery goods, categories keep listings easy to scan."
                        />
                    </div>
                </div>
            </section>

            // CTA Section
            <section class="py-24 px-4 bg-gradient-to-b from-transparent to-theme-secondary/30">
                <div class="max-w-4xl mx-auto text-center landing-scroll-animate">
                    <h2 class="text-3xl sm:text-4xl font-bold text-theme-primary mb-4">
                        "Ready to move some food?"
                    </h2>
                    <p class="text-lg text-theme-secondary mb-8 max-w-xl mx-auto">
                        "Join donors, NGOs, and volunteers who make sure good food reaches good people."
                    </p>
                    <A
                        href="/auth"
                        attr:class="landing-btn-primary inline-block"
                    >
                        "Create an Account"
                    </A>
                </div>
            </section>

            <Footer />

            <LandingStyles />
            <ScrollAnimationScript />
        </div>
    }
}

/// Landing header with auth buttons for anonymous visitors
#[component]
fn Header() -> impl IntoView {
    let auth = use_auth_context();
    let theme = use_theme_context();

    view! {
        <header class="fixed top-0 left-0 right-0 z-50 bg-theme-primary/80 backdrop-blur-md border-b border-theme/50">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex items-center justify-between h-16">
                    <A href="/" attr:class="flex items-center gap-3 hover:opacity-80 transition-opacity">
                        <Logo />
                        <span class="text-xl font-bold text-theme-primary">"FoodBridge"</span>
                    </A>

                    <div class="flex items-center gap-4">
                        <nav class="hidden sm:flex items-center gap-4">
                            <a href="#how-it-works" class="text-sm font-medium text-theme-secondary hover:text-theme-primary transition-colors">
                                "How It Works"
                            </a>
                        </nav>

                        {move || {
                            match auth.state.get() {
                                AuthState::Authenticated(_) => {
                                    let target = auth
                                        .role
                                        .get()
                                        .map(|r| r.dashboard_path())
                                        .unwrap_or("/select-role");
                                    view! {
                                        <A
                                            href=target
                                            attr:class="px-4 py-2 text-sm font-medium text-white bg-accent-primary hover:bg-accent-primary-hover rounded-lg transition-colors shadow-md"
                                        >
                                            "Dashboard"
                                        </A>
                                    }
                                    .into_any()
                                }
                                _ => {
                                    view! {
                                        <A
                                            href="/auth"
                                            attr:class="px-4 py-2 text-sm font-medium text-white bg-accent-primary hover:bg-accent-primary-hover rounded-lg transition-colors shadow-md"
                                        >
                                            "Sign In"
                                        </A>
                                    }
                                    .into_any()
                                }
                            }
                        }}

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
            </div>
        </header>
    }
}

/// Numbered step card for the "How It Works" section
#[component]
fn StepCard(
    step: &'static str,
    icon: &'static str,
    title: &'static str,
    description: &'static str,
) -> impl IntoView {
    view! {
        <div class="landing-scroll-animate bg-theme-primary p-6 rounded-xl border border-theme hover:border-accent-primary/50
                    transition-all duration-300 hover:shadow-lg hover:-translate-y-1 relative">
            <span class="absolute top-4 right-5 text-4xl font-bold text-theme-tertiary/30" aria-hidden="true">
                {step}
            </span>
            <div class="w-12 h-12 rounded-lg bg-accent-primary/10 flex items-center justify-center mb-4">
                <Icon name=icon class="w-6 h-6 text-accent-primary" />
            </div>
            <h3 class="text-lg font-semibold text-theme-primary mb-2">{title}</h3>
            <p class="text-theme-secondary text-sm leading-relaxed">{description}</p>
        </div>
    }
}

/// Feature card component
#[component]
fn FeatureCard(
    icon: &'static str,
    title: &'static str,
    description: &'static str,
) -> impl IntoView {
    view! {
        <div class="landing-scroll-animate bg-theme-primary p-6 rounded-xl border border-theme hover:border-accent-primary/50
                    transition-all duration-300 hover:shadow-lg hover:-translate-y-1">
            <div class="w-12 h-12 rounded-lg bg-accent-primary/10 flex items-center justify-center mb-4">
                <Icon name=icon class="w-6 h-6 text-accent-primary" />
            </div>
            <h3 class="text-lg font-semibold text-theme-primary mb-2">{title}</h3>
            <p class="text-theme-secondary text-sm leading-relaxed">{description}</p>
        </div>
    }
}

/// SEO Meta tags component using leptos_meta
#[component]
fn SeoMeta() -> impl IntoView {
    view! {
        <Title text="FoodBridge - Surplus Food Redistribution" />

        <Meta name="description" content="Connect surplus food with people who need it. Donors post food, NGOs accept it, volunteers deliver it. Free to use." />
        <Meta name="keywords" content="food donation, food waste, surplus food, NGO, volunteer delivery, food redistribution, food rescue" />

        <Meta property="og:type" content="website" />
        <Meta property="og:title" content="FoodBridge - Surplus Food Redistribution" />
        <Meta property="og:description" content="Connect surplus food with people who need it. Donors post food, NGOs accept it, volunteers deliver it." />

        <Link rel="canonical" href="https://foodbridge.example.org/" />
    }
}

/// Footer component
#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer class="py-12 border-t border-theme bg-theme-primary">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex flex-col sm:flex-row items-center justify-between gap-4">
                    <div class="flex items-center gap-3">
                        <Logo />
                        <span class="text-xl font-bold text-theme-primary">"FoodBridge"</span>
                    </div>
                    <span class="text-sm text-theme-tertiary">
                        "© 2026 FoodBridge. Good food belongs on plates."
                    </span>
                </div>
            </div>
        </footer>
    }
}

/// CSS styles for landing page animations
#[component]
fn LandingStyles() -> impl IntoView {
    view! {
        <style>
            r#"
            /* Button styles */
            .landing-btn-primary {
                padding: 1rem 2rem;
                font-weight: 600;
                font-size: 1.125rem;
                color: white;
                background-color: #16a34a;
                border-radius: 0.75rem;
                transition: all 0.3s;
                transform: scale(1);
                box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1);
                cursor: pointer;
            }
            .landing-btn-primary:hover {
                transform: scale(1.05);
                background-color: #15803d;
            }

            .landing-btn-secondary {
                padding: 1rem 2rem;
                font-weight: 600;
                font-size: 1.125rem;
                border: 2px solid #9ca3af;
                border-radius: 0.75rem;
                transition: all 0.3s;
                box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1);
                background-color: #f9fafb;
                color: #374151;
            }
            .dark .landing-btn-secondary {
                background-color: #1f2937;
                border-color: #6b7280;
                color: #e5e7eb;
            }
            .landing-btn-secondary:hover {
                transform: scale(1.05);
                box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1);
            }

            /* Fade in up animation */
            @keyframes landing-fade-in-up {
                from {
                    opacity: 0;
                    transform: translateY(20px);
                }
                to {
                    opacity: 1;
                    transform: translateY(0);
                }
            }

            .landing-fade-in-up {
                animation: landing-fade-in-up 0.6s ease-out forwards;
            }

            .landing-delay-200 {
                animation-delay: 0.2s;
                opacity: 0;
            }

            .landing-delay-400 {
                animation-delay: 0.4s;
                opacity: 0;
            }

            /* Scroll animations */
            .landing-scroll-animate {
                opacity: 0;
                transform: translateY(30px);
                transition: opacity 0.6s ease-out, transform 0.6s ease-out;
            }

            .landing-scroll-animate.visible {
                opacity: 1;
                transform: translateY(0);
            }
            "#
        </style>
    }
}

/// Script for scroll-triggered animations using IntersectionObserver
#[component]
fn ScrollAnimationScript() -> impl IntoView {
    view! {
        <script>
            r#"
            (function() {
                function initScrollAnimations() {
                    const observer = new IntersectionObserver((entries) => {
                        entries.forEach(entry => {
                            if (entry.isIntersecting) {
                                entry.target.classList.add('visible');
                            }
                        });
                    }, {
                        threshold: 0.1,
                        rootMargin: '0px 0px -50px 0px'
                    });

                    document.querySelectorAll('.landing-scroll-animate').forEach(el => {
                        observer.observe(el);
                    });
                }

                if (document.readyState === 'loading') {
                    document.addEventListener('DOMContentLoaded', initScrollAnimations);
                } else {
                    initScrollAnimations();
                }
            })();
            "#
        </script>
    }
}
