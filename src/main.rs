#![recursion_limit = "4096"]

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use foodbridge::app::*;
    use foodbridge::core::auth::{AuthApiState, AuthService, JwtService, auth_api_router};
    use foodbridge::core::config::Config;
    use foodbridge::core::db::{
        AnalyticsRepository, DbConfig, DeliveryRepository, DonationRepository, ProfileRepository,
        RoleRepository, SessionRepository, UserRepository, create_pool_with_migrations,
    };
    use foodbridge::core::deliveries::{DeliveryApiState, delivery_api_router};
    use foodbridge::core::donations::{DonationApiState, donation_api_router};
    use foodbridge::core::profiles::{ProfileApiState, profile_api_router};
    use leptos::logging::log;
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use tower_http::compression::{CompressionLayer, CompressionLevel};
    use tower_http::services::ServeDir;

    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load application config from environment variables
    let config = Config::from_env();

    // Log config status (without revealing secrets)
    tracing::info!(
        "Config loaded: database={}, jwt_secret={}",
        config.has_database(),
        config.has_jwt_secret()
    );

    // Connect to PostgreSQL and apply pending migrations
    let db_config = DbConfig {
        database_url: config.database_url_or_panic().to_string(),
        ..Default::default()
    };
    let pool = create_pool_with_migrations(&db_config)
        .await
        .expect("Failed to connect to database");

    // Repositories
    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let role_repo = RoleRepository::new(pool.clone());
    let profile_repo = ProfileRepository::new(pool.clone());
    let donation_repo = DonationRepository::new(pool.clone());
    let delivery_repo = DeliveryRepository::new(pool.clone());
    let analytics_repo = AnalyticsRepository::new(pool.clone());

    // Auth services
    let jwt_service = JwtService::from_env().expect("Failed to create JWT service");
    let auth_service = AuthService::new(user_repo, session_repo, jwt_service.clone());

    // Load configuration from Cargo.toml [package.metadata.leptos]
    // Can be overridden via LEPTOS_SITE_ADDR env var for Docker/K8s
    let conf = get_configuration(None).unwrap();
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    // Generate the list of routes in your Leptos App
    let routes = generate_route_list(App);

    // Create ServeDir for pkg with pre-compressed file support
    // This serves .br (brotli) and .gz (gzip) files automatically
    let pkg_service = ServeDir::new(format!("{}/pkg", leptos_options.site_root))
        .precompressed_br()
        .precompressed_gzip();

    // Build the Leptos router
    let leptos_router = Router::new()
        // Serve pre-compressed static assets from /pkg
        .nest_service("/pkg", pkg_service)
        .leptos_routes(&leptos_options, routes, {
            let leptos_options = leptos_options.clone();
            move || shell(leptos_options.clone())
        })
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options);

    // REST API routers
    let auth_api = auth_api_router(AuthApiState { auth_service });
    let donation_api = donation_api_router(DonationApiState {
        donation_repo,
        role_repo: role_repo.clone(),
        jwt_service: jwt_service.clone(),
    });
    let delivery_api = delivery_api_router(DeliveryApiState {
        delivery_repo,
        role_repo: role_repo.clone(),
        jwt_service: jwt_service.clone(),
    });
    let profile_api = profile_api_router(ProfileApiState {
        profile_repo,
        role_repo,
        analytics_repo,
        jwt_service,
    });

    // Build the main application router with compression
    let app = Router::new()
        .merge(auth_api)
        .merge(donation_api)
        .merge(delivery_api)
        .merge(profile_api)
        // Leptos routes (merged last so the fallback catches everything else)
        .merge(leptos_router)
        // Add compression with Brotli priority (best compression for web)
        // Compresses responses > 1KB, skips already compressed formats
        .layer(
            CompressionLayer::new()
                .br(true) // Brotli - best compression ratio
                .gzip(true) // Gzip - wide support fallback
                .quality(CompressionLevel::Best),
        );

    // Run our app with hyper
    log!("listening on http://{}", &addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // unless we want this to work with e.g., Trunk for pure client-side testing
    // see lib.rs for hydration function instead
}
