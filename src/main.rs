//! Salon Booking Server
//!
//! REST API server for appointment booking and salon statistics.

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon_booking_server::{
    api,
    config::AppConfig,
    error::attach_request_path,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("salon_booking_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Salon Booking Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    tracing::info!(
        conflict_policy = ?config.booking.conflict_policy,
        enforce_availability = config.booking.enforce_availability,
        revenue_mode = ?config.statistics.revenue_mode,
        "Booking configuration"
    );

    let services = Services::new(Repository::new(pool.clone()), &config);
    services
        .auth
        .bootstrap_admin()
        .await
        .context("Failed to create bootstrap admin")?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        pool,
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Appointments
        .route(
            "/appointments/by-date-range",
            get(api::appointments::list_by_date_range),
        )
        .route("/appointments", post(api::appointments::create_appointment))
        .route(
            "/appointments/:id",
            get(api::appointments::get_appointment)
                .put(api::appointments::update_appointment)
                .delete(api::appointments::delete_appointment),
        )
        .route("/availability/check", get(api::availability::check_availability))
        // Service catalog
        .route(
            "/services",
            get(api::catalog::list_services).post(api::catalog::create_service),
        )
        .route(
            "/services/:id",
            get(api::catalog::get_service)
                .put(api::catalog::update_service)
                .delete(api::catalog::delete_service),
        )
        // Customers
        .route(
            "/customers",
            get(api::customers::list_customers).post(api::customers::create_customer),
        )
        .route(
            "/customers/:id",
            get(api::customers::get_customer)
                .put(api::customers::update_customer)
                .delete(api::customers::delete_customer),
        )
        // Schedules
        .route(
            "/workinghours",
            get(api::schedules::list_working_hours).post(api::schedules::upsert_working_hours),
        )
        .route(
            "/blockedtimeslots",
            get(api::schedules::list_blocked_slots).post(api::schedules::create_blocked_slot),
        )
        .route(
            "/blockedtimeslots/:id",
            put(api::schedules::update_blocked_slot).delete(api::schedules::delete_blocked_slot),
        )
        .route(
            "/blockedtimeslots/date/:date",
            get(api::schedules::blocked_slots_for_date),
        )
        // Statistics
        .route("/statistics/detailed-counts", get(api::stats::detailed_counts))
        .route("/statistics/by-day-of-week", get(api::stats::by_day_of_week))
        .route("/statistics/by-service", get(api::stats::by_service))
        .route("/statistics/by-hour", get(api::stats::by_hour))
        .route("/statistics/utilization", get(api::stats::utilization))
        .route(
            "/statistics/today-upcoming-appointments",
            get(api::stats::today_upcoming),
        )
        // Reports
        .route("/reports", get(api::reports::get_report))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(middleware::from_fn(attach_request_path))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
