use std::sync::Arc;

use anyhow::Context;
use catalog::CatalogClient;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod session;
mod state;

use config::Config;
use features::recents::refresher;
use middleware::auth::Moderators;
use session::ProviderSessions;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::courses::handlers::list_courses,
        features::courses::handlers::get_course_stats,
        features::courses::handlers::get_course,
        features::courses::handlers::list_course_reviews,
        features::recents::handlers::get_recents,
        features::recents::handlers::get_course_recents,
        features::reviews::handlers::list_recent_reviews,
        features::reviews::handlers::get_review,
        features::reviews::handlers::create_review,
        features::reviews::handlers::update_review,
        features::reviews::handlers::delete_review,
        features::users::handlers::get_me,
        features::users::handlers::create_user,
        features::users::handlers::list_my_reviews,
        features::reference::handlers::list_departments,
        features::reference::handlers::list_programs,
        features::reference::handlers::list_semesters,
    ),
    components(
        schemas(
            storage::dto::review::CreateReviewRequest,
            storage::dto::review::UpdateReviewRequest,
            storage::dto::course::CourseStats,
            storage::dto::course::CourseWithStats,
            storage::dto::common::PaginationMeta,
            storage::services::payload::SortDirection,
            storage::models::Review,
            storage::models::Course,
            storage::models::User,
            storage::models::Semester,
            catalog::models::Department,
            catalog::models::Program,
            catalog::models::SemesterInfo,
        )
    ),
    tags(
        (name = "courses", description = "Course catalog and review statistics"),
        (name = "reviews", description = "Review submission and lookup"),
        (name = "recents", description = "Recent review feed"),
        (name = "users", description = "Profiles of signed-in users"),
        (name = "reference", description = "Static reference data"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting OMSHub API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let sessions = ProviderSessions::new(&config.auth_url, &config.auth_anon_key)
        .context("Failed to build auth client")?;
    let catalog = CatalogClient::new(&config.catalog_base_url, config.catalog_cache_ttl)
        .context("Failed to build catalog client")?;

    let state = AppState::new(
        Arc::new(db),
        Arc::new(sessions),
        Arc::new(catalog),
        Moderators::from_comma_separated(&config.moderator_ids),
        config.recents_size,
        config.recents_buffer,
    );

    refresher::spawn(state.clone(), config.recents_refresh);
    tracing::info!(
        "Recency window refresh every {}s ({} + {} reviews)",
        config.recents_refresh.as_secs(),
        config.recents_size,
        config.recents_buffer
    );

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);

    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
