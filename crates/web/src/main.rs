use anyhow::Context;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::{books, catalog, imports, sitemap};
use middleware::auth::ApiKeys;
use state::{AppState, ImportState, SiteUrl};

#[derive(OpenApi)]
#[openapi(
    paths(
        books::handlers::list_books,
        books::handlers::get_book,
        books::handlers::create_book,
        books::handlers::delete_book,
        books::handlers::list_images,
        books::handlers::add_image,
        books::handlers::remove_image,
        books::handlers::reorder_images,
        catalog::handlers::list_benefits,
        catalog::handlers::list_categories,
        imports::handlers::import_books,
        imports::handlers::import_status,
        sitemap::handlers::sitemap,
    ),
    components(
        schemas(
            storage::dto::book::BookResponse,
            storage::dto::book::BookDetailResponse,
            storage::dto::book::CreateBookRequest,
            storage::dto::image::AddImageRequest,
            storage::dto::image::ReorderImagesRequest,
            storage::dto::common::PaginationMeta,
            storage::models::Book,
            storage::models::BookImage,
            storage::models::Benefit,
            storage::models::Category,
            imports::handlers::ImportSummaryResponse,
            imports::handlers::ImportStatusResponse,
        )
    ),
    tags(
        (name = "books", description = "Book browsing and submission"),
        (name = "images", description = "Admin image management"),
        (name = "catalog", description = "Benefits and categories"),
        (name = "imports", description = "Admin bulk JSON import"),
        (name = "sitemap", description = "Search engine sitemap"),
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
                        .bearer_format("API Key")
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

    tracing::info!("Starting book directory API");

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

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty: admin routes will reject every request");
    }

    tracing::info!(
        "Bulk import: benefit resolution {}, relation policy {:?}",
        config.import_options.benefit_resolution,
        config.import_options.relation_policy
    );

    let state = AppState {
        db,
        api_keys,
        imports: ImportState::new(config.import_options),
        site_url: SiteUrl::new(&config.site_url),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
