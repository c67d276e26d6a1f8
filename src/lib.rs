pub mod auth;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod settings;
pub mod status;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use settings::SettingsStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::list_orders,
        handlers::orders::create_order,
        handlers::orders::track_order,
        handlers::orders::update_order_status,
        handlers::stock::list_stock,
        handlers::stock::set_quantity,
        handlers::stock::set_minimum,
        handlers::stock::sync_stock,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::stats::sales_summary,
        handlers::stats::dashboard,
        handlers::settings::get_settings,
        handlers::settings::put_settings,
    ),
    tags(
        (name = "orders", description = "Storefront checkout and order lifecycle"),
        (name = "stock", description = "On-hand quantities and thresholds"),
        (name = "products", description = "Catalog management"),
        (name = "customers", description = "Customer records"),
        (name = "reporting", description = "Sales aggregation and dashboard counters"),
        (name = "settings", description = "Store preferences document"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    settings_store: SettingsStore,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(settings_store.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::patch().to(handlers::orders::update_order_status))
                    .route("/track/{number}", web::get().to(handlers::orders::track_order)),
            )
            .service(
                web::scope("/stock")
                    .route("", web::get().to(handlers::stock::list_stock))
                    .route("", web::post().to(handlers::stock::set_quantity))
                    .route("", web::put().to(handlers::stock::set_minimum))
                    .route("/sync", web::post().to(handlers::stock::sync_stock)),
            )
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::products::list_products))
                    .route("", web::post().to(handlers::products::create_product))
                    .route("/{id}", web::get().to(handlers::products::get_product))
                    .route("/{id}", web::put().to(handlers::products::update_product))
                    .route("/{id}", web::delete().to(handlers::products::delete_product)),
            )
            .service(
                web::scope("/customers")
                    .route("", web::get().to(handlers::customers::list_customers))
                    .route("", web::post().to(handlers::customers::create_customer))
                    .route("/{id}", web::put().to(handlers::customers::update_customer))
                    .route("/{id}", web::delete().to(handlers::customers::delete_customer)),
            )
            .route("/sales/summary", web::get().to(handlers::stats::sales_summary))
            .route("/stats/dashboard", web::get().to(handlers::stats::dashboard))
            .route("/settings", web::get().to(handlers::settings::get_settings))
            .route("/settings", web::put().to(handlers::settings::put_settings))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
