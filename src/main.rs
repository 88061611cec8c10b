mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::{MongoDB, Store};
use crate::services::Authorizer;

fn cors(config: &AppConfig) -> Cors {
    let cors = if config.cors_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🚀 Starting Course Matcher...");

    let db = MongoDB::new(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!("✅ MongoDB connected successfully");

    if config.admin_emails.is_empty() {
        log::warn!("⚠️  ADMIN_EMAILS is empty: only users with the admin role can manage the catalog");
    }

    let bind_address = config.bind_address();
    let db = Arc::new(db);
    let store: web::Data<dyn Store> = web::Data::from(db.clone() as Arc<dyn Store>);
    let db_data = web::Data::from(db);
    let authorizer = web::Data::new(Authorizer::new(&config.admin_emails));
    let config_data = web::Data::new(config);

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(store.clone())
            .app_data(config_data.clone())
            .app_data(authorizer.clone())
            .wrap(cors(&config_data))
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .route("/", web::get().to(api::health::index))
            .route("/health", web::get().to(api::health::health_check))
            .configure(api::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
