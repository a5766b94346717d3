mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::services::{MatchLedger, UserDirectory};

const DEFAULT_ORIGINS: &str = "http://localhost:8081,http://localhost:19006,http://127.0.0.1:8081,http://127.0.0.1:19006";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    let allowed_origins: Vec<String> = env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| DEFAULT_ORIGINS.to_string())
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if env::var("JWT_SECRET").is_err() {
        log::warn!("⚠️  JWT_SECRET not set, using the development default");
    }

    log::info!("🚀 Starting Matching Service...");
    api::health::mark_started();

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    let db = Arc::new(db);
    let directory: Arc<dyn UserDirectory> = db.clone();
    let ledger = web::Data::new(MatchLedger::new(db, directory.clone()));
    let directory = web::Data::from(directory);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(ledger.clone())
            .app_data(directory.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))

            // ==================== MATCHING LEDGER ====================
            // The token subject is the acting user for every operation
            .service(
                web::scope("/api/v1/matching")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/likes/{target_id}", web::post().to(api::matching::like_user))
                    .route("/seen/{target_id}", web::post().to(api::matching::mark_seen))
                    .route("/matches/{other_id}", web::get().to(api::matching::check_match))
                    .route("/seen", web::get().to(api::matching::get_seen_users))
                    .route("/tables", web::get().to(api::matching::get_match_tables))
            )

            .service(
                web::scope("/api/v1/users")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/me", web::get().to(api::users::get_me))
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
