mod api;
mod database;
mod jobs;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("MONGODB_URI"))
        .unwrap_or_else(|_| "mongodb://localhost:27017/tatcon".to_string());

    log::info!("🚀 Starting TatCon Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // 🌱 Seed the demo event catalog
    seeds::events_seed::seed_demo_events(&db).await;

    // ⏰ Start the reminder push job
    log::info!("📅 Starting background jobs...");
    jobs::reminder_scheduler::start_reminder_scheduler(db.clone()).await;
    log::info!("✅ Background jobs started");

    // The Expo client origin; cookies require credentials support
    let client_url = env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&client_url)
            .allowed_origin("http://localhost:8081") // Expo dev server
            .allowed_origin("http://localhost:19006") // Expo web
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Auth: registration and the four sign-in flows are public,
            // /me needs a token
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(api::auth::register))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/google", web::post().to(api::auth::google_auth))
                    .route("/facebook", web::post().to(api::auth::facebook_auth))
                    .route("/vk", web::post().to(api::auth::vk_auth))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::auth::get_me)),
                    ),
            )
            // Profiles: public read, protected write and rating
            .service(
                web::scope("/api/profile")
                    .service(
                        web::resource("")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::put().to(api::profile::update_profile)),
                    )
                    .service(
                        web::resource("/{id}/rating")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::post().to(api::profile::add_rating)),
                    )
                    .route("/{id}", web::get().to(api::profile::get_profile)), // MUST STAY LAST (catch-all)
            )
            // Events: calendar, shorts feed, likes and reminders
            .service(
                web::scope("/api/events")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::events::list_events))
                    .route("/shorts", web::get().to(api::events::shorts_feed))
                    .route("/{id}/like", web::post().to(api::events::toggle_like))
                    .route("/{id}/reminder", web::post().to(api::events::schedule_reminder))
                    .route("/{id}", web::get().to(api::events::get_event)), // MUST STAY LAST (catch-all)
            )
            // Reminders
            .service(
                web::scope("/api/reminders")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::notifications::list_reminders))
                    .route("/{id}", web::delete().to(api::notifications::cancel_reminder)),
            )
            // Notification preferences + device push token
            .service(
                web::scope("/api/notifications")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/settings", web::get().to(api::notifications::get_settings))
                    .route("/settings", web::put().to(api::notifications::update_settings))
                    .route("/token", web::post().to(api::notifications::register_push_token)),
            )
            // Discovery swipe deck
            .service(
                web::scope("/api/discovery")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::matches::next_profile)
                    .service(api::matches::swipe),
            )
            // Matches
            .service(
                web::scope("/api/matches")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::matches::list_matches),
            )
            // Random coffee
            .service(
                web::scope("/api/coffee")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::coffee::request_match)
                    .service(api::coffee::get_session)
                    .service(api::coffee::leave),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
