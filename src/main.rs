//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::env;
use std::sync::Arc;
use zentic_service::routes::{assistant_routes, auth_routes, message_routes, team_routes};
use zentic_service::services::assistant::UnconfiguredBackend;
use zentic_service::state::AppState;
use zentic_service::utils::auth_middleware::Authentication;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let address = env::var("ZENTIC_ADDR").unwrap_or_else(|_| "127.0.0.1:9090".to_string());
    let storage_root = env::var("ZENTIC_STORAGE").unwrap_or_else(|_| "./storage".to_string());

    std::fs::create_dir_all(&storage_root)?;

    // No completion provider is wired in by default; the assistant route
    // serves its fallback reply until one is configured.
    let state = web::Data::new(AppState::new(&storage_root, Arc::new(UnconfiguredBackend)));

    info!("🚀 Zentic service listening on {}", address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(auth_routes::init_routes)
            .service(
                web::scope("")
                    .wrap(Authentication)
                    .configure(team_routes::init_routes)
                    .configure(message_routes::init_routes)
                    .configure(assistant_routes::init_routes),
            )
    })
    .bind(address)?
    .run()
    .await
}
