mod config;
mod entities;
mod services;
mod handlers;
mod routes;
mod utils;
mod models;
mod seeders;
#[cfg(test)]
mod test_utils;

use config::{Config, AppState};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use crate::services::storage_service::StorageService;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::init();
    println!("🚀 Starting Sekolah Admin...");

    // 1. Database Connection
    println!("📡 Connecting to Database...");
    let db = Database::connect(&cfg.database_url)
        .await
        .expect("🔥 Failed to connect to Database!");
    println!("✅ Database Connected!");

    // 2. Migrations
    println!("🧱 Running Migrations...");
    Migrator::up(&db, None)
        .await
        .expect("🔥 Migration failed!");

    // 3. Database Seeding
    println!("🌱 Running Seeders...");
    if let Err(e) = seeders::run_seeders(&db).await {
        tracing::error!("❌ Seeding failed: {}", e);
    } else {
        println!("✅ Seeding Successful!");
    }

    // 4. Storage & Templates
    let storage = StorageService::new(&cfg.storage_dir, &cfg.storage_url, cfg.max_upload_bytes);
    storage.ensure_root().await.expect("🔥 Storage directory is not writable!");

    let templates = utils::view::build_templates().expect("🔥 Failed to compile templates!");

    // 5. Build App State
    let state = AppState {
        db,
        templates: Arc::new(templates),
        storage,
    };

    // 6. Initialize Router
    let app = routes::create_routes(state.clone()).with_state(state);

    // 7. Start Server
    let addr_str = format!("{}:{}", cfg.server_host, cfg.server_port);
    let addr: SocketAddr = addr_str.parse().expect("Invalid address");

    println!("🎯 Server ready! Listening on http://{}", addr);
    tracing::info!("Admin panel at http://{}/admin/gallery", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("🔥 Failed to bind address");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
