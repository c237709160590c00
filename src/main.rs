//! Chat web server with per-session conversation memory

use tokio_chat_memory_api::api;
use tokio_chat_memory_api::core::services::MyChatService;
use tokio_chat_memory_api::infrastructure::database::DatabaseConnection;
use tokio_chat_memory_api::infrastructure::gemini::GeminiBackend;
use tokio_chat_memory_api::infrastructure::repositories::DbMessageRepository;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use di::{Injectable, ServiceCollection};
use di_axum::RouterServiceProviderExtensions;
use log::info;
use serde_json::json;
use tokio::runtime::{Builder, Runtime};
use tower_http::cors::{Any, CorsLayer};

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(web_server_task());

    Ok(())
}

async fn web_server_task() {
    let provider = ServiceCollection::new()
        .add(DatabaseConnection::singleton())
        .add(DbMessageRepository::scoped())
        .add(GeminiBackend::singleton())
        .add(MyChatService::scoped())
        .build_provider()
        .unwrap();

    // apply the schema before accepting traffic
    {
        let db = provider.get_required::<DatabaseConnection>();
        sqlx::migrate!()
            .run(&**db)
            .await
            .expect("failed to run migrations");
    }

    // build our application with a route
    let app = Router::new()
        .route("/", get(index))
        .merge(api::chat::router())
        .layer(cors_layer())
        .with_provider(provider);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
    info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
    info!("Shutting down...");
}

fn cors_layer() -> CorsLayer {
    dotenvy::dotenv().ok();

    let mut origins = vec!["http://localhost:5173".parse::<HeaderValue>().unwrap()];
    if let Ok(frontend_url) = std::env::var("FRONTEND_URL") {
        if let Ok(origin) = frontend_url.parse::<HeaderValue>() {
            origins.push(origin);
        }
    }

    CorsLayer::new()
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(origins)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": "Chat backend with per-session conversation memory" }))
}
