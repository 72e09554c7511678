use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldhand::records::http::HttpRecordStore;
use fieldhand::state::AppState;
use fieldhand::{commands, notify, schema};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fieldhand backend...");

    if let Err(e) = schema::validate_all() {
        tracing::error!("Entity schema validation failed: {}", e);
        return;
    }

    let base_url = env::var("RECORD_API_URL").unwrap_or_else(|_| {
        tracing::warn!("RECORD_API_URL not found in env, using default local record API");
        "http://localhost:4000/api/v1".to_string()
    });
    let project_id = env::var("RECORD_PROJECT_ID").unwrap_or_default();
    let public_key = env::var("RECORD_PUBLIC_KEY").unwrap_or_default();

    let store = match HttpRecordStore::new(&base_url, &project_id, &public_key) {
        Ok(store) => {
            tracing::info!("Record store client ready for {}", base_url);
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!("Failed to build record store client: {}", e);
            return;
        }
    };

    let app_state = AppState::new(store, Arc::new(notify::TracingNotifier));

    // Build our application with routes
    let app = Router::new()
        .route("/", get(root))
        // Farm routes
        .route("/api/farms", get(commands::farms::list_farms))
        .route("/api/farms/create", post(commands::farms::create_farm))
        .route("/api/farms/update", post(commands::farms::update_farm))
        .route("/api/farms/delete", post(commands::farms::delete_farm))
        // Crop routes
        .route("/api/crops", get(commands::crops::list_crops))
        .route(
            "/api/crops/by-farm/:farm_id",
            get(commands::crops::crops_by_farm),
        )
        .route("/api/crops/create", post(commands::crops::create_crop))
        .route("/api/crops/update", post(commands::crops::update_crop))
        .route("/api/crops/delete", post(commands::crops::delete_crop))
        // Expense routes
        .route("/api/expenses", get(commands::expenses::list_expenses))
        .route(
            "/api/expenses/create",
            post(commands::expenses::create_expense),
        )
        .route(
            "/api/expenses/update",
            post(commands::expenses::update_expense),
        )
        .route(
            "/api/expenses/delete",
            post(commands::expenses::delete_expense),
        )
        // Income routes
        .route("/api/income", get(commands::income::list_income))
        .route("/api/income/create", post(commands::income::create_income))
        .route("/api/income/update", post(commands::income::update_income))
        .route("/api/income/delete", post(commands::income::delete_income))
        // Task routes
        .route("/api/tasks", get(commands::tasks::list_tasks))
        .route("/api/tasks/create", post(commands::tasks::create_task))
        .route("/api/tasks/update", post(commands::tasks::update_task))
        .route("/api/tasks/toggle", post(commands::tasks::toggle_task))
        .route("/api/tasks/delete", post(commands::tasks::delete_task))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr_str = format!("0.0.0.0:{}", port);
    let addr = addr_str.parse::<SocketAddr>().expect("Invalid address");

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn root() -> &'static str {
    "Fieldhand backend is running"
}
