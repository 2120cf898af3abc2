use axum::{
    routing::{get, post, put},
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use handlers::{auth, catalog, orders, system};

/// Builds the HTTP surface of the store.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Orders
        .route("/api/orders", post(orders::place_order).get(orders::list_orders))
        .route("/api/orders/user/:user_id", get(orders::orders_for_user))
        .route("/api/orders/:order_id", put(orders::update_status))

        // Catalog
        .route("/api/products", get(catalog::list_products).post(catalog::create_product))
        .route("/api/categories", get(catalog::list_categories).post(catalog::create_category))

        // Identity, served under both prefixes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users/register", post(auth::register))
        .route("/api/users/login", post(auth::login))

        // System
        .route("/", get(system::banner))
        .route("/health", get(system::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!("🌐 API Server listening on http://{}", address);
    }
    info!("📖 API Documentation:");
    info!("   POST /api/orders                 - Place an order");
    info!("   GET  /api/orders                 - List all orders (admin)");
    info!("   GET  /api/orders/user/:user_id   - List a user's orders");
    info!("   PUT  /api/orders/:order_id       - Update order status");
    info!("   GET  /api/products               - Search products");
    info!("   POST /api/products               - Create product");
    info!("   GET  /api/categories             - List categories");
    info!("   POST /api/categories             - Create category");
    info!("   POST /api/auth/register          - Register (also /api/users/register)");
    info!("   POST /api/auth/login             - Log in (also /api/users/login)");
    info!("   GET  /health                     - Health check");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
