/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server: state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load the optional database pool (auth layer)
 * 2. Build the document store over it, or the in-memory fallback
 * 3. Create the application state (room registry starts empty; rooms are
 *    created per document on first join and destroyed on last leave)
 * 4. Create and configure the router
 */
use axum::Router;

use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, load_store};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Error Handling
///
/// The function is designed to be resilient: a missing or unreachable
/// database never prevents startup. Auth endpoints answer 503 without a
/// database; the real-time core runs against the in-memory store.
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing MindLink backend server");

    // Step 1: Load optional services
    let db_pool = load_database().await;

    // Step 2: Build the document store
    let store = load_store(&db_pool);

    // Step 3: Create app state (rooms registry included)
    let app_state = AppState::new(store, db_pool);

    tracing::info!("Application state initialized");

    // Step 4: Create router with all routes
    create_router(app_state)
}
