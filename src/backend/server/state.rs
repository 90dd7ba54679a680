/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container for the server,
 * holding:
 * - The room registry (who is connected to which document)
 * - The document store (Postgres, or the in-memory fallback)
 * - The optional database pool used by the auth layer
 *
 * # Thread Safety
 *
 * All fields are cheaply cloneable handles over shared state:
 * `RoomRegistry` is an `Arc<Mutex<...>>` internally, the store is an
 * `Arc<dyn MapStore>`, and `PgPool` is itself a shared handle.
 */
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::rooms::RoomRegistry;
use crate::backend::store::MapStore;

/// Application state shared by every handler and hub connection
#[derive(Clone)]
pub struct AppState {
    /// Room registry: rosters, presence colors, broadcast channels
    pub rooms: RoomRegistry,

    /// The document store the hub persists operations into
    pub store: Arc<dyn MapStore>,

    /// Database connection pool for the auth layer
    ///
    /// `None` if the database is not configured (no `DATABASE_URL`), in
    /// which case auth endpoints answer 503 while the real-time core keeps
    /// working against the in-memory store.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Assemble application state from its parts
    pub fn new(store: Arc<dyn MapStore>, db_pool: Option<PgPool>) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            store,
            db_pool,
        }
    }
}

/// Allow handlers to extract the room registry directly
impl FromRef<AppState> for RoomRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}

/// Allow handlers to extract the document store directly
impl FromRef<AppState> for Arc<dyn MapStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

/// Allow handlers to extract the optional database pool directly
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
