/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration:
 * the optional PostgreSQL connection and the document store built on top
 * of it.
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup.
 * Without a database the auth endpoints answer 503 and the document store
 * falls back to a process-local in-memory implementation, which keeps the
 * real-time core fully usable in development.
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::store::{MapStore, MemoryMapStore, PgMapStore};

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<PgPool>;

/// Load and initialize database connection pool
///
/// This function:
/// 1. Reads `DATABASE_URL` from environment
/// 2. Creates a PostgreSQL connection pool
/// 3. Runs database migrations
///
/// # Returns
///
/// - `Some(PgPool)` if database is successfully configured
/// - `None` if `DATABASE_URL` is not set or connection fails
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    // Run migrations
    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {:?}", e);
            // Continue anyway - migrations might have already been run
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Build the document store over the configured database
///
/// Falls back to the in-memory store when no database is available, so
/// rooms, snapshots, and operation persistence keep working (without
/// durability) in development.
pub fn load_store(db_pool: &DatabaseConfig) -> Arc<dyn MapStore> {
    match db_pool {
        Some(pool) => Arc::new(PgMapStore::new(pool.clone())),
        None => {
            tracing::warn!("Using in-memory map store; documents will not survive a restart");
            Arc::new(MemoryMapStore::new())
        }
    }
}
