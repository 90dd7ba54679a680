/**
 * Document Store
 *
 * The persistence collaborator for map documents. The hub and the REST
 * layer consume it through the `MapStore` trait: load by id, whole-document
 * save, create, delete, and an owner-or-collaborator listing.
 *
 * # Implementations
 *
 * - `PgMapStore` - PostgreSQL via sqlx; nodes/edges persisted as JSONB
 * - `MemoryMapStore` - process-local fallback used when `DATABASE_URL` is
 *   unset, and as the store double in tests
 *
 * # Concurrency
 *
 * `save` is a whole-document overwrite with no version check and no
 * compare-and-swap: concurrent read-modify-write cycles for the same
 * document are last-writer-wins, and one cycle's effect can be silently
 * discarded. That is the system's documented consistency model, not an
 * accident of the implementation.
 */
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::graph::{Edge, MapDocument, Node};

pub mod memory;
pub mod postgres;

pub use memory::MemoryMapStore;
pub use postgres::PgMapStore;

/// Document store failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Document (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The document store contract
///
/// Ids arrive as opaque strings from the wire; an id that does not parse
/// as a document id behaves exactly like an absent document.
#[async_trait]
pub trait MapStore: Send + Sync {
    /// Load a document by id; `None` if absent or the id is malformed
    async fn find_by_id(&self, id: &str) -> Result<Option<MapDocument>, StoreError>;

    /// Persist a document as a whole-document overwrite
    async fn save(&self, document: &MapDocument) -> Result<(), StoreError>;

    /// Create a new document owned by `owner`
    async fn create(
        &self,
        title: String,
        owner: Uuid,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<MapDocument, StoreError>;

    /// Delete a document by id; returns whether anything was removed
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;

    /// List every document where the user is owner or collaborator
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MapDocument>, StoreError>;
}
