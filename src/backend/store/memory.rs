/**
 * In-memory Document Store
 *
 * A `MapStore` over a process-local map. Used when `DATABASE_URL` is not
 * configured so the real-time core stays fully usable in development, and
 * as the store double in tests. Nothing survives a restart.
 */
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::store::{MapStore, StoreError};
use crate::shared::graph::{Edge, MapDocument, Node};

/// Process-local, non-durable document store
#[derive(Clone, Default)]
pub struct MemoryMapStore {
    maps: Arc<RwLock<HashMap<Uuid, MapDocument>>>,
}

impl MemoryMapStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MapStore for MemoryMapStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<MapDocument>, StoreError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.maps.read().await.get(&id).cloned())
    }

    async fn save(&self, document: &MapDocument) -> Result<(), StoreError> {
        self.maps
            .write()
            .await
            .insert(document.id, document.clone());
        Ok(())
    }

    async fn create(
        &self,
        title: String,
        owner: Uuid,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<MapDocument, StoreError> {
        let mut document = MapDocument::new(title, owner);
        document.nodes = nodes;
        document.edges = edges;
        self.maps
            .write()
            .await
            .insert(document.id, document.clone());
        Ok(document)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(false);
        };
        Ok(self.maps.write().await.remove(&id).is_some())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MapDocument>, StoreError> {
        let maps = self.maps.read().await;
        let mut results: Vec<MapDocument> = maps
            .values()
            .filter(|m| m.owner == user_id || m.collaborators.contains(&user_id))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(results)
    }
}
