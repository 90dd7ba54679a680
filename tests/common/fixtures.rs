//! Graph and application-state fixtures

use mindlink::shared::graph::{Edge, Node};

/// A node with a fixed id, for scenarios that reference ids across steps
pub fn node(id: &str, content: &str, x: f64, y: f64) -> Node {
    Node {
        id: id.to_string(),
        node_type: "text".to_string(),
        content: content.to_string(),
        x,
        y,
        width: None,
        height: None,
        style: serde_json::Map::new(),
    }
}

/// An edge with a fixed id
pub fn edge(id: &str, source: &str, target: &str) -> Edge {
    Edge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        color: None,
    }
}

#[cfg(feature = "server")]
pub use server_fixtures::*;

#[cfg(feature = "server")]
mod server_fixtures {
    use std::sync::Arc;

    use mindlink::backend::server::state::AppState;
    use mindlink::backend::store::{MapStore, MemoryMapStore};
    use mindlink::shared::graph::MapDocument;
    use uuid::Uuid;

    /// Application state over a fresh in-memory store, no database
    pub fn app_state() -> (AppState, Arc<MemoryMapStore>) {
        let store = Arc::new(MemoryMapStore::new());
        (AppState::new(store.clone(), None), store)
    }

    /// Create an empty document in the store and return it
    pub async fn seeded_map(store: &MemoryMapStore, title: &str) -> MapDocument {
        store
            .create(title.to_string(), Uuid::new_v4(), Vec::new(), Vec::new())
            .await
            .expect("in-memory create cannot fail")
    }
}
