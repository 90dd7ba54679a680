/**
 * PostgreSQL Document Store
 *
 * sqlx-backed `MapStore` implementation. Documents live in the `maps`
 * table with node/edge arrays as JSONB columns and collaborators as a
 * UUID array, so a document round-trips as one row.
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::store::{MapStore, StoreError};
use crate::shared::graph::{Edge, MapDocument, Node};

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgMapStore {
    pool: PgPool,
}

impl PgMapStore {
    /// Create a store over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape for the `maps` table
#[derive(sqlx::FromRow)]
struct MapRow {
    id: Uuid,
    title: String,
    owner: Uuid,
    collaborators: Vec<Uuid>,
    nodes: Json<Vec<Node>>,
    edges: Json<Vec<Edge>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MapRow> for MapDocument {
    fn from(row: MapRow) -> Self {
        MapDocument {
            id: row.id,
            title: row.title,
            owner: row.owner,
            collaborators: row.collaborators,
            nodes: row.nodes.0,
            edges: row.edges.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl MapStore for PgMapStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<MapDocument>, StoreError> {
        // A malformed id behaves like an absent document
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, MapRow>(
            r#"
            SELECT id, title, owner, collaborators, nodes, edges, created_at, updated_at
            FROM maps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MapDocument::from))
    }

    async fn save(&self, document: &MapDocument) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO maps (id, title, owner, collaborators, nodes, edges, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                collaborators = EXCLUDED.collaborators,
                nodes = EXCLUDED.nodes,
                edges = EXCLUDED.edges,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(document.id)
        .bind(&document.title)
        .bind(document.owner)
        .bind(&document.collaborators)
        .bind(Json(&document.nodes))
        .bind(Json(&document.edges))
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;

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

        sqlx::query(
            r#"
            INSERT INTO maps (id, title, owner, collaborators, nodes, edges, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(document.id)
        .bind(&document.title)
        .bind(document.owner)
        .bind(&document.collaborators)
        .bind(Json(&document.nodes))
        .bind(Json(&document.edges))
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(document)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM maps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MapDocument>, StoreError> {
        let rows = sqlx::query_as::<_, MapRow>(
            r#"
            SELECT id, title, owner, collaborators, nodes, edges, created_at, updated_at
            FROM maps
            WHERE owner = $1 OR $1 = ANY(collaborators)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MapDocument::from).collect())
    }
}
