/**
 * Map Lifecycle Handlers
 *
 * REST endpoints for the document lifecycle, all behind the bearer-token
 * middleware:
 *
 * - `GET    /api/maps`             - maps where the user is owner or collaborator
 * - `POST   /api/maps`             - create a map
 * - `GET    /api/maps/{id}`        - fetch one map
 * - `PUT    /api/maps/{id}`        - partial update of title/nodes/edges
 * - `DELETE /api/maps/{id}`        - delete a map
 * - `POST   /api/maps/{id}/invite` - invite a registered user by email
 *
 * # Access Control
 *
 * Fetching by id is deliberately relaxed (link-sharing mode): any
 * authenticated user who knows the id can read the map, matching the
 * unauthenticated real-time channel. Inviting is owner-only.
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::BackendError;
use crate::backend::maps::types::{
    CreateMapRequest, InviteRequest, InviteResponse, InvitedUser, MessageResponse,
    UpdateMapRequest,
};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::graph::MapDocument;

/// Default title for maps created without one
const DEFAULT_MAP_TITLE: &str = "Untitled Map";

/// List every map the user owns or collaborates on
pub async fn list_maps(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<MapDocument>>, BackendError> {
    let maps = state.store.list_for_user(user.user_id).await?;
    Ok(Json(maps))
}

/// Create a new map owned by the caller
pub async fn create_map(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateMapRequest>,
) -> Result<(StatusCode, Json<MapDocument>), BackendError> {
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MAP_TITLE.to_string());

    let map = state
        .store
        .create(
            title,
            user.user_id,
            request.nodes.unwrap_or_default(),
            request.edges.unwrap_or_default(),
        )
        .await?;

    tracing::info!("Map {} created by {}", map.id, user.user_id);
    Ok((StatusCode::CREATED, Json(map)))
}

/// Fetch one map by id
///
/// Access control is relaxed for easier collaboration (link-sharing mode):
/// owner/collaborator membership is not checked here.
pub async fn get_map(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MapDocument>, BackendError> {
    let map = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BackendError::not_found("Map not found"))?;

    Ok(Json(map))
}

/// Partially update a map's title, nodes, and/or edges
pub async fn update_map(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateMapRequest>,
) -> Result<Json<MapDocument>, BackendError> {
    let mut map = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BackendError::not_found("Map not found"))?;

    if let Some(title) = request.title {
        map.title = title;
    }
    if let Some(nodes) = request.nodes {
        map.nodes = nodes;
    }
    if let Some(edges) = request.edges {
        map.edges = edges;
    }
    map.updated_at = Utc::now();

    state.store.save(&map).await?;
    Ok(Json(map))
}

/// Delete a map by id
pub async fn delete_map(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, BackendError> {
    let removed = state.store.delete_by_id(&id).await?;
    if !removed {
        return Err(BackendError::not_found("Map not found"));
    }

    Ok(Json(MessageResponse {
        message: "Map deleted successfully".to_string(),
    }))
}

/// Invite a registered user, by email, as a collaborator
///
/// Owner-only. The invitee must already have an account; inviting the
/// owner or an existing collaborator is rejected.
pub async fn invite_collaborator(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<InviteRequest>,
) -> Result<Json<InviteResponse>, BackendError> {
    let mut map = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BackendError::not_found("Map not found"))?;

    if map.owner != user.user_id {
        return Err(BackendError::forbidden(
            "Only the owner can invite collaborators.",
        ));
    }

    // The invitee lookup is the only part that needs the auth database
    let pool = state.db_pool.as_ref().ok_or_else(|| {
        tracing::error!("Database not configured");
        BackendError::unavailable("Database not configured")
    })?;

    let email = request.email.trim().to_lowercase();
    let invitee = get_user_by_email(pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            BackendError::Store(e.into())
        })?
        .ok_or_else(|| {
            BackendError::not_found(
                "User not found. They must be registered on MindLink to be invited.",
            )
        })?;

    if invitee.id == map.owner {
        return Err(BackendError::validation("You are the owner of this map."));
    }
    if map.collaborators.contains(&invitee.id) {
        return Err(BackendError::validation("User is already a collaborator."));
    }

    map.collaborators.push(invitee.id);
    map.updated_at = Utc::now();
    state.store.save(&map).await?;

    tracing::info!("User {} invited to map {}", invitee.id, map.id);
    Ok(Json(InviteResponse {
        message: "Collaborator added successfully".to_string(),
        user: InvitedUser {
            username: invitee.username,
            email: invitee.email,
        },
    }))
}
