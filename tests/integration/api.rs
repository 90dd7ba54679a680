//! REST document lifecycle flows
//!
//! Exercises the map handlers end-to-end against the in-memory store:
//! create, list, fetch, update, delete, and the owner-only invite guard.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pretty_assertions::assert_eq;
use mindlink::backend::maps::types::{CreateMapRequest, InviteRequest, UpdateMapRequest};
use mindlink::backend::maps::{
    create_map, delete_map, get_map, invite_collaborator, list_maps, update_map,
};
use mindlink::backend::middleware::{AuthUser, AuthenticatedUser};
use uuid::Uuid;

use crate::common::{app_state, edge, node};

fn auth(user_id: Uuid) -> AuthUser {
    AuthUser(AuthenticatedUser {
        user_id,
        email: "user@example.com".to_string(),
    })
}

#[tokio::test]
async fn test_full_document_lifecycle() {
    let (state, _store) = app_state();
    let owner = Uuid::new_v4();

    // Create with initial content
    let (status, Json(created)) = create_map(
        State(state.clone()),
        auth(owner),
        Json(CreateMapRequest {
            title: Some("Brainstorm".to_string()),
            nodes: Some(vec![node("a", "A", 0.0, 0.0)]),
            edges: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.title, "Brainstorm");
    assert_eq!(created.nodes.len(), 1);

    // It shows up in the owner's listing
    let Json(mine) = list_maps(State(state.clone()), auth(owner)).await.unwrap();
    assert_eq!(mine.len(), 1);

    // Update replaces the provided fields wholesale
    let Json(updated) = update_map(
        State(state.clone()),
        auth(owner),
        Path(created.id.to_string()),
        Json(UpdateMapRequest {
            title: None,
            nodes: Some(vec![node("a", "A", 0.0, 0.0), node("b", "B", 5.0, 5.0)]),
            edges: Some(vec![edge("ab", "a", "b")]),
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.title, "Brainstorm");
    assert_eq!(updated.nodes.len(), 2);
    assert_eq!(updated.edges.len(), 1);

    // Fetch sees the update
    let Json(fetched) = get_map(
        State(state.clone()),
        auth(owner),
        Path(created.id.to_string()),
    )
    .await
    .unwrap();
    assert_eq!(fetched.nodes.len(), 2);

    // Delete, then the map is gone
    delete_map(
        State(state.clone()),
        auth(owner),
        Path(created.id.to_string()),
    )
    .await
    .unwrap();
    let missing = get_map(State(state), auth(owner), Path(created.id.to_string())).await;
    assert_eq!(
        missing.err().unwrap().status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_invite_is_owner_only() {
    let (state, _store) = app_state();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let (_, Json(map)) = create_map(
        State(state.clone()),
        auth(owner),
        Json(CreateMapRequest::default()),
    )
    .await
    .unwrap();

    // A non-owner is rejected before any user lookup happens, so this
    // does not need the auth database.
    let result = invite_collaborator(
        State(state),
        auth(stranger),
        Path(map.id.to_string()),
        Json(InviteRequest {
            email: "friend@example.com".to_string(),
        }),
    )
    .await;

    assert_eq!(
        result.err().unwrap().status_code(),
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_update_missing_map_is_not_found() {
    let (state, _store) = app_state();

    let result = update_map(
        State(state),
        auth(Uuid::new_v4()),
        Path(Uuid::new_v4().to_string()),
        Json(UpdateMapRequest::default()),
    )
    .await;

    assert_eq!(
        result.err().unwrap().status_code(),
        StatusCode::NOT_FOUND
    );
}
