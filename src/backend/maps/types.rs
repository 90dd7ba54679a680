/**
 * Map Handler Types
 *
 * Request and response types for the document lifecycle endpoints.
 */
use serde::{Deserialize, Serialize};

use crate::shared::graph::{Edge, Node};

/// Create request; everything is optional, an empty body yields an
/// untitled empty map
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CreateMapRequest {
    pub title: Option<String>,
    pub nodes: Option<Vec<Node>>,
    pub edges: Option<Vec<Edge>>,
}

/// Partial update of title/nodes/edges; absent fields are left untouched
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateMapRequest {
    pub title: Option<String>,
    pub nodes: Option<Vec<Node>>,
    pub edges: Option<Vec<Edge>>,
}

/// Invite-collaborator request
#[derive(Deserialize, Serialize, Debug)]
pub struct InviteRequest {
    /// Email of the registered user to invite
    pub email: String,
}

/// Invite-collaborator success response
#[derive(Serialize, Deserialize, Debug)]
pub struct InviteResponse {
    pub message: String,
    pub user: InvitedUser,
}

/// The invited user's public identity
#[derive(Serialize, Deserialize, Debug)]
pub struct InvitedUser {
    pub username: String,
    pub email: String,
}

/// Simple success message body
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
