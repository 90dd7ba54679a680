//! Document lifecycle REST surface
//!
//! Create, list, fetch, update, delete, and collaborator invitations.

pub mod handlers;
pub mod types;

pub use handlers::{
    create_map, delete_map, get_map, invite_collaborator, list_maps, update_map,
};
