//! Authentication
//!
//! User accounts, bcrypt password hashing, and JWT session tokens. The
//! token gates the REST surface only; the real-time channel is
//! deliberately unauthenticated (link-sharing trust model).

pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::{get_me, login, signup};
