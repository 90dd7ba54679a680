/**
 * Collaboration Hub
 *
 * The server-side relay for real-time graph editing. Each WebSocket
 * connection can join one document room; operations it submits are fanned
 * out to every other room member immediately and merged into the stored
 * document asynchronously.
 *
 * # Consistency Trade-off
 *
 * Broadcast-before-persist gives the best perceived latency: peers see an
 * edit the moment it reaches the hub, whether or not the persistence write
 * later succeeds. If that write fails, storage and peer memory diverge
 * until the next snapshot. The domain (visual brainstorming) tolerates
 * this; the trade-off is deliberate.
 */
pub mod connection;
pub mod persist;
pub mod socket;

pub use connection::{
    disconnect, join_document, submit_cursor, submit_operation, RoomSession, GUEST_USERNAME,
};
pub use socket::ws_handler;
