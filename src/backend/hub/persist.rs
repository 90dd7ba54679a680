/**
 * Operation Persistence Cycle
 *
 * One read-modify-write cycle against the document store: load the whole
 * document, apply the operation's mutation rule, write the whole document
 * back.
 *
 * # Known Race
 *
 * There is no locking, no optimistic version check, and no serialization
 * point across cycles. Two operations for the same document arriving from
 * different connections trigger concurrent cycles; each reloads the full
 * document, mutates its own copy, and overwrites the row, so the last
 * writer wins and the other cycle's effect is silently discarded from
 * storage (peers already applied it in memory via the broadcast). This is
 * the documented consistency model of the system, preserved on purpose.
 */
use chrono::Utc;

use crate::backend::store::{MapStore, StoreError};
use crate::shared::operation::{self, Operation};

/// Load, apply, and persist one operation
///
/// Returns `Ok(true)` if the document existed and was written back,
/// `Ok(false)` if it was absent (the operation is dropped, mirroring the
/// relay's fire-and-forget contract).
pub async fn apply_and_persist(
    store: &dyn MapStore,
    map_id: &str,
    op: &Operation,
) -> Result<bool, StoreError> {
    let Some(mut document) = store.find_by_id(map_id).await? else {
        return Ok(false);
    };

    operation::apply(&mut document.nodes, &mut document.edges, op);
    document.updated_at = Utc::now();
    store.save(&document).await?;

    Ok(true)
}
