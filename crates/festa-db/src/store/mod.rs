//! Store operations: the transactional layer that owns the model's
//! contracts.
//!
//! Uniqueness (one attendance per owner and event, one vote per owner
//! and target) is delegated to the store's unique constraints, not
//! application-level locking, and surfaces as [`Error::Duplicate`].
//! The denormalized `follower_count`/`vote_count` columns are maintained
//! incrementally here, in the same transaction as the row change they
//! mirror. Polymorphic references carry no foreign keys, so deleting a
//! target sweeps its dependents explicitly, also here.

use festa_schema::{TargetKind, TargetRef, quote_ident};
use tokio_postgres::Transaction;

use crate::{Error, Result};

pub mod attendance;
pub mod comments;
pub mod events;
pub mod follows;
pub mod messaging;
pub mod users;
pub mod votes;

/// Tables holding polymorphic `(target_kind, target_id)` references.
pub(crate) const TARGETED_TABLES: [&str; 4] = ["comment", "annotation", "follow", "vote"];

/// Parse an externally-supplied target into a validated reference.
///
/// This is the application boundary for polymorphic references: the
/// kind must be one of the known target kinds. The id is not checked
/// against the backing table; a dangling pair is an accepted risk.
pub fn parse_target(kind: &str, id: i64) -> Result<TargetRef> {
    TargetKind::parse(kind)
        .map(|kind| TargetRef::new(kind, id))
        .ok_or_else(|| Error::UnknownTargetKind(kind.to_string()))
}

/// Delete every polymorphic row pointing at an event owned by `owner_id`.
///
/// Deleting a user cascades into their events through `fk_event_owner_id`,
/// so the rows targeting those events must go in the same transaction, or
/// they dangle.
pub(crate) async fn sweep_owned_event_targets(
    tx: &Transaction<'_>,
    owner_id: i64,
) -> Result<u64> {
    let kind = TargetKind::Event.as_str();
    let mut total = 0;
    for table in TARGETED_TABLES {
        total += tx
            .execute(
                &format!(
                    "DELETE FROM {} WHERE target_kind = $1 \
                     AND target_id IN (SELECT id FROM \"event\" WHERE owner_id = $2)",
                    quote_ident(table)
                ),
                &[&kind, &owner_id],
            )
            .await?;
    }
    Ok(total)
}

/// Delete every polymorphic row pointing at `target`.
///
/// Runs inside the caller's transaction, alongside the deletion of the
/// target row itself.
pub(crate) async fn sweep_target(tx: &Transaction<'_>, target: TargetRef) -> Result<u64> {
    let kind = target.kind.as_str();
    let mut total = 0;
    for table in TARGETED_TABLES {
        total += tx
            .execute(
                &format!(
                    "DELETE FROM {} WHERE target_kind = $1 AND target_id = $2",
                    quote_ident(table)
                ),
                &[&kind, &target.id],
            )
            .await?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_accepts_known_kinds() {
        let target = parse_target("event", 42).unwrap();
        assert_eq!(target.kind, TargetKind::Event);
        assert_eq!(target.id, 42);
    }

    #[test]
    fn parse_target_rejects_unknown_kinds() {
        let err = parse_target("playlist", 1).unwrap_err();
        assert!(matches!(err, Error::UnknownTargetKind(kind) if kind == "playlist"));
    }
}
