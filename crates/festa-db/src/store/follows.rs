//! Follows and the `follower_count` counter.

use festa_schema::{TargetRef, quote_ident};
use tokio_postgres::Client;

use crate::{Error, Result};

/// Follow a target, bumping its follower count in the same transaction.
/// Following the same target twice is a duplicate. Returns the new
/// count.
pub async fn follow(client: &mut Client, owner_id: i64, target: TargetRef) -> Result<i32> {
    let tx = client.transaction().await?;
    let kind = target.kind.as_str();

    tx.execute(
        r#"INSERT INTO "follow" (owner_id, target_kind, target_id) VALUES ($1, $2, $3)"#,
        &[&owner_id, &kind, &target.id],
    )
    .await
    .map_err(Error::from_db)?;

    let row = tx
        .query_opt(
            &format!(
                "UPDATE {} SET follower_count = follower_count + 1 WHERE id = $1 RETURNING follower_count",
                quote_ident(target.kind.table())
            ),
            &[&target.id],
        )
        .await?
        .ok_or(Error::NotFound {
            table: target.kind.table(),
            id: target.id,
        })?;
    let count: i32 = row.get(0);

    tx.commit().await?;
    Ok(count)
}

/// Unfollow a target, dropping its follower count in the same
/// transaction. Returns the new count, or `None` if the owner was not
/// following the target.
pub async fn unfollow(
    client: &mut Client,
    owner_id: i64,
    target: TargetRef,
) -> Result<Option<i32>> {
    let tx = client.transaction().await?;
    let kind = target.kind.as_str();

    let deleted = tx
        .execute(
            r#"DELETE FROM "follow" WHERE owner_id = $1 AND target_kind = $2 AND target_id = $3"#,
            &[&owner_id, &kind, &target.id],
        )
        .await?;
    if deleted == 0 {
        return Ok(None);
    }

    let row = tx
        .query_opt(
            &format!(
                "UPDATE {} SET follower_count = follower_count - 1 WHERE id = $1 RETURNING follower_count",
                quote_ident(target.kind.table())
            ),
            &[&target.id],
        )
        .await?
        .ok_or(Error::NotFound {
            table: target.kind.table(),
            id: target.id,
        })?;
    let count: i32 = row.get(0);

    tx.commit().await?;
    Ok(Some(count))
}
