//! Votes and the `vote_count` counter.

use festa_schema::{TargetRef, Vote, quote_ident, vote_count_delta};
use tokio_postgres::Client;

use crate::{Error, Result};

/// Cast or re-cast a vote on a target.
///
/// In one transaction: the vote row is inserted (or updated, when the
/// owner already voted on this target) and the target's `vote_count`
/// moves by [`vote_count_delta`], which is doubled when a prior vote
/// existed to cover the net swing of a reversal. Returns the new count.
pub async fn cast_vote(
    client: &mut Client,
    owner_id: i64,
    target: TargetRef,
    vote: Vote,
) -> Result<i32> {
    let tx = client.transaction().await?;
    let kind = target.kind.as_str();
    let code = vote.code();

    let prior = tx
        .query_opt(
            r#"SELECT vote FROM "vote" WHERE owner_id = $1 AND target_kind = $2 AND target_id = $3"#,
            &[&owner_id, &kind, &target.id],
        )
        .await?;
    let voted_before = prior.is_some();

    if voted_before {
        tx.execute(
            r#"UPDATE "vote" SET vote = $4 WHERE owner_id = $1 AND target_kind = $2 AND target_id = $3"#,
            &[&owner_id, &kind, &target.id, &code],
        )
        .await?;
    } else {
        tx.execute(
            r#"INSERT INTO "vote" (owner_id, target_kind, target_id, vote) VALUES ($1, $2, $3, $4)"#,
            &[&owner_id, &kind, &target.id, &code],
        )
        .await
        .map_err(Error::from_db)?;
    }

    let delta = vote_count_delta(vote, voted_before);
    let row = tx
        .query_opt(
            &format!(
                "UPDATE {} SET vote_count = vote_count + $1 WHERE id = $2 RETURNING vote_count",
                quote_ident(target.kind.table())
            ),
            &[&delta, &target.id],
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

/// The owner's current vote on a target, if any.
pub async fn vote_of(client: &Client, owner_id: i64, target: TargetRef) -> Result<Option<Vote>> {
    let kind = target.kind.as_str();
    let row = client
        .query_opt(
            r#"SELECT vote FROM "vote" WHERE owner_id = $1 AND target_kind = $2 AND target_id = $3"#,
            &[&owner_id, &kind, &target.id],
        )
        .await?;

    match row {
        None => Ok(None),
        Some(row) => {
            let code: String = row.get(0);
            Vote::parse(&code)
                .map(Some)
                .ok_or_else(|| Error::Decode(format!("bad vote code {code:?}")))
        }
    }
}
