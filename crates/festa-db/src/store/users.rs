//! User accounts.

use festa_schema::TargetRef;
use tokio_postgres::Client;

use crate::{Error, Result};

use super::{sweep_owned_event_targets, sweep_target};

/// Fields required to register a user.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Register a user. Duplicate username or email surfaces as
/// [`Error::Duplicate`].
pub async fn create_user(client: &Client, user: NewUser<'_>) -> Result<i64> {
    let row = client
        .query_one(
            r#"INSERT INTO "user" (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id"#,
            &[&user.username, &user.email, &user.password_hash],
        )
        .await
        .map_err(Error::from_db)?;
    Ok(row.get(0))
}

/// Block another user. Blocking twice is a duplicate.
pub async fn block_user(client: &Client, user_id: i64, blocked_id: i64) -> Result<()> {
    client
        .execute(
            r#"INSERT INTO "user_block" (user_id, blocked_id) VALUES ($1, $2)"#,
            &[&user_id, &blocked_id],
        )
        .await
        .map_err(Error::from_db)?;
    Ok(())
}

/// Create a corporate profile and attach it to the user, marking the
/// account corporate, in one transaction.
pub async fn attach_corporate_profile(
    client: &mut Client,
    user_id: i64,
    url: Option<&str>,
) -> Result<i64> {
    let tx = client.transaction().await?;

    let row = tx
        .query_one(
            r#"INSERT INTO "corporate_profile" (url) VALUES ($1) RETURNING id"#,
            &[&url],
        )
        .await?;
    let profile_id: i64 = row.get(0);

    let updated = tx
        .execute(
            r#"UPDATE "user" SET corporate_profile_id = $1, is_corporate = true WHERE id = $2"#,
            &[&profile_id, &user_id],
        )
        .await?;
    if updated == 0 {
        return Err(Error::NotFound {
            table: "user",
            id: user_id,
        });
    }

    tx.commit().await?;
    Ok(profile_id)
}

/// Delete a user.
///
/// Owned rows (events, comments, votes, ...) fall to their foreign keys;
/// polymorphic rows pointing *at* the user, and at the events the cascade
/// will take with them, are swept here, in the same transaction.
pub async fn delete_user(client: &mut Client, user_id: i64) -> Result<()> {
    let tx = client.transaction().await?;

    sweep_owned_event_targets(&tx, user_id).await?;
    sweep_target(&tx, TargetRef::user(user_id)).await?;

    let deleted = tx
        .execute(r#"DELETE FROM "user" WHERE id = $1"#, &[&user_id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound {
            table: "user",
            id: user_id,
        });
    }

    tx.commit().await?;
    Ok(())
}
