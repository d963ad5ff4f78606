//! Attendance declarations and event shares.

use festa_schema::Attendance;
use tokio_postgres::Client;

use crate::{Error, Result};

/// Declare attendance for an event. There is at most one declaration
/// per (owner, event): a repeat declaration replaces the status.
pub async fn set_attendance(
    client: &Client,
    owner_id: i64,
    event_id: i64,
    status: Attendance,
) -> Result<()> {
    client
        .execute(
            r#"
            INSERT INTO "attendance" (owner_id, event_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (owner_id, event_id) DO UPDATE SET status = EXCLUDED.status
            "#,
            &[&owner_id, &event_id, &status.code()],
        )
        .await?;
    Ok(())
}

/// The owner's attendance declaration for an event, if any.
pub async fn attendance_of(
    client: &Client,
    owner_id: i64,
    event_id: i64,
) -> Result<Option<Attendance>> {
    let row = client
        .query_opt(
            r#"SELECT status FROM "attendance" WHERE owner_id = $1 AND event_id = $2"#,
            &[&owner_id, &event_id],
        )
        .await?;

    match row {
        None => Ok(None),
        Some(row) => {
            let code: String = row.get(0);
            Attendance::parse(&code)
                .map(Some)
                .ok_or_else(|| Error::Decode(format!("bad attendance code {code:?}")))
        }
    }
}

/// Record that the owner shared an event. At most one share per
/// (owner, event); sharing twice is a duplicate.
pub async fn share_event(client: &Client, owner_id: i64, event_id: i64) -> Result<i64> {
    let row = client
        .query_one(
            r#"INSERT INTO "share" (owner_id, event_id) VALUES ($1, $2) RETURNING id"#,
            &[&owner_id, &event_id],
        )
        .await
        .map_err(Error::from_db)?;
    Ok(row.get(0))
}
