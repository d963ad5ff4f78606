//! Two-party conversations and messages.

use tokio_postgres::Client;

use crate::{Error, Result};

/// Open a conversation between `owner_id` and `participant_id`.
pub async fn start_conversation(
    client: &Client,
    owner_id: i64,
    participant_id: i64,
) -> Result<i64> {
    let row = client
        .query_one(
            r#"INSERT INTO "conversation" (owner_id, participant_id) VALUES ($1, $2) RETURNING id"#,
            &[&owner_id, &participant_id],
        )
        .await?;
    Ok(row.get(0))
}

/// Send a message in a conversation.
///
/// The sender must be one of the two members; the other member is the
/// receiver. The conversation's `updated` timestamp moves with the
/// message, in the same transaction.
pub async fn send_message(
    client: &mut Client,
    conversation_id: i64,
    sender_id: i64,
    content: &str,
) -> Result<i64> {
    let tx = client.transaction().await?;

    let row = tx
        .query_opt(
            r#"SELECT owner_id, participant_id FROM "conversation" WHERE id = $1"#,
            &[&conversation_id],
        )
        .await?
        .ok_or(Error::NotFound {
            table: "conversation",
            id: conversation_id,
        })?;
    let owner_id: i64 = row.get(0);
    let participant_id: i64 = row.get(1);

    let receiver_id = if sender_id == owner_id {
        participant_id
    } else if sender_id == participant_id {
        owner_id
    } else {
        return Err(Error::NotParticipant {
            conversation: conversation_id,
            user: sender_id,
        });
    };

    let row = tx
        .query_one(
            r#"
            INSERT INTO "message" (owner_id, receiver_id, conversation_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
            &[&sender_id, &receiver_id, &conversation_id, &content],
        )
        .await?;
    let message_id: i64 = row.get(0);

    tx.execute(
        r#"UPDATE "conversation" SET updated = now() WHERE id = $1"#,
        &[&conversation_id],
    )
    .await?;

    tx.commit().await?;
    Ok(message_id)
}
