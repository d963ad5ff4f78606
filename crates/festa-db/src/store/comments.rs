//! Comments and annotations on polymorphic targets.

use festa_schema::TargetRef;
use tokio_postgres::Client;

use crate::Result;

/// Post a comment on a target.
pub async fn add_comment(
    client: &Client,
    owner_id: i64,
    target: TargetRef,
    content: &str,
) -> Result<i64> {
    let kind = target.kind.as_str();
    let row = client
        .query_one(
            r#"
            INSERT INTO "comment" (owner_id, target_kind, target_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
            &[&owner_id, &kind, &target.id, &content],
        )
        .await?;
    Ok(row.get(0))
}

/// Update a comment's content, touching its `updated` timestamp.
pub async fn edit_comment(client: &Client, comment_id: i64, content: &str) -> Result<()> {
    let updated = client
        .execute(
            r#"UPDATE "comment" SET content = $2, updated = now() WHERE id = $1"#,
            &[&comment_id, &content],
        )
        .await?;
    if updated == 0 {
        return Err(crate::Error::NotFound {
            table: "comment",
            id: comment_id,
        });
    }
    Ok(())
}

/// Attach a structured annotation to a target.
pub async fn add_annotation(
    client: &Client,
    owner_id: i64,
    target: TargetRef,
    data: &serde_json::Value,
) -> Result<i64> {
    let kind = target.kind.as_str();
    let row = client
        .query_one(
            r#"
            INSERT INTO "annotation" (owner_id, target_kind, target_id, data)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
            &[&owner_id, &kind, &target.id, &data],
        )
        .await?;
    Ok(row.get(0))
}
