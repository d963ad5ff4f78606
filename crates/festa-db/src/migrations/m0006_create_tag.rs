//! Migration: create-tag

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "tag" (
    "id" BIGSERIAL PRIMARY KEY,
    "name" TEXT NOT NULL
)
"#,
    )
    .await?;

    ctx.execute(
        r#"
CREATE TABLE "event_tag" (
    "id" BIGSERIAL PRIMARY KEY,
    "event_id" BIGINT NOT NULL,
    "tag_id" BIGINT NOT NULL,
    CONSTRAINT uq_event_tag_event_id_tag_id UNIQUE ("event_id", "tag_id"),
    CONSTRAINT fk_event_tag_event_id FOREIGN KEY ("event_id") REFERENCES "event"("id") ON DELETE CASCADE,
    CONSTRAINT fk_event_tag_tag_id FOREIGN KEY ("tag_id") REFERENCES "tag"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    ctx.execute(
        r#"
CREATE TABLE "user_tag" (
    "id" BIGSERIAL PRIMARY KEY,
    "user_id" BIGINT NOT NULL,
    "tag_id" BIGINT NOT NULL,
    CONSTRAINT uq_user_tag_user_id_tag_id UNIQUE ("user_id", "tag_id"),
    CONSTRAINT fk_user_tag_user_id FOREIGN KEY ("user_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_user_tag_tag_id FOREIGN KEY ("tag_id") REFERENCES "tag"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0006-create-tag",
        name: "create-tag",
        depends_on: Some("0005-create-follow-vote"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
