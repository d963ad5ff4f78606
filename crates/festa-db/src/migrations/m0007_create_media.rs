//! Migration: create-media

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "media" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "event_id" BIGINT NOT NULL,
    "file" TEXT NOT NULL,
    "created" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "updated" TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT fk_media_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_media_event_id FOREIGN KEY ("event_id") REFERENCES "event"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0007-create-media",
        name: "create-media",
        depends_on: Some("0006-create-tag"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
