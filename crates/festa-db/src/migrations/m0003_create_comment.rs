//! Migration: create-comment

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "comment" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "target_kind" TEXT NOT NULL,
    "target_id" BIGINT NOT NULL,
    "content" TEXT NOT NULL,
    "created" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "updated" TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT fk_comment_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0003-create-comment",
        name: "create-comment",
        depends_on: Some("0002-create-event"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
