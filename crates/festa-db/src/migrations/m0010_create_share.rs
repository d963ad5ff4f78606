//! Migration: create-share

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "share" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "event_id" BIGINT NOT NULL,
    CONSTRAINT uq_share_owner_id_event_id UNIQUE ("owner_id", "event_id"),
    CONSTRAINT fk_share_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_share_event_id FOREIGN KEY ("event_id") REFERENCES "event"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0010-create-share",
        name: "create-share",
        depends_on: Some("0009-create-corporate-profile"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
