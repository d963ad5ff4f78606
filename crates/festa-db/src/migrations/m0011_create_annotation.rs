//! Migration: create-annotation

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "annotation" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "target_kind" TEXT NOT NULL,
    "target_id" BIGINT NOT NULL,
    "data" JSONB NOT NULL,
    "created" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "updated" TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT fk_annotation_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0011-create-annotation",
        name: "create-annotation",
        depends_on: Some("0010-create-share"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
