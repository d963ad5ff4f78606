//! Migration: create-follow-vote

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "follow" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "target_kind" TEXT NOT NULL,
    "target_id" BIGINT NOT NULL,
    CONSTRAINT uq_follow_owner_id_target_kind_target_id UNIQUE ("owner_id", "target_kind", "target_id"),
    CONSTRAINT fk_follow_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    ctx.execute(
        r#"
CREATE TABLE "vote" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "target_kind" TEXT NOT NULL,
    "target_id" BIGINT NOT NULL,
    "vote" TEXT NOT NULL,
    CONSTRAINT uq_vote_owner_id_target_kind_target_id UNIQUE ("owner_id", "target_kind", "target_id"),
    CONSTRAINT fk_vote_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0005-create-follow-vote",
        name: "create-follow-vote",
        depends_on: Some("0004-create-attendance"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
