//! Migration: create-attendance

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "attendance" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "event_id" BIGINT NOT NULL,
    "status" TEXT NOT NULL,
    CONSTRAINT uq_attendance_owner_id_event_id UNIQUE ("owner_id", "event_id"),
    CONSTRAINT fk_attendance_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_attendance_event_id FOREIGN KEY ("event_id") REFERENCES "event"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0004-create-attendance",
        name: "create-attendance",
        depends_on: Some("0003-create-comment"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
