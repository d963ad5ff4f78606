//! Migration: create-corporate-profile
//!
//! Corporate users carry extra profile data. A separate optional
//! one-to-one table keeps the user table lean for everyone else.

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "corporate_profile" (
    "id" BIGSERIAL PRIMARY KEY,
    "url" TEXT
)
"#,
    )
    .await?;

    ctx.execute(
        r#"ALTER TABLE "user" ADD COLUMN "is_corporate" BOOLEAN NOT NULL DEFAULT false"#,
    )
    .await?;

    ctx.execute(r#"ALTER TABLE "user" ADD COLUMN "corporate_profile_id" BIGINT UNIQUE"#)
        .await?;

    ctx.execute(
        r#"
ALTER TABLE "user"
    ADD CONSTRAINT fk_user_corporate_profile_id
    FOREIGN KEY ("corporate_profile_id") REFERENCES "corporate_profile"("id") ON DELETE SET NULL
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0009-create-corporate-profile",
        name: "create-corporate-profile",
        depends_on: Some("0008-create-conversation"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
