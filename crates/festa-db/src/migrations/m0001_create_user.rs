//! Migration: create-user

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "user" (
    "id" BIGSERIAL PRIMARY KEY,
    "username" TEXT NOT NULL UNIQUE,
    "email" TEXT NOT NULL UNIQUE,
    "password_hash" TEXT NOT NULL,
    "first_name" TEXT,
    "last_name" TEXT,
    "profile_photo" TEXT,
    "bio" TEXT,
    "city" TEXT,
    "follower_count" INTEGER NOT NULL DEFAULT 0,
    "vote_count" INTEGER NOT NULL DEFAULT 0,
    "joined" TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#,
    )
    .await?;

    ctx.execute(
        r#"
CREATE TABLE "user_block" (
    "id" BIGSERIAL PRIMARY KEY,
    "user_id" BIGINT NOT NULL,
    "blocked_id" BIGINT NOT NULL,
    CONSTRAINT uq_user_block_user_id_blocked_id UNIQUE ("user_id", "blocked_id"),
    CONSTRAINT fk_user_block_user_id FOREIGN KEY ("user_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_user_block_blocked_id FOREIGN KEY ("blocked_id") REFERENCES "user"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0001-create-user",
        name: "create-user",
        depends_on: None,
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
