//! Migration: create-conversation

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "conversation" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "participant_id" BIGINT NOT NULL,
    "created" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "updated" TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT fk_conversation_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_conversation_participant_id FOREIGN KEY ("participant_id") REFERENCES "user"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    ctx.execute(
        r#"
CREATE TABLE "message" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "receiver_id" BIGINT NOT NULL,
    "conversation_id" BIGINT NOT NULL,
    "content" TEXT NOT NULL,
    "created" TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT fk_message_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_message_receiver_id FOREIGN KEY ("receiver_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_message_conversation_id FOREIGN KEY ("conversation_id") REFERENCES "conversation"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0008-create-conversation",
        name: "create-conversation",
        depends_on: Some("0007-create-media"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
