//! Migration: create-event
//!
//! Location deletion cascaded into events at this point; step 0012
//! relaxes the policy to SET NULL.

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        r#"
CREATE TABLE "location" (
    "id" BIGSERIAL PRIMARY KEY,
    "city" TEXT NOT NULL,
    "district" TEXT NOT NULL,
    "place_id" TEXT NOT NULL,
    "name" TEXT NOT NULL,
    "lat" NUMERIC(9, 6) NOT NULL,
    "lng" NUMERIC(9, 6) NOT NULL
)
"#,
    )
    .await?;

    ctx.execute(
        r#"
CREATE TABLE "event" (
    "id" BIGSERIAL PRIMARY KEY,
    "owner_id" BIGINT NOT NULL,
    "title" TEXT NOT NULL,
    "description" TEXT NOT NULL,
    "date" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "price" NUMERIC(6, 2) NOT NULL DEFAULT 0,
    "organizer_url" TEXT,
    "featured_image" TEXT,
    "location_id" BIGINT UNIQUE,
    "follower_count" INTEGER NOT NULL DEFAULT 0,
    "vote_count" INTEGER NOT NULL DEFAULT 0,
    "created" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "updated" TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT fk_event_owner_id FOREIGN KEY ("owner_id") REFERENCES "user"("id") ON DELETE CASCADE,
    CONSTRAINT fk_event_location_id FOREIGN KEY ("location_id") REFERENCES "location"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    ctx.execute(
        r#"
CREATE TABLE "event_artist" (
    "id" BIGSERIAL PRIMARY KEY,
    "event_id" BIGINT NOT NULL,
    "artist_id" BIGINT NOT NULL,
    CONSTRAINT uq_event_artist_event_id_artist_id UNIQUE ("event_id", "artist_id"),
    CONSTRAINT fk_event_artist_event_id FOREIGN KEY ("event_id") REFERENCES "event"("id") ON DELETE CASCADE,
    CONSTRAINT fk_event_artist_artist_id FOREIGN KEY ("artist_id") REFERENCES "user"("id") ON DELETE CASCADE
)
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0002-create-event",
        name: "create-event",
        depends_on: Some("0001-create-user"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
