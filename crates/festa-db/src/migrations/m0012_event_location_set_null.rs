//! Migration: event-location-set-null
//!
//! Deleting a location must not take its event down with it; the event
//! keeps existing with no venue assigned.

use crate::{Migration, MigrationContext, Result};

async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(r#"ALTER TABLE "event" DROP CONSTRAINT fk_event_location_id"#)
        .await?;

    ctx.execute(
        r#"
ALTER TABLE "event"
    ADD CONSTRAINT fk_event_location_id
    FOREIGN KEY ("location_id") REFERENCES "location"("id") ON DELETE SET NULL
"#,
    )
    .await?;

    Ok(())
}

inventory::submit! {
    Migration {
        version: "0012-event-location-set-null",
        name: "event-location-set-null",
        depends_on: Some("0011-create-annotation"),
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
