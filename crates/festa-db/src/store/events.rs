//! Events, locations, and media.

use chrono::{DateTime, Utc};
use festa_schema::{TargetRef, upload_path};
use rust_decimal::Decimal;
use tokio_postgres::Client;

use crate::{Error, Result};

use super::sweep_target;

/// Fields required to publish an event.
pub struct NewEvent<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub date: DateTime<Utc>,
    pub price: Decimal,
    pub organizer_url: Option<&'a str>,
    pub location_id: Option<i64>,
}

/// Publish an event owned by `owner_id`.
pub async fn create_event(client: &Client, owner_id: i64, event: NewEvent<'_>) -> Result<i64> {
    let row = client
        .query_one(
            r#"
            INSERT INTO "event" (owner_id, title, description, date, price, organizer_url, location_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
            &[
                &owner_id,
                &event.title,
                &event.description,
                &event.date,
                &event.price,
                &event.organizer_url,
                &event.location_id,
            ],
        )
        .await
        .map_err(Error::from_db)?;
    Ok(row.get(0))
}

/// Fields describing a location.
pub struct NewLocation<'a> {
    pub city: &'a str,
    pub district: &'a str,
    pub place_id: &'a str,
    pub name: &'a str,
    pub lat: Decimal,
    pub lng: Decimal,
}

pub async fn create_location(client: &Client, location: NewLocation<'_>) -> Result<i64> {
    let row = client
        .query_one(
            r#"
            INSERT INTO "location" (city, district, place_id, name, lat, lng)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
            &[
                &location.city,
                &location.district,
                &location.place_id,
                &location.name,
                &location.lat,
                &location.lng,
            ],
        )
        .await?;
    Ok(row.get(0))
}

/// Credit a performing artist on an event. Crediting twice is a
/// duplicate.
pub async fn add_artist(client: &Client, event_id: i64, artist_id: i64) -> Result<()> {
    client
        .execute(
            r#"INSERT INTO "event_artist" (event_id, artist_id) VALUES ($1, $2)"#,
            &[&event_id, &artist_id],
        )
        .await
        .map_err(Error::from_db)?;
    Ok(())
}

/// Attach an uploaded file to an event, returning the stored path
/// reference (the bytes live in the external file store).
pub async fn add_media(
    client: &Client,
    owner_id: i64,
    event_id: i64,
    filename: &str,
) -> Result<String> {
    let path = upload_path(filename);
    client
        .execute(
            r#"INSERT INTO "media" (owner_id, event_id, file) VALUES ($1, $2, $3)"#,
            &[&owner_id, &event_id, &path],
        )
        .await?;
    Ok(path)
}

/// Delete an event.
///
/// Foreign-key dependents (media, attendance, shares, junction rows)
/// cascade in the store; polymorphic dependents (comments, annotations,
/// follows, votes targeting the event) are swept in the same
/// transaction. The owning user is untouched.
pub async fn delete_event(client: &mut Client, event_id: i64) -> Result<()> {
    let tx = client.transaction().await?;

    sweep_target(&tx, TargetRef::event(event_id)).await?;

    let deleted = tx
        .execute(r#"DELETE FROM "event" WHERE id = $1"#, &[&event_id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound {
            table: "event",
            id: event_id,
        });
    }

    tx.commit().await?;
    Ok(())
}

/// Delete a location. Events referencing it keep existing with their
/// location cleared (SET NULL).
pub async fn delete_location(client: &Client, location_id: i64) -> Result<()> {
    let deleted = client
        .execute(r#"DELETE FROM "location" WHERE id = $1"#, &[&location_id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound {
            table: "location",
            id: location_id,
        });
    }
    Ok(())
}
