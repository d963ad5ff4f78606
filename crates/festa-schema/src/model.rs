//! The festa data model: entity tables and their constraints.
//!
//! Each entity is a function returning its [`Table`], composed from the
//! capability mixins; [`app_schema`] collects them in dependency order.
//! This module is the current truth of the schema; the migration chain
//! in `festa-db` is frozen history that converges on it.

use crate::mixins::{
    USER_TABLE, follower_count, id, junction, owner, target, timestamps, vote_count,
};
use crate::schema::{Column, ForeignKey, OnDelete, PgType, Schema, Table};

fn numeric(precision: u8, scale: u8) -> PgType {
    PgType::Numeric { precision, scale }
}

/// Corporate profile data, attached optionally to a user.
///
/// Corporate users carry extra data that does not belong on every user
/// row, so it lives in its own optional one-to-one table.
pub fn corporate_profile() -> Table {
    Table::new("corporate_profile")
        .column(id())
        .column(Column::new("url", PgType::Text).nullable())
}

/// A user account.
pub fn user() -> Table {
    Table::new(USER_TABLE)
        .column(id())
        .column(Column::new("username", PgType::Text).unique())
        .column(Column::new("email", PgType::Text).unique())
        .column(Column::new("password_hash", PgType::Text))
        .column(Column::new("first_name", PgType::Text).nullable())
        .column(Column::new("last_name", PgType::Text).nullable())
        .column(Column::new("profile_photo", PgType::Text).nullable())
        .column(Column::new("bio", PgType::Text).nullable())
        .column(Column::new("city", PgType::Text).nullable())
        .column(Column::new("is_corporate", PgType::Boolean).default_expr("false"))
        .column(
            Column::new("corporate_profile_id", PgType::BigInt)
                .nullable()
                .unique(),
        )
        .column(follower_count())
        .column(vote_count())
        .column(Column::new("joined", PgType::Timestamptz).default_expr("now()"))
        .foreign_key(ForeignKey::new(
            "corporate_profile_id",
            "corporate_profile",
            OnDelete::SetNull,
        ))
}

/// Directed self-referential block list.
pub fn user_block() -> Table {
    junction("user_block", ("user_id", USER_TABLE), ("blocked_id", USER_TABLE))
}

/// A physical place an event happens at.
pub fn location() -> Table {
    Table::new("location")
        .column(id())
        .column(Column::new("city", PgType::Text))
        .column(Column::new("district", PgType::Text))
        .column(Column::new("place_id", PgType::Text))
        .column(Column::new("name", PgType::Text))
        .column(Column::new("lat", numeric(9, 6)))
        .column(Column::new("lng", numeric(9, 6)))
}

/// An event: the central entity of the application.
///
/// `location_id` is nullable and survives location deletion (SET NULL);
/// the event itself must not disappear with its venue. The relation is
/// one-to-one: a location backs at most one event.
pub fn event() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("event")
        .column(id())
        .column(owner_col)
        .column(Column::new("title", PgType::Text))
        .column(Column::new("description", PgType::Text))
        .column(Column::new("date", PgType::Timestamptz).default_expr("now()"))
        .column(Column::new("price", numeric(6, 2)).default_expr("0"))
        .column(Column::new("organizer_url", PgType::Text).nullable())
        .column(Column::new("featured_image", PgType::Text).nullable())
        .column(Column::new("location_id", PgType::BigInt).nullable().unique())
        .column(follower_count())
        .column(vote_count())
        .columns(timestamps())
        .foreign_key(owner_fk)
        .foreign_key(ForeignKey::new("location_id", "location", OnDelete::SetNull))
}

/// Performing artists, modeled as users.
pub fn event_artist() -> Table {
    junction("event_artist", ("event_id", "event"), ("artist_id", USER_TABLE))
}

/// A free-form label.
pub fn tag() -> Table {
    Table::new("tag")
        .column(id())
        .column(Column::new("name", PgType::Text))
}

/// Tags on events.
pub fn event_tag() -> Table {
    junction("event_tag", ("event_id", "event"), ("tag_id", "tag"))
}

/// Tags on user profiles (interests).
pub fn user_tag() -> Table {
    junction("user_tag", ("user_id", USER_TABLE), ("tag_id", "tag"))
}

/// Attendance declaration for an event.
///
/// At most one per (owner, event); updates replace.
pub fn attendance() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("attendance")
        .column(id())
        .column(owner_col)
        .column(Column::new("event_id", PgType::BigInt))
        .column(Column::new("status", PgType::Text))
        .unique_together(&["owner_id", "event_id"])
        .foreign_key(owner_fk)
        .foreign_key(ForeignKey::new("event_id", "event", OnDelete::Cascade))
}

/// A share of an event by a user. At most one per (owner, event).
pub fn share() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("share")
        .column(id())
        .column(owner_col)
        .column(Column::new("event_id", PgType::BigInt))
        .unique_together(&["owner_id", "event_id"])
        .foreign_key(owner_fk)
        .foreign_key(ForeignKey::new("event_id", "event", OnDelete::Cascade))
}

/// A comment on any targetable entity.
pub fn comment() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("comment")
        .column(id())
        .column(owner_col)
        .columns(target())
        .column(Column::new("content", PgType::Text))
        .columns(timestamps())
        .foreign_key(owner_fk)
}

/// A structured annotation on any targetable entity.
pub fn annotation() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("annotation")
        .column(id())
        .column(owner_col)
        .columns(target())
        .column(Column::new("data", PgType::Jsonb))
        .columns(timestamps())
        .foreign_key(owner_fk)
}

/// A follow relationship. A user follows a given target at most once.
pub fn follow() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("follow")
        .column(id())
        .column(owner_col)
        .columns(target())
        .unique_together(&["owner_id", "target_kind", "target_id"])
        .foreign_key(owner_fk)
}

/// A vote on a target. A user votes on a given target at most once.
pub fn vote() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("vote")
        .column(id())
        .column(owner_col)
        .columns(target())
        .column(Column::new("vote", PgType::Text))
        .unique_together(&["owner_id", "target_kind", "target_id"])
        .foreign_key(owner_fk)
}

/// An uploaded media file attached to an event.
pub fn media() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("media")
        .column(id())
        .column(owner_col)
        .column(Column::new("event_id", PgType::BigInt))
        .column(Column::new("file", PgType::Text))
        .columns(timestamps())
        .foreign_key(owner_fk)
        .foreign_key(ForeignKey::new("event_id", "event", OnDelete::Cascade))
}

/// A two-party conversation. The owner started it.
pub fn conversation() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("conversation")
        .column(id())
        .column(owner_col)
        .column(Column::new("participant_id", PgType::BigInt))
        .columns(timestamps())
        .foreign_key(owner_fk)
        .foreign_key(ForeignKey::new("participant_id", USER_TABLE, OnDelete::Cascade))
}

/// A message within a conversation. The owner is the sender.
pub fn message() -> Table {
    let (owner_col, owner_fk) = owner();
    Table::new("message")
        .column(id())
        .column(owner_col)
        .column(Column::new("receiver_id", PgType::BigInt))
        .column(Column::new("conversation_id", PgType::BigInt))
        .column(Column::new("content", PgType::Text))
        .column(Column::new("created", PgType::Timestamptz).default_expr("now()"))
        .foreign_key(owner_fk)
        .foreign_key(ForeignKey::new("receiver_id", USER_TABLE, OnDelete::Cascade))
        .foreign_key(ForeignKey::new("conversation_id", "conversation", OnDelete::Cascade))
}

/// The complete application schema, in dependency order: every foreign
/// key target precedes its referrers, so [`Schema::to_sql`] output can be
/// executed top to bottom.
pub fn app_schema() -> Schema {
    Schema {
        tables: vec![
            corporate_profile(),
            user(),
            user_block(),
            location(),
            event(),
            event_artist(),
            tag(),
            event_tag(),
            user_tag(),
            attendance(),
            share(),
            comment(),
            annotation(),
            follow(),
            vote(),
            media(),
            conversation(),
            message(),
        ],
    }
}
