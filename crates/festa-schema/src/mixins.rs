//! Capability mixins: composable field groups shared across entities.
//!
//! The model has a handful of structural capabilities that several
//! entities share: "owned by a user", "can be commented on", "carries
//! denormalized counters". Rather than repeating the column lists, each
//! capability is a function contributing columns (and, where needed,
//! constraints) that the entity definitions in [`crate::model`] compose.

use crate::schema::{Column, ForeignKey, OnDelete, PgType, Table};

/// The canonical user table.
///
/// Every owner relationship in the model points here; it is a single
/// process-wide decision, not a per-call-site one.
pub const USER_TABLE: &str = "user";

/// BIGSERIAL primary key, present on every entity.
pub fn id() -> Column {
    Column::new("id", PgType::BigSerial).primary_key()
}

/// Ownable: a required reference to the creating user.
///
/// Owned rows die with their user.
pub fn owner() -> (Column, ForeignKey) {
    (
        Column::new("owner_id", PgType::BigInt),
        ForeignKey::new("owner_id", USER_TABLE, OnDelete::Cascade),
    )
}

/// Polymorphic target: a `(target_kind, target_id)` pair naming a row of
/// any targetable entity (see [`crate::target::TargetKind`]).
///
/// No foreign key backs the pair; Postgres cannot enforce a reference
/// whose table varies per row. Validity is an application contract, and
/// deleting a target must sweep these rows explicitly.
pub fn target() -> Vec<Column> {
    vec![
        Column::new("target_kind", PgType::Text),
        Column::new("target_id", PgType::BigInt),
    ]
}

/// `created` and `updated` timestamps, defaulted on insert.
pub fn timestamps() -> Vec<Column> {
    vec![
        Column::new("created", PgType::Timestamptz).default_expr("now()"),
        Column::new("updated", PgType::Timestamptz).default_expr("now()"),
    ]
}

/// Followable: denormalized follower counter, incrementally maintained
/// by the store alongside `follow` row changes.
pub fn follower_count() -> Column {
    Column::new("follower_count", PgType::Integer).default_expr("0")
}

/// Votable: denormalized vote counter, incrementally maintained by the
/// store alongside `vote` row changes.
pub fn vote_count() -> Column {
    Column::new("vote_count", PgType::Integer).default_expr("0")
}

/// A many-to-many junction table.
///
/// `left` and `right` are `(column, referenced table)` pairs. Each pair
/// may appear at most once; both sides cascade.
pub fn junction(name: &str, left: (&str, &str), right: (&str, &str)) -> Table {
    Table::new(name)
        .column(id())
        .column(Column::new(left.0, PgType::BigInt))
        .column(Column::new(right.0, PgType::BigInt))
        .unique_together(&[left.0, right.0])
        .foreign_key(ForeignKey::new(left.0, left.1, OnDelete::Cascade))
        .foreign_key(ForeignKey::new(right.0, right.1, OnDelete::Cascade))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_cascades_to_user() {
        let (col, fk) = owner();
        assert_eq!(col.name, "owner_id");
        assert!(!col.nullable);
        assert_eq!(fk.references_table, USER_TABLE);
        assert_eq!(fk.on_delete, OnDelete::Cascade);
    }

    #[test]
    fn target_pair_has_no_foreign_key() {
        let cols = target();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].name, "target_kind");
        assert_eq!(cols[1].name, "target_id");
    }

    #[test]
    fn junction_is_unique_per_pair() {
        let table = junction("event_artist", ("event_id", "event"), ("artist_id", "user"));
        assert_eq!(table.uniques.len(), 1);
        assert_eq!(table.uniques[0].columns, vec!["event_id", "artist_id"]);
        assert_eq!(table.foreign_keys.len(), 2);
        assert!(table.foreign_keys.iter().all(|fk| fk.on_delete == OnDelete::Cascade));
    }
}
