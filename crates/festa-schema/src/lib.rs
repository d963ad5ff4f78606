//! Declarative schema model for the festa event-discovery backend.
//!
//! This crate describes the relational data model as plain values:
//! [`Table`]s composed from capability mixins (ownable, commentable,
//! followable, votable, taggable), plus the handful of derived
//! computations the model carries (vote values, counter deltas, upload
//! paths). It knows how to render itself to `CREATE TABLE` SQL but has
//! no database dependency; applying and evolving the schema lives in
//! `festa-db`.
//!
//! # Naming Convention
//!
//! **Table names use singular form** (e.g., `user`, `event`, `comment`).
//!
//! This convention treats each table as a definition of what a single
//! record represents, rather than a container of multiple records.
//! Junction tables for many-to-many relationships use singular forms
//! joined by underscore: `event_artist`, `event_tag`, `user_block`.
//!
//! Because `user` is a reserved word in Postgres, every rendered
//! identifier goes through [`quote_ident`].

pub mod mixins;
pub mod model;
pub mod reaction;
pub mod schema;
pub mod target;

pub use model::app_schema;
pub use reaction::{Attendance, Vote, vote_count_delta};
pub use schema::{Column, ForeignKey, OnDelete, PgType, Schema, Table, Unique};
pub use target::{TargetKind, TargetRef};

/// Quote a PostgreSQL identifier.
///
/// Always quotes identifiers to avoid issues with reserved keywords like
/// `user`, `order`, `table`, `group`, etc. Doubles any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Storage reference for an uploaded file.
///
/// The actual bytes live in an external file store; the database only
/// keeps this path-like string, `file_<unix-timestamp>_<original name>`.
pub fn upload_path(filename: &str) -> String {
    format!("file_{}_{}", chrono::Utc::now().timestamp(), filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_wraps_and_escapes() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn upload_path_keeps_original_filename() {
        let path = upload_path("party.png");
        assert!(path.starts_with("file_"));
        assert!(path.ends_with("_party.png"));
    }
}
