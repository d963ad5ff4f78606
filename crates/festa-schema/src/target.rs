//! Polymorphic references.
//!
//! Comments, annotations, follows, and votes attach to heterogeneous
//! targets. A target is identified by `(kind, id)` rather than a fixed
//! foreign key; the kind is restricted to the enumeration below and is
//! validated at the application boundary, since the storage layer cannot
//! enforce a cross-table reference for a polymorphic column.

/// The entities that can carry comments, annotations, follows, and votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A user profile.
    User,
    /// An event.
    Event,
}

impl TargetKind {
    /// All valid kinds.
    pub const ALL: [TargetKind; 2] = [TargetKind::User, TargetKind::Event];

    /// The stored discriminator string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::User => "user",
            TargetKind::Event => "event",
        }
    }

    /// The table backing this kind. Same as the discriminator today, but
    /// the two are distinct concepts.
    pub fn table(&self) -> &'static str {
        self.as_str()
    }

    /// Parse a stored discriminator.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(TargetKind::User),
            "event" => Some(TargetKind::Event),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a row of a targetable entity.
///
/// The pair is not storage-enforced; a dangling id is possible and is an
/// accepted risk of the design. Target deletion sweeps dependents
/// explicitly instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRef {
    /// What kind of row is referenced.
    pub kind: TargetKind,
    /// Primary key of the referenced row.
    pub id: i64,
}

impl TargetRef {
    pub fn new(kind: TargetKind, id: i64) -> Self {
        Self { kind, id }
    }

    /// A user target.
    pub fn user(id: i64) -> Self {
        Self::new(TargetKind::User, id)
    }

    /// An event target.
    pub fn event(id: i64) -> Self {
        Self::new(TargetKind::Event, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_all_kinds() {
        for kind in TargetKind::ALL {
            assert_eq!(TargetKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TargetKind::parse("comment"), None);
        assert_eq!(TargetKind::parse(""), None);
    }

    #[test]
    fn display_matches_discriminator() {
        assert_eq!(TargetRef::event(7).kind.to_string(), "event");
    }
}
