//! Votes, attendance statuses, and the counter arithmetic they drive.

/// A user's vote on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Single-character storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Vote::Up => "U",
            Vote::Down => "D",
        }
    }

    /// Parse a storage code.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "U" => Some(Vote::Up),
            "D" => Some(Vote::Down),
            _ => None,
        }
    }

    /// Numeric value of the vote: +1 for up, -1 for down.
    pub fn value(&self) -> i32 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}

/// A user's attendance status for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attendance {
    Yes,
    No,
    Maybe,
    Attended,
    Blocked,
}

impl Attendance {
    /// Single-character storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Attendance::Yes => "Y",
            Attendance::No => "N",
            Attendance::Maybe => "M",
            Attendance::Attended => "A",
            Attendance::Blocked => "B",
        }
    }

    /// Parse a storage code.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Y" => Some(Attendance::Yes),
            "N" => Some(Attendance::No),
            "M" => Some(Attendance::Maybe),
            "A" => Some(Attendance::Attended),
            "B" => Some(Attendance::Blocked),
            _ => None,
        }
    }
}

/// Adjustment to apply to a target's `vote_count` when a vote lands.
///
/// When the voter already had a vote on the target, the delta is doubled
/// to cover the net swing of a reversal (an up vote replacing a down vote
/// moves the count by +2). Note the doubling applies whether or not the
/// prior vote actually pointed the other way, so re-casting the same
/// direction overshoots by one. That is the counter rule as shipped, and
/// the tests pin it rather than substituting switch-vote semantics.
pub fn vote_count_delta(vote: Vote, voted_before: bool) -> i32 {
    let value = vote.value();
    if voted_before { value * 2 } else { value }
}
