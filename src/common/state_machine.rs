//! Transition-table validation shared by every task domain.
//!
//! Each task domain declares its status set and adjacency table by
//! implementing [`TaskStatus`]. Validation is a pure lookup: no timestamps
//! are touched and nothing is persisted here. Side effects that follow an
//! approved transition belong to the owning aggregate.

use std::fmt;
use thiserror::Error;

/// Lifecycle status of a task entity with a fixed transition table.
pub trait TaskStatus: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Returns the canonical storage representation.
    fn as_str(self) -> &'static str;

    /// Returns the statuses reachable from `self` in one transition.
    fn successors(self) -> &'static [Self];

    /// Returns whether transition to `target` is listed in the table.
    fn can_transition_to(self, target: Self) -> bool {
        self.successors().contains(&target)
    }

    /// Returns whether no transition leaves this status.
    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

/// A requested status change that the transition table does not allow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid status transition: {from} -> {to}")]
pub struct InvalidTransition {
    /// Current status in canonical string form.
    pub from: String,
    /// Requested status as supplied by the caller.
    pub to: String,
}

impl InvalidTransition {
    fn between(from: &str, to: &str) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
        }
    }
}

/// Checks `requested` against the adjacency table of `current`.
///
/// Requesting the current status is never valid: no table contains a
/// self-loop.
///
/// # Errors
///
/// Returns [`InvalidTransition`] when `requested` is not a successor of
/// `current`.
pub fn validate_transition<S: TaskStatus>(
    current: S,
    requested: S,
) -> Result<(), InvalidTransition> {
    if current.can_transition_to(requested) {
        Ok(())
    } else {
        Err(InvalidTransition::between(current.as_str(), requested.as_str()))
    }
}

/// Parses a raw status string and validates it against `current`.
///
/// A string that names no status of the domain cannot appear in any
/// adjacency list, so it is rejected the same way as an unlisted status.
///
/// # Errors
///
/// Returns [`InvalidTransition`] when `requested` does not parse into `S` or
/// is not a successor of `current`.
pub fn parse_and_validate<S>(current: S, requested: &str) -> Result<S, InvalidTransition>
where
    S: TaskStatus + for<'a> TryFrom<&'a str>,
{
    let target = S::try_from(requested)
        .map_err(|_| InvalidTransition::between(current.as_str(), requested.trim()))?;
    validate_transition(current, target)?;
    Ok(target)
}
