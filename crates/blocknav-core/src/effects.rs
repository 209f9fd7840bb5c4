//! Highlight effect types.
//!
//! Effects are requests returned by the transition functions in `update`.
//! The tracker executes them against the items it holds.
//! A transition only mutates the cursor; it never touches an item.

use std::fmt;

/// Effects returned by a transition for the tracker to execute.
///
/// Indices are absolute positions in the tracker's item list, not offsets
/// into the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavEffect {
    /// Highlight the item at this index.
    Select(usize),

    /// Remove the highlight from the item at this index.
    Deselect(usize),
}

impl NavEffect {
    /// The list index this effect targets.
    pub fn index(self) -> usize {
        match self {
            NavEffect::Select(index) | NavEffect::Deselect(index) => index,
        }
    }

    pub fn is_select(self) -> bool {
        matches!(self, NavEffect::Select(_))
    }
}

impl fmt::Display for NavEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavEffect::Select(index) => write!(f, "+{index}"),
            NavEffect::Deselect(index) => write!(f, "-{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_and_kind() {
        assert_eq!(NavEffect::Select(4).index(), 4);
        assert_eq!(NavEffect::Deselect(2).index(), 2);
        assert!(NavEffect::Select(0).is_select());
        assert!(!NavEffect::Deselect(0).is_select());
    }

    #[test]
    fn test_display_uses_sign_prefix() {
        assert_eq!(NavEffect::Select(3).to_string(), "+3");
        assert_eq!(NavEffect::Deselect(7).to_string(), "-7");
    }
}
