//! Parameter groups and categories.
//!
//! This module provides the two closed classifications every parameter carries:
//!
//! - **Group**: the namespace a parameter lives in. Names only have to be unique
//!   within their group, and a control panel is materialized one group at a time.
//! - **Category**: how the parameter was declared. The category picks the kind of
//!   control the surface builds and the reconciliation path the sync engine takes.
//!
//! # Example
//!
//! ```ignore
//! // Panel "Tracking"
//! // ├── Tracking.threshold   (BoundedRange)
//! // ├── Tracking.use_motion  (Toggle)
//! // └── Tracking.max_frames  (FreeText)
//! ```

use std::fmt;

/// Namespace partitioning the parameters of a program.
///
/// The set is fixed. Each group is an independent namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Parameter,
    Main,
    OrbExtractor,
    Initialization,
    Tracking,
    Relocalization,
    LocalMapping,
    LoopClosing,
}

impl Group {
    /// All groups in declaration order.
    pub const ALL: [Group; 8] = [
        Group::Parameter,
        Group::Main,
        Group::OrbExtractor,
        Group::Initialization,
        Group::Tracking,
        Group::Relocalization,
        Group::LocalMapping,
        Group::LoopClosing,
    ];

    /// Canonical upper-snake name (e.g., "LOOP_CLOSING").
    pub const fn as_str(self) -> &'static str {
        match self {
            Group::Parameter => "PARAMETER",
            Group::Main => "MAIN",
            Group::OrbExtractor => "ORBEXTRACTOR",
            Group::Initialization => "INITIALIZATION",
            Group::Tracking => "TRACKING",
            Group::Relocalization => "RELOCALIZATION",
            Group::LocalMapping => "LOCAL_MAPPING",
            Group::LoopClosing => "LOOP_CLOSING",
        }
    }

    /// Find a group by its canonical name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Group> {
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a parameter is presented and reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Boolean switch. The toggle flag is stored as the parameter's max:
    /// `true` asks for a latching switch, `false` for a momentary button.
    Toggle,
    /// Value constrained to `[min, max]`, shown as a slider.
    BoundedRange,
    /// Value edited as text and converted at the boundary.
    FreeText,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Toggle => f.write_str("toggle"),
            Category::BoundedRange => f.write_str("range"),
            Category::FreeText => f.write_str("text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_names_round_trip() {
        for group in Group::ALL {
            assert_eq!(Group::from_name(group.as_str()), Some(group));
        }
        assert_eq!(Group::from_name("loop_closing"), Some(Group::LoopClosing));
        assert_eq!(Group::from_name("mapping"), None);
    }

    #[test]
    fn test_group_order_follows_declaration() {
        let mut sorted = Group::ALL;
        sorted.sort();
        assert_eq!(sorted, Group::ALL);
    }
}
