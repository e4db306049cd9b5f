//! Interface name matching.
//!
//! # Responsibilities
//! - Turn a router's `interfaces` entries into explicit match rules
//! - Decide whether one rule accepts a sub-interface name
//!
//! # Design Decisions
//! - The wildcard is a variant, not a string compared at match time
//! - Sub-interface names match exactly (case-sensitive)
//! - Wildcard and exact rules are equally sufficient; there is no precedence

use std::fmt;

/// The config token that accepts every sub-interface.
pub const WILDCARD: &str = "*";

/// One entry of a router's accepted-interfaces list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InterfaceMatcher {
    /// Accepts every sub-interface name.
    Wildcard,
    /// Accepts exactly this sub-interface name.
    Exact(String),
}

impl InterfaceMatcher {
    /// Parse one config entry. Surrounding whitespace is ignored.
    pub fn parse(entry: &str) -> Self {
        match entry.trim() {
            WILDCARD => InterfaceMatcher::Wildcard,
            name => InterfaceMatcher::Exact(name.to_string()),
        }
    }

    /// Returns true if this rule accepts the sub-interface `name`.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            InterfaceMatcher::Wildcard => true,
            InterfaceMatcher::Exact(expected) => expected == name,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, InterfaceMatcher::Wildcard)
    }
}

impl fmt::Display for InterfaceMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceMatcher::Wildcard => f.write_str(WILDCARD),
            InterfaceMatcher::Exact(name) => f.write_str(name),
        }
    }
}
