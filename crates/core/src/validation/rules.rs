//! Validation rules.

use crate::types::Email;

/// A single field rule.
///
/// `Min` and `Max` bound the length in characters, not bytes, so CJK input
/// counts the way a user reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Value must be non-blank after trimming.
    Required,
    /// Value must be a plausible email address.
    Email,
    /// Value must be at least this many characters.
    Min(usize),
    /// Value may be at most this many characters.
    Max(usize),
}

impl Rule {
    /// Rule name as used for catalog message lookup.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
        }
    }

    /// Named parameter for message interpolation, if the rule has one.
    #[must_use]
    pub const fn param(&self) -> Option<(&'static str, usize)> {
        match self {
            Self::Min(n) | Self::Max(n) => Some(("length", *n)),
            Self::Required | Self::Email => None,
        }
    }

    /// Whether `value` satisfies this rule.
    #[must_use]
    pub fn check(&self, value: &str) -> bool {
        match self {
            Self::Required => !value.trim().is_empty(),
            _ if value.is_empty() => true,
            Self::Email => Email::parse(value).is_ok(),
            Self::Min(n) => value.chars().count() >= *n,
            Self::Max(n) => value.chars().count() <= *n,
        }
    }
}
