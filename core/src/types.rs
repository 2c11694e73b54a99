//! Shared primitive types used across the onboarding core.

use serde::{Deserialize, Serialize};

/// Identifier the compliance backend knows the applicant by.
/// Assigned lazily, at most once per session.
pub type CustomerId = String;

/// Risk score in points. The six factors sum to at most 155.
pub type Score = u32;

/// Progress through a step sequence, 0..=100.
pub type Percent = u8;

/// Which kind of applicant is onboarding. Selects the base step sequence.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Individual,
    Business,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Business   => "business",
        }
    }
}
