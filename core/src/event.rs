//! Session event log — a diagnostic trail of every state change.
//!
//! Variants are appended, never removed or reordered.

use crate::{
    compliance::ComplianceStatus,
    step::StepId,
    types::{AccountType, CustomerId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    // ── Data ───────────────────────────────────────
    AccountTypeSet {
        account_type: AccountType,
    },
    StepDataMerged {
        step: StepId,
    },

    // ── Navigation ─────────────────────────────────
    StepChanged {
        from: StepId,
        to:   StepId,
    },

    // ── Submission ─────────────────────────────────
    SubmissionStarted {
        customer_id: CustomerId,
    },
    SubmissionSucceeded {
        customer_id: CustomerId,
        status:      ComplianceStatus,
    },
    SubmissionFailed {
        customer_id: CustomerId,
        reason:      String,
    },
    DuplicateSubmissionSuppressed {
        in_flight: bool,
    },
}

impl SessionEvent {
    /// Stable name, matching the serde tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AccountTypeSet { .. }                => "account_type_set",
            Self::StepDataMerged { .. }                => "step_data_merged",
            Self::StepChanged { .. }                   => "step_changed",
            Self::SubmissionStarted { .. }             => "submission_started",
            Self::SubmissionSucceeded { .. }           => "submission_succeeded",
            Self::SubmissionFailed { .. }              => "submission_failed",
            Self::DuplicateSubmissionSuppressed { .. } => "duplicate_submission_suppressed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogEntry {
    pub seq:   u64,
    pub at:    DateTime<Utc>,
    pub event: SessionEvent,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<EventLogEntry>,
}

impl EventLog {
    pub fn append(&mut self, event: SessionEvent) {
        let entry = EventLogEntry {
            seq: self.entries.len() as u64,
            at:  Utc::now(),
            event,
        };
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    pub fn count(&self, event_type: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event.event_type() == event_type)
            .count()
    }
}
