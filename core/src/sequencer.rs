//! Step sequencer — derives the ordered onboarding steps for one applicant.
//!
//! RULES:
//!   - A sequence is derived, never stored. Every call recomputes the risk
//!     assessment from the record it is given.
//!   - COMPLETED is never a member. No identifier appears twice.
//!   - ENHANCED_DUE_DILIGENCE appears at most once, directly after
//!     BANK_ACCOUNT, and only for medium or high risk.
//!   - Navigation clamps at both ends. It never wraps and never fails.

use crate::{
    record::ApplicantRecord,
    risk_model::{RiskLevel, RiskModel},
    step::StepId,
    types::{AccountType, Percent},
};
use serde::Serialize;

const INDIVIDUAL_STEPS: &[StepId] = &[
    StepId::AccountType,
    StepId::PersonalData,
    StepId::Address,
    StepId::IdVerification,
    StepId::AddressProof,
    StepId::TaxStatus,
    StepId::SourceOfFunds,
    StepId::InvestmentProfile,
    StepId::BankAccount,
    StepId::Agreement,
    StepId::Review,
];

const BUSINESS_STEPS: &[StepId] = &[
    StepId::AccountType,
    StepId::BusinessData,
    StepId::PersonalData,
    StepId::Address,
    StepId::IdVerification,
    StepId::AddressProof,
    StepId::TaxStatus,
    StepId::SourceOfFunds,
    StepId::InvestmentProfile,
    StepId::BankAccount,
    StepId::Agreement,
    StepId::Review,
];

/// An ordered list of distinct steps, ending at REVIEW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepSequence {
    steps: Vec<StepId>,
}

impl StepSequence {
    /// Base sequence for the account type, with enhanced due diligence
    /// inserted when `risk_level` calls for it.
    pub fn build(account_type: AccountType, risk_level: RiskLevel) -> Self {
        let base = match account_type {
            AccountType::Individual => INDIVIDUAL_STEPS,
            AccountType::Business   => BUSINESS_STEPS,
        };
        let mut steps = base.to_vec();

        if risk_level.requires_enhanced_due_diligence()
            && !steps.contains(&StepId::EnhancedDueDiligence)
        {
            if let Some(pos) = steps.iter().position(|s| *s == StepId::BankAccount) {
                steps.insert(pos + 1, StepId::EnhancedDueDiligence);
            }
        }

        Self { steps }
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepId> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.steps.contains(&step)
    }

    pub fn position(&self, step: StepId) -> Option<usize> {
        self.steps.iter().position(|s| *s == step)
    }

    pub fn first(&self) -> Option<StepId> {
        self.steps.first().copied()
    }

    pub fn last(&self) -> Option<StepId> {
        self.steps.last().copied()
    }

    /// `round(index / (len - 1) * 100)`. A step not in the sequence counts
    /// as index 0. A sequence of fewer than two steps reports 0.
    pub fn progress(&self, current: StepId) -> Percent {
        if self.steps.len() < 2 {
            return 0;
        }
        let index = self.position(current).unwrap_or(0);
        let ratio = index as f64 / (self.steps.len() - 1) as f64;
        (ratio * 100.0).round() as Percent
    }

    /// The step after `current`. Stays put on the last step.
    /// From a step outside the sequence, lands on the first step.
    pub fn next_after(&self, current: StepId) -> StepId {
        match self.position(current) {
            Some(i) if i + 1 < self.steps.len() => self.steps[i + 1],
            Some(_)                             => current,
            None                                => self.first().unwrap_or(current),
        }
    }

    /// The step before `current`. Stays put on the first step and on any
    /// step outside the sequence.
    pub fn previous_before(&self, current: StepId) -> StepId {
        match self.position(current) {
            Some(i) if i > 0 => self.steps[i - 1],
            _                => current,
        }
    }
}

/// Pure and reentrant. Holds only the risk model it consults.
#[derive(Debug, Clone, Default)]
pub struct StepSequencer {
    model: RiskModel,
}

impl StepSequencer {
    pub fn new(model: RiskModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &RiskModel {
        &self.model
    }

    pub fn sequence(&self, account_type: AccountType, record: &ApplicantRecord) -> StepSequence {
        let assessment = self.model.assess(record);
        StepSequence::build(account_type, assessment.risk_level)
    }

    pub fn progress(&self, account_type: AccountType, record: &ApplicantRecord, current: StepId) -> Percent {
        self.sequence(account_type, record).progress(current)
    }

    pub fn next(&self, account_type: AccountType, record: &ApplicantRecord, current: StepId) -> StepId {
        self.sequence(account_type, record).next_after(current)
    }

    pub fn previous(&self, account_type: AccountType, record: &ApplicantRecord, current: StepId) -> StepId {
        self.sequence(account_type, record).previous_before(current)
    }
}
