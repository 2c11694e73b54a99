//! Step identifiers.
//!
//! RULE: identifiers are stable strings. Their position in a concrete
//! sequence is decided by the sequencer, never by the enum order.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Where every session starts.
    #[default]
    AccountType,
    PersonalData,
    BusinessData,
    Address,
    IdVerification,
    AddressProof,
    TaxStatus,
    SourceOfFunds,
    InvestmentProfile,
    BankAccount,
    EnhancedDueDiligence,
    Agreement,
    Review,
    /// Terminal state. Never a member of a step sequence.
    Completed,
}

impl StepId {
    pub const ALL: [StepId; 14] = [
        Self::AccountType,
        Self::PersonalData,
        Self::BusinessData,
        Self::Address,
        Self::IdVerification,
        Self::AddressProof,
        Self::TaxStatus,
        Self::SourceOfFunds,
        Self::InvestmentProfile,
        Self::BankAccount,
        Self::EnhancedDueDiligence,
        Self::Agreement,
        Self::Review,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountType          => "account_type",
            Self::PersonalData         => "personal_data",
            Self::BusinessData         => "business_data",
            Self::Address              => "address",
            Self::IdVerification       => "id_verification",
            Self::AddressProof         => "address_proof",
            Self::TaxStatus            => "tax_status",
            Self::SourceOfFunds        => "source_of_funds",
            Self::InvestmentProfile    => "investment_profile",
            Self::BankAccount          => "bank_account",
            Self::EnhancedDueDiligence => "enhanced_due_diligence",
            Self::Agreement            => "agreement",
            Self::Review               => "review",
            Self::Completed            => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown step identifier '{0}'")]
pub struct UnknownStep(pub String);

impl FromStr for StepId {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_forms_round_trip() {
        for step in StepId::ALL {
            assert_eq!(step.as_str().parse::<StepId>().unwrap(), step);
        }
    }

    #[test]
    fn serde_uses_the_stable_string() {
        let json = serde_json::to_string(&StepId::EnhancedDueDiligence).unwrap();
        assert_eq!(json, "\"enhanced_due_diligence\"");
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let err = "kyc_interview".parse::<StepId>().unwrap_err();
        assert_eq!(err, UnknownStep("kyc_interview".into()));
    }

    #[test]
    fn unknown_step_converts_into_anyhow() {
        let err: anyhow::Error = "kyc_interview".parse::<StepId>().unwrap_err().into();
        assert_eq!(err.to_string(), "unknown step identifier 'kyc_interview'");
    }

    #[test]
    fn only_completed_is_terminal() {
        let terminal: Vec<_> = StepId::ALL.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![&StepId::Completed]);
    }
}
