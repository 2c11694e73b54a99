//! The applicant record — everything collected so far, one slot per step.
//!
//! RULE: a slot is only ever replaced wholesale by a later write for the
//! same step. Nothing merges fields across slots.
//! RULE: an empty slot means "not yet collected", never "explicitly empty".
//! The core stores whatever it is given. Validation belongs to the screens.

use crate::{step::StepId, types::AccountType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Step payloads ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonalData {
    pub first_name:     String,
    pub last_name:      String,
    #[serde(default)]
    pub date_of_birth:  Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    /// Free text, e.g. "Germany". Read by the country-risk factor.
    #[serde(default)]
    pub nationality:    Option<String>,
    #[serde(default)]
    pub email:          Option<String>,
    #[serde(default)]
    pub phone:          Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BusinessData {
    pub company_name:             String,
    #[serde(default)]
    pub legal_form:               Option<String>,
    #[serde(default)]
    pub registration_number:      Option<String>,
    #[serde(default)]
    pub country_of_incorporation: Option<String>,
    #[serde(default)]
    pub authorized_signatory:     Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub street:      String,
    pub city:        String,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country of residence. Read by the country-risk factor.
    #[serde(default)]
    pub country:     Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Uploaded,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentUpload {
    /// e.g. "passport", "national_id", "utility_bill".
    pub document_type: String,
    #[serde(default)]
    pub file_names:    Vec<String>,
    #[serde(default)]
    pub status:        DocumentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaxResidency {
    pub country: String,
    #[serde(default)]
    pub tax_id:  Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaxStatus {
    #[serde(default)]
    pub is_pep:          bool,
    #[serde(default)]
    pub pep_details:     Option<String>,
    #[serde(default)]
    pub is_us_person:    bool,
    #[serde(default)]
    pub tax_residencies: Vec<TaxResidency>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceOfFunds {
    /// Category label, e.g. "salary", "inheritance", "real estate".
    pub primary_source: String,
    #[serde(default)]
    pub description:    Option<String>,
    #[serde(default)]
    pub annual_income:  Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentExperience {
    None,
    Basic,
    Intermediate,
    Expert,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InvestmentProfile {
    #[serde(default)]
    pub experience:          Option<InvestmentExperience>,
    /// Bucket label, e.g. "10k-50k", ">100k". Matched by substring.
    #[serde(default)]
    pub expected_investment: Option<String>,
    #[serde(default)]
    pub risk_tolerance:      Option<String>,
    #[serde(default)]
    pub investment_horizon:  Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BankAccount {
    pub account_holder: String,
    pub iban:           String,
    #[serde(default)]
    pub bic:            Option<String>,
    #[serde(default)]
    pub bank_name:      Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnhancedDueDiligence {
    #[serde(default)]
    pub source_of_wealth:        Option<String>,
    #[serde(default)]
    pub purpose_of_relationship: Option<String>,
    #[serde(default)]
    pub supporting_documents:    Vec<DocumentUpload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Agreement {
    #[serde(default)]
    pub terms_accepted:           bool,
    #[serde(default)]
    pub privacy_accepted:         bool,
    #[serde(default)]
    pub risk_disclosure_accepted: bool,
    #[serde(default)]
    pub accepted_at:              Option<DateTime<Utc>>,
}

// ── Step data ────────────────────────────────────────────────────────────────

/// One step's captured payload, as handed to the core by a screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum StepData {
    AccountType(AccountType),
    PersonalData(PersonalData),
    BusinessData(BusinessData),
    Address(Address),
    IdVerification(DocumentUpload),
    AddressProof(DocumentUpload),
    TaxStatus(TaxStatus),
    SourceOfFunds(SourceOfFunds),
    InvestmentProfile(InvestmentProfile),
    BankAccount(BankAccount),
    EnhancedDueDiligence(EnhancedDueDiligence),
    Agreement(Agreement),
}

impl StepData {
    /// The record slot this payload writes.
    pub fn step(&self) -> StepId {
        match self {
            Self::AccountType(_)          => StepId::AccountType,
            Self::PersonalData(_)         => StepId::PersonalData,
            Self::BusinessData(_)         => StepId::BusinessData,
            Self::Address(_)              => StepId::Address,
            Self::IdVerification(_)       => StepId::IdVerification,
            Self::AddressProof(_)         => StepId::AddressProof,
            Self::TaxStatus(_)            => StepId::TaxStatus,
            Self::SourceOfFunds(_)        => StepId::SourceOfFunds,
            Self::InvestmentProfile(_)    => StepId::InvestmentProfile,
            Self::BankAccount(_)          => StepId::BankAccount,
            Self::EnhancedDueDiligence(_) => StepId::EnhancedDueDiligence,
            Self::Agreement(_)            => StepId::Agreement,
        }
    }
}

// ── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplicantRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type:           Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_data:          Option<PersonalData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_data:          Option<BusinessData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address:                Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_verification:        Option<DocumentUpload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_proof:          Option<DocumentUpload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_status:             Option<TaxStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_of_funds:        Option<SourceOfFunds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_profile:     Option<InvestmentProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account:           Option<BankAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_due_diligence: Option<EnhancedDueDiligence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement:              Option<Agreement>,
}

impl ApplicantRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot named by `data` with its payload.
    /// Returns the step that was written.
    pub fn merge(&mut self, data: StepData) -> StepId {
        let step = data.step();
        match data {
            StepData::AccountType(v)          => self.account_type = Some(v),
            StepData::PersonalData(v)         => self.personal_data = Some(v),
            StepData::BusinessData(v)         => self.business_data = Some(v),
            StepData::Address(v)              => self.address = Some(v),
            StepData::IdVerification(v)       => self.id_verification = Some(v),
            StepData::AddressProof(v)         => self.address_proof = Some(v),
            StepData::TaxStatus(v)            => self.tax_status = Some(v),
            StepData::SourceOfFunds(v)        => self.source_of_funds = Some(v),
            StepData::InvestmentProfile(v)    => self.investment_profile = Some(v),
            StepData::BankAccount(v)          => self.bank_account = Some(v),
            StepData::EnhancedDueDiligence(v) => self.enhanced_due_diligence = Some(v),
            StepData::Agreement(v)            => self.agreement = Some(v),
        }
        step
    }

    /// Whether a payload has been collected for `step`.
    pub fn has(&self, step: StepId) -> bool {
        match step {
            StepId::AccountType          => self.account_type.is_some(),
            StepId::PersonalData         => self.personal_data.is_some(),
            StepId::BusinessData         => self.business_data.is_some(),
            StepId::Address              => self.address.is_some(),
            StepId::IdVerification       => self.id_verification.is_some(),
            StepId::AddressProof         => self.address_proof.is_some(),
            StepId::TaxStatus            => self.tax_status.is_some(),
            StepId::SourceOfFunds        => self.source_of_funds.is_some(),
            StepId::InvestmentProfile    => self.investment_profile.is_some(),
            StepId::BankAccount          => self.bank_account.is_some(),
            StepId::EnhancedDueDiligence => self.enhanced_due_diligence.is_some(),
            StepId::Agreement            => self.agreement.is_some(),
            StepId::Review | StepId::Completed => false,
        }
    }

    // ── Risk inputs ───────────────────────────────────────────

    pub fn is_pep(&self) -> bool {
        self.tax_status.as_ref().is_some_and(|t| t.is_pep)
    }

    pub fn is_us_person(&self) -> bool {
        self.tax_status.as_ref().is_some_and(|t| t.is_us_person)
    }

    /// Nationality, residence country and every declared tax residence,
    /// in that order. Absent values are skipped.
    pub fn declared_countries(&self) -> Vec<&str> {
        let nationality = self
            .personal_data
            .as_ref()
            .and_then(|p| p.nationality.as_deref());
        let residence = self.address.as_ref().and_then(|a| a.country.as_deref());
        let tax = self
            .tax_status
            .iter()
            .flat_map(|t| t.tax_residencies.iter())
            .map(|r| r.country.as_str());

        nationality.into_iter().chain(residence).chain(tax).collect()
    }

    pub fn primary_fund_source(&self) -> Option<&str> {
        self.source_of_funds
            .as_ref()
            .map(|s| s.primary_source.as_str())
    }

    pub fn expected_investment(&self) -> Option<&str> {
        self.investment_profile
            .as_ref()
            .and_then(|p| p.expected_investment.as_deref())
    }

    pub fn investment_experience(&self) -> Option<InvestmentExperience> {
        self.investment_profile.as_ref().and_then(|p| p.experience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_the_slot_wholesale() {
        let mut record = ApplicantRecord::new();
        record.merge(StepData::TaxStatus(TaxStatus {
            is_pep: true,
            pep_details: Some("former minister".into()),
            ..Default::default()
        }));
        record.merge(StepData::TaxStatus(TaxStatus {
            is_us_person: true,
            ..Default::default()
        }));

        let tax = record.tax_status.as_ref().unwrap();
        assert!(!tax.is_pep, "earlier write must not leak into the new payload");
        assert!(tax.pep_details.is_none());
        assert!(tax.is_us_person);
    }

    #[test]
    fn merge_leaves_other_slots_alone() {
        let mut record = ApplicantRecord::new();
        record.merge(StepData::Address(Address {
            street: "Hauptstrasse 1".into(),
            city: "Berlin".into(),
            country: Some("Germany".into()),
            ..Default::default()
        }));
        let written = record.merge(StepData::AccountType(AccountType::Business));

        assert_eq!(written, StepId::AccountType);
        assert!(record.has(StepId::Address));
        assert!(!record.has(StepId::PersonalData));
        assert_eq!(record.account_type, Some(AccountType::Business));
    }

    #[test]
    fn declared_countries_collects_every_source() {
        let mut record = ApplicantRecord::new();
        record.merge(StepData::PersonalData(PersonalData {
            nationality: Some("France".into()),
            ..Default::default()
        }));
        record.merge(StepData::TaxStatus(TaxStatus {
            tax_residencies: vec![
                TaxResidency { country: "Spain".into(), tax_id: None },
                TaxResidency { country: "Italy".into(), tax_id: None },
            ],
            ..Default::default()
        }));

        assert_eq!(record.declared_countries(), vec!["France", "Spain", "Italy"]);
    }

    #[test]
    fn step_data_json_is_tagged_by_step() {
        let json = serde_json::json!({
            "step": "source_of_funds",
            "data": { "primary_source": "salary" }
        });
        let data: StepData = serde_json::from_value(json).unwrap();
        assert_eq!(data.step(), StepId::SourceOfFunds);
    }

    #[test]
    fn empty_record_serializes_to_empty_object() {
        let json = serde_json::to_string(&ApplicantRecord::new()).unwrap();
        assert_eq!(json, "{}");
    }
}
