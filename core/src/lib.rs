//! Onboarding core — step sequencing and risk scoring for KYC/AML
//! applicant onboarding.
//!
//! DATA FLOW (one direction in, one direction out):
//!   record ──► risk_model ──► RiskAssessment
//!   record ──► sequencer  ──► StepSequence (risk-dependent)
//!   session owns the record and the step pointer, and hands the derived
//!   sequence and assessment to the presentation layer.

pub mod compliance;
pub mod config;
pub mod customer_id;
pub mod error;
pub mod event;
pub mod record;
pub mod risk_model;
pub mod sequencer;
pub mod session;
pub mod snapshot;
pub mod step;
pub mod types;

pub use compliance::{ComplianceResult, ComplianceService, ComplianceStatus, LocalComplianceService};
pub use config::RiskConfig;
pub use customer_id::{CustomerIdGenerator, SeededCustomerIds, UuidCustomerIds};
pub use error::{ComplianceError, OnboardingError, OnboardingResult};
pub use record::{ApplicantRecord, StepData};
pub use risk_model::{RiskAssessment, RiskCategory, RiskFactor, RiskLevel, RiskModel};
pub use sequencer::{StepSequence, StepSequencer};
pub use session::{OnboardingSession, SubmissionState, SubmitOutcome};
pub use snapshot::SessionSnapshot;
pub use step::StepId;
pub use types::AccountType;
