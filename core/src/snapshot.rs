//! Session snapshot — the read-only view handed to the presentation layer.
//!
//! Derived fields (sequence, progress, risk assessment) are recomputed
//! when the snapshot is taken. Nothing here is written back.

use crate::{
    compliance::ComplianceResult,
    record::ApplicantRecord,
    risk_model::RiskAssessment,
    sequencer::StepSequence,
    step::StepId,
    types::{AccountType, CustomerId, Percent},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub current_step:      StepId,
    pub account_type:      AccountType,
    pub data:              ApplicantRecord,
    pub sequence:          StepSequence,
    pub progress:          Percent,
    pub risk_assessment:   RiskAssessment,
    pub is_loading:        bool,
    pub error:             Option<String>,
    pub customer_id:       Option<CustomerId>,
    pub compliance_result: Option<ComplianceResult>,
}
