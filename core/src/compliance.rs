//! The compliance decision contract.
//!
//! The backend is the sole authority that turns a risk level into an
//! approval or a manual review. The core only hands it the record.

use crate::{
    error::ComplianceError,
    record::ApplicantRecord,
    risk_model::{RiskLevel, RiskModel},
    types::CustomerId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Approved,
    ManualReview,
    Rejected,
}

/// The backend's verdict. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceResult {
    pub customer_id: CustomerId,
    pub status:      ComplianceStatus,
    #[serde(default)]
    pub risk_level:  Option<RiskLevel>,
    #[serde(default)]
    pub message:     Option<String>,
    pub decided_at:  DateTime<Utc>,
}

#[async_trait]
pub trait ComplianceService: Send + Sync {
    async fn submit_onboarding(
        &self,
        customer_id: &str,
        record: &ApplicantRecord,
    ) -> Result<ComplianceResult, ComplianceError>;
}

/// In-process stand-in for the remote backend, applying its stated
/// policy: low risk is approved, anything else goes to manual review.
#[derive(Debug, Clone, Default)]
pub struct LocalComplianceService {
    model: RiskModel,
}

impl LocalComplianceService {
    pub fn new(model: RiskModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl ComplianceService for LocalComplianceService {
    async fn submit_onboarding(
        &self,
        customer_id: &str,
        record: &ApplicantRecord,
    ) -> Result<ComplianceResult, ComplianceError> {
        let assessment = self.model.assess(record);
        let (status, message) = match assessment.risk_level {
            RiskLevel::Low => (ComplianceStatus::Approved, "Account approved"),
            _              => (ComplianceStatus::ManualReview, "Application referred for compliance review"),
        };
        log::debug!(
            "local compliance: customer={customer_id} score={} level={} status={status:?}",
            assessment.overall_score,
            assessment.risk_level.as_str(),
        );
        Ok(ComplianceResult {
            customer_id: customer_id.to_string(),
            status,
            risk_level:  Some(assessment.risk_level),
            message:     Some(message.to_string()),
            decided_at:  Utc::now(),
        })
    }
}
