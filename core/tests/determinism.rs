//! Two sessions, same seed, same operations.
//! They must derive byte-identical assessments and sequences and hand out
//! the same customer id. Any divergence means something is cached or
//! reads ambient state.

use onboarding_core::{
    record::{
        Address, InvestmentExperience, InvestmentProfile, PersonalData, SourceOfFunds,
        TaxResidency, TaxStatus,
    },
    AccountType, LocalComplianceService, OnboardingSession, RiskModel, SeededCustomerIds,
    StepData, StepSequencer,
};
use std::sync::Arc;

const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

fn build_session(seed: u64) -> OnboardingSession {
    OnboardingSession::new(
        StepSequencer::default(),
        Arc::new(LocalComplianceService::default()),
        Arc::new(SeededCustomerIds::new(seed)),
    )
}

fn script() -> Vec<StepData> {
    vec![
        StepData::AccountType(AccountType::Business),
        StepData::PersonalData(PersonalData {
            first_name: "Mira".into(),
            last_name: "Okafor".into(),
            nationality: Some("Nigeria".into()),
            ..Default::default()
        }),
        StepData::Address(Address {
            street: "12 Harbour Rd".into(),
            city: "Lagos".into(),
            country: Some("Nigeria".into()),
            ..Default::default()
        }),
        StepData::TaxStatus(TaxStatus {
            tax_residencies: vec![TaxResidency {
                country: "United Kingdom".into(),
                tax_id: Some("AB123456C".into()),
            }],
            ..Default::default()
        }),
        StepData::SourceOfFunds(SourceOfFunds {
            primary_source: "business".into(),
            ..Default::default()
        }),
        StepData::InvestmentProfile(InvestmentProfile {
            experience: Some(InvestmentExperience::None),
            expected_investment: Some("50k-100k".into()),
            ..Default::default()
        }),
    ]
}

/// Snapshot JSON minus the fields that carry wall-clock time.
fn comparable(session: &OnboardingSession) -> String {
    let mut json = serde_json::to_value(session.snapshot()).expect("serialize snapshot");
    if let Some(result) = json.get_mut("compliance_result").and_then(|r| r.as_object_mut()) {
        result.remove("decided_at");
    }
    json.to_string()
}

#[test]
fn assessment_is_idempotent() {
    let model = RiskModel::default();
    let session = build_session(SEED);
    for step in script() {
        session.update(step);
    }
    let record = session.data();

    let a = serde_json::to_string(&model.assess(&record)).unwrap();
    let b = serde_json::to_string(&model.assess(&record)).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn same_seed_same_operations_same_session() {
    let session_a = build_session(SEED);
    let session_b = build_session(SEED);

    for session in [&session_a, &session_b] {
        for step in script() {
            session.update(step);
            session.next();
        }
        session.submit().await.expect("submit");
    }

    let a = comparable(&session_a);
    let b = comparable(&session_b);
    assert_eq!(a, b, "Sessions diverged:\n  A: {a}\n  B: {b}");
    assert!(session_a.customer_id().is_some());
}

#[tokio::test]
async fn different_seeds_produce_different_ids() {
    let session_a = build_session(42);
    let session_b = build_session(99);

    session_a.submit().await.unwrap();
    session_b.submit().await.unwrap();

    assert_ne!(session_a.customer_id(), session_b.customer_id());
}
