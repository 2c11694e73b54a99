//! Risk model integration tests: factor arithmetic, level thresholds,
//! the PEP override and the canonical factor order.

use onboarding_core::{
    record::{
        Address, InvestmentExperience, InvestmentProfile, PersonalData, SourceOfFunds,
        TaxResidency, TaxStatus,
    },
    risk_model::{RiskCategory, RiskLevel, RiskModel},
    ApplicantRecord, RiskConfig, StepData,
};

fn record_with(items: Vec<StepData>) -> ApplicantRecord {
    let mut record = ApplicantRecord::new();
    for item in items {
        record.merge(item);
    }
    record
}

fn tax(is_pep: bool, is_us_person: bool) -> StepData {
    StepData::TaxStatus(TaxStatus {
        is_pep,
        is_us_person,
        ..Default::default()
    })
}

fn funds(source: &str) -> StepData {
    StepData::SourceOfFunds(SourceOfFunds {
        primary_source: source.into(),
        ..Default::default()
    })
}

fn investment(bucket: Option<&str>, experience: Option<InvestmentExperience>) -> StepData {
    StepData::InvestmentProfile(InvestmentProfile {
        expected_investment: bucket.map(str::to_string),
        experience,
        ..Default::default()
    })
}

fn nationality(country: &str) -> StepData {
    StepData::PersonalData(PersonalData {
        first_name: "Ada".into(),
        last_name: "Example".into(),
        nationality: Some(country.into()),
        ..Default::default()
    })
}

fn residence(country: &str) -> StepData {
    StepData::Address(Address {
        street: "1 Main St".into(),
        city: "Somewhere".into(),
        country: Some(country.into()),
        ..Default::default()
    })
}

/// An empty record is low risk and auto-approved.
#[test]
fn empty_record_is_low_and_auto_approved() {
    let assessment = RiskModel::default().assess(&ApplicantRecord::new());

    assert_eq!(assessment.overall_score, 0);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert!(assessment.auto_approved);
    assert!(!assessment.requires_manual_review);
    assert_eq!(assessment.factors.len(), 6);
    assert!(assessment.factors.iter().all(|f| f.score == 0));
}

/// PEP with a salary income: 40 points, but forced to high.
#[test]
fn pep_forces_high_below_threshold() {
    let record = record_with(vec![tax(true, false), funds("salary")]);
    let assessment = RiskModel::default().assess(&record);

    assert_eq!(assessment.factor(RiskCategory::Pep).unwrap().score, 40);
    assert_eq!(assessment.overall_score, 40);
    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert!(!assessment.auto_approved);
}

/// Inheritance plus a >100k bucket reaches high on score alone.
#[test]
fn inheritance_and_large_investment_reach_high_by_score() {
    let record = record_with(vec![funds("inheritance"), investment(Some(">100k"), None)]);
    let assessment = RiskModel::default().assess(&record);

    assert_eq!(assessment.factor(RiskCategory::SourceOfFunds).unwrap().score, 30);
    assert_eq!(assessment.factor(RiskCategory::InvestmentAmount).unwrap().score, 20);
    assert_eq!(assessment.overall_score, 50);
    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert!(!assessment.auto_approved);
}

/// US person alone lands exactly on the medium threshold.
#[test]
fn us_person_alone_is_medium() {
    let assessment = RiskModel::default().assess(&record_with(vec![tax(false, true)]));

    assert_eq!(assessment.overall_score, 25);
    assert_eq!(assessment.risk_level, RiskLevel::Medium);
    assert!(!assessment.auto_approved);
}

/// Factors come out in canonical order whatever contributed.
#[test]
fn factors_are_in_canonical_order() {
    let records = [
        ApplicantRecord::new(),
        record_with(vec![funds("crypto")]),
        record_with(vec![tax(true, true), nationality("Iran"), investment(Some("50k-100k"), Some(InvestmentExperience::None))]),
    ];
    let model = RiskModel::default();

    for record in &records {
        let categories: Vec<_> = model.assess(record).factors.iter().map(|f| f.category).collect();
        assert_eq!(categories, RiskCategory::CANONICAL_ORDER.to_vec());
    }
}

/// The overall score is the plain sum of factor scores.
#[test]
fn overall_score_is_sum_of_factors() {
    let record = record_with(vec![
        tax(true, true),
        nationality("North Korea"),
        funds("gambling"),
        investment(Some("100k+"), Some(InvestmentExperience::None)),
    ]);
    let assessment = RiskModel::default().assess(&record);

    let sum: u32 = assessment.factors.iter().map(|f| f.score).sum();
    assert_eq!(assessment.overall_score, sum);
    assert_eq!(assessment.overall_score, 155);
}

/// Weight is descriptive only: scores are the raw contributions.
#[test]
fn weight_does_not_scale_score() {
    let assessment = RiskModel::default().assess(&record_with(vec![tax(false, true)]));
    let factor = assessment.factor(RiskCategory::UsPerson).unwrap();

    assert_eq!(factor.score, 25);
    assert!((factor.weight - RiskCategory::UsPerson.weight()).abs() < f64::EPSILON);
    assert_eq!(factor.label, "US Person (FATCA)");
}

/// High-risk countries take precedence over medium-risk ones.
#[test]
fn high_risk_country_beats_medium() {
    let record = record_with(vec![nationality("Turkey"), residence("Syria")]);
    let factor = RiskModel::default()
        .assess(&record)
        .factor(RiskCategory::Country)
        .cloned()
        .unwrap();

    assert_eq!(factor.score, 35);
    assert!(factor.description.contains("Syria"));
}

/// Country matching is a case-insensitive substring check across
/// nationality, residence and tax residencies.
#[test]
fn country_match_covers_tax_residencies() {
    let record = record_with(vec![
        nationality("germany"),
        StepData::TaxStatus(TaxStatus {
            tax_residencies: vec![TaxResidency {
                country: "Republic of TURKEY".into(),
                tax_id: None,
            }],
            ..Default::default()
        }),
    ]);
    let assessment = RiskModel::default().assess(&record);

    assert_eq!(assessment.factor(RiskCategory::Country).unwrap().score, 15);
    assert_eq!(assessment.overall_score, 15);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
}

/// Fund-source categories: high, medium and standard.
#[test]
fn fund_source_tiers() {
    let model = RiskModel::default();
    let score = |source: &str| {
        model
            .assess(&record_with(vec![funds(source)]))
            .factor(RiskCategory::SourceOfFunds)
            .unwrap()
            .score
    };

    assert_eq!(score("gift"), 30);
    assert_eq!(score("Crypto"), 30);
    assert_eq!(score("business"), 10);
    assert_eq!(score("Real Estate"), 10);
    assert_eq!(score("real_estate"), 10);
    assert_eq!(score("salary"), 0);
    assert_eq!(score("pension"), 0);
}

/// Investment buckets: anything above 100k, the 50k family, everything else.
#[test]
fn investment_bucket_tiers() {
    let model = RiskModel::default();
    let score = |bucket: &str| {
        model
            .assess(&record_with(vec![investment(Some(bucket), None)]))
            .factor(RiskCategory::InvestmentAmount)
            .unwrap()
            .score
    };

    assert_eq!(score(">100k"), 20);
    assert_eq!(score("100K+"), 20);
    assert_eq!(score("100k-500k"), 20);
    assert_eq!(score("250k-500k"), 20);
    assert_eq!(score("500k+"), 20);
    assert_eq!(score("1M+"), 20);
    assert_eq!(score("50k-100k"), 10);
    assert_eq!(score("10k-50k"), 10);
    assert_eq!(score("<10k"), 0);
}

/// Only an explicit "none" experience scores.
#[test]
fn experience_factor() {
    let model = RiskModel::default();
    let score = |experience: Option<InvestmentExperience>| {
        model
            .assess(&record_with(vec![investment(None, experience)]))
            .factor(RiskCategory::Experience)
            .unwrap()
            .score
    };

    assert_eq!(score(Some(InvestmentExperience::None)), 5);
    assert_eq!(score(Some(InvestmentExperience::Basic)), 0);
    assert_eq!(score(Some(InvestmentExperience::Expert)), 0);
    assert_eq!(score(None), 0);
}

/// Auto-approval follows the level exactly.
#[test]
fn auto_approved_iff_low() {
    let model = RiskModel::default();
    let records = [
        ApplicantRecord::new(),
        record_with(vec![funds("business")]),
        record_with(vec![tax(false, true)]),
        record_with(vec![tax(true, false)]),
        record_with(vec![funds("inheritance"), investment(Some(">100k"), None)]),
    ];

    for record in &records {
        let assessment = model.assess(record);
        assert_eq!(assessment.auto_approved, assessment.risk_level == RiskLevel::Low);
        assert!(!assessment.requires_manual_review);
    }
}

/// Custom tables replace the built-in ones.
#[test]
fn custom_config_tables_apply() {
    let config = RiskConfig {
        high_risk_countries: vec!["Atlantis".into()],
        ..Default::default()
    };
    let model = RiskModel::new(config);

    let atlantis = model.assess(&record_with(vec![residence("Atlantis")]));
    let iran = model.assess(&record_with(vec![residence("Iran")]));

    assert_eq!(atlantis.factor(RiskCategory::Country).unwrap().score, 35);
    assert_eq!(iran.factor(RiskCategory::Country).unwrap().score, 0);
}
