//! Risk model — turns a partial applicant record into a risk assessment.
//!
//! RULES:
//!   - assess() is pure and total. Missing data scores 0 and is reported
//!     as the benign case for that factor.
//!   - Six additive factors, always emitted in canonical order:
//!     PEP, US person, country, source of funds, investment amount, experience.
//!   - A factor's weight is display metadata. It never enters the arithmetic.
//!   - Nothing is cached. Same record in, identical assessment out.

use crate::{
    config::RiskConfig,
    record::{ApplicantRecord, InvestmentExperience},
    types::Score,
};
use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

pub const PEP_SCORE: Score = 40;
pub const US_PERSON_SCORE: Score = 25;
pub const HIGH_RISK_COUNTRY_SCORE: Score = 35;
pub const MEDIUM_RISK_COUNTRY_SCORE: Score = 15;
pub const HIGH_RISK_FUNDS_SCORE: Score = 30;
pub const MEDIUM_RISK_FUNDS_SCORE: Score = 10;
pub const LARGE_INVESTMENT_SCORE: Score = 20;
pub const MEDIUM_INVESTMENT_SCORE: Score = 10;
pub const NO_EXPERIENCE_SCORE: Score = 5;

pub const HIGH_RISK_THRESHOLD: Score = 50;
pub const MEDIUM_RISK_THRESHOLD: Score = 25;

/// Sum of every factor's largest contribution.
pub const MAX_SCORE: Score = PEP_SCORE
    + US_PERSON_SCORE
    + HIGH_RISK_COUNTRY_SCORE
    + HIGH_RISK_FUNDS_SCORE
    + LARGE_INVESTMENT_SCORE
    + NO_EXPERIENCE_SCORE;

// ── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Level from score thresholds alone, before the PEP override.
    pub fn from_score(score: Score) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low    => "low",
            Self::Medium => "medium",
            Self::High   => "high",
        }
    }

    /// Medium and high applicants get the enhanced due diligence step.
    pub fn requires_enhanced_due_diligence(&self) -> bool {
        !matches!(self, Self::Low)
    }
}

/// The six scored categories, declared in canonical emission order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Pep,
    UsPerson,
    Country,
    SourceOfFunds,
    InvestmentAmount,
    Experience,
}

impl RiskCategory {
    pub const CANONICAL_ORDER: [RiskCategory; 6] = [
        Self::Pep,
        Self::UsPerson,
        Self::Country,
        Self::SourceOfFunds,
        Self::InvestmentAmount,
        Self::Experience,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pep              => "PEP Status",
            Self::UsPerson         => "US Person (FATCA)",
            Self::Country          => "Country Risk",
            Self::SourceOfFunds    => "Source of Funds",
            Self::InvestmentAmount => "Investment Amount",
            Self::Experience       => "Investment Experience",
        }
    }

    /// Display weight. Sums to 1.0 across the six categories.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Pep              => 0.25,
            Self::UsPerson         => 0.15,
            Self::Country          => 0.20,
            Self::SourceOfFunds    => 0.20,
            Self::InvestmentAmount => 0.10,
            Self::Experience       => 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFactor {
    pub category:    RiskCategory,
    pub label:       String,
    pub score:       Score,
    pub description: String,
    pub weight:      f64,
}

impl RiskFactor {
    fn new(category: RiskCategory, score: Score, description: impl Into<String>) -> Self {
        Self {
            category,
            label:       category.label().to_string(),
            score,
            description: description.into(),
            weight:      category.weight(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub overall_score:          Score,
    pub risk_level:             RiskLevel,
    pub factors:                Vec<RiskFactor>,
    /// Always false. Enhanced due diligence stands in for manual review,
    /// and no manual-review policy is defined yet.
    pub requires_manual_review: bool,
    pub auto_approved:          bool,
}

impl RiskAssessment {
    pub fn factor(&self, category: RiskCategory) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.category == category)
    }
}

// ── Model ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RiskModel {
    config: RiskConfig,
}

impl RiskModel {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn assess(&self, record: &ApplicantRecord) -> RiskAssessment {
        let factors = vec![
            self.pep_factor(record),
            self.us_person_factor(record),
            self.country_factor(record),
            self.source_of_funds_factor(record),
            self.investment_amount_factor(record),
            self.experience_factor(record),
        ];

        let overall_score: Score = factors.iter().map(|f| f.score).sum();
        let risk_level = if record.is_pep() {
            RiskLevel::High
        } else {
            RiskLevel::from_score(overall_score)
        };

        RiskAssessment {
            overall_score,
            risk_level,
            factors,
            requires_manual_review: false,
            auto_approved: risk_level == RiskLevel::Low,
        }
    }

    fn pep_factor(&self, record: &ApplicantRecord) -> RiskFactor {
        if record.is_pep() {
            RiskFactor::new(RiskCategory::Pep, PEP_SCORE, "Politically exposed person declared")
        } else {
            RiskFactor::new(RiskCategory::Pep, 0, "Not a politically exposed person")
        }
    }

    fn us_person_factor(&self, record: &ApplicantRecord) -> RiskFactor {
        if record.is_us_person() {
            RiskFactor::new(
                RiskCategory::UsPerson,
                US_PERSON_SCORE,
                "US person for tax purposes (FATCA reporting applies)",
            )
        } else {
            RiskFactor::new(RiskCategory::UsPerson, 0, "Not a US person")
        }
    }

    fn country_factor(&self, record: &ApplicantRecord) -> RiskFactor {
        let declared = record.declared_countries();

        if let Some(country) = first_listed(&declared, &self.config.high_risk_countries) {
            return RiskFactor::new(
                RiskCategory::Country,
                HIGH_RISK_COUNTRY_SCORE,
                format!("High-risk jurisdiction declared: {country}"),
            );
        }
        if let Some(country) = first_listed(&declared, &self.config.medium_risk_countries) {
            return RiskFactor::new(
                RiskCategory::Country,
                MEDIUM_RISK_COUNTRY_SCORE,
                format!("Medium-risk jurisdiction declared: {country}"),
            );
        }
        RiskFactor::new(RiskCategory::Country, 0, "No elevated-risk jurisdictions declared")
    }

    fn source_of_funds_factor(&self, record: &ApplicantRecord) -> RiskFactor {
        let Some(source) = record.primary_fund_source() else {
            return RiskFactor::new(RiskCategory::SourceOfFunds, 0, "Source of funds not yet declared");
        };
        let normalized = normalize_category(source);

        if listed(&normalized, &self.config.high_risk_fund_sources) {
            RiskFactor::new(
                RiskCategory::SourceOfFunds,
                HIGH_RISK_FUNDS_SCORE,
                format!("High-risk source of funds: {source}"),
            )
        } else if listed(&normalized, &self.config.medium_risk_fund_sources) {
            RiskFactor::new(
                RiskCategory::SourceOfFunds,
                MEDIUM_RISK_FUNDS_SCORE,
                format!("Medium-risk source of funds: {source}"),
            )
        } else {
            RiskFactor::new(
                RiskCategory::SourceOfFunds,
                0,
                format!("Standard source of funds: {source}"),
            )
        }
    }

    fn investment_amount_factor(&self, record: &ApplicantRecord) -> RiskFactor {
        let Some(bucket) = record.expected_investment() else {
            return RiskFactor::new(RiskCategory::InvestmentAmount, 0, "Expected investment not yet declared");
        };
        let bucket_lower = bucket.to_lowercase();

        if contains_any(&bucket_lower, &self.config.large_investment_markers) {
            RiskFactor::new(
                RiskCategory::InvestmentAmount,
                LARGE_INVESTMENT_SCORE,
                format!("Large expected investment: {bucket}"),
            )
        } else if contains_any(&bucket_lower, &self.config.medium_investment_markers) {
            RiskFactor::new(
                RiskCategory::InvestmentAmount,
                MEDIUM_INVESTMENT_SCORE,
                format!("Moderate expected investment: {bucket}"),
            )
        } else {
            RiskFactor::new(
                RiskCategory::InvestmentAmount,
                0,
                format!("Expected investment: {bucket}"),
            )
        }
    }

    fn experience_factor(&self, record: &ApplicantRecord) -> RiskFactor {
        match record.investment_experience() {
            Some(InvestmentExperience::None) => RiskFactor::new(
                RiskCategory::Experience,
                NO_EXPERIENCE_SCORE,
                "No prior investment experience",
            ),
            _ => RiskFactor::new(RiskCategory::Experience, 0, "Investment experience declared or not yet collected"),
        }
    }
}

// ── Matching helpers ─────────────────────────────────────────────────────────
//
// Free-text substring matching. "Turkey" will match inside any longer token
// that contains it. Structured country codes would remove that ambiguity.

/// First declared country containing any listed name, case-insensitively.
fn first_listed<'a>(declared: &[&'a str], list: &[String]) -> Option<&'a str> {
    declared
        .iter()
        .copied()
        .find(|country| contains_any(&country.to_lowercase(), list))
}

/// `haystack` must already be lowercase. Empty needles never match.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .filter(|n| !n.is_empty())
        .any(|n| haystack.contains(&n.to_lowercase()))
}

fn listed(normalized: &str, list: &[String]) -> bool {
    list.iter().any(|entry| normalize_category(entry) == normalized)
}

/// "Real Estate", "real-estate" and "real_estate" all normalize alike.
fn normalize_category(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
