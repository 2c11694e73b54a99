//! Static lookup tables for the risk model.
//!
//! The built-in tables are a convenience, not a legal reference. They are
//! neither exhaustive nor authoritative. Deployments override them with
//! `RiskConfig::load`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Matched case-insensitively as substrings of declared countries.
    pub high_risk_countries:       Vec<String>,
    pub medium_risk_countries:     Vec<String>,
    /// Matched against the normalized primary source of funds.
    pub high_risk_fund_sources:    Vec<String>,
    pub medium_risk_fund_sources:  Vec<String>,
    /// Substrings of the lowercased expected-investment bucket. Large
    /// markers are checked first. The built-in markers expect buckets
    /// such as "10k-50k", "50k-100k", ">100k", "100k-500k", "500k+" or
    /// "1m+". "<10k" and any other wording score nothing.
    pub large_investment_markers:  Vec<String>,
    pub medium_investment_markers: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_risk_countries: strings(&[
                "Afghanistan",
                "Iran",
                "North Korea",
                "Syria",
                "Yemen",
                "Myanmar",
                "Cuba",
                "Venezuela",
            ]),
            medium_risk_countries: strings(&[
                "Russia",
                "Turkey",
                "United Arab Emirates",
                "Nigeria",
                "Pakistan",
                "Panama",
                "Cayman Islands",
                "South Africa",
            ]),
            high_risk_fund_sources: strings(&["inheritance", "crypto", "gambling", "gift"]),
            medium_risk_fund_sources: strings(&["business", "investments", "real_estate"]),
            large_investment_markers: strings(&[
                ">100k",
                "100k+",
                "over_100k",
                "100k-",
                "250k",
                "500k",
                "1m",
            ]),
            medium_investment_markers: strings(&["50k"]),
        }
    }
}

impl RiskConfig {
    /// Load tables from a JSON file. Keys missing from the file keep
    /// their built-in table.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
