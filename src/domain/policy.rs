use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPARISON_YEARS: [i32; 2] = [2024, 2025];
pub const DEFAULT_REPORTING_MONTHS: usize = 7;
pub const DEFAULT_TOP_OFFICES: usize = 10;
pub const DEFAULT_REAL_TAX_TYPES: [&str; 6] = [
    "iva_real",
    "igi_real",
    "dta_real",
    "ieps_real",
    "isan_real",
    "otros_real",
];

/// Reporting-period rules shared by the comparative charts.
///
/// The January–July window and the 2024/2025 pair are business rules of the
/// report, so they live here rather than inside the recipes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingPolicy {
    /// Years compared side by side (variation, composition, time series).
    pub comparison_years: Vec<i32>,
    /// Number of leading calendar months included in comparative charts.
    pub reporting_months: usize,
    /// Size of the office ranking.
    pub top_offices: usize,
    /// Tax-type values holding inflation-adjusted amounts.
    pub real_tax_types: Vec<String>,
}

impl Default for ReportingPolicy {
    fn default() -> Self {
        Self {
            comparison_years: DEFAULT_COMPARISON_YEARS.to_vec(),
            reporting_months: DEFAULT_REPORTING_MONTHS,
            top_offices: DEFAULT_TOP_OFFICES,
            real_tax_types: DEFAULT_REAL_TAX_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReportingPolicy {
    pub fn is_comparison_year(&self, year: i32) -> bool {
        self.comparison_years.contains(&year)
    }

    pub fn is_real_tax_type(&self, tax_type: &str) -> bool {
        self.real_tax_types.iter().any(|t| t == tax_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let policy: ReportingPolicy = serde_yaml::from_str("reporting_months: 6\n").unwrap();
        assert_eq!(policy.reporting_months, 6);
        assert_eq!(policy.comparison_years, vec![2024, 2025]);
        assert_eq!(policy.top_offices, 10);
        assert!(policy.is_real_tax_type("ieps_real"));
        assert!(!policy.is_real_tax_type("IEPS"));
    }
}
