//! Back-of-the-envelope impact estimate behind the calculator panel.

use std::ops::RangeInclusive;

use crate::stats::group_thousands;

pub const BUDGET_RANGE: RangeInclusive<f64> = 10_000.0..=10_000_000.0;
pub const DURATION_RANGE: RangeInclusive<f64> = 6.0..=120.0;
pub const BENEFICIARY_RANGE: RangeInclusive<f64> = 100.0..=100_000.0;

/// Intervention type, keyed by the `<select>` option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectType {
    #[default]
    SandDams,
    Mangrove,
    Solar,
    WaterManagement,
}

/// Per-type weights of each output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub ndvi: f64,
    pub carbon: f64,
    pub roi: f64,
    pub resilience: f64,
}

impl ProjectType {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "sand_dams" => Some(ProjectType::SandDams),
            "mangrove" => Some(ProjectType::Mangrove),
            "solar" => Some(ProjectType::Solar),
            "water_mgmt" => Some(ProjectType::WaterManagement),
            _ => None,
        }
    }

    pub fn multipliers(self) -> Multipliers {
        let (ndvi, carbon, roi, resilience) = match self {
            ProjectType::SandDams => (0.15, 0.8, 3.5, 85.0),
            ProjectType::Mangrove => (0.20, 1.2, 2.8, 90.0),
            ProjectType::Solar => (0.05, 2.5, 4.2, 75.0),
            ProjectType::WaterManagement => (0.12, 0.6, 3.0, 80.0),
        };
        Multipliers { ndvi, carbon, roi, resilience }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactInputs {
    /// USD.
    pub budget: f64,
    pub duration_months: f64,
    pub beneficiaries: f64,
    pub project: ProjectType,
}

impl Default for ImpactInputs {
    fn default() -> Self {
        Self {
            budget: 250_000.0,
            duration_months: 24.0,
            beneficiaries: 5_000.0,
            project: ProjectType::SandDams,
        }
    }
}

impl ImpactInputs {
    /// Inputs from the raw form field values. Fields that do not parse keep
    /// their default; numbers are clamped to the form's ranges.
    pub fn from_fields(budget: &str, duration: &str, beneficiaries: &str, project: &str) -> Self {
        let defaults = Self::default();
        let number = |text: &str, fallback: f64, range: RangeInclusive<f64>| {
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
                .clamp(*range.start(), *range.end())
        };
        Self {
            budget: number(budget, defaults.budget, BUDGET_RANGE),
            duration_months: number(duration, defaults.duration_months, DURATION_RANGE),
            beneficiaries: number(beneficiaries, defaults.beneficiaries, BENEFICIARY_RANGE),
            project: ProjectType::from_value(project).unwrap_or(defaults.project),
        }
    }

    pub fn estimate(&self) -> ImpactEstimate {
        let m = self.project.multipliers();
        let budget_factor = (self.budget / 100_000.0).log10();
        let duration_factor = (self.duration_months / 12.0).sqrt();
        let beneficiary_factor = (self.beneficiaries / 1_000.0).log10();

        ImpactEstimate {
            ndvi_gain: m.ndvi * budget_factor * duration_factor,
            carbon_tonnes: (self.budget * m.carbon * duration_factor / 1_000.0).round().max(0.0) as u64,
            roi: m.roi * beneficiary_factor,
            resilience: (m.resilience * budget_factor * 0.8).round() as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEstimate {
    pub ndvi_gain: f64,
    /// tCO2e sequestered over the project's lifetime.
    pub carbon_tonnes: u64,
    pub roi: f64,
    pub resilience: i64,
}

impl ImpactEstimate {
    pub fn ndvi_text(&self) -> String {
        format!("{:+.2}", self.ndvi_gain)
    }

    pub fn carbon_text(&self) -> String {
        format!("{} tCO2e", group_thousands(self.carbon_tonnes))
    }

    pub fn roi_text(&self) -> String {
        format!("{:.1}x", self.roi)
    }

    pub fn resilience_text(&self) -> String {
        self.resilience.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_estimate() {
        let estimate = ImpactInputs::default().estimate();
        assert_eq!(estimate.ndvi_text(), "+0.08");
        assert_eq!(estimate.carbon_text(), "283 tCO2e");
        assert_eq!(estimate.roi_text(), "2.4x");
        assert_eq!(estimate.resilience_text(), "27");
    }

    #[test]
    fn unit_factors_expose_multipliers() {
        // budget 100k * 10, one year, 10k people: every factor is 1
        for (value, m) in [
            ("sand_dams", (0.15_f64, 0.8_f64, 3.5_f64, 85.0_f64)),
            ("mangrove", (0.20, 1.2, 2.8, 90.0)),
            ("solar", (0.05, 2.5, 4.2, 75.0)),
            ("water_mgmt", (0.12, 0.6, 3.0, 80.0)),
        ] {
            let inputs = ImpactInputs::from_fields("1000000", "12", "10000", value);
            let e = inputs.estimate();
            assert!((e.ndvi_gain - m.0).abs() < 1e-9, "{value}");
            assert_eq!(e.carbon_tonnes, (1_000.0 * m.1).round() as u64, "{value}");
            assert!((e.roi - m.2).abs() < 1e-9, "{value}");
            assert_eq!(e.resilience, (m.3 * 0.8).round() as i64, "{value}");
        }
    }

    #[test]
    fn large_solar_project() {
        let e = ImpactInputs::from_fields("10000000", "48", "100000", "solar").estimate();
        assert_eq!(e.ndvi_text(), "+0.20");
        assert_eq!(e.carbon_text(), "50,000 tCO2e");
        assert_eq!(e.roi_text(), "8.4x");
        assert_eq!(e.resilience_text(), "120");
    }

    #[test]
    fn small_budget_shrinks_vegetation() {
        let e = ImpactInputs::from_fields("10000", "12", "1000", "mangrove").estimate();
        assert_eq!(e.ndvi_text(), "-0.20");
        assert_eq!(e.roi_text(), "0.0x");
        assert_eq!(e.resilience, -72);
    }

    #[test]
    fn bad_fields_fall_back_and_clamp() {
        let inputs = ImpactInputs::from_fields("", "1000", "abc", "nuclear");
        assert_eq!(inputs.budget, 250_000.0);
        assert_eq!(inputs.duration_months, 120.0);
        assert_eq!(inputs.beneficiaries, 5_000.0);
        assert_eq!(inputs.project, ProjectType::SandDams);
        assert_eq!(ImpactInputs::from_fields("5", "1", "1", "solar").budget, 10_000.0);
    }
}
