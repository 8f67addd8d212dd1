//! Scenario catalog: Conservative, Moderate, Optimistic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ensure_finite, ForecastError, ForecastResult};

/// Named scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScenarioName {
    Conservative,
    Moderate,
    Optimistic,
}

impl ScenarioName {
    /// Catalog order
    pub const ALL: [ScenarioName; 3] = [
        ScenarioName::Conservative,
        ScenarioName::Moderate,
        ScenarioName::Optimistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioName::Conservative => "Conservative",
            ScenarioName::Moderate => "Moderate",
            ScenarioName::Optimistic => "Optimistic",
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioName {
    type Err = ForecastError;

    /// Case-insensitive; unknown names are rejected rather than defaulted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(ScenarioName::Conservative),
            "moderate" => Ok(ScenarioName::Moderate),
            "optimistic" => Ok(ScenarioName::Optimistic),
            _ => Err(ForecastError::InvalidScenario(s.to_string())),
        }
    }
}

/// Revenue-level and growth assumptions for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: ScenarioName,
    /// Multiplier applied to base revenue
    pub level_multiplier: f64,
    /// Monthly compounding growth rate
    pub monthly_growth: f64,
}

impl ScenarioConfig {
    pub fn new(name: ScenarioName, level_multiplier: f64, monthly_growth: f64) -> Self {
        Self { name, level_multiplier, monthly_growth }
    }

    /// Standard assumptions for a named scenario
    pub fn standard(name: ScenarioName) -> Self {
        match name {
            ScenarioName::Conservative => Self::new(name, 0.85, 0.005),
            ScenarioName::Moderate => Self::new(name, 1.00, 0.010),
            ScenarioName::Optimistic => Self::new(name, 1.15, 0.020),
        }
    }
}

/// The fixed three-entry catalog
///
/// Level multiplier and growth are non-decreasing Conservative -> Optimistic,
/// so for a shared base revenue the scenarios never cross.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    configs: [ScenarioConfig; 3],
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScenarioCatalog {
    pub fn standard() -> Self {
        Self {
            configs: ScenarioName::ALL.map(ScenarioConfig::standard),
        }
    }

    /// Build a custom catalog, validating names, order, and monotonicity
    pub fn new(configs: [ScenarioConfig; 3]) -> ForecastResult<Self> {
        for (expected, config) in ScenarioName::ALL.iter().zip(configs.iter()) {
            if config.name != *expected {
                return Err(ForecastError::invalid_input(
                    "scenario_catalog",
                    format!("expected {} at this position, found {}", expected, config.name),
                ));
            }
            ensure_finite("level_multiplier", config.level_multiplier)?;
            ensure_finite("monthly_growth", config.monthly_growth)?;
            if config.level_multiplier < 0.0 {
                return Err(ForecastError::invalid_input(
                    "level_multiplier",
                    format!("{} multiplier cannot be negative", config.name),
                ));
            }
            if config.monthly_growth <= -1.0 {
                return Err(ForecastError::invalid_input(
                    "monthly_growth",
                    format!("{} growth must be above -100%", config.name),
                ));
            }
        }

        for pair in configs.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if upper.level_multiplier < lower.level_multiplier || upper.monthly_growth < lower.monthly_growth {
                return Err(ForecastError::invalid_input(
                    "scenario_catalog",
                    format!("{} assumptions must not be below {}", upper.name, lower.name),
                ));
            }
        }

        Ok(Self { configs })
    }

    /// Config for a named scenario
    pub fn get(&self, name: ScenarioName) -> ScenarioConfig {
        self.configs[name.position()]
    }

    /// Look up by name, failing fast on unknown names
    pub fn by_name(&self, name: &str) -> ForecastResult<ScenarioConfig> {
        Ok(self.get(name.parse()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioConfig> {
        self.configs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("Moderate".parse::<ScenarioName>().unwrap(), ScenarioName::Moderate);
        assert_eq!(" optimistic ".parse::<ScenarioName>().unwrap(), ScenarioName::Optimistic);
        assert!(matches!(
            "Base".parse::<ScenarioName>(),
            Err(ForecastError::InvalidScenario(name)) if name == "Base"
        ));
    }

    #[test]
    fn test_standard_catalog_is_ordered() {
        let catalog = ScenarioCatalog::standard();
        assert!(ScenarioCatalog::new(catalog.configs).is_ok());

        let configs: Vec<_> = catalog.iter().collect();
        assert_eq!(configs.len(), 3);
        for pair in configs.windows(2) {
            assert!(pair[1].level_multiplier >= pair[0].level_multiplier);
            assert!(pair[1].monthly_growth >= pair[0].monthly_growth);
        }
    }

    #[test]
    fn test_catalog_rejects_inversion() {
        let configs = [
            ScenarioConfig::new(ScenarioName::Conservative, 1.0, 0.02),
            ScenarioConfig::new(ScenarioName::Moderate, 1.0, 0.01),
            ScenarioConfig::new(ScenarioName::Optimistic, 1.2, 0.03),
        ];
        assert!(ScenarioCatalog::new(configs).is_err());
    }

    #[test]
    fn test_catalog_rejects_misordered_names() {
        let configs = [
            ScenarioConfig::standard(ScenarioName::Moderate),
            ScenarioConfig::standard(ScenarioName::Conservative),
            ScenarioConfig::standard(ScenarioName::Optimistic),
        ];
        assert!(ScenarioCatalog::new(configs).is_err());
    }

    #[test]
    fn test_by_name() {
        let catalog = ScenarioCatalog::standard();
        assert_eq!(catalog.by_name("conservative").unwrap().name, ScenarioName::Conservative);
        assert!(catalog.by_name("Aggressive").is_err());
    }
}
