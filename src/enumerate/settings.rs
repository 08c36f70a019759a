//! Enumerator settings, validated at construction

use super::EnumerateError;

/// How the closure loop explores the state space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationMode {
    /// Every unimolecular and bimolecular transition is enumerated
    Detailed,
}

/// Which three-way branch migration variant to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreeWayMode {
    /// Invader sites anywhere in the component of the remaining incumbent
    /// site
    Adjacent,
}

/// Which toehold unbinding variant to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnbindingMode {
    Adjacent,
}

/// Rate constants attached to emitted reactions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSet {
    pub bind: f64,
    pub unbind: f64,
    pub migrate: f64,
    pub displace: f64,
}

impl Default for RateSet {
    fn default() -> Self {
        Self { bind: 0.003, unbind: 0.1, migrate: 1.0, displace: 1.0 }
    }
}

impl RateSet {
    fn validate(&self) -> Result<(), EnumerateError> {
        for (name, value) in [
            ("bind", self.bind),
            ("unbind", self.unbind),
            ("migrate", self.migrate),
            ("displace", self.displace),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EnumerateError::InvalidSettings(format!(
                    "rate '{}' must be a positive number, found {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Full configuration of a geometric enumerator
#[derive(Debug, Clone)]
pub struct EnumeratorSettings {
    /// Human-readable configuration name (appears in logs)
    pub name: String,
    pub enumeration_mode: EnumerationMode,
    pub three_way_mode: ThreeWayMode,
    pub unbinding_mode: UnbindingMode,
    /// Hard bound on strands per complex; exceeding it aborts enumeration
    pub max_complex_size: usize,
    pub rates: RateSet,
}

impl EnumeratorSettings {
    /// Settings with the default modes and rates and no complex-size bound
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enumeration_mode: EnumerationMode::Detailed,
            three_way_mode: ThreeWayMode::Adjacent,
            unbinding_mode: UnbindingMode::Adjacent,
            max_complex_size: usize::MAX,
            rates: RateSet::default(),
        }
    }

    /// Bound the number of strands per complex
    pub fn with_max_complex_size(mut self, max: usize) -> Self {
        self.max_complex_size = max;
        self
    }

    /// Replace the rate constants
    pub fn with_rates(mut self, rates: RateSet) -> Self {
        self.rates = rates;
        self
    }

    /// Check the configuration; enumerator construction calls this
    pub fn validate(&self) -> Result<(), EnumerateError> {
        if self.name.is_empty() {
            return Err(EnumerateError::InvalidSettings(
                "settings name must not be empty".to_string(),
            ));
        }
        if self.max_complex_size == 0 {
            return Err(EnumerateError::InvalidSettings(
                "maxComplexSize must be at least 1".to_string(),
            ));
        }
        self.rates.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(EnumeratorSettings::new("adjacent_detailed").validate().is_ok());
    }

    #[test]
    fn nonpositive_rate_is_rejected() {
        let settings = EnumeratorSettings::new("bad")
            .with_rates(RateSet { bind: 0.0, ..RateSet::default() });
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_complex_bound_is_rejected() {
        assert!(EnumeratorSettings::new("bad").with_max_complex_size(0).validate().is_err());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(EnumeratorSettings::new("").validate().is_err());
    }
}
