use crate::{Error, ErrorKind, Result};

/// Thresholds used to pair repeats and to grade the pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HosConfig {
    /// Maximum distance, in nucleotides, between the starts (and between the
    /// ends) of two repeats for them to count as covering the same span.
    pub offset: usize,
    /// The longer period must exceed the shorter one by more than this factor.
    pub min_ratio: f64,
    /// The fractional part of the period ratio must be below this, or above
    /// `1 - frac_tolerance`.
    pub frac_tolerance: f64,
    /// A longer/shorter score ratio above this counts as support.
    pub score_ratio: f64,
    /// A longer minus shorter identity above this counts as support.
    pub identity_delta: f64,
}

impl Default for HosConfig {
    fn default() -> Self {
        HosConfig {
            offset: 10,
            min_ratio: 1.5,
            frac_tolerance: 0.15,
            score_ratio: 1.15,
            identity_delta: 5.0,
        }
    }
}

impl HosConfig {
    /// Check every threshold is a usable number.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("min-ratio", self.min_ratio),
            ("frac-tolerance", self.frac_tolerance),
            ("score-ratio", self.score_ratio),
            ("identity-delta", self.identity_delta),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(config_error(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.min_ratio < 1.0 {
            return Err(config_error(format!(
                "min-ratio must be at least 1, got {}",
                self.min_ratio
            )));
        }
        if !(0.0..=0.5).contains(&self.frac_tolerance) {
            return Err(config_error(format!(
                "frac-tolerance must lie in [0, 0.5], got {}",
                self.frac_tolerance
            )));
        }
        if self.score_ratio < 0.0 {
            return Err(config_error(format!(
                "score-ratio must not be negative, got {}",
                self.score_ratio
            )));
        }
        if self.identity_delta < 0.0 {
            return Err(config_error(format!(
                "identity-delta must not be negative, got {}",
                self.identity_delta
            )));
        }
        Ok(())
    }
}

fn config_error(msg: String) -> Error {
    Error::new(ErrorKind::Config(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(HosConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        let cfg = HosConfig {
            frac_tolerance: 0.6,
            ..HosConfig::default()
        };
        assert!(matches!(cfg.validate().unwrap_err().kind(), ErrorKind::Config(_)));

        let cfg = HosConfig {
            min_ratio: 0.5,
            ..HosConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = HosConfig {
            identity_delta: -1.0,
            ..HosConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = HosConfig {
            score_ratio: f64::NAN,
            ..HosConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
