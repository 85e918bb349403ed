//! On-demand trailing analysis over recent samples.

use crate::config::Thresholds;
use crate::error::TelemetryError;
use crate::models::Sample;
use serde::Serialize;

pub const HIGH_SLIP_ADVISORY: &str = "AI Analysis: High average slip ratio detected. Recommend reducing speed and checking tire pressure. Surface conditions may be compromised.";
pub const MODERATE_SLIP_ADVISORY: &str = "AI Analysis: Moderate traction loss. System is compensating effectively. Consider smoother acceleration patterns.";
pub const EXCELLENT_TRACTION_ADVISORY: &str = "AI Analysis: Excellent traction control. All parameters within optimal range. Current driving conditions are ideal.";

/// Traction level derived from the average slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TractionLevel {
    Excellent,
    Moderate,
    High,
}

impl TractionLevel {
    pub fn advisory(&self) -> &'static str {
        match self {
            TractionLevel::Excellent => EXCELLENT_TRACTION_ADVISORY,
            TractionLevel::Moderate => MODERATE_SLIP_ADVISORY,
            TractionLevel::High => HIGH_SLIP_ADVISORY,
        }
    }
}

/// Result of one trailing analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailingAnalysis {
    /// Mean slip ratio over the window.
    pub avg_slip: f64,
    /// Number of samples actually averaged.
    pub samples: usize,
    pub level: TractionLevel,
    pub advisory: &'static str,
}

/// Mean slip ratio of `window`, or `None` when it is empty.
pub fn average_slip(window: &[Sample]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let total: f64 = window.iter().map(|s| s.slip_ratio).sum();
    Some(total / window.len() as f64)
}

/// Classify the average slip of `window` against the trailing thresholds.
///
/// The caller chooses the window; this averages whatever it is given.
pub fn analyze(
    window: &[Sample],
    thresholds: &Thresholds,
) -> Result<TrailingAnalysis, TelemetryError> {
    let avg_slip = average_slip(window).ok_or(TelemetryError::EmptyBufferAnalysis)?;

    let level = if avg_slip > thresholds.high_avg_slip {
        TractionLevel::High
    } else if avg_slip > thresholds.moderate_avg_slip {
        TractionLevel::Moderate
    } else {
        TractionLevel::Excellent
    };

    Ok(TrailingAnalysis {
        avg_slip,
        samples: window.len(),
        level,
        advisory: level.advisory(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_of(slips: &[f64]) -> Vec<Sample> {
        slips
            .iter()
            .map(|&slip| Sample::new("09:30:00", 70.0, slip, 40.0, 50.0))
            .collect()
    }

    #[test]
    fn test_high_average() {
        let result = analyze(&window_of(&[15.0; 10]), &Thresholds::default()).unwrap();
        assert_eq!(result.avg_slip, 15.0);
        assert_eq!(result.level, TractionLevel::High);
        assert_eq!(result.advisory, HIGH_SLIP_ADVISORY);
    }

    #[test]
    fn test_excellent_average() {
        let result = analyze(&window_of(&[5.0; 10]), &Thresholds::default()).unwrap();
        assert_eq!(result.level, TractionLevel::Excellent);
        assert_eq!(result.advisory, EXCELLENT_TRACTION_ADVISORY);
    }

    #[test]
    fn test_moderate_average() {
        let result = analyze(&window_of(&[8.0; 10]), &Thresholds::default()).unwrap();
        assert_eq!(result.level, TractionLevel::Moderate);
        assert_eq!(result.advisory, MODERATE_SLIP_ADVISORY);
    }

    #[test]
    fn test_boundaries_fall_to_lower_level() {
        let thresholds = Thresholds::default();
        assert_eq!(
            analyze(&window_of(&[10.0]), &thresholds).unwrap().level,
            TractionLevel::Moderate
        );
        assert_eq!(
            analyze(&window_of(&[6.0]), &thresholds).unwrap().level,
            TractionLevel::Excellent
        );
    }

    #[test]
    fn test_partial_window_averages_what_is_present() {
        let result = analyze(&window_of(&[12.0, 14.0, 13.0]), &Thresholds::default()).unwrap();
        assert_eq!(result.samples, 3);
        assert_eq!(result.avg_slip, 13.0);
        assert_eq!(result.level, TractionLevel::High);
    }

    #[test]
    fn test_empty_window_is_no_data() {
        assert_eq!(
            analyze(&[], &Thresholds::default()),
            Err(TelemetryError::EmptyBufferAnalysis)
        );
        assert_eq!(average_slip(&[]), None);
    }
}
