//! Prediction module

/// Offset between Kelvin and degrees Celsius
const KELVIN_OFFSET: f64 = 273.15;

/// A predicted boiling point
///
/// Holds both the raw model output and the value rounded to the nearest
/// integer Kelvin. Ties round to even, matching the rounding the regression
/// pipeline's reference deployment applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    raw: f64,
    kelvin: i64,
}

impl Prediction {
    /// Build a prediction from a raw model output
    ///
    /// Returns `None` when the output is NaN or infinite; such a value has
    /// no nearest integer.
    pub fn from_model_output(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        Some(Self {
            raw,
            kelvin: raw.round_ties_even() as i64,
        })
    }

    /// Rounded boiling point in Kelvin
    pub fn kelvin(&self) -> i64 {
        self.kelvin
    }

    /// Unrounded model output in Kelvin
    pub fn raw(&self) -> f64 {
        self.raw
    }

    /// Rounded boiling point in degrees Celsius
    pub fn celsius(&self) -> f64 {
        self.kelvin as f64 - KELVIN_OFFSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_nearest() {
        assert_eq!(Prediction::from_model_output(351.4).unwrap().kelvin(), 351);
        assert_eq!(Prediction::from_model_output(351.6).unwrap().kelvin(), 352);
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(Prediction::from_model_output(424.5).unwrap().kelvin(), 424);
        assert_eq!(Prediction::from_model_output(425.5).unwrap().kelvin(), 426);
    }

    #[test]
    fn test_non_finite_output_rejected() {
        assert!(Prediction::from_model_output(f64::NAN).is_none());
        assert!(Prediction::from_model_output(f64::INFINITY).is_none());
    }

    #[test]
    fn test_celsius() {
        let p = Prediction::from_model_output(373.0).unwrap();
        assert!((p.celsius() - 99.85).abs() < 1e-9);
        assert_eq!(p.raw(), 373.0);
    }
}
