//! Warning policy module
//!
//! Flags predictions that fall outside the region the regression pipeline
//! was trained on. The thresholds are tied to the training-data
//! distribution and are deliberately constants.

use crate::{FeatureVector, Prediction};

/// Kind of caveat attached to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// More than one hydrogen-bond donor
    HBondDonors,
    /// Molecular weight outside the well-sampled range
    MolWt,
    /// More than one aromatic ring
    RingsAromatic,
    /// Prediction close to the model's lower limit
    PredBpLow,
    /// Prediction close to the model's upper limit
    PredBpHigh,
}

impl WarningCode {
    /// Stable machine-readable code
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::HBondDonors => "h_bond_donors",
            WarningCode::MolWt => "mol_wt",
            WarningCode::RingsAromatic => "rings_aromatic",
            WarningCode::PredBpLow => "pred_bp_low",
            WarningCode::PredBpHigh => "pred_bp_high",
        }
    }

    /// Human-readable explanation shown next to the prediction
    pub fn message(&self) -> &'static str {
        match self {
            WarningCode::HBondDonors => {
                "Molecules with 2 or more hydrogen bonding donors are not well represented in the \
                 training data set; the predicted boiling point is likely artificially low."
            }
            WarningCode::MolWt => {
                "The molecular weight is more than 2 standard deviations from the training data's \
                 mean; boiling points are not accurately predicted for molecules of this size. \
                 Predictions are most accurate in the molecular weight range of 113 - 308 g/mol."
            }
            WarningCode::RingsAromatic => {
                "Molecules with 2 or more aromatic rings are not well represented in the training \
                 data set; boiling points are not accurately predicted for polyaromatics."
            }
            WarningCode::PredBpLow => {
                "The predicted boiling point is near the lower limit of this model's capabilities \
                 (400 K, 127 °C)."
            }
            WarningCode::PredBpHigh => {
                "The predicted boiling point is near the upper limit of this model's capabilities \
                 (700 K, 427 °C)."
            }
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (code, message) caveat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Machine-readable code
    pub code: WarningCode,
    /// Human-readable message
    pub message: &'static str,
}

impl From<WarningCode> for Warning {
    fn from(code: WarningCode) -> Self {
        Self {
            code,
            message: code.message(),
        }
    }
}

/// Fixed thresholds producing prediction caveats
pub struct WarningPolicy;

impl WarningPolicy {
    /// Donor counts above this trigger `h_bond_donors`
    pub const MAX_H_BOND_DONORS: u32 = 1;
    /// Weights below this trigger `mol_wt`
    pub const MIN_MOL_WT: f64 = 113.0;
    /// Weights above this trigger `mol_wt`
    pub const MAX_MOL_WT: f64 = 308.0;
    /// Aromatic ring counts above this trigger `rings_aromatic`
    pub const MAX_RINGS_AROMATIC: u32 = 1;
    /// Predictions below this (Kelvin) trigger `pred_bp_low`
    pub const LOW_BP_KELVIN: i64 = 425;
    /// Predictions above this (Kelvin) trigger `pred_bp_high`
    pub const HIGH_BP_KELVIN: i64 = 675;

    /// Evaluate every check and collect the warnings that fire
    ///
    /// Checks are independent and always appended in the same order:
    /// donors, weight, aromatic rings, low prediction, high prediction.
    pub fn evaluate(features: &FeatureVector, prediction: &Prediction) -> Vec<Warning> {
        let mut warnings = Vec::new();

        // 1. Hydrogen-bond donors
        if features.h_bond_donors > Self::MAX_H_BOND_DONORS {
            warnings.push(WarningCode::HBondDonors.into());
        }

        // 2. Molecular weight outside [113, 308]
        if features.mol_wt > Self::MAX_MOL_WT || features.mol_wt < Self::MIN_MOL_WT {
            warnings.push(WarningCode::MolWt.into());
        }

        // 3. Polyaromatics
        if features.rings_aromatic > Self::MAX_RINGS_AROMATIC {
            warnings.push(WarningCode::RingsAromatic.into());
        }

        // 4-5. Prediction near the model's limits (on the rounded value)
        if prediction.kelvin() < Self::LOW_BP_KELVIN {
            warnings.push(WarningCode::PredBpLow.into());
        }
        if prediction.kelvin() > Self::HIGH_BP_KELVIN {
            warnings.push(WarningCode::PredBpHigh.into());
        }

        warnings
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const ORDER: [WarningCode; 5] = [
        WarningCode::HBondDonors,
        WarningCode::MolWt,
        WarningCode::RingsAromatic,
        WarningCode::PredBpLow,
        WarningCode::PredBpHigh,
    ];

    proptest! {
        /// Property: evaluation is deterministic
        #[test]
        fn test_evaluation_is_stable(
            donors in 0u32..6,
            wt in 0.0f64..600.0,
            rings in 0u32..5,
            kelvin in 100.0f64..900.0,
        ) {
            let fv = FeatureVector::new(0.2, donors, wt, rings);
            let p = Prediction::from_model_output(kelvin).unwrap();
            prop_assert_eq!(WarningPolicy::evaluate(&fv, &p), WarningPolicy::evaluate(&fv, &p));
        }

        /// Property: warnings are a subsequence of the fixed check order
        #[test]
        fn test_warnings_follow_check_order(
            donors in 0u32..6,
            wt in 0.0f64..600.0,
            rings in 0u32..5,
            kelvin in 100.0f64..900.0,
        ) {
            let fv = FeatureVector::new(0.2, donors, wt, rings);
            let p = Prediction::from_model_output(kelvin).unwrap();
            let warnings = WarningPolicy::evaluate(&fv, &p);

            let positions: Vec<usize> = warnings
                .iter()
                .map(|w| ORDER.iter().position(|c| *c == w.code).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }

        /// Property: each check fires exactly when its threshold is crossed
        #[test]
        fn test_checks_are_independent(
            donors in 0u32..6,
            wt in 0.0f64..600.0,
            rings in 0u32..5,
            kelvin in 100.0f64..900.0,
        ) {
            let fv = FeatureVector::new(0.2, donors, wt, rings);
            let p = Prediction::from_model_output(kelvin).unwrap();
            let warnings = WarningPolicy::evaluate(&fv, &p);
            let has = |code: WarningCode| warnings.iter().any(|w| w.code == code);

            prop_assert_eq!(has(WarningCode::HBondDonors), donors > 1);
            prop_assert_eq!(has(WarningCode::MolWt), !(113.0..=308.0).contains(&wt));
            prop_assert_eq!(has(WarningCode::RingsAromatic), rings > 1);
            prop_assert_eq!(has(WarningCode::PredBpLow), p.kelvin() < 425);
            prop_assert_eq!(has(WarningCode::PredBpHigh), p.kelvin() > 675);
        }
    }
}
