//! Feature vector module

/// Number of descriptors the regression pipeline consumes
pub const FEATURE_COUNT: usize = 4;

/// Descriptor names in the order the pipeline was trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "branch_fraction",
    "h_bond_donors",
    "mol_wt",
    "rings_aromatic",
];

/// The four molecular descriptors fed to the regression pipeline
///
/// The layout is fixed: the downstream model is order-sensitive, so
/// [`FeatureVector::to_array`] always yields
/// `(branch_fraction, h_bond_donors, mol_wt, rings_aromatic)`.
///
/// `branch_fraction` is NaN when the molecule has no carbon atoms. Consumers
/// must read NaN as "feature unavailable", never as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Fraction of carbons that are tertiary or quaternary aliphatic branch points
    pub branch_fraction: f64,
    /// Lipinski hydrogen-bond donor count
    pub h_bond_donors: u32,
    /// Exact (monoisotopic) molecular weight in g/mol
    pub mol_wt: f64,
    /// Number of aromatic rings
    pub rings_aromatic: u32,
}

impl FeatureVector {
    /// Create a feature vector from its four descriptors
    pub fn new(branch_fraction: f64, h_bond_donors: u32, mol_wt: f64, rings_aromatic: u32) -> Self {
        Self {
            branch_fraction,
            h_bond_donors,
            mol_wt,
            rings_aromatic,
        }
    }

    /// All-zero vector with the same shape, used when no molecule is available
    pub fn zeroed() -> Self {
        Self::new(0.0, 0, 0.0, 0)
    }

    /// Descriptors as a fixed-order array
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.branch_fraction,
            f64::from(self.h_bond_donors),
            self.mol_wt,
            f64::from(self.rings_aromatic),
        ]
    }

    /// Whether every descriptor is defined (no NaN)
    pub fn is_complete(&self) -> bool {
        self.to_array().iter().all(|v| !v.is_nan())
    }

    /// Pair each descriptor with its name, in model order
    pub fn named(&self) -> [(&'static str, f64); FEATURE_COUNT] {
        let values = self.to_array();
        [
            (FEATURE_NAMES[0], values[0]),
            (FEATURE_NAMES[1], values[1]),
            (FEATURE_NAMES[2], values[2]),
            (FEATURE_NAMES[3], values[3]),
        ]
    }
}
