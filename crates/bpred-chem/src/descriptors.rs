//! Molecular descriptors fed to the boiling point model.

use crate::element::Element;
use crate::molecule::Molecule;
use bpred_domain::FeatureVector;

/// Mass of an electron, removed per unit of positive charge.
const ELECTRON_MASS: f64 = 0.00054857990907;

/// Computes the model's feature vector from a molecule.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Features in model order: branch fraction, donors, exact weight,
    /// aromatic rings.
    pub fn extract(molecule: &Molecule) -> FeatureVector {
        FeatureVector::new(
            branch_fraction(molecule),
            h_bond_donor_count(molecule),
            exact_mol_wt(molecule),
            aromatic_ring_count(molecule),
        )
    }

    /// Total over absent molecules: yields the zero vector.
    pub fn extract_or_zeroed(molecule: Option<&Molecule>) -> FeatureVector {
        molecule.map_or_else(FeatureVector::zeroed, Self::extract)
    }
}

/// Carbon atoms, aromatic or aliphatic.
pub fn carbon_count(molecule: &Molecule) -> usize {
    molecule
        .atoms()
        .iter()
        .filter(|a| a.element == Element::C)
        .count()
}

/// Aliphatic carbons with at most one hydrogen and at least three carbon
/// neighbours (tertiary and quaternary branch points).
pub fn branch_carbon_count(molecule: &Molecule) -> usize {
    (0..molecule.atom_count())
        .filter(|&i| {
            let atom = molecule.atom(i);
            atom.element == Element::C
                && !atom.aromatic
                && molecule.total_hydrogens(i) <= 1
                && molecule
                    .neighbors(i)
                    .filter(|(other, _)| molecule.atom(*other).element == Element::C)
                    .count()
                    >= 3
        })
        .count()
}

/// Branch carbons over all carbons; NaN when there is no carbon.
pub fn branch_fraction(molecule: &Molecule) -> f64 {
    match carbon_count(molecule) {
        0 => f64::NAN,
        carbons => branch_carbon_count(molecule) as f64 / carbons as f64,
    }
}

/// Lipinski hydrogen bond donors: N-H and O-H/S-H groups, protonated
/// amines and pyrrole-type aromatic nitrogen.
pub fn h_bond_donor_count(molecule: &Molecule) -> u32 {
    (0..molecule.atom_count())
        .filter(|&i| is_donor(molecule, i))
        .count() as u32
}

fn is_donor(molecule: &Molecule, index: usize) -> bool {
    let atom = molecule.atom(index);
    let hydrogens = molecule.total_hydrogens(index);
    let valence = molecule.total_valence(index);
    match (atom.element, atom.aromatic) {
        (Element::N, false) => {
            hydrogens >= 1
                && ((atom.charge == 0 && valence == 3) || (atom.charge == 1 && valence == 4))
        }
        (Element::O | Element::S, false) => atom.charge == 0 && hydrogens == 1,
        (Element::N, true) => atom.charge == 0 && hydrogens == 1,
        _ => false,
    }
}

/// Isotope-aware monoisotopic weight including hydrogens, corrected for
/// the electrons gained or lost by charged atoms.
pub fn exact_mol_wt(molecule: &Molecule) -> f64 {
    let hydrogen = Element::H.monoisotopic_mass();
    molecule
        .atoms()
        .iter()
        .map(|atom| {
            atom.mass() + f64::from(atom.hydrogens) * hydrogen
                - f64::from(atom.charge) * ELECTRON_MASS
        })
        .sum()
}

/// Rings of the SSSR whose bonds are all aromatic.
pub fn aromatic_ring_count(molecule: &Molecule) -> u32 {
    molecule
        .rings()
        .iter()
        .filter(|ring| ring.bonds.iter().all(|&b| molecule.bonds()[b].aromatic))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructureParser;

    fn mol(smiles: &str) -> Molecule {
        StructureParser::parse(smiles).unwrap()
    }

    #[test]
    fn branch_carbons() {
        // isooctane: two branch points out of eight carbons
        let isooctane = mol("CC(C)CC(C)(C)C");
        assert_eq!(carbon_count(&isooctane), 8);
        assert_eq!(branch_carbon_count(&isooctane), 2);
        assert_eq!(branch_fraction(&isooctane), 0.25);

        assert_eq!(branch_carbon_count(&mol("CCCCCCCC")), 0);
        // aromatic carbons never count
        assert_eq!(branch_carbon_count(&mol("Cc1ccccc1C")), 0);
    }

    #[test]
    fn branch_fraction_without_carbon_is_nan() {
        assert!(branch_fraction(&mol("O")).is_nan());
        assert!(branch_fraction(&mol("NN")).is_nan());
    }

    #[test]
    fn only_carbon_neighbours_make_branches() {
        assert_eq!(branch_carbon_count(&mol("CC(O)C")), 0);
        assert_eq!(branch_carbon_count(&mol("CC(C)(O)C")), 1);
        assert_eq!(branch_carbon_count(&mol("CC(=O)C(C)C")), 1);
    }

    #[test]
    fn donors() {
        assert_eq!(h_bond_donor_count(&mol("CCO")), 1);
        assert_eq!(h_bond_donor_count(&mol("OCCO")), 2);
        assert_eq!(h_bond_donor_count(&mol("CN")), 1);
        assert_eq!(h_bond_donor_count(&mol("CN(C)C")), 0);
        assert_eq!(h_bond_donor_count(&mol("C[NH3+]")), 1);
        assert_eq!(h_bond_donor_count(&mol("c1cc[nH]c1")), 1);
        assert_eq!(h_bond_donor_count(&mol("c1ccncc1")), 0);
        assert_eq!(h_bond_donor_count(&mol("CC(=O)O")), 1);
        assert_eq!(h_bond_donor_count(&mol("O")), 0);
        assert_eq!(h_bond_donor_count(&mol("CCOCC")), 0);
    }

    #[test]
    fn exact_weights() {
        assert!((exact_mol_wt(&mol("CCO")) - 46.041864812).abs() < 1e-6);
        assert!((exact_mol_wt(&mol("c1ccccc1")) - 78.046950192).abs() < 1e-6);
        assert!((exact_mol_wt(&mol("[13CH4]")) - 17.03465496).abs() < 1e-6);
    }

    #[test]
    fn most_abundant_isotope_labels_do_not_change_weight() {
        let same = |labelled: &str, plain: &str| {
            (exact_mol_wt(&mol(labelled)) - exact_mol_wt(&mol(plain))).abs() < 1e-9
        };
        assert!(same("[16OH2]", "O"));
        assert!(same("[14NH3]", "N"));
        assert!(same("[12CH4]", "C"));
        assert!(same("[1H][1H]", "[H][H]"));
        assert!(!same("[18OH2]", "O"));
    }

    #[test]
    fn charged_weight_accounts_for_electrons() {
        let neutral = exact_mol_wt(&mol("[NH3]"));
        let cation = exact_mol_wt(&mol("[NH4+]"));
        let expected = neutral + Element::H.monoisotopic_mass() - ELECTRON_MASS;
        assert!((cation - expected).abs() < 1e-9);
    }

    #[test]
    fn aromatic_rings() {
        assert_eq!(aromatic_ring_count(&mol("c1ccccc1")), 1);
        assert_eq!(aromatic_ring_count(&mol("C1=CC=CC=C1")), 1);
        assert_eq!(aromatic_ring_count(&mol("c1ccc2ccccc2c1")), 2);
        assert_eq!(aromatic_ring_count(&mol("C1CCc2ccccc2C1")), 1);
        assert_eq!(aromatic_ring_count(&mol("C1CCCCC1")), 0);
        assert_eq!(aromatic_ring_count(&mol("c1ccccc1-c1ccccc1")), 2);
    }

    #[test]
    fn extract_orders_features() {
        let features = FeatureExtractor::extract(&mol("CCO"));
        let values = features.to_array();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 1.0);
        assert!((values[2] - 46.041864812).abs() < 1e-6);
        assert_eq!(values[3], 0.0);
    }

    #[test]
    fn extract_or_zeroed_handles_absent_molecule() {
        assert_eq!(FeatureExtractor::extract_or_zeroed(None).to_array(), [0.0; 4]);
        let ethanol = mol("CCO");
        assert_eq!(
            FeatureExtractor::extract_or_zeroed(Some(&ethanol)).h_bond_donors,
            1
        );
    }
}
