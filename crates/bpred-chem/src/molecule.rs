//! Validated molecular graph.

use crate::element::Element;
use std::collections::{BTreeMap, BTreeSet};

/// Kekulé bond order; aromaticity is tracked separately on [`Bond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    /// `-`, also `/` and `\`
    Single,
    /// `=`
    Double,
    /// `#`
    Triple,
    /// `$`
    Quadruple,
}

impl BondOrder {
    /// Valence contributed to each end
    pub fn valence(&self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }
}

/// An atom of a validated molecule
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element, or the wildcard
    pub element: Element,
    /// Mass number, when the structure string gave one
    pub isotope: Option<u16>,
    /// Formal charge
    pub charge: i8,
    /// Implicit plus folded explicit hydrogens
    pub hydrogens: u8,
    /// Member of a perceived aromatic ring
    pub aromatic: bool,
}

impl Atom {
    /// Element symbol
    pub fn symbol(&self) -> &'static str {
        self.element.symbol()
    }

    /// Exact mass of the heavy atom alone, honouring its isotope label.
    pub fn mass(&self) -> f64 {
        match self.isotope {
            Some(mass_number) => self.element.isotope_mass(mass_number),
            None => self.element.monoisotopic_mass(),
        }
    }
}

/// A bond between two atom indices
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    /// First atom index
    pub begin: usize,
    /// Second atom index
    pub end: usize,
    /// Kekulé order
    pub order: BondOrder,
    /// Part of a perceived aromatic ring
    pub aromatic: bool,
}

/// A ring of the smallest set of smallest rings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    /// Atom indices in traversal order
    pub atoms: Vec<usize>,
    /// Bond indices
    pub bonds: Vec<usize>,
}

impl Ring {
    /// Ring size
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the ring has no atoms
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// A parsed, validated molecule.
///
/// Only [`crate::StructureParser`] constructs molecules, so every instance
/// has passed valence, kekulization and ring checks.
#[derive(Debug, Clone)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// (neighbour atom, bond index) per atom
    adjacency: Vec<Vec<(usize, usize)>>,
    rings: Vec<Ring>,
}

impl Molecule {
    pub(crate) fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>, rings: Vec<Ring>) -> Self {
        let adjacency = build_adjacency(atoms.len(), &bonds);
        Self {
            atoms,
            bonds,
            adjacency,
            rings,
        }
    }

    /// Atoms in input order, after hydrogen folding
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Atom at `index`; panics when out of range
    pub fn atom(&self, index: usize) -> &Atom {
        &self.atoms[index]
    }

    /// Number of graph atoms
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Bonds between graph atoms
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Smallest set of smallest rings
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Neighbouring atoms with the bond joining them.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (usize, &Bond)> + '_ {
        self.adjacency[index]
            .iter()
            .map(move |&(other, bond)| (other, &self.bonds[bond]))
    }

    /// Number of explicit neighbours
    pub fn degree(&self, index: usize) -> usize {
        self.adjacency[index].len()
    }

    /// Sum of Kekulé bond orders to explicit neighbours.
    pub fn explicit_valence(&self, index: usize) -> u16 {
        self.neighbors(index)
            .map(|(_, bond)| u16::from(bond.order.valence()))
            .sum()
    }

    /// Hydrogens on the atom, counting both implicit hydrogens and hydrogen
    /// atoms that stayed explicit in the graph.
    pub fn total_hydrogens(&self, index: usize) -> u16 {
        let explicit = self
            .neighbors(index)
            .filter(|(other, _)| self.atoms[*other].element == Element::H)
            .count() as u16;
        u16::from(self.atoms[index].hydrogens) + explicit
    }

    /// Explicit valence plus implicit hydrogens.
    pub fn total_valence(&self, index: usize) -> u16 {
        self.explicit_valence(index) + u16::from(self.atoms[index].hydrogens)
    }

    /// Distinct element symbols of the atoms in the graph.
    ///
    /// Hydrogens folded into their parent atom are not graph atoms and do
    /// not contribute.
    pub fn element_symbols(&self) -> BTreeSet<&'static str> {
        self.atoms.iter().map(Atom::symbol).collect()
    }

    /// Atoms other than hydrogen and the wildcard
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms
            .iter()
            .filter(|a| a.element != Element::H && !a.element.is_dummy())
            .count()
    }

    /// Molecular formula in Hill order (C, H, then alphabetical; purely
    /// alphabetical when there is no carbon).
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for atom in &self.atoms {
            if atom.element.is_dummy() {
                continue;
            }
            *counts.entry(atom.symbol()).or_default() += 1;
            if atom.hydrogens > 0 {
                *counts.entry("H").or_default() += usize::from(atom.hydrogens);
            }
        }

        let mut formula = String::new();
        let mut push = |symbol: &str, count: usize| {
            formula.push_str(symbol);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        };

        if let Some(carbon) = counts.remove("C") {
            push("C", carbon);
            if let Some(hydrogen) = counts.remove("H") {
                push("H", hydrogen);
            }
        }
        for (symbol, count) in counts {
            push(symbol, count);
        }
        formula
    }
}

pub(crate) fn build_adjacency(atom_count: usize, bonds: &[Bond]) -> Vec<Vec<(usize, usize)>> {
    let mut adjacency = vec![Vec::new(); atom_count];
    for (idx, bond) in bonds.iter().enumerate() {
        adjacency[bond.begin].push((bond.end, idx));
        adjacency[bond.end].push((bond.begin, idx));
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use crate::StructureParser;

    #[test]
    fn formula_hill_order() {
        let ethanol = StructureParser::parse("CCO").unwrap();
        assert_eq!(ethanol.formula(), "C2H6O");

        let water = StructureParser::parse("O").unwrap();
        assert_eq!(water.formula(), "H2O");

        let ammonium_chloride = StructureParser::parse("[NH4+].[Cl-]").unwrap();
        assert_eq!(ammonium_chloride.formula(), "ClH4N");
    }

    #[test]
    fn element_symbols_are_distinct() {
        let mol = StructureParser::parse("OCC(=O)NCC").unwrap();
        let symbols: Vec<_> = mol.element_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["C", "N", "O"]);
    }

    #[test]
    fn valence_accessors() {
        let acetone = StructureParser::parse("CC(=O)C").unwrap();
        assert_eq!(acetone.explicit_valence(1), 4);
        assert_eq!(acetone.total_hydrogens(0), 3);
        assert_eq!(acetone.total_valence(2), 2);
        assert_eq!(acetone.degree(1), 3);
        assert_eq!(acetone.heavy_atom_count(), 4);
    }
}
