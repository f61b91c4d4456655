//! Atom allowlist check

use bpred_chem::Molecule;
use std::collections::BTreeSet;

/// The set of elements a molecule may contain to be predicted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomAllowlist {
    /// Symbols in configuration order, for messages
    ordered: Vec<String>,
    symbols: BTreeSet<String>,
}

impl AtomAllowlist {
    /// Build an allowlist from element symbols
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut set = BTreeSet::new();
        for symbol in symbols {
            let symbol = symbol.into();
            if set.insert(symbol.clone()) {
                ordered.push(symbol);
            }
        }
        Self {
            ordered,
            symbols: set,
        }
    }

    /// Whether every element in the molecule is on the list
    pub fn allowed(&self, molecule: &Molecule) -> bool {
        molecule
            .element_symbols()
            .iter()
            .all(|symbol| self.symbols.contains(*symbol))
    }

    /// Elements in the molecule that are not on the list
    pub fn disallowed(&self, molecule: &Molecule) -> Vec<&'static str> {
        molecule
            .element_symbols()
            .into_iter()
            .filter(|symbol| !self.symbols.contains(*symbol))
            .collect()
    }

    /// Symbols in configuration order
    pub fn symbols(&self) -> &[String] {
        &self.ordered
    }

    /// Human-readable list: "H, C, O, and N"
    pub fn describe(&self) -> String {
        match self.ordered.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{first} and {second}"),
            [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpred_chem::StructureParser;

    fn default_list() -> AtomAllowlist {
        AtomAllowlist::new(["H", "C", "O", "N"])
    }

    #[test]
    fn test_allows_chon_molecules() {
        let list = default_list();
        for smiles in ["CCO", "CC(=O)N", "c1ccncc1", "[NH4+]", "[2H]OC"] {
            let molecule = StructureParser::parse(smiles).unwrap();
            assert!(list.allowed(&molecule), "{smiles} should be allowed");
        }
    }

    #[test]
    fn test_rejects_heteroatoms() {
        let list = default_list();
        let molecule = StructureParser::parse("ClCCS").unwrap();
        assert!(!list.allowed(&molecule));
        assert_eq!(list.disallowed(&molecule), vec!["Cl", "S"]);
    }

    #[test]
    fn test_wildcard_atom_is_not_allowed() {
        let molecule = StructureParser::parse("*CC").unwrap();
        assert!(!default_list().allowed(&molecule));
    }

    #[test]
    fn test_describe() {
        assert_eq!(default_list().describe(), "H, C, O, and N");
        assert_eq!(AtomAllowlist::new(["C", "H"]).describe(), "C and H");
        assert_eq!(AtomAllowlist::new(["C", "C"]).describe(), "C");
    }
}
