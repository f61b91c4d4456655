//! Entry point from structure strings to molecules.

use crate::error::SmilesError;
use crate::molecule::Molecule;
use crate::sanitize::build_molecule;
use crate::smiles;
use tracing::debug;

/// Parses SMILES strings into validated [`Molecule`]s.
///
/// Parsing is pure: the same input always yields the same molecule or the
/// same error, and nothing is cached between calls.
pub struct StructureParser;

impl StructureParser {
    /// Parse and sanitize a structure string.
    pub fn parse(input: &str) -> Result<Molecule, SmilesError> {
        let raw = smiles::parse(input)?;
        let molecule = build_molecule(raw)?;
        debug!(
            atoms = molecule.atom_count(),
            rings = molecule.rings().len(),
            "parsed structure"
        );
        Ok(molecule)
    }

    /// Like [`StructureParser::parse`], for callers that only branch on
    /// validity.
    pub fn try_parse(input: &str) -> Option<Molecule> {
        match Self::parse(input) {
            Ok(molecule) => Some(molecule),
            Err(err) => {
                debug!(error = %err, "structure rejected");
                None
            }
        }
    }
}
