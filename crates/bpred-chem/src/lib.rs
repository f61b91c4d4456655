//! Bpred Chemistry Engine
//!
//! Turns SMILES strings into validated molecular graphs and computes the
//! descriptors the boiling point model consumes.
//!
//! ## Pipeline
//!
//! 1. [`StructureParser`] tokenizes the string into a raw graph
//! 2. Implicit hydrogens are assigned and explicit `[H]` atoms folded
//! 3. Rings (SSSR) are perceived and aromatic systems kekulized
//! 4. Valences are checked and aromaticity is perceived on the Kekulé form
//! 5. [`FeatureExtractor`] reads descriptors off the finished [`Molecule`]
//!
//! Any failure in steps 1-4 rejects the whole structure; a [`Molecule`]
//! never exists in a partially valid state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptors;
pub mod element;
pub mod error;
pub mod molecule;
mod parser;
mod rings;
mod sanitize;
mod smiles;

pub use descriptors::FeatureExtractor;
pub use element::{Element, ParseElementError};
pub use error::SmilesError;
pub use molecule::{Atom, Bond, BondOrder, Molecule, Ring};
pub use parser::StructureParser;
