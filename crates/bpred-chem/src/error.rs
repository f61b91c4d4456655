//! Structure parsing errors

use thiserror::Error;

/// Reasons a structure string does not describe a valid molecule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    /// Nothing to parse
    #[error("empty structure string")]
    Empty,

    /// Character outside the grammar
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// Offending character
        character: char,
        /// Byte offset
        position: usize,
    },

    /// Symbol that names no element
    #[error("unknown element symbol '{symbol}' at position {position}")]
    UnknownElement {
        /// Symbol as written
        symbol: String,
        /// Byte offset
        position: usize,
    },

    /// `[` without `]`
    #[error("unterminated bracket atom starting at position {0}")]
    UnterminatedBracket(usize),

    /// Bracket atom body out of order or incomplete
    #[error("malformed bracket atom at position {0}")]
    InvalidBracketAtom(usize),

    /// Unmatched `(` or `)`
    #[error("unbalanced parenthesis at position {0}")]
    UnbalancedParenthesis(usize),

    /// `()` with no atoms
    #[error("empty branch at position {0}")]
    EmptyBranch(usize),

    /// Bond or branch before any atom
    #[error("bond or branch at position {0} has no preceding atom")]
    MissingAtom(usize),

    /// Bond symbol with nothing after it
    #[error("bond at position {0} is not followed by an atom")]
    DanglingBond(usize),

    /// Ring-closure digit opened but never closed
    #[error("ring closure {0} is never closed")]
    UnclosedRing(u16),

    /// Ring closure back to the opening atom
    #[error("ring closure {0} bonds an atom to itself")]
    RingSelfBond(u16),

    /// Ring closure between already bonded atoms
    #[error("ring closure {0} duplicates an existing bond")]
    DuplicateBond(u16),

    /// Different bond symbols on the two ends of a ring closure
    #[error("ring closure {0} has conflicting bond orders")]
    ConflictingRingBond(u16),

    /// Atom bonded beyond any permitted valence
    #[error("explicit valence {valence} for atom {index} ({symbol}) is greater than permitted")]
    Valence {
        /// Atom index
        index: usize,
        /// Element symbol
        symbol: &'static str,
        /// Total valence found
        valence: u16,
    },

    /// Lowercase atom that no ring contains
    #[error("atom {index} ({symbol}) is marked aromatic but is not in a ring")]
    AromaticOutsideRing {
        /// Atom index
        index: usize,
        /// Element symbol
        symbol: &'static str,
    },

    /// No Kekulé structure exists for the aromatic atoms
    #[error("cannot assign alternating bonds to the aromatic system")]
    Kekulize,
}
