//! SMILES tokenizer and graph builder.
//!
//! Produces an unsanitized graph: bond orders as written, aromatic flags as
//! written, hydrogens only where a bracket atom states them. Implicit
//! hydrogens, kekulization and aromaticity are handled by `sanitize`.

use crate::element::Element;
use crate::error::SmilesError;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Bond order as written in the string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl RawOrder {
    /// Contribution to the sigma/explicit valence, aromatic counted as one.
    pub(crate) fn valence(&self) -> u8 {
        match self {
            RawOrder::Single | RawOrder::Aromatic => 1,
            RawOrder::Double => 2,
            RawOrder::Triple => 3,
            RawOrder::Quadruple => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawAtom {
    pub element: Element,
    pub aromatic: bool,
    pub isotope: Option<u16>,
    pub charge: i8,
    /// Hydrogen count for bracket atoms; `None` for organic-subset atoms
    pub bracket_hydrogens: Option<u8>,
}

impl RawAtom {
    fn organic(element: Element, aromatic: bool) -> Self {
        Self {
            element,
            aromatic,
            isotope: None,
            charge: 0,
            bracket_hydrogens: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawBond {
    pub begin: usize,
    pub end: usize,
    pub order: RawOrder,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RawGraph {
    pub atoms: Vec<RawAtom>,
    pub bonds: Vec<RawBond>,
}

/// Parse a SMILES string into an unsanitized graph.
pub(crate) fn parse(input: &str) -> Result<RawGraph, SmilesError> {
    Parser::new(input).run()
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    graph: RawGraph,
    prev: Option<usize>,
    pending: Option<(RawOrder, usize)>,
    branches: Vec<(Option<usize>, usize)>,
    open_rings: BTreeMap<u16, (usize, Option<RawOrder>)>,
    /// Position of a '(' or '.' that still needs an atom after it
    expect_atom: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
            graph: RawGraph::default(),
            prev: None,
            pending: None,
            branches: Vec::new(),
            open_rings: BTreeMap::new(),
            expect_atom: None,
        }
    }

    fn run(mut self) -> Result<RawGraph, SmilesError> {
        while let Some(&c) = self.bytes.get(self.pos) {
            match c {
                // Whitespace ends the structure; the rest is a title.
                b' ' | b'\t' | b'\r' | b'\n' => break,
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.bond_symbol(c)?,
                b'.' => self.dot()?,
                b'%' | b'0'..=b'9' => self.ring_closure()?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.add_atom(atom)?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.add_atom(atom)?;
                }
            }
        }

        if let Some((_, position)) = self.pending {
            return Err(SmilesError::DanglingBond(position));
        }
        if let Some(position) = self.expect_atom {
            return Err(SmilesError::MissingAtom(position));
        }
        if let Some((_, position)) = self.branches.last() {
            return Err(SmilesError::UnbalancedParenthesis(*position));
        }
        if let Some(ring) = self.open_rings.keys().next() {
            return Err(SmilesError::UnclosedRing(*ring));
        }
        if self.graph.atoms.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok(self.graph)
    }

    fn open_branch(&mut self) -> Result<(), SmilesError> {
        if self.prev.is_none() || self.pending.is_some() {
            return Err(SmilesError::MissingAtom(self.pos));
        }
        self.branches.push((self.prev, self.pos));
        self.expect_atom = Some(self.pos);
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), SmilesError> {
        if let Some((_, position)) = self.pending {
            return Err(SmilesError::DanglingBond(position));
        }
        if self.expect_atom.is_some() {
            return Err(SmilesError::EmptyBranch(self.pos));
        }
        let (prev, _) = self
            .branches
            .pop()
            .ok_or(SmilesError::UnbalancedParenthesis(self.pos))?;
        self.prev = prev;
        self.pos += 1;
        Ok(())
    }

    fn bond_symbol(&mut self, c: u8) -> Result<(), SmilesError> {
        if self.prev.is_none() {
            return Err(SmilesError::MissingAtom(self.pos));
        }
        if self.pending.is_some() {
            return Err(SmilesError::UnexpectedCharacter {
                character: char::from(c),
                position: self.pos,
            });
        }
        let order = match c {
            b'=' => RawOrder::Double,
            b'#' => RawOrder::Triple,
            b'$' => RawOrder::Quadruple,
            b':' => RawOrder::Aromatic,
            // '-', '/' and '\' are all single bonds; stereo is not kept.
            _ => RawOrder::Single,
        };
        self.pending = Some((order, self.pos));
        self.pos += 1;
        Ok(())
    }

    fn dot(&mut self) -> Result<(), SmilesError> {
        if self.prev.is_none() || self.expect_atom.is_some() {
            return Err(SmilesError::MissingAtom(self.pos));
        }
        if let Some((_, position)) = self.pending {
            return Err(SmilesError::DanglingBond(position));
        }
        self.prev = None;
        self.expect_atom = Some(self.pos);
        self.pos += 1;
        Ok(())
    }

    fn ring_closure(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let atom = self.prev.ok_or(SmilesError::MissingAtom(start))?;
        let number = self.ring_number()?;
        let written = self.pending.take().map(|(order, _)| order);

        match self.open_rings.remove(&number) {
            Some((other, other_order)) => {
                if other == atom {
                    return Err(SmilesError::RingSelfBond(number));
                }
                let duplicate = self.graph.bonds.iter().any(|b| {
                    (b.begin == other && b.end == atom) || (b.begin == atom && b.end == other)
                });
                if duplicate {
                    return Err(SmilesError::DuplicateBond(number));
                }
                let order = match (written, other_order) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::ConflictingRingBond(number))
                    }
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => self.implicit_order(other, atom),
                };
                self.graph.bonds.push(RawBond {
                    begin: other,
                    end: atom,
                    order,
                });
            }
            None => {
                self.open_rings.insert(number, (atom, written));
            }
        }
        Ok(())
    }

    fn ring_number(&mut self) -> Result<u16, SmilesError> {
        let start = self.pos;
        if self.bytes[self.pos] != b'%' {
            let digit = u16::from(self.bytes[self.pos] - b'0');
            self.pos += 1;
            return Ok(digit);
        }
        self.pos += 1;
        let digits = if self.bytes.get(self.pos) == Some(&b'(') {
            self.pos += 1;
            let digits = self.take_digits(5);
            if self.bytes.get(self.pos) != Some(&b')') {
                return Err(SmilesError::UnexpectedCharacter {
                    character: '%',
                    position: start,
                });
            }
            self.pos += 1;
            digits
        } else {
            let digits = self.take_digits(2);
            if digits.len() != 2 {
                return Err(SmilesError::UnexpectedCharacter {
                    character: '%',
                    position: start,
                });
            }
            digits
        };
        digits.parse().map_err(|_| SmilesError::UnexpectedCharacter {
            character: '%',
            position: start,
        })
    }

    fn take_digits(&mut self, max: usize) -> String {
        let mut digits = String::new();
        while digits.len() < max {
            match self.bytes.get(self.pos) {
                Some(d) if d.is_ascii_digit() => {
                    digits.push(char::from(*d));
                    self.pos += 1;
                }
                _ => break,
            }
        }
        digits
    }

    fn organic_atom(&mut self) -> Result<RawAtom, SmilesError> {
        let start = self.pos;
        let c = self.bytes[self.pos];
        let next = self.bytes.get(self.pos + 1).copied();

        let (symbol, aromatic, width) = match (c, next) {
            (b'B', Some(b'r')) => ("Br", false, 2),
            (b'C', Some(b'l')) => ("Cl", false, 2),
            (b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I', _) => {
                (ascii_symbol(c), false, 1)
            }
            (b'b' | b'c' | b'n' | b'o' | b'p' | b's', _) => (ascii_symbol(c), true, 1),
            (b'*', _) => ("*", false, 1),
            _ if c.is_ascii_alphabetic() => {
                return Err(SmilesError::UnknownElement {
                    symbol: char::from(c).to_string(),
                    position: start,
                })
            }
            _ => {
                return Err(SmilesError::UnexpectedCharacter {
                    character: char::from(c),
                    position: start,
                })
            }
        };

        let element = lookup_element(symbol, start)?;
        self.pos += width;
        Ok(RawAtom::organic(element, aromatic))
    }

    fn bracket_atom(&mut self) -> Result<RawAtom, SmilesError> {
        let start = self.pos;
        let close = self.bytes[start..]
            .iter()
            .position(|&b| b == b']')
            .map(|offset| start + offset)
            .ok_or(SmilesError::UnterminatedBracket(start))?;
        let body = &self.bytes[start + 1..close];
        let mut i = 0;

        // isotope
        let mut isotope = None;
        let iso_len = body.iter().take_while(|b| b.is_ascii_digit()).count();
        if iso_len > 0 {
            let text = ascii_str(&body[..iso_len]);
            isotope = Some(
                text.parse::<u16>()
                    .map_err(|_| SmilesError::InvalidBracketAtom(start))?,
            );
            i = iso_len;
        }

        // element symbol
        let (element, aromatic, width) = bracket_symbol(&body[i..], start + 1 + i)?;
        i += width;

        // chirality is accepted and discarded
        if body.get(i) == Some(&b'@') {
            i += 1;
            if body.get(i) == Some(&b'@') {
                i += 1;
            } else if body.len() >= i + 2
                && body[i].is_ascii_uppercase()
                && body[i + 1].is_ascii_uppercase()
            {
                i += 2;
                i += body[i..].iter().take_while(|b| b.is_ascii_digit()).count();
            }
        }

        // hydrogen count
        let mut hydrogens = 0u8;
        if body.get(i) == Some(&b'H') {
            i += 1;
            let len = body[i..].iter().take_while(|b| b.is_ascii_digit()).count();
            hydrogens = if len == 0 {
                1
            } else {
                ascii_str(&body[i..i + len])
                    .parse()
                    .map_err(|_| SmilesError::InvalidBracketAtom(start))?
            };
            i += len;
        }

        // charge: +, ++, +2, -, --, -3
        let mut charge = 0i8;
        if let Some(&sign @ (b'+' | b'-')) = body.get(i) {
            let unit: i8 = if sign == b'+' { 1 } else { -1 };
            i += 1;
            let len = body[i..].iter().take_while(|b| b.is_ascii_digit()).count();
            if len > 0 {
                let magnitude: i8 = ascii_str(&body[i..i + len])
                    .parse()
                    .map_err(|_| SmilesError::InvalidBracketAtom(start))?;
                charge = unit * magnitude;
                i += len;
            } else {
                charge = unit;
                while body.get(i) == Some(&sign) {
                    charge = charge
                        .checked_add(unit)
                        .ok_or(SmilesError::InvalidBracketAtom(start))?;
                    i += 1;
                }
            }
        }

        // atom class is accepted and discarded
        if body.get(i) == Some(&b':') {
            i += 1;
            let len = body[i..].iter().take_while(|b| b.is_ascii_digit()).count();
            if len == 0 {
                return Err(SmilesError::InvalidBracketAtom(start));
            }
            i += len;
        }

        if i != body.len() {
            return Err(SmilesError::InvalidBracketAtom(start));
        }

        self.pos = close + 1;
        Ok(RawAtom {
            element,
            aromatic,
            isotope,
            charge,
            bracket_hydrogens: Some(hydrogens),
        })
    }

    fn add_atom(&mut self, atom: RawAtom) -> Result<(), SmilesError> {
        let index = self.graph.atoms.len();
        self.graph.atoms.push(atom);

        match self.prev {
            Some(prev) => {
                let order = match self.pending.take() {
                    Some((order, _)) => order,
                    None => self.implicit_order(prev, index),
                };
                self.graph.bonds.push(RawBond {
                    begin: prev,
                    end: index,
                    order,
                });
            }
            None => {
                if let Some((_, position)) = self.pending {
                    return Err(SmilesError::MissingAtom(position));
                }
            }
        }

        self.prev = Some(index);
        self.expect_atom = None;
        Ok(())
    }

    /// Unwritten bonds between two aromatic atoms are aromatic, otherwise single.
    fn implicit_order(&self, a: usize, b: usize) -> RawOrder {
        if self.graph.atoms[a].aromatic && self.graph.atoms[b].aromatic {
            RawOrder::Aromatic
        } else {
            RawOrder::Single
        }
    }
}

fn ascii_symbol(c: u8) -> &'static str {
    match c {
        b'B' => "B",
        b'C' => "C",
        b'N' => "N",
        b'O' => "O",
        b'P' => "P",
        b'S' => "S",
        b'F' => "F",
        b'I' => "I",
        b'b' => "B",
        b'c' => "C",
        b'n' => "N",
        b'o' => "O",
        b'p' => "P",
        _ => "S",
    }
}

fn ascii_str(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap_or_default()
}

fn lookup_element(symbol: &str, position: usize) -> Result<Element, SmilesError> {
    Element::from_str(symbol).map_err(|_| SmilesError::UnknownElement {
        symbol: symbol.to_string(),
        position,
    })
}

/// Element symbol at the start of a bracket body: `*`, an aromatic
/// lowercase symbol, or a one- or two-letter element symbol.
fn bracket_symbol(body: &[u8], position: usize) -> Result<(Element, bool, usize), SmilesError> {
    let first = *body.first().ok_or(SmilesError::InvalidBracketAtom(position))?;

    if first == b'*' {
        return Ok((Element::DUMMY, false, 1));
    }

    if first.is_ascii_lowercase() {
        for candidate in [&b"se"[..], &b"as"[..], &b"te"[..]] {
            if body.starts_with(candidate) {
                let mut symbol = ascii_str(candidate).to_string();
                symbol[..1].make_ascii_uppercase();
                return Ok((lookup_element(&symbol, position)?, true, 2));
            }
        }
        return match first {
            b'b' | b'c' | b'n' | b'o' | b'p' | b's' => {
                Ok((lookup_element(ascii_symbol(first), position)?, true, 1))
            }
            _ => Err(SmilesError::UnknownElement {
                symbol: char::from(first).to_string(),
                position,
            }),
        };
    }

    if !first.is_ascii_uppercase() {
        return Err(SmilesError::InvalidBracketAtom(position));
    }

    if let Some(&second) = body.get(1) {
        if second.is_ascii_lowercase() {
            let two = ascii_str(&body[..2]);
            if let Ok(element) = Element::from_str(two) {
                return Ok((element, false, 2));
            }
        }
    }
    Ok((lookup_element(ascii_str(&body[..1]), position)?, false, 1))
}
