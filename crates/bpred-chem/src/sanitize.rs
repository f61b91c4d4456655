//! Turns a raw parsed graph into a validated [`Molecule`].
//!
//! Stages run in a fixed order: implicit hydrogens, explicit hydrogen
//! folding, ring perception, kekulization, valence check, aromaticity
//! perception. Any failure rejects the whole structure.

use crate::element::Element;
use crate::error::SmilesError;
use crate::molecule::{Atom, Bond, BondOrder, Molecule, Ring};
use crate::rings::find_sssr;
use crate::smiles::{RawAtom, RawBond, RawGraph, RawOrder};
use std::collections::BTreeSet;
use tracing::trace;

/// Upper bound on matching attempts before kekulization gives up.
const KEKULIZE_STEP_LIMIT: usize = 100_000;

/// Graph after hydrogen folding, still carrying written bond orders.
struct WorkGraph {
    atoms: Vec<RawAtom>,
    /// Index of each atom in the input string
    origin: Vec<usize>,
    hydrogens: Vec<u8>,
    needs_pi: Vec<bool>,
    bonds: Vec<RawBond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

pub(crate) fn build_molecule(raw: RawGraph) -> Result<Molecule, SmilesError> {
    let (hydrogens, needs_pi) = assign_hydrogens(&raw);
    let graph = fold_hydrogens(raw, hydrogens, needs_pi);

    let pairs: Vec<(usize, usize)> = graph.bonds.iter().map(|b| (b.begin, b.end)).collect();
    let rings = find_sssr(graph.atoms.len(), &pairs, &graph.adjacency);
    check_aromatic_atoms_in_rings(&graph, &rings)?;

    let orders = kekulize(&graph)?;

    let mut atoms: Vec<Atom> = graph
        .atoms
        .iter()
        .zip(&graph.hydrogens)
        .map(|(raw, &hydrogens)| Atom {
            element: raw.element,
            isotope: raw.isotope,
            charge: raw.charge,
            hydrogens,
            aromatic: false,
        })
        .collect();
    let mut bonds: Vec<Bond> = graph
        .bonds
        .iter()
        .zip(orders)
        .map(|(raw, order)| Bond {
            begin: raw.begin,
            end: raw.end,
            order,
            aromatic: false,
        })
        .collect();

    check_valences(&graph, &atoms, &bonds)?;
    perceive_aromaticity(&mut atoms, &mut bonds, &graph.adjacency, &rings);

    trace!(
        atoms = atoms.len(),
        bonds = bonds.len(),
        rings = rings.len(),
        "sanitized molecule"
    );
    Ok(Molecule::from_parts(atoms, bonds, rings))
}

/// Implicit hydrogen count and whether the atom still needs a pi bond from
/// kekulization, per atom.
fn assign_hydrogens(raw: &RawGraph) -> (Vec<u8>, Vec<bool>) {
    let mut sigma = vec![0u16; raw.atoms.len()];
    let mut has_multiple = vec![false; raw.atoms.len()];
    for bond in &raw.bonds {
        let multiple = matches!(
            bond.order,
            RawOrder::Double | RawOrder::Triple | RawOrder::Quadruple
        );
        for atom in [bond.begin, bond.end] {
            sigma[atom] += u16::from(bond.order.valence());
            has_multiple[atom] |= multiple;
        }
    }

    raw.atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| implicit_state(atom, sigma[i], has_multiple[i]))
        .unzip()
}

fn implicit_state(atom: &RawAtom, sigma: u16, has_multiple: bool) -> (u8, bool) {
    if let Some(hydrogens) = atom.bracket_hydrogens {
        let used = sigma + u16::from(hydrogens);
        let needs_pi = atom.aromatic
            && !has_multiple
            && atom
                .element
                .charged_valences(atom.charge)
                .and_then(|valences| smallest_at_least(valences, used))
                .is_some_and(|target| target > used);
        return (hydrogens, needs_pi);
    }

    let Some(target) = smallest_at_least(atom.element.default_valences(), sigma) else {
        return (0, false);
    };
    let free = (target - sigma) as u8;
    if atom.aromatic && !has_multiple && free >= 1 {
        (free - 1, true)
    } else {
        (free, false)
    }
}

fn smallest_at_least(valences: &[u8], floor: u16) -> Option<u16> {
    valences
        .iter()
        .map(|v| u16::from(*v))
        .filter(|v| *v >= floor)
        .min()
}

fn is_foldable_hydrogen(atom: &RawAtom) -> bool {
    atom.element == Element::H
        && atom.isotope.is_none()
        && atom.charge == 0
        && atom.bracket_hydrogens == Some(0)
}

/// Remove neutral unlabelled `[H]` atoms singly bonded to a non-hydrogen
/// atom, adding them to that atom's hydrogen count.
fn fold_hydrogens(raw: RawGraph, mut hydrogens: Vec<u8>, needs_pi: Vec<bool>) -> WorkGraph {
    let mut degree = vec![0usize; raw.atoms.len()];
    for bond in &raw.bonds {
        degree[bond.begin] += 1;
        degree[bond.end] += 1;
    }

    let mut folded = vec![false; raw.atoms.len()];
    for bond in &raw.bonds {
        if bond.order != RawOrder::Single {
            continue;
        }
        for (hydrogen, parent) in [(bond.begin, bond.end), (bond.end, bond.begin)] {
            if degree[hydrogen] == 1
                && is_foldable_hydrogen(&raw.atoms[hydrogen])
                && raw.atoms[parent].element != Element::H
            {
                folded[hydrogen] = true;
                hydrogens[parent] = hydrogens[parent].saturating_add(1);
            }
        }
    }

    let mut remap = vec![None; raw.atoms.len()];
    let mut graph = WorkGraph {
        atoms: Vec::new(),
        origin: Vec::new(),
        hydrogens: Vec::new(),
        needs_pi: Vec::new(),
        bonds: Vec::new(),
        adjacency: Vec::new(),
    };
    for (i, atom) in raw.atoms.into_iter().enumerate() {
        if folded[i] {
            continue;
        }
        remap[i] = Some(graph.atoms.len());
        graph.atoms.push(atom);
        graph.origin.push(i);
        graph.hydrogens.push(hydrogens[i]);
        graph.needs_pi.push(needs_pi[i]);
    }

    graph.adjacency = vec![Vec::new(); graph.atoms.len()];
    for bond in raw.bonds {
        let (Some(begin), Some(end)) = (remap[bond.begin], remap[bond.end]) else {
            continue;
        };
        let index = graph.bonds.len();
        graph.adjacency[begin].push((end, index));
        graph.adjacency[end].push((begin, index));
        graph.bonds.push(RawBond {
            begin,
            end,
            order: bond.order,
        });
    }
    graph
}

fn check_aromatic_atoms_in_rings(graph: &WorkGraph, rings: &[Ring]) -> Result<(), SmilesError> {
    let ring_atoms: BTreeSet<usize> = rings.iter().flat_map(|r| r.atoms.iter().copied()).collect();
    match graph
        .atoms
        .iter()
        .enumerate()
        .find(|(i, atom)| atom.aromatic && !ring_atoms.contains(i))
    {
        Some((i, atom)) => Err(SmilesError::AromaticOutsideRing {
            index: graph.origin[i],
            symbol: atom.element.symbol(),
        }),
        None => Ok(()),
    }
}

/// Assign Kekulé orders: atoms needing a pi bond are perfectly matched over
/// aromatic bonds, matched bonds become double and the rest single.
fn kekulize(graph: &WorkGraph) -> Result<Vec<BondOrder>, SmilesError> {
    let mut orders: Vec<BondOrder> = graph
        .bonds
        .iter()
        .map(|bond| match bond.order {
            RawOrder::Single | RawOrder::Aromatic => BondOrder::Single,
            RawOrder::Double => BondOrder::Double,
            RawOrder::Triple => BondOrder::Triple,
            RawOrder::Quadruple => BondOrder::Quadruple,
        })
        .collect();

    if !graph.needs_pi.iter().any(|n| *n) {
        return Ok(orders);
    }

    let mut matcher = Matcher {
        graph,
        mate: vec![None; graph.atoms.len()],
        steps: 0,
    };
    if !matcher.search() {
        trace!(steps = matcher.steps, "kekulization failed");
        return Err(SmilesError::Kekulize);
    }

    for bond in matcher.mate.iter().flatten() {
        orders[*bond] = BondOrder::Double;
    }
    Ok(orders)
}

struct Matcher<'a> {
    graph: &'a WorkGraph,
    /// Bond each atom is matched through
    mate: Vec<Option<usize>>,
    steps: usize,
}

impl Matcher<'_> {
    fn candidates(&self, atom: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.adjacency[atom]
            .iter()
            .copied()
            .filter(move |&(other, bond)| {
                self.graph.bonds[bond].order == RawOrder::Aromatic
                    && self.graph.needs_pi[other]
                    && self.mate[other].is_none()
            })
    }

    /// Depth-first search, always branching on the unmatched atom with the
    /// fewest options.
    fn search(&mut self) -> bool {
        let mut best: Option<(usize, usize)> = None;
        for atom in 0..self.graph.atoms.len() {
            if !self.graph.needs_pi[atom] || self.mate[atom].is_some() {
                continue;
            }
            let options = self.candidates(atom).count();
            if options == 0 {
                return false;
            }
            if best.is_none_or(|(_, fewest)| options < fewest) {
                best = Some((atom, options));
            }
        }
        let Some((atom, _)) = best else {
            return true;
        };

        let options: Vec<(usize, usize)> = self.candidates(atom).collect();
        for (other, bond) in options {
            self.steps += 1;
            if self.steps > KEKULIZE_STEP_LIMIT {
                return false;
            }
            self.mate[atom] = Some(bond);
            self.mate[other] = Some(bond);
            if self.search() {
                return true;
            }
            self.mate[atom] = None;
            self.mate[other] = None;
        }
        false
    }
}

fn check_valences(graph: &WorkGraph, atoms: &[Atom], bonds: &[Bond]) -> Result<(), SmilesError> {
    let mut valence: Vec<u16> = atoms.iter().map(|a| u16::from(a.hydrogens)).collect();
    for bond in bonds {
        valence[bond.begin] += u16::from(bond.order.valence());
        valence[bond.end] += u16::from(bond.order.valence());
    }

    for (i, atom) in atoms.iter().enumerate() {
        let Some(allowed) = atom.element.charged_valences(atom.charge) else {
            continue;
        };
        let max = allowed.iter().copied().max().unwrap_or(0);
        if valence[i] > u16::from(max) {
            return Err(SmilesError::Valence {
                index: graph.origin[i],
                symbol: atom.symbol(),
                valence: valence[i],
            });
        }
    }
    Ok(())
}

/// Hückel perception on the Kekulé form. Single SSSR rings are tested
/// first, then pairs of rings sharing a bond (azulene-type systems).
fn perceive_aromaticity(
    atoms: &mut [Atom],
    bonds: &mut [Bond],
    adjacency: &[Vec<(usize, usize)>],
    rings: &[Ring],
) {
    if rings.is_empty() {
        return;
    }

    let mut ring_bond = vec![false; bonds.len()];
    for ring in rings {
        for &bond in &ring.bonds {
            ring_bond[bond] = true;
        }
    }

    let electrons: Vec<Option<u8>> = (0..atoms.len())
        .map(|i| pi_electrons(i, atoms, bonds, adjacency, &ring_bond))
        .collect();

    let mut aromatic: Vec<bool> = rings
        .iter()
        .map(|ring| is_huckel(ring.atoms.iter().copied(), &electrons))
        .collect();

    for i in 0..rings.len() {
        for j in i + 1..rings.len() {
            if aromatic[i] && aromatic[j] {
                continue;
            }
            if !rings[i].bonds.iter().any(|b| rings[j].bonds.contains(b)) {
                continue;
            }
            let union: BTreeSet<usize> = rings[i].atoms.iter().chain(&rings[j].atoms).copied().collect();
            if is_huckel(union.into_iter(), &electrons) {
                aromatic[i] = true;
                aromatic[j] = true;
            }
        }
    }

    for (ring, _) in rings.iter().zip(&aromatic).filter(|(_, a)| **a) {
        for &atom in &ring.atoms {
            atoms[atom].aromatic = true;
        }
        for &bond in &ring.bonds {
            bonds[bond].aromatic = true;
        }
    }
}

/// 4n+2 pi electrons, with every member able to take part.
fn is_huckel(members: impl Iterator<Item = usize>, electrons: &[Option<u8>]) -> bool {
    members
        .map(|atom| electrons[atom].map(u32::from))
        .sum::<Option<u32>>()
        .is_some_and(|total| total % 4 == 2)
}

/// Pi electrons a ring atom donates, or `None` when it cannot be part of an
/// aromatic ring.
fn pi_electrons(
    index: usize,
    atoms: &[Atom],
    bonds: &[Bond],
    adjacency: &[Vec<(usize, usize)>],
    ring_bond: &[bool],
) -> Option<u8> {
    let atom = &atoms[index];
    let mut valence = u16::from(atom.hydrogens);
    let mut ring_doubles = 0;
    let mut exocyclic_double = None;
    for &(other, bond) in &adjacency[index] {
        let order = bonds[bond].order;
        valence += u16::from(order.valence());
        match order {
            BondOrder::Single => {}
            BondOrder::Double if ring_bond[bond] => ring_doubles += 1,
            BondOrder::Double if exocyclic_double.is_none() => exocyclic_double = Some(other),
            _ => return None,
        }
    }

    match (ring_doubles, exocyclic_double) {
        (1, None) => Some(1),
        (0, Some(other)) => {
            let partner = atoms[other].element;
            (atom.element == Element::C
                && matches!(partner, Element::N | Element::O | Element::S | Element::SE))
            .then_some(0)
        }
        (0, None) => lone_pair_electrons(atom, valence),
        _ => None,
    }
}

fn lone_pair_electrons(atom: &Atom, valence: u16) -> Option<u8> {
    match (atom.element.atomic_number(), atom.charge, valence) {
        (6, 1, _) => Some(0),
        (6, -1, _) => Some(2),
        (7 | 15 | 33, 0, 3) => Some(2),
        (7 | 15 | 33, -1, 2) => Some(2),
        (8 | 16 | 34 | 52, 0, 2) => Some(2),
        (5, 0, 3) => Some(0),
        _ => None,
    }
}
