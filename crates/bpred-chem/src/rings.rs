//! Smallest set of smallest rings.
//!
//! Candidate cycles follow Horton: for every root atom and every non-tree
//! bond of the root's BFS tree, the two tree paths plus the bond form a
//! cycle when the paths meet only at the root. Candidates are taken
//! shortest first and kept while they are linearly independent over GF(2)
//! (as bond sets), until the cycle rank `bonds - atoms + components` is
//! reached.

use crate::molecule::Ring;
use std::collections::{HashSet, VecDeque};

/// Fixed-width bit set over bond indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BondSet(Vec<u64>);

impl BondSet {
    fn new(bonds: usize) -> Self {
        Self(vec![0; bonds.div_ceil(64)])
    }

    fn insert(&mut self, bond: usize) {
        self.0[bond / 64] |= 1 << (bond % 64);
    }

    fn contains(&self, bond: usize) -> bool {
        self.0[bond / 64] & (1 << (bond % 64)) != 0
    }

    fn xor(&mut self, other: &BondSet) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a ^= b;
        }
    }

    fn lowest(&self) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(i, word)| i * 64 + word.trailing_zeros() as usize)
    }

    fn iter(&self, bonds: usize) -> impl Iterator<Item = usize> + '_ {
        (0..bonds).filter(move |b| self.contains(*b))
    }
}

struct Candidate {
    atoms: Vec<usize>,
    bonds: BondSet,
}

/// Compute the SSSR of a graph given as (begin, end) bond pairs and an
/// adjacency list of (neighbour, bond index).
pub(crate) fn find_sssr(
    atom_count: usize,
    bonds: &[(usize, usize)],
    adjacency: &[Vec<(usize, usize)>],
) -> Vec<Ring> {
    let components = count_components(atom_count, adjacency);
    let rank = (bonds.len() + components).saturating_sub(atom_count);
    if rank == 0 {
        return Vec::new();
    }

    let mut candidates = horton_candidates(atom_count, bonds, adjacency);
    candidates.sort_by(|a, b| a.atoms.len().cmp(&b.atoms.len()).then(a.atoms.cmp(&b.atoms)));

    let mut basis: Vec<(usize, BondSet)> = Vec::new();
    let mut rings = Vec::new();
    for candidate in candidates {
        let mut reduced = candidate.bonds.clone();
        for (pivot, row) in &basis {
            if reduced.contains(*pivot) {
                reduced.xor(row);
            }
        }
        let Some(pivot) = reduced.lowest() else {
            continue;
        };
        basis.push((pivot, reduced));
        rings.push(Ring {
            atoms: candidate.atoms,
            bonds: candidate.bonds.iter(bonds.len()).collect(),
        });
        if rings.len() == rank {
            break;
        }
    }
    rings
}

fn horton_candidates(
    atom_count: usize,
    bonds: &[(usize, usize)],
    adjacency: &[Vec<(usize, usize)>],
) -> Vec<Candidate> {
    let mut seen: HashSet<BondSet> = HashSet::new();
    let mut candidates = Vec::new();

    for root in 0..atom_count {
        if adjacency[root].len() < 2 {
            continue;
        }

        // BFS tree from root: parent atom and parent bond per atom
        let mut parent: Vec<Option<(usize, usize)>> = vec![None; atom_count];
        let mut visited = vec![false; atom_count];
        visited[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(atom) = queue.pop_front() {
            for &(next, bond) in &adjacency[atom] {
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some((atom, bond));
                    queue.push_back(next);
                }
            }
        }

        for (bond, &(x, y)) in bonds.iter().enumerate() {
            if !visited[x] || !visited[y] {
                continue;
            }
            if parent[x].map(|(_, b)| b) == Some(bond) || parent[y].map(|(_, b)| b) == Some(bond) {
                continue;
            }

            let (path_x, bonds_x) = path_to_root(x, &parent);
            let (path_y, bonds_y) = path_to_root(y, &parent);

            // Paths may share only the root.
            let on_x: HashSet<usize> = path_x[..path_x.len() - 1].iter().copied().collect();
            if path_y[..path_y.len() - 1].iter().any(|a| on_x.contains(a)) {
                continue;
            }

            let mut set = BondSet::new(bonds.len());
            set.insert(bond);
            for b in bonds_x.iter().chain(&bonds_y) {
                set.insert(*b);
            }
            if !seen.insert(set.clone()) {
                continue;
            }

            // root .. x, then y .. (just before root)
            let mut atoms: Vec<usize> = path_x.iter().rev().copied().collect();
            atoms.extend(path_y[..path_y.len() - 1].iter().copied());
            candidates.push(Candidate { atoms, bonds: set });
        }
    }
    candidates
}

/// Atoms from `atom` up to and including the root, and the bonds between them.
fn path_to_root(atom: usize, parent: &[Option<(usize, usize)>]) -> (Vec<usize>, Vec<usize>) {
    let mut atoms = vec![atom];
    let mut bonds = Vec::new();
    let mut current = atom;
    while let Some((up, bond)) = parent[current] {
        atoms.push(up);
        bonds.push(bond);
        current = up;
    }
    (atoms, bonds)
}

fn count_components(atom_count: usize, adjacency: &[Vec<(usize, usize)>]) -> usize {
    let mut visited = vec![false; atom_count];
    let mut components = 0;
    for start in 0..atom_count {
        if visited[start] {
            continue;
        }
        components += 1;
        visited[start] = true;
        let mut stack = vec![start];
        while let Some(atom) = stack.pop() {
            for &(next, _) in &adjacency[atom] {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
    }
    components
}
