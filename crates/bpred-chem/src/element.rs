//! Periodic table data needed by the parser and descriptors.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Symbol that names no element
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

/// Symbol and monoisotopic mass of the most abundant (or longest-lived)
/// isotope, indexed by atomic number. Index 0 is the `*` wildcard atom.
const ELEMENTS: [(&str, f64); 119] = [
    ("*", 0.0),
    ("H", 1.00782503223),
    ("He", 4.00260325413),
    ("Li", 7.0160034366),
    ("Be", 9.012183065),
    ("B", 11.00930536),
    ("C", 12.0),
    ("N", 14.00307400443),
    ("O", 15.99491461957),
    ("F", 18.99840316273),
    ("Ne", 19.9924401762),
    ("Na", 22.989769282),
    ("Mg", 23.985041697),
    ("Al", 26.98153853),
    ("Si", 27.97692653465),
    ("P", 30.97376199842),
    ("S", 31.9720711744),
    ("Cl", 34.968852682),
    ("Ar", 39.9623831237),
    ("K", 38.9637064864),
    ("Ca", 39.962590863),
    ("Sc", 44.95590828),
    ("Ti", 47.94794198),
    ("V", 50.94395704),
    ("Cr", 51.94050623),
    ("Mn", 54.93804391),
    ("Fe", 55.93493633),
    ("Co", 58.93319429),
    ("Ni", 57.93534241),
    ("Cu", 62.92959772),
    ("Zn", 63.92914201),
    ("Ga", 68.9255735),
    ("Ge", 73.921177761),
    ("As", 74.92159457),
    ("Se", 79.9165218),
    ("Br", 78.9183376),
    ("Kr", 83.9114977282),
    ("Rb", 84.9117897379),
    ("Sr", 87.9056125),
    ("Y", 88.9058403),
    ("Zr", 89.9046977),
    ("Nb", 92.906373),
    ("Mo", 97.90540482),
    ("Tc", 97.9072124),
    ("Ru", 101.9043441),
    ("Rh", 102.905498),
    ("Pd", 105.9034804),
    ("Ag", 106.9050916),
    ("Cd", 113.90336509),
    ("In", 114.903878776),
    ("Sn", 119.90220163),
    ("Sb", 120.903812),
    ("Te", 129.906222748),
    ("I", 126.9044719),
    ("Xe", 131.9041550856),
    ("Cs", 132.905451961),
    ("Ba", 137.905247),
    ("La", 138.9063563),
    ("Ce", 139.9054431),
    ("Pr", 140.9076576),
    ("Nd", 141.907729),
    ("Pm", 144.9127559),
    ("Sm", 151.9197397),
    ("Eu", 152.921238),
    ("Gd", 157.9241123),
    ("Tb", 158.9253547),
    ("Dy", 163.9291819),
    ("Ho", 164.9303288),
    ("Er", 165.9302995),
    ("Tm", 168.9342179),
    ("Yb", 173.9388664),
    ("Lu", 174.9407752),
    ("Hf", 179.946557),
    ("Ta", 180.9479958),
    ("W", 183.95093092),
    ("Re", 186.9557501),
    ("Os", 191.961477),
    ("Ir", 192.9629216),
    ("Pt", 194.9647917),
    ("Au", 196.96656879),
    ("Hg", 201.9706434),
    ("Tl", 204.9744278),
    ("Pb", 207.9766525),
    ("Bi", 208.9803991),
    ("Po", 208.9824308),
    ("At", 209.9871479),
    ("Rn", 222.0175782),
    ("Fr", 223.019736),
    ("Ra", 226.0254103),
    ("Ac", 227.0277523),
    ("Th", 232.0380558),
    ("Pa", 231.0358842),
    ("U", 238.0507884),
    ("Np", 237.0481736),
    ("Pu", 244.0642053),
    ("Am", 243.0613813),
    ("Cm", 247.0703541),
    ("Bk", 247.0703073),
    ("Cf", 251.0795886),
    ("Es", 252.08298),
    ("Fm", 257.0951061),
    ("Md", 258.0984315),
    ("No", 259.10103),
    ("Lr", 262.10961),
    ("Rf", 267.12179),
    ("Db", 268.12567),
    ("Sg", 271.13393),
    ("Bh", 272.13826),
    ("Hs", 270.13429),
    ("Mt", 276.15159),
    ("Ds", 281.16451),
    ("Rg", 280.16514),
    ("Cn", 285.17712),
    ("Nh", 284.17873),
    ("Fl", 289.19042),
    ("Mc", 288.19274),
    ("Lv", 293.20449),
    ("Ts", 292.20746),
    ("Og", 294.21392),
];

/// Exact masses of labelled isotopes commonly written in structure strings,
/// as (atomic number, mass number, mass).
const ISOTOPES: [(u8, u16, f64); 18] = [
    (1, 1, 1.00782503223),
    (1, 2, 2.01410177812),
    (1, 3, 3.0160492779),
    (6, 11, 11.0114336),
    (6, 12, 12.0),
    (6, 13, 13.00335483507),
    (6, 14, 14.0032419884),
    (7, 13, 13.00573861),
    (7, 14, 14.00307400443),
    (7, 15, 15.00010889888),
    (8, 15, 15.0030656),
    (8, 16, 15.99491461957),
    (8, 17, 16.99913175650),
    (8, 18, 17.99915961286),
    (9, 18, 18.0009380),
    (16, 34, 33.967867004),
    (17, 37, 36.965902602),
    (35, 81, 80.9162897),
];

/// A chemical element, identified by atomic number
///
/// Atomic number 0 is the `*` wildcard atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    /// The `*` wildcard
    pub const DUMMY: Element = Element(0);
    /// Hydrogen
    pub const H: Element = Element(1);
    /// Boron
    pub const B: Element = Element(5);
    /// Carbon
    pub const C: Element = Element(6);
    /// Nitrogen
    pub const N: Element = Element(7);
    /// Oxygen
    pub const O: Element = Element(8);
    /// Fluorine
    pub const F: Element = Element(9);
    /// Phosphorus
    pub const P: Element = Element(15);
    /// Sulfur
    pub const S: Element = Element(16);
    /// Chlorine
    pub const CL: Element = Element(17);
    /// Selenium
    pub const SE: Element = Element(34);
    /// Bromine
    pub const BR: Element = Element(35);
    /// Iodine
    pub const I: Element = Element(53);

    /// Element for an atomic number, `None` beyond oganesson
    pub fn from_atomic_number(number: u8) -> Option<Self> {
        (usize::from(number) < ELEMENTS.len()).then_some(Element(number))
    }

    /// Atomic number (0 for the wildcard)
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    /// Element symbol in canonical case
    pub fn symbol(&self) -> &'static str {
        ELEMENTS[usize::from(self.0)].0
    }

    /// Mass of the most abundant isotope
    pub fn monoisotopic_mass(&self) -> f64 {
        ELEMENTS[usize::from(self.0)].1
    }

    /// Mass of a specific isotope.
    ///
    /// The most abundant isotope gets the monoisotopic mass; other unlisted
    /// isotopes fall back to the mass number.
    pub fn isotope_mass(&self, mass_number: u16) -> f64 {
        if let Some(&(_, _, mass)) = ISOTOPES
            .iter()
            .find(|(z, a, _)| *z == self.0 && *a == mass_number)
        {
            return mass;
        }
        let monoisotopic = self.monoisotopic_mass();
        if f64::from(mass_number) == monoisotopic.round() {
            monoisotopic
        } else {
            f64::from(mass_number)
        }
    }

    /// Whether this is the `*` wildcard
    pub fn is_dummy(&self) -> bool {
        self.0 == 0
    }

    /// Valences used to assign implicit hydrogens to organic-subset atoms.
    pub fn default_valences(&self) -> &'static [u8] {
        match self.0 {
            5 => &[3],
            6 => &[4],
            7 => &[3, 5],
            8 => &[2],
            15 => &[3, 5],
            16 => &[2, 4, 6],
            9 | 17 | 35 | 53 => &[1],
            _ => &[],
        }
    }

    /// Permitted total valences for a neutral atom of this element.
    ///
    /// `None` means the element is not valence-checked (metals and the like).
    pub fn allowed_valences(&self) -> Option<&'static [u8]> {
        match self.0 {
            1 => Some(&[1]),
            2 | 10 | 18 | 36 | 54 | 86 => Some(&[0]),
            5 => Some(&[3]),
            6 | 14 | 32 => Some(&[4]),
            7 => Some(&[3]),
            8 => Some(&[2]),
            9 => Some(&[1]),
            15 | 33 => Some(&[3, 5, 7]),
            16 | 34 | 52 => Some(&[2, 4, 6]),
            17 | 35 | 53 => Some(&[1, 3, 5, 7]),
            _ => None,
        }
    }

    /// Permitted valences for this element carrying `charge`, using the
    /// isoelectronic neighbour (N+ behaves like C, O- like F, ...).
    ///
    /// Elements that are not valence-checked stay unchecked when charged.
    pub fn charged_valences(&self, charge: i8) -> Option<&'static [u8]> {
        self.allowed_valences()?;
        let adjusted = i16::from(self.0) - i16::from(charge);
        if adjusted <= 0 {
            return Some(&[0]);
        }
        u8::try_from(adjusted)
            .ok()
            .and_then(Element::from_atomic_number)
            .and_then(|e| e.allowed_valences())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ELEMENTS
            .iter()
            .position(|(symbol, _)| *symbol == s)
            .and_then(|idx| u8::try_from(idx).ok())
            .map(Element)
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}
