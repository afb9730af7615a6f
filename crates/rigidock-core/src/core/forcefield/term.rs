use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Energy of one evaluation split by interaction type, in kcal/mol.
///
/// `restraint` stays zero for evaluators without a restraint term.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub vdw: f64,
    pub coulomb: f64,
    pub restraint: f64,
}

impl EnergyTerm {
    pub fn new(vdw: f64, coulomb: f64, restraint: f64) -> Self {
        Self {
            vdw,
            coulomb,
            restraint,
        }
    }

    /// Receptor/ligand interaction energy, excluding the restraint.
    #[inline]
    pub fn interaction(&self) -> f64 {
        self.vdw + self.coulomb
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.interaction() + self.restraint
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        self.vdw += rhs.vdw;
        self.coulomb += rhs.coulomb;
        self.restraint += rhs.restraint;
    }
}

impl Sum for EnergyTerm {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for EnergyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={:.6} (vdw={:.6}, coulomb={:.6}, restraint={:.6})",
            self.total(),
            self.vdw,
            self.coulomb,
            self.restraint
        )
    }
}
