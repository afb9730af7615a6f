/// Chemical metadata carried by one atom of a rigid body.
///
/// Positions are not stored here: they live in the body's transform cache at
/// the same index, so moving a body never touches its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomProperty {
    /// The atom name (e.g. "CA", "CB"), upper-cased.
    pub atom_type: String,
    /// The residue name (e.g. "ALA"), upper-cased.
    pub residue_type: String,
    /// Alternate-location indicator, `' '` when absent.
    pub alt_loc: char,
    /// Chain identifier, `' '` when absent.
    pub chain_id: char,
    pub residue_id: i32,
    /// Serial number of the atom in its source file.
    pub atom_id: i32,
    /// Partial charge in elementary charge units.
    pub charge: f64,
    /// Zero-based force-field category used to look up pair coefficients.
    pub category: usize,
    /// Free-text trailer following the coordinate columns.
    pub extra: String,
}

impl Default for AtomProperty {
    fn default() -> Self {
        Self {
            atom_type: String::new(),
            residue_type: String::new(),
            alt_loc: ' ',
            chain_id: ' ',
            residue_id: 0,
            atom_id: 0,
            charge: 0.0,
            category: 0,
            extra: String::new(),
        }
    }
}

impl AtomProperty {
    pub fn new(atom_type: &str, residue_type: &str, residue_id: i32, atom_id: i32) -> Self {
        Self {
            atom_type: atom_type.to_uppercase(),
            residue_type: residue_type.to_uppercase(),
            residue_id,
            atom_id,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: usize) -> Self {
        self.category = category;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    /// Reads the reduced-model category and charge from the trailer.
    ///
    /// Files number categories from 1; a trailer whose first token is `n` maps to
    /// category `n - 1` and the second token, when present, is the charge. A
    /// trailer without a leading integer leaves both at zero.
    pub fn apply_reduced_trailer(&mut self) {
        let mut tokens = self.extra.split_whitespace();
        let Some(category) = tokens.next().and_then(|t| t.parse::<usize>().ok()) else {
            self.category = 0;
            self.charge = 0.0;
            return;
        };
        self.category = category.saturating_sub(1);
        self.charge = tokens
            .next()
            .and_then(|t| t.parse::<f64>().ok())
            .unwrap_or(0.0);
    }
}

/// Activity predicate that treats every atom as active.
pub fn all_atoms_active(_: &AtomProperty) -> bool {
    true
}
