use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Number of categories in a pair-matrix parameter file.
pub const PAIR_MATRIX_CATEGORIES: usize = 31;
/// Largest number of categories accepted from a legacy per-category file.
pub const MAX_LEGACY_CATEGORIES: usize = 39;

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid number in '{path}' at token {position} (value: '{value}')")]
    Parse {
        path: String,
        position: usize,
        value: String,
    },
    #[error("Parameter file '{path}' ended early: expected {expected} values, found {found}")]
    Truncated {
        path: String,
        expected: usize,
        found: usize,
    },
    #[error("Polarity in '{path}' at row {row}, column {col} must be 1 or -1 (value: {value})")]
    InvalidPolarity {
        path: String,
        row: usize,
        col: usize,
        value: i32,
    },
    #[error("Parameter file '{path}' defines {found} categories (at most {max} are supported)")]
    TooManyCategories {
        path: String,
        found: usize,
        max: usize,
    },
}

/// Precomputed Lennard-Jones combination for one (receptor, ligand) category pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCoefficients {
    /// Repulsive coefficient (r^-8 term).
    pub rc: f64,
    /// Attractive coefficient (r^-6 term).
    pub ac: f64,
    /// `1` for an attractive minimum, `-1` for a purely repulsive saddle.
    pub polarity: i32,
    /// Depth of the minimum of `rc/r^8 - ac/r^6`.
    pub emin: f64,
    /// Squared distance of that minimum, where the potential switches branch.
    pub switch_distance_squared: f64,
}

impl PairCoefficients {
    /// Derives the minimum depth and switch distance from `rc` and `ac`.
    ///
    /// A pair with no attraction (`ac == 0`) has no minimum; its depth and switch
    /// distance are stored as zero.
    pub fn new(rc: f64, ac: f64, polarity: i32) -> Self {
        let (emin, switch_distance_squared) = if ac == 0.0 {
            (0.0, 0.0)
        } else {
            let ac4 = ac * ac * ac * ac;
            let rc3 = rc * rc * rc;
            (-27.0 * ac4 / (256.0 * rc3), 4.0 * rc / (3.0 * ac))
        };
        Self {
            rc,
            ac,
            polarity,
            emin,
            switch_distance_squared,
        }
    }
}

/// Square table of pair coefficients indexed by `(receptor category, ligand category)`.
///
/// Built once from a parameter file and shared read-only between evaluators.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    size: usize,
    pairs: Vec<PairCoefficients>,
}

impl ParameterTable {
    pub fn size(&self) -> usize {
        self.size
    }

    /// # Panics
    ///
    /// Panics if either category is outside the table.
    #[inline]
    pub fn pair(&self, receptor_category: usize, ligand_category: usize) -> &PairCoefficients {
        debug_assert!(receptor_category < self.size && ligand_category < self.size);
        &self.pairs[receptor_category * self.size + ligand_category]
    }

    /// Loads a pair-matrix file: three 31x31 row-major tables (radius, amplitude,
    /// polarity) separated by whitespace.
    pub fn load_pair_matrix(path: &Path) -> Result<Self, ParamLoadError> {
        let source = path.to_string_lossy().to_string();
        let content = read_file(path)?;
        let table = Self::parse_pair_matrix(&content, &source)?;
        debug!(path = %source, categories = table.size, "Loaded pair-matrix parameter table.");
        Ok(table)
    }

    /// Parses pair-matrix content; `source` names the origin in error messages.
    pub fn parse_pair_matrix(content: &str, source: &str) -> Result<Self, ParamLoadError> {
        let n = PAIR_MATRIX_CATEGORIES;
        let cells = n * n;
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() < 3 * cells {
            return Err(ParamLoadError::Truncated {
                path: source.to_string(),
                expected: 3 * cells,
                found: tokens.len(),
            });
        }

        let radii = parse_floats(&tokens[..cells], 0, source)?;
        let amplitudes = parse_floats(&tokens[cells..2 * cells], cells, source)?;

        let mut pairs = Vec::with_capacity(cells);
        for (k, token) in tokens[2 * cells..3 * cells].iter().enumerate() {
            let (row, col) = (k / n, k % n);
            let polarity: i32 = token.parse().map_err(|_| ParamLoadError::Parse {
                path: source.to_string(),
                position: 2 * cells + k + 1,
                value: token.to_string(),
            })?;
            if polarity != 1 && polarity != -1 {
                return Err(ParamLoadError::InvalidPolarity {
                    path: source.to_string(),
                    row,
                    col,
                    value: polarity,
                });
            }

            let rbc2 = radii[k] * radii[k];
            let rbc6 = rbc2 * rbc2 * rbc2;
            let rbc8 = rbc6 * rbc2;
            let rc = amplitudes[k] * rbc8;
            let ac = amplitudes[k] * rbc6;
            pairs.push(PairCoefficients::new(rc, ac, polarity));
        }

        Ok(Self { size: n, pairs })
    }

    /// Loads a legacy per-category file: one `index radius amplitude unused` line
    /// per category.
    pub fn load_legacy(path: &Path) -> Result<Self, ParamLoadError> {
        let source = path.to_string_lossy().to_string();
        let content = read_file(path)?;
        let table = Self::parse_legacy(&content, &source)?;
        debug!(path = %source, categories = table.size, "Loaded legacy parameter table.");
        Ok(table)
    }

    pub fn parse_legacy(content: &str, source: &str) -> Result<Self, ParamLoadError> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.is_empty() || tokens.len() % 4 != 0 {
            return Err(ParamLoadError::Truncated {
                path: source.to_string(),
                expected: (tokens.len() / 4 + 1) * 4,
                found: tokens.len(),
            });
        }

        let n = tokens.len() / 4;
        if n > MAX_LEGACY_CATEGORIES {
            return Err(ParamLoadError::TooManyCategories {
                path: source.to_string(),
                found: n,
                max: MAX_LEGACY_CATEGORIES,
            });
        }

        let values = parse_floats(&tokens, 0, source)?;
        let radii: Vec<f64> = values.chunks_exact(4).map(|row| row[1]).collect();
        let amplitudes: Vec<f64> = values.chunks_exact(4).map(|row| row[2]).collect();

        let mut pairs = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let amp = amplitudes[i] * amplitudes[j];
                let rad = radii[i] + radii[j];
                pairs.push(PairCoefficients::new(amp * rad.powi(8), amp * rad.powi(6), 1));
            }
        }

        Ok(Self { size: n, pairs })
    }
}

fn read_file(path: &Path) -> Result<String, ParamLoadError> {
    std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn parse_floats(tokens: &[&str], offset: usize, source: &str) -> Result<Vec<f64>, ParamLoadError> {
    tokens
        .iter()
        .enumerate()
        .map(|(k, token)| {
            token.parse::<f64>().map_err(|_| ParamLoadError::Parse {
                path: source.to_string(),
                position: offset + k + 1,
                value: token.to_string(),
            })
        })
        .collect()
}
