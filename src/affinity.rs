//! Validated symmetric affinity matrices and their text serialization.

use rand::Rng;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Absolute tolerance for the symmetry check.
///
/// Entries `M[i][j]` and `M[j][i]` may differ by up to this amount (e.g. from
/// computing the two triangles along different floating-point paths). Within
/// tolerance the upper triangle is authoritative and is mirrored into the
/// lower triangle at construction, so all downstream bookkeeping is exact.
const SYMMETRY_EPS: f64 = 1e-9;

// ============================================================================
// AffinityMatrix
// ============================================================================

/// A validated n×n symmetric matrix of pairwise affinities.
///
/// Entries are finite and non-negative; `weight(i, j) == weight(j, i)` holds
/// exactly. Self-affinities play no role in any degree or density computation,
/// so the diagonal is stored as zero regardless of the input (inputs
/// conventionally carry a diagonal of 1).
///
/// The matrix is immutable after construction and may be shared read-only
/// across concurrent solver invocations.
#[derive(Clone, Debug, PartialEq)]
pub struct AffinityMatrix {
    n: usize,
    /// Row-major `n * n` storage with a zeroed diagonal.
    data: Vec<f64>,
}

impl AffinityMatrix {
    /// Creates a matrix from a slice of rows.
    ///
    /// # Errors
    /// Returns an error if the rows do not form a square matrix, or if any
    /// entry is non-finite, negative off the diagonal, or asymmetric beyond
    /// the documented tolerance.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, AffinityError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AffinityError::NonSquare {
                    row: i,
                    expected: n,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::finalize(n, data)
    }

    /// Creates a matrix from row-major flat storage of length `n * n`.
    ///
    /// # Errors
    /// Returns an error if `data.len() != n * n` or validation fails as in
    /// [`AffinityMatrix::from_rows`].
    pub fn from_flat(n: usize, data: Vec<f64>) -> Result<Self, AffinityError> {
        if data.len() != n * n {
            return Err(AffinityError::WrongLength {
                expected: n * n,
                got: data.len(),
            });
        }
        Self::finalize(n, data)
    }

    /// Validates entries, zeroes the diagonal, and mirrors the upper triangle.
    fn finalize(n: usize, mut data: Vec<f64>) -> Result<Self, AffinityError> {
        for i in 0..n {
            for j in 0..n {
                let value = data[i * n + j];
                if !value.is_finite() {
                    return Err(AffinityError::NotFinite { i, j, value });
                }
                if i != j && value < 0.0 {
                    return Err(AffinityError::Negative { i, j, value });
                }
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let a_ij = data[i * n + j];
                let a_ji = data[j * n + i];
                if (a_ij - a_ji).abs() > SYMMETRY_EPS {
                    return Err(AffinityError::NotSymmetric { i, j, a_ij, a_ji });
                }
            }
        }
        for i in 0..n {
            data[i * n + i] = 0.0;
            for j in (i + 1)..n {
                data[j * n + i] = data[i * n + j];
            }
        }
        Ok(Self { n, data })
    }

    /// Generates a random symmetric matrix for tests and benchmarks.
    ///
    /// Each unordered pair receives a uniform weight in `[0, 1)` with
    /// probability `edge_probability`, and weight 0 otherwise.
    ///
    /// # Panics
    /// Panics in debug builds if `edge_probability` is outside `[0, 1]`.
    pub fn random<R: Rng>(rng: &mut R, n: usize, edge_probability: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&edge_probability),
            "edge_probability must be in [0, 1]"
        );
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_bool(edge_probability) {
                    let w: f64 = rng.random_range(0.0..1.0);
                    data[i * n + j] = w;
                    data[j * n + i] = w;
                }
            }
        }
        Self { n, data }
    }

    /// Returns the number of elements (matrix order).
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns whether the matrix has no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the affinity between elements `i` and `j`.
    ///
    /// The diagonal reads as zero.
    #[inline(always)]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n && j < self.n);
        self.data[i * self.n + j]
    }

    /// Returns row `i` as a slice of length `n` (diagonal entry zero).
    #[inline(always)]
    pub fn row(&self, i: usize) -> &[f64] {
        debug_assert!(i < self.n);
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Saves the matrix to a file as `n` rows of space-separated decimals.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, filename: impl AsRef<Path>) -> io::Result<()> {
        let mut f = File::create(filename)?;
        self.write_to(&mut f)
    }

    /// Writes the matrix to a writer as `n` rows of space-separated decimals.
    ///
    /// The diagonal is written as stored (zero). Output round-trips exactly
    /// through [`parse_affinity_matrix`].
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for i in 0..self.n {
            for (j, value) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(w, " ")?;
                }
                write!(w, "{value}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Loads a matrix from a file containing `n` rows of `n` decimals.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the matrix is malformed.
    pub fn load_from_file(filename: impl AsRef<Path>) -> Result<Self, AffinityError> {
        let file = File::open(filename).map_err(|e| AffinityError::Io(e.to_string()))?;
        let reader = BufReader::new(file);
        let mut text = String::new();
        for line in reader.lines() {
            let line = line.map_err(|e| AffinityError::Io(e.to_string()))?;
            text.push_str(&line);
            text.push('\n');
        }
        parse_affinity_matrix(&text)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while constructing or parsing an affinity matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum AffinityError {
    /// No non-empty rows were found.
    Empty,
    /// Matrix is not square.
    NonSquare {
        /// The row index with the wrong length.
        row: usize,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// Flat storage length does not match the declared order.
    WrongLength {
        /// Expected `n * n`.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// Encountered a token that does not parse as a decimal number.
    InvalidNumber {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The offending token.
        token: String,
    },
    /// Entry is NaN or infinite.
    NotFinite {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// The offending value.
        value: f64,
    },
    /// Off-diagonal entry is negative.
    Negative {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// The offending value.
        value: f64,
    },
    /// `M[i][j]` and `M[j][i]` differ beyond tolerance.
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// Value at `M[i][j]`.
        a_ij: f64,
        /// Value at `M[j][i]`.
        a_ji: f64,
    },
    /// I/O error (file not found, etc.).
    Io(String),
}

impl fmt::Display for AffinityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffinityError::Empty => write!(f, "affinity matrix is empty"),
            AffinityError::NonSquare { row, expected, got } => write!(
                f,
                "affinity matrix is not square: row {row} has length {got}, expected {expected}"
            ),
            AffinityError::WrongLength { expected, got } => write!(
                f,
                "flat storage has length {got}, expected {expected}"
            ),
            AffinityError::InvalidNumber { row, col, token } => write!(
                f,
                "invalid number at ({row}, {col}): {token:?}"
            ),
            AffinityError::NotFinite { i, j, value } => {
                write!(f, "non-finite affinity at ({i}, {j}): {value}")
            }
            AffinityError::Negative { i, j, value } => {
                write!(f, "negative affinity at ({i}, {j}): {value}")
            }
            AffinityError::NotSymmetric { i, j, a_ij, a_ji } => write!(
                f,
                "matrix is not symmetric at ({i},{j}): M[i][j]={a_ij}, M[j][i]={a_ji}"
            ),
            AffinityError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for AffinityError {}

// ============================================================================
// Parsing
// ============================================================================

/// Parses an affinity matrix from text.
///
/// Rules:
/// - Rows are lines of whitespace-separated decimal numbers; blank lines are
///   ignored.
/// - The matrix must be square and symmetric within tolerance; entries must be
///   finite and non-negative off the diagonal.
/// - Diagonal values are accepted (conventionally 1) but stored as zero.
///
/// # Errors
/// Returns an error if the input is empty, non-square, contains unparseable
/// tokens, or violates the finiteness, non-negativity, or symmetry
/// constraints.
pub fn parse_affinity_matrix(text: &str) -> Result<AffinityMatrix, AffinityError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(AffinityError::Empty);
    }
    let n = lines.len();

    let mut data = Vec::with_capacity(n * n);
    for (i, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != n {
            return Err(AffinityError::NonSquare {
                row: i,
                expected: n,
                got: tokens.len(),
            });
        }
        for (j, token) in tokens.iter().enumerate() {
            let value: f64 = token.parse().map_err(|_| AffinityError::InvalidNumber {
                row: i,
                col: j,
                token: (*token).to_string(),
            })?;
            data.push(value);
        }
    }

    AffinityMatrix::from_flat(n, data)
}

// ============================================================================
// Tests
// ============================================================================
