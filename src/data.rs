//! Point loading: turns comma-separated text rows into a validated point set

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Rows reserved up front before the buffer starts growing.
const INITIAL_CAPACITY: usize = 10;

/// Validated, read-only collection of points sharing one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    /// Points stored row-major with shape (count, dimension)
    features: Array2<f64>,
}

impl PointSet {
    /// Wrap a feature matrix, rejecting empty sets and zero-width rows.
    pub fn new(features: Array2<f64>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(Error::EmptyInput);
        }
        if features.ncols() == 0 {
            return Err(Error::InvalidParameter {
                name: "dimension",
                message: "points must have at least one coordinate",
            });
        }
        if let Some(bad) = features.iter().position(|v| !v.is_finite()) {
            return Err(Error::MalformedRow {
                line: bad / features.ncols() + 1,
                reason: "non-finite coordinate".to_string(),
            });
        }
        Ok(Self { features })
    }

    /// Build a point set from owned rows; every row must match the first one's length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyInput)?;
        let dimension = first.len();

        let mut flat = Vec::with_capacity(rows.len() * dimension);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != dimension {
                return Err(Error::DimensionMismatch {
                    line: idx + 1,
                    expected: dimension,
                    found: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }

        let features = Array2::from_shape_vec((rows.len(), dimension), flat).map_err(|_| {
            Error::InvalidParameter {
                name: "rows",
                message: "row data does not form a rectangular matrix",
            }
        })?;
        Self::new(features)
    }

    /// Number of points.
    pub fn count(&self) -> usize {
        self.features.nrows()
    }

    /// Coordinates per point.
    pub fn dimension(&self) -> usize {
        self.features.ncols()
    }

    /// View of point `index`; panics when out of range like slice indexing.
    pub fn point(&self, index: usize) -> ArrayView1<'_, f64> {
        self.features.row(index)
    }

    /// The full (count, dimension) matrix.
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }
}

/// Parse one non-blank text row into exactly `dimension` finite values.
///
/// Fields may carry leading whitespace; only the last field may carry
/// trailing whitespace. `line` is the 1-based position used in errors.
pub fn parse_vector(row: &str, dimension: usize, line: usize) -> Result<Vec<f64>> {
    let found = row.matches(',').count() + 1;
    if found != dimension {
        return Err(Error::DimensionMismatch {
            line,
            expected: dimension,
            found,
        });
    }

    let mut values = Vec::with_capacity(dimension);
    for (idx, field) in row.split(',').enumerate() {
        let field = field.trim_start();
        let field = if idx + 1 == dimension {
            field.trim_end()
        } else {
            field
        };

        let value: f64 = field.parse().map_err(|_| Error::MalformedRow {
            line,
            reason: format!("invalid number {:?} in field {}", field, idx + 1),
        })?;
        if !value.is_finite() {
            return Err(Error::MalformedRow {
                line,
                reason: format!("non-finite value in field {}", idx + 1),
            });
        }
        values.push(value);
    }

    Ok(values)
}

/// Read every non-blank row from `reader`.
///
/// The first row fixes the dimension. Loading is all-or-nothing: the first
/// malformed row fails the whole load.
pub fn load_points<R: BufRead>(reader: R) -> Result<PointSet> {
    let mut flat: Vec<f64> = Vec::new();
    let mut dimension = 0;
    let mut count = 0;

    for (idx, row) in reader.lines().enumerate() {
        let row = row?;
        if row.is_empty() {
            continue;
        }

        let line = idx + 1;
        if count == 0 {
            dimension = row.matches(',').count() + 1;
            flat.reserve(INITIAL_CAPACITY * dimension);
        }

        let values = parse_vector(&row, dimension, line)?;
        flat.extend_from_slice(&values);
        count += 1;
        debug!(line, "parsed point");
    }

    if count == 0 {
        return Err(Error::EmptyInput);
    }

    let features =
        Array2::from_shape_vec((count, dimension), flat).map_err(|_| Error::InvalidParameter {
            name: "rows",
            message: "row data does not form a rectangular matrix",
        })?;
    let points = PointSet::new(features)?;
    info!(count, dimension, "loaded points");
    Ok(points)
}

/// Load points from a text file.
pub fn load_points_from_path<P: AsRef<Path>>(path: P) -> Result<PointSet> {
    let file = File::open(path.as_ref())?;
    load_points(BufReader::new(file))
}

/// Load points from an in-memory string.
pub fn load_points_from_str(input: &str) -> Result<PointSet> {
    load_points(input.as_bytes())
}
