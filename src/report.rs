//! Output formatting for fitted centroids

use crate::error::GENERIC_DIAGNOSTIC;
use crate::model::KMeansModel;
use ndarray::{Array2, ArrayView1};
use std::io::{self, Write};

/// Decimal places printed per coordinate.
const PRECISION: usize = 4;

/// Format one centroid as comma-joined coordinates with four decimals.
pub fn format_centroid(centroid: ArrayView1<'_, f64>) -> String {
    centroid
        .iter()
        .map(|v| format!("{:.*}", PRECISION, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// One line per centroid, in cluster order, each terminated by a newline.
pub fn format_centroids(centroids: &Array2<f64>) -> String {
    let mut out = String::new();
    for centroid in centroids.outer_iter() {
        out.push_str(&format_centroid(centroid));
        out.push('\n');
    }
    out
}

/// Write centroid lines to `writer`.
pub fn write_centroids<W: Write>(writer: &mut W, centroids: &Array2<f64>) -> io::Result<()> {
    writer.write_all(format_centroids(centroids).as_bytes())
}

/// Write the full run output: one diagnostic per empty-cluster event, then the centroids.
pub fn write_report<W: Write>(writer: &mut W, model: &KMeansModel) -> io::Result<()> {
    for _ in &model.empty_clusters {
        writeln!(writer, "{GENERIC_DIAGNOSTIC}")?;
    }
    write_centroids(writer, &model.centroids)?;
    writer.flush()
}
