//! lloydforge: partition numeric points into k clusters with Lloyd's k-means
//!
//! Points are read as comma-separated text rows, clustered from a fixed
//! seeding (the first `k` points) and reported as centroid lines with four
//! decimal places.

pub mod cli;
pub mod data;
pub mod error;
pub mod model;
pub mod report;

// Re-export public items for easier access
pub use cli::{parse_whole_number, Args};
pub use data::{load_points, load_points_from_path, load_points_from_str, parse_vector, PointSet};
pub use error::{
    Diagnostic, Error, Result, CLUSTER_COUNT_DIAGNOSTIC, GENERIC_DIAGNOSTIC, ITERATION_DIAGNOSTIC,
};
pub use model::{
    fit_kmeans, initial_centroids, EmptyCluster, KMeansConfig, KMeansModel, Lloyd, Pass,
    StopReason, DEFAULT_ITER, EPSILON, MAX_ITER, MIN_ITER, MIN_K,
};
pub use report::{format_centroid, format_centroids, write_centroids, write_report};
