//! Integration tests for lloydforge

use lloydforge::{
    fit_kmeans, format_centroids, load_points_from_path, load_points_from_str, Error,
    KMeansConfig, StopReason,
};
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

const SCENARIO_A: &str = "1,1\n1,2\n10,10\n10,11\n";

/// Create a test file with the given rows
fn create_test_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

/// Run the binary with `args`, feeding `stdin`
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_lloydforge"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // The binary may exit on bad arguments before reading stdin.
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_end_to_end_pipeline() {
    let points = load_points_from_str(SCENARIO_A).unwrap();
    assert_eq!(points.count(), 4);
    assert_eq!(points.dimension(), 2);

    let model = fit_kmeans(&points, &KMeansConfig::new(2)).unwrap();
    assert_eq!(model.stop_reason, StopReason::Converged);
    assert!(model.iterations <= 5);
    assert_eq!(
        format_centroids(&model.centroids),
        "1.0000,1.5000\n10.0000,10.5000\n"
    );

    let sizes = model.cluster_sizes();
    assert_eq!(sizes.iter().sum::<usize>(), 4);
}

#[test]
fn test_file_input_matches_string_input() {
    let file = create_test_file(SCENARIO_A);
    let from_file = load_points_from_path(file.path()).unwrap();
    let from_str = load_points_from_str(SCENARIO_A).unwrap();
    assert_eq!(from_file, from_str);
}

#[test]
fn test_error_handling_too_many_clusters() {
    let points = load_points_from_str("1,1\n2,2\n3,3\n").unwrap();
    let err = fit_kmeans(&points, &KMeansConfig::new(3)).unwrap_err();
    assert!(matches!(err, Error::TooManyClusters { k: 3, count: 3 }));
}

#[test]
fn test_cli_scenario_a() {
    let output = run_cli(&["2"], SCENARIO_A);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "1.0000,1.5000\n10.0000,10.5000\n");
}

#[test]
fn test_cli_accepts_whole_floats() {
    let output = run_cli(&["2.0", "100.0"], SCENARIO_A);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "1.0000,1.5000\n10.0000,10.5000\n");
}

#[test]
fn test_cli_reads_input_file() {
    let file = create_test_file(SCENARIO_A);
    let path = file.path().to_str().unwrap();

    let output = run_cli(&["--input", path, "2"], "");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "1.0000,1.5000\n10.0000,10.5000\n");
}

#[test]
fn test_cli_scenario_b_too_many_clusters() {
    let output = run_cli(&["3"], "1,1\n2,2\n3,3\n");
    assert!(!output.status.success());
    assert_eq!(stdout_of(&output), "Incorrect number of clusters!\n");
}

#[test]
fn test_cli_scenario_c_dimension_mismatch() {
    let output = run_cli(&["1"], "1,2\n3,4,5\n6,7\n");
    assert!(!output.status.success());
    assert_eq!(stdout_of(&output), "An Error Has Occurred\n");
}

#[test]
fn test_cli_scenario_d_iteration_bounds() {
    for bad in ["0", "1001", "2.5"] {
        let output = run_cli(&["2", bad], SCENARIO_A);
        assert!(!output.status.success());
        assert_eq!(stdout_of(&output), "Incorrect maximum iteration!\n");
    }

    let output = run_cli(&["2", "1000"], SCENARIO_A);
    assert!(output.status.success());
}

#[test]
fn test_cli_scenario_e_empty_cluster_is_reported() {
    let output = run_cli(&["2"], "1,1\n1,1\n3,3\n");
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "An Error Has Occurred\n3.0000,3.0000\n1.0000,1.0000\n"
    );
}

#[test]
fn test_cli_argument_arity() {
    let output = run_cli(&[], SCENARIO_A);
    assert!(!output.status.success());
    assert_eq!(stdout_of(&output), "An Error Has Occurred\n");

    let output = run_cli(&["2", "100", "7"], SCENARIO_A);
    assert!(!output.status.success());
    assert_eq!(stdout_of(&output), "An Error Has Occurred\n");
}

#[test]
fn test_cli_invalid_cluster_count() {
    for bad in ["0", "-1", "1.5", "nan", "inf"] {
        let output = run_cli(&[bad], SCENARIO_A);
        assert!(!output.status.success());
        assert_eq!(stdout_of(&output), "Incorrect number of clusters!\n");
    }
}

#[test]
fn test_cli_hyphenated_values_get_their_own_diagnostic() {
    for bad in ["-inf", "-nan", "--"] {
        let output = run_cli(&[bad], SCENARIO_A);
        assert!(!output.status.success());
        assert_eq!(stdout_of(&output), "Incorrect number of clusters!\n");
    }

    for bad in ["-inf", "-5", "--"] {
        let output = run_cli(&["2", bad], SCENARIO_A);
        assert!(!output.status.success());
        assert_eq!(stdout_of(&output), "Incorrect maximum iteration!\n");
    }

    let output = run_cli(&["--", "2"], SCENARIO_A);
    assert!(!output.status.success());
    assert_eq!(stdout_of(&output), "Incorrect number of clusters!\n");
}

#[test]
fn test_cli_empty_input() {
    let output = run_cli(&["1"], "\n\n");
    assert!(!output.status.success());
    assert_eq!(stdout_of(&output), "An Error Has Occurred\n");
}
