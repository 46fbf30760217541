use std::io::Write;

use spectra_core::serde::{to_canonical_json_bytes, to_yaml_string};
use spectra_core::{ErrorKind, SolverConfig, DEFAULT_MAX_DENSE_SIZE, DEFAULT_MAX_ITERATIONS};

#[test]
fn defaults_match_documented_constants() {
    let config = SolverConfig::default();
    assert_eq!(config.max_dense_size, DEFAULT_MAX_DENSE_SIZE);
    assert_eq!(config.max_dense_size, 3000);
    assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    assert_eq!(config.hermitian_tolerance, 1e-6);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_yaml_falls_back_to_defaults() {
    let config = SolverConfig::from_yaml_slice(b"max_dense_size: 64\nseed: 5\n").expect("yaml");
    assert_eq!(config.max_dense_size, 64);
    assert_eq!(config.seed, 5);
    assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    assert_eq!(config.krylov_subspace, None);
}

#[test]
fn yaml_and_json_round_trip() {
    let config = SolverConfig::default()
        .with_max_dense_size(128)
        .with_max_iterations(500)
        .with_seed(11);
    let yaml = to_yaml_string(&config).expect("yaml");
    assert_eq!(SolverConfig::from_yaml_slice(yaml.as_bytes()).expect("decode"), config);
    let json = to_canonical_json_bytes(&config).expect("json");
    assert_eq!(SolverConfig::from_json_slice(&json).expect("decode"), config);
}

#[test]
fn invalid_values_are_rejected() {
    let err = SolverConfig::from_yaml_slice(b"max_iterations: 0\n").expect_err("zero cap");
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(err.info().code, "invalid-config");

    let err = SolverConfig::from_json_slice(br#"{"krylov_tolerance": -1.0}"#).expect_err("tol");
    assert_eq!(err.info().context.get("krylov_tolerance").map(String::as_str), Some("-1"));

    let err = SolverConfig::from_yaml_slice(b"max_dense_size: [1, 2]\n").expect_err("shape");
    assert_eq!(err.kind(), ErrorKind::Serde);
}

#[test]
fn loads_from_files_by_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let yaml_path = dir.path().join("solver.yaml");
    let mut file = std::fs::File::create(&yaml_path).expect("create");
    writeln!(file, "max_dense_size: 10\nkrylov_subspace: 12").expect("write");
    let config = SolverConfig::from_path(&yaml_path).expect("load yaml");
    assert_eq!(config.max_dense_size, 10);
    assert_eq!(config.krylov_subspace, Some(12));

    let json_path = dir.path().join("solver.json");
    std::fs::write(&json_path, br#"{"seed": 3}"#).expect("write");
    assert_eq!(SolverConfig::from_path(&json_path).expect("load json").seed, 3);

    let missing = SolverConfig::from_path(dir.path().join("missing.yaml")).expect_err("missing");
    assert_eq!(missing.info().code, "config_read");
}
