// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Tests running the `mdkernel` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use float_cmp::assert_approx_eq;
use serde_yaml::Value;

/// Path to the compiled `mdkernel` binary.
fn mdkernel_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mdkernel"))
}

fn run_eval(input: &Path, output: &Path) -> ExitStatus {
    Command::new(mdkernel_binary())
        .arg("-o")
        .arg(output)
        .arg("eval")
        .arg("-i")
        .arg(input)
        .status()
        .expect("failed to execute mdkernel binary")
}

#[test]
fn eval_two_particles() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("output.yaml");
    let status = run_eval(Path::new("tests/files/two_particles.yaml"), &output);
    assert!(status.success(), "mdkernel exited with status: {status}");

    let yaml: Value = serde_yaml::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let energy = yaml["energy"].as_f64().unwrap();
    assert_approx_eq!(f64, energy, 0.016316891, epsilon = 1e-6);

    let force_x = yaml["forces"][0][0].as_f64().unwrap();
    assert_approx_eq!(f64, force_x, -24.0, epsilon = 1e-4);
    let position_x = yaml["positions"][1][0].as_f64().unwrap();
    assert_approx_eq!(f64, position_x, 9.0, epsilon = 1e-6);
    assert_eq!(yaml["cell"]["boundary"].as_str(), Some("reflecting"));
}

#[test]
fn eval_missing_input_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("output.yaml");
    let status = run_eval(&tmp.path().join("does_not_exist.yaml"), &output);
    assert!(!status.success());
    assert!(!output.exists());
}

#[test]
fn eval_invalid_potential_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("output.yaml");
    let status = run_eval(Path::new("tests/files/zero_sigma.yaml"), &output);
    assert!(!status.success());
    assert!(!output.exists());
}
