use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::error::Error;
use std::fs;
use tempfile::tempdir;

fn floats(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_f64().expect("number"))
        .collect()
}

#[test]
fn methods_lists_every_surrogate() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.arg("methods");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("super (selected)"))
        .stdout(predicate::str::contains("heaviside"))
        .stdout(predicate::str::contains("heavi_erfc"));
    Ok(())
}

#[test]
fn step_with_default_parameters() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["step", "--input", "2.0"]);
    let assert = cmd.assert().success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(floats(&report["spikes"]), vec![0.0]);
    let v = floats(&report["v"])[0];
    assert!((v - 0.2).abs() < 1e-6, "v = {}", v);
    assert!(report.get("gradients").is_none());
    Ok(())
}

#[test]
fn step_reports_surrogate_gradients() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["step", "--input", "2.0,2.0", "--v", "0.95,-1.0", "--grad", "--alpha", "1.0"]);
    let assert = cmd.assert().success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(floats(&report["spikes"]), vec![1.0, 0.0]);

    let v_th = floats(&report["gradients"]["v_th"]);
    assert_eq!(v_th.len(), 1);
    assert!(v_th[0] < 0.0);
    Ok(())
}

#[test]
fn step_text_format() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["step", "--input", "-1.0", "--format", "text"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("spikes:    [0.0]"));
    Ok(())
}

#[test]
fn run_constant_input_spikes_on_seventh_step() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["run", "--input", "2.0", "--steps", "14"]);
    let assert = cmd.assert().success();

    let trace: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let records = trace["records"].as_array().expect("records");
    assert_eq!(records.len(), 14);
    assert_eq!(floats(&records[6]["spikes"]), vec![1.0]);
    assert_eq!(floats(&records[6]["v"]), vec![0.0]);
    assert_eq!(floats(&trace["spike_counts"]), vec![2.0]);
    Ok(())
}

#[test]
fn run_writes_csv_trace() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let out = tmp.path().join("trace.csv");
    let out_str = out.to_str().expect("temp path to UTF-8");

    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["run", "--input", "1.0,3.0", "-n", "5", "--format", "csv", "-o", out_str]);
    cmd.assert().success();

    let csv = fs::read_to_string(&out)?;
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "step,time,neuron,spike,v");
    assert_eq!(lines.len(), 1 + 5 * 2);
    Ok(())
}

#[test]
fn parameter_file_is_applied() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let params = tmp.path().join("params.toml");
    fs::write(&params, "v_th = 0.1\nmethod = \"triangle\"\n")?;
    let params_str = params.to_str().expect("temp path to UTF-8");

    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["--params", params_str, "step", "--input", "2.0"]);
    let assert = cmd.assert().success();
    let report: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(floats(&report["spikes"]), vec![1.0]);

    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["--params", params_str, "params"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("method = \"triangle\""))
        .stdout(predicate::str::contains("v_th = 0.1"));
    Ok(())
}

#[test]
fn params_round_trip_through_file() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let out = tmp.path().join("effective.toml");
    let out_str = out.to_str().expect("temp path to UTF-8");

    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["--method", "tanh", "params", "-o", out_str]);
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["--params", out_str, "methods"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tanh (selected)"));
    Ok(())
}

#[test]
fn unknown_method_fails_fast() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["--method", "bogus", "step", "--input", "1.0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("bogus").and(predicate::str::contains("heavi_erfc")));
    Ok(())
}

#[test]
fn invalid_alpha_is_rejected() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["--alpha", "0", "step", "--input", "1.0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameter alpha"));
    Ok(())
}

#[test]
fn mismatched_shapes_fail() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("lifbox")?;
    cmd.args(["step", "--input", "1.0,2.0", "--v", "0.0,0.0,0.0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be broadcast"));
    Ok(())
}
