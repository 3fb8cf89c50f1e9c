//! Runs the `opreg` binary against throwaway projects.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = r#"
catalogues {
	curated "functions.kdl"
	generated "generated_functions.kdl"
}
"#;

const FUNCTIONS: &str = r#"
function "abs" {
	returns "DOUBLE"
	args "DOUBLE"
	backend "MathFunctions::Abs"
	aliases "abs"
}
"#;

fn project(functions: &str) -> tempfile::TempDir {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join("opreg.kdl"), CONFIG).unwrap();
	fs::write(dir.path().join("functions.kdl"), functions).unwrap();
	fs::write(dir.path().join("generated_functions.kdl"), "").unwrap();
	dir
}

fn opreg(root: &Path, args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_opreg"))
		.arg("--root")
		.arg(root)
		.args(args)
		.output()
		.unwrap()
}

#[test]
fn test_generate_writes_artifacts() {
	let dir = project(FUNCTIONS);
	let out = opreg(dir.path(), &["generate"]);
	assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

	let thrift = fs::read_to_string(dir.path().join("common/thrift/Opcodes.thrift")).unwrap();
	assert!(thrift.contains("  ABS,\n"));
	assert!(dir.path().join("be/generated-sources/opcode/opcode-registry-init.cc").is_file());
}

#[test]
fn test_check_writes_nothing() {
	let dir = project(FUNCTIONS);
	let out = opreg(dir.path(), &["check"]);
	assert!(out.status.success());
	assert!(!dir.path().join("common").exists());
}

#[test]
fn test_alias_conflict_fails_without_output() {
	let dir = project(
		r#"
		function "x" { returns "INT"; args; backend "F::X"; aliases "foo"; }
		function "y" { returns "INT"; args; backend "F::Y"; aliases "foo"; }
		"#,
	);
	let out = opreg(dir.path(), &[]);
	assert!(!out.status.success());
	let stderr = String::from_utf8_lossy(&out.stderr);
	assert!(stderr.contains("\"foo\""), "{stderr}");
	assert!(!dir.path().join("common").exists());
	assert!(!dir.path().join("fe").exists());
	assert!(!dir.path().join("be").exists());
}

#[test]
fn test_opcodes_lists_ordinals() {
	let dir = project(FUNCTIONS);
	let out = opreg(dir.path(), &["opcodes"]);
	assert!(out.status.success());
	let stdout = String::from_utf8_lossy(&out.stdout);
	let lines: Vec<&str> = stdout.lines().map(str::trim).collect();
	assert_eq!(lines, ["0  INVALID_OPCODE", "1  ABS", "2  LAST_OPCODE"]);
}

#[test]
fn test_missing_config_fails() {
	let dir = tempfile::tempdir().unwrap();
	let out = opreg(dir.path(), &["check"]);
	assert!(!out.status.success());
	assert!(String::from_utf8_lossy(&out.stderr).contains("opreg.kdl"));
}
