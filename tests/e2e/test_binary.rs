//! Integration tests for the deptree binary.
//!
//! These tests run the compiled binary and verify output against golden
//! `.expect.txt` files under `tests/golden/`.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Path of the binary built by `cargo test`.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_deptree"))
}

fn golden_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path
}

/// Run the binary with the given stdin input and extra CLI args.
fn run(input: &str, extra_args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::Write;
            if let Some(ref mut stdin) = child.stdin {
                stdin.write_all(input.as_bytes()).ok();
            }
            child.wait_with_output()
        })
        .expect("Failed to run binary")
}

/// Run and require success. Returns stdout.
fn run_binary(input: &str, extra_args: &[&str]) -> String {
    let output = run(input, extra_args);
    assert!(
        output.status.success(),
        "Binary exited with {:?}:\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Non-UTF8 output")
}

/// Find all (name, input, expect) triples in the golden directory.
fn find_golden_pairs() -> Vec<(String, PathBuf, PathBuf)> {
    let dir = golden_dir();
    let mut pairs = Vec::new();
    if let Ok(entries) = fs::read_dir(&dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("deps") {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                let expect_path = dir.join(format!("{}.expect.txt", name));
                if expect_path.exists() {
                    pairs.push((name, path, expect_path));
                }
            }
        }
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

#[test]
fn test_golden_files() {
    let pairs = find_golden_pairs();
    assert!(!pairs.is_empty(), "no golden files found in {:?}", golden_dir());
    for (name, input_path, expect_path) in pairs {
        let input = fs::read_to_string(&input_path).unwrap();
        let expected = fs::read_to_string(&expect_path).unwrap();
        let actual = run_binary(&input, &[]);
        assert_eq!(actual, expected, "golden mismatch for {}", name);
    }
}

#[test]
fn test_input_file_argument() {
    let path = golden_dir().join("chain.deps");
    let out = run_binary("", &[path.to_str().unwrap()]);
    assert_eq!(out, "a  \n│  \n└▷b\n");
}

#[test]
fn test_ascii_flag() {
    let out = run_binary("a -> b\n", &["--ascii"]);
    assert_eq!(out, "a  \n|  \n+>b\n");
}

#[test]
fn test_indent_flag() {
    let out = run_binary("a -> b\n", &["--indent", "4"]);
    assert_eq!(out, "a    \n│    \n└──▷b\n");
}

#[test]
fn test_entrypoint_flag() {
    let out = run_binary("a -> b\nb -> c\n", &["-e", "b"]);
    assert_eq!(out, "b  \n│  \n└▷c\n");
}

#[test]
fn test_json_flag() {
    let out = run_binary("a -> b\n", &["--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "tree": { "a": { "b": null } },
            "circularDependencies": [],
            "errors": {}
        })
    );
    assert!(out.ends_with("}\n"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let stdout = run_binary("a -> b\n", &["-o", path.to_str().unwrap()]);
    assert!(stdout.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "a  \n│  \n└▷b\n");
}

#[test]
fn test_syntax_error_exits_with_1() {
    let output = run("a -> b\nx y\n", &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: syntax error on line 2"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_entrypoint_exits_with_1() {
    let output = run("a -> b\n", &["-e", "zzz"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown node 'zzz'"));
}

#[test]
fn test_missing_input_file_exits_with_1() {
    let output = run("", &["/nonexistent/input.deps"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: cannot read"));
}

#[test]
fn test_version_flag() {
    let out = run_binary("", &["--version"]);
    assert!(out.starts_with("deptree "));
}
