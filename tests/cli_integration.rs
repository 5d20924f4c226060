use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

fn jsondude(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_jsondude"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_ok(out: &Output) -> String {
    assert!(
        out.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

const BLOB: &str =
    "{'age': 4, 'name': { 'first': 'fred', 'last' : 'gherkin'}, 'friends': ['bob', 'john']}";

#[test]
fn fmt_prints_canonical_text() {
    let out = jsondude(&["fmt"], BLOB);
    assert_eq!(
        stdout_ok(&out),
        "{\"age\":4,\"name\":{\"first\":\"fred\",\"last\":\"gherkin\"},\"friends\":[\"bob\",\"john\"]}\n"
    );
}

#[test]
fn fmt_pretty() {
    let out = jsondude(&["fmt", "--pretty", "-"], "{'a':[1]}");
    assert_eq!(stdout_ok(&out), "{\n  \"a\": [\n    1\n  ]\n}\n");
}

#[test]
fn get_reads_typed_values() {
    assert_eq!(stdout_ok(&jsondude(&["get", "--path", "age", "--as", "integer"], BLOB)), "4\n");
    assert_eq!(stdout_ok(&jsondude(&["get", "--path", "friends.1", "--as", "string"], BLOB)), "john\n");
    assert_eq!(stdout_ok(&jsondude(&["get", "--path", "name"], BLOB)), "{\"first\":\"fred\",\"last\":\"gherkin\"}\n");
}

#[test]
fn get_failures_exit_nonzero_with_reason() {
    let out = jsondude(&["get", "--path", "missing", "--as", "string"], BLOB);
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("no such key"), "{err}");

    let out = jsondude(&["get", "--path", "age", "--as", "string"], BLOB);
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("expected string"), "{err}");
}

#[test]
fn check_reports_parse_position() {
    assert_eq!(stdout_ok(&jsondude(&["check"], "[1, 2]")), "ok\n");

    let out = jsondude(&["check"], "[1,2,");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("line 1 column 6"), "{err}");
}

#[test]
fn strict_flag_rejects_single_quotes() {
    let out = jsondude(&["check", "--strict"], "{'a':1}");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("single-quoted"));
}

#[test]
fn config_file_sets_defaults_and_flags_override() {
    let mut cfg = tempfile::NamedTempFile::new().unwrap();
    writeln!(cfg, "[parse]\nmax_depth = 2\n\n[render]\npretty = true").unwrap();
    let cfg_path = cfg.path().to_str().unwrap().to_string();

    let out = jsondude(&["check", "--config", &cfg_path], "[[[]]]");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nesting deeper than 2"));

    let out = jsondude(&["fmt", "--config", &cfg_path, "--max-depth", "3"], "[[[]]]");
    assert_eq!(stdout_ok(&out), "[\n  [\n    []\n  ]\n]\n");
}

#[test]
fn reads_named_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(BLOB.as_bytes()).unwrap();
    let path = f.path().to_str().unwrap().to_string();
    let out = jsondude(&["get", &path, "--path", "name.last"], "");
    assert_eq!(stdout_ok(&out), "\"gherkin\"\n");
}
