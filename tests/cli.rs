//! CLI tests for the `docqa` binary.
//!
//! Each test runs in a fresh temp directory with an in-memory store and
//! disabled providers, so no network access or credentials are needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn docqa_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("docqa");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    fs::write(root.join("notes.txt"), "Plain text is not accepted.").unwrap();
    fs::write(root.join("policy.pdf"), b"%PDF-1.4\n% truncated body\n").unwrap();

    let config_content = r#"[chunking]
max_chars = 1500
overlap_chars = 200

[embedding]
provider = "disabled"

[generation]
provider = "disabled"

[store]
provider = "memory"
"#;
    let config_path = root.join("docqa.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_docqa(dir: &Path, config_path: &Path, args: &[&str]) -> (String, String, bool) {
    run_docqa_with_env(dir, config_path, &[], args)
}

fn run_docqa_with_env(
    dir: &Path,
    config_path: &Path,
    env: &[(&str, &str)],
    args: &[&str],
) -> (String, String, bool) {
    let binary = docqa_binary();
    let output = Command::new(&binary)
        .current_dir(dir)
        .env_remove("GOOGLE_API_KEY")
        .env_remove("PINECONE_API_KEY")
        .env_remove("PINECONE_INDEX")
        .envs(env.iter().copied())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run docqa binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_namespace_prints_md5() {
    let (tmp, config) = setup_test_env();
    fs::write(tmp.path().join("hello.bin"), b"hello world").unwrap();

    let (stdout, stderr, success) = run_docqa(tmp.path(), &config, &["namespace", "hello.bin"]);
    assert!(success, "namespace failed: {}", stderr);
    assert_eq!(stdout.trim(), "5eb63bbbe01eeed093cb22bb8f5acdc3");
}

#[test]
fn test_ingest_rejects_non_pdf() {
    let (tmp, config) = setup_test_env();

    let (_, stderr, success) = run_docqa(tmp.path(), &config, &["ingest", "notes.txt"]);
    assert!(!success);
    assert!(stderr.contains("Only PDF"), "stderr: {}", stderr);
}

#[test]
fn test_ingest_missing_file_fails() {
    let (tmp, config) = setup_test_env();

    let (_, stderr, success) = run_docqa(tmp.path(), &config, &["ingest", "missing.pdf"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read"), "stderr: {}", stderr);
}

#[test]
fn test_ingest_unparsable_pdf_reports_extraction_error() {
    let (tmp, config) = setup_test_env();

    let (_, stderr, success) = run_docqa(tmp.path(), &config, &["ingest", "policy.pdf"]);
    assert!(!success);
    assert!(stderr.contains("Extraction error"), "stderr: {}", stderr);
}

#[test]
fn test_ask_blank_question_prints_guidance() {
    let (tmp, config) = setup_test_env();

    let (stdout, stderr, success) = run_docqa(tmp.path(), &config, &["ask", "ns1", "  "]);
    assert!(success, "ask failed: {}", stderr);
    assert_eq!(stdout.trim(), "Please enter a valid question.");
}

#[test]
fn test_ask_without_namespace_prints_no_document() {
    let (tmp, config) = setup_test_env();

    let (stdout, stderr, success) = run_docqa(tmp.path(), &config, &["ask", "", "What is covered?"]);
    assert!(success, "ask failed: {}", stderr);
    assert!(stdout.contains("No active document"));
}

#[test]
fn test_ask_with_disabled_embedder_fails() {
    let (tmp, config) = setup_test_env();

    let (_, stderr, success) = run_docqa(tmp.path(), &config, &["ask", "ns1", "What is covered?"]);
    assert!(!success);
    assert!(stderr.contains("Embedding error"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_config_is_rejected() {
    let (tmp, _) = setup_test_env();
    let bad = tmp.path().join("bad.toml");
    fs::write(&bad, "[retrieval]\ntop_k = 0\n").unwrap();

    let (_, stderr, success) = run_docqa(tmp.path(), &bad, &["ask", "ns1", "Why?"]);
    assert!(!success);
    assert!(stderr.contains("top_k"), "stderr: {}", stderr);
}

#[test]
fn test_pinecone_store_requires_credentials() {
    let (tmp, _) = setup_test_env();
    let config = tmp.path().join("pinecone.toml");
    fs::write(
        &config,
        "[embedding]\nprovider = \"disabled\"\n\n[generation]\nprovider = \"disabled\"\n",
    )
    .unwrap();

    let (_, stderr, success) = run_docqa(tmp.path(), &config, &["ask", "ns1", "Why?"]);
    assert!(!success);
    assert!(stderr.contains("PINECONE_API_KEY"), "stderr: {}", stderr);
}

#[test]
fn test_missing_google_key_reported_before_store_lookup() {
    let (tmp, _) = setup_test_env();
    let config = tmp.path().join("gemini.toml");
    // No host configured: reaching the store would need an index lookup.
    fs::write(&config, "[store]\nprovider = \"pinecone\"\n").unwrap();

    let (_, stderr, success) = run_docqa_with_env(
        tmp.path(),
        &config,
        &[("PINECONE_API_KEY", "pk"), ("PINECONE_INDEX", "idx")],
        &["ask", "ns1", "Why?"],
    );
    assert!(!success);
    assert!(stderr.contains("GOOGLE_API_KEY"), "stderr: {}", stderr);
}
