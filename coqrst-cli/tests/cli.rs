use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn coqrst() -> Command {
    Command::cargo_bin("coqrst").expect("binary exists")
}

#[test]
fn render_defaults_to_html() {
    coqrst()
        .args(["render", "a b"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<span class="notation"><span>a</span> <span>b</span></span>"#,
        ));
}

#[test]
fn render_with_format() {
    coqrst()
        .args(["render", "{+, @term}", "--format", "ellipsis"])
        .assert()
        .success()
        .stdout("‘term’, …, ‘term’\n");
}

#[test]
fn render_invalid_notation_fails() {
    coqrst()
        .args(["render", "{+ @x"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn render_unknown_format_lists_formats() {
    coqrst()
        .args(["render", "a", "-f", "latex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("renderer not found: latex"))
        .stderr(predicate::str::contains("Available formats: doctree"));
}

#[test]
fn formats_lists_every_renderer() {
    let output = coqrst().arg("formats").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for name in ["html", "doctree", "doctree-json", "ellipsis", "regexp"] {
        assert!(stdout.contains(&format!("  {}\n", name)), "missing {}", name);
    }
}

#[test]
fn page_renders_stdin_notations() {
    coqrst()
        .arg("page")
        .write_stdin("intros {* @ident}\nplain text\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("How to read this page"))
        .stdout(predicate::str::contains(r#"<span class="hole">ident</span>"#))
        .stdout(predicate::str::contains("plain text").not());
}

#[test]
fn grep_finds_uses_in_v_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Basics.v"), "Goal True.\nrewrite H1, H2.\nQed.\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "rewrite H3").unwrap();

    coqrst()
        .args(["grep", "rewrite {+, @term}"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Basics.v:11: rewrite H1, H2"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn config_file_overrides_renderer_options() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("coqrst.toml");
    fs::write(&config, "[notation.regexp]\nstar = \"strict\"\n").unwrap();

    coqrst()
        .arg("--config")
        .arg(&config)
        .args(["render", "{? @x}", "-f", "regexp"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("(?:"));
}

#[test]
fn missing_config_file_fails() {
    coqrst()
        .args(["--config", "/nonexistent/coqrst.toml", "formats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn highlight_without_coqdoc_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("coqrst.toml");
    fs::write(&config, "[coqdoc]\nbinary = \"definitely-not-coqdoc\"\n").unwrap();

    coqrst()
        .arg("-c")
        .arg(&config)
        .arg("highlight")
        .write_stdin("Check nat.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Highlight error"));
}

#[cfg(unix)]
fn echo_repl_config(dir: &std::path::Path) -> std::path::PathBuf {
    let config = dir.join("coqrst.toml");
    fs::write(
        &config,
        r#"[coqtop]
binary = "sh"
args = ["-c", "printf 'Coq < '; while IFS= read -r line; do printf '%s\\nCoq < ' \"$line\"; done"]
timeout_ms = 5000
"#,
    )
    .unwrap();
    config
}

#[cfg(unix)]
#[test]
fn repl_prints_responses() {
    let dir = tempdir().unwrap();
    coqrst()
        .arg("--config")
        .arg(echo_repl_config(dir.path()))
        .args(["repl", "Check nat.", "Check bool."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Check nat.\n----------------------------------------\nCheck nat.\n"))
        .stdout(predicate::str::contains("Check bool."));
}

#[cfg(unix)]
#[test]
fn repl_block_transcript() {
    let dir = tempdir().unwrap();
    coqrst()
        .arg("--config")
        .arg(echo_repl_config(dir.path()))
        .args(["repl", "--block", "in", "Check nat. Check bool."])
        .assert()
        .success()
        .stdout("Check nat.\nCheck bool.\n");
}

#[cfg(unix)]
#[test]
fn repl_block_without_options_shows_input() {
    let dir = tempdir().unwrap();
    coqrst()
        .arg("--config")
        .arg(echo_repl_config(dir.path()))
        .args(["repl", "--block", "", "Check nat. Check bool."])
        .assert()
        .success()
        .stdout("Check nat.\nCheck bool.\n");
}

#[test]
fn repl_rejects_inconsistent_block_options() {
    coqrst()
        .args(["repl", "--block", "reset,undo", "Check nat."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("‘undo’ with ‘reset’"));
}
