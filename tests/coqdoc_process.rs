//! The coqdoc adapter against stand-in executables.
#![cfg(unix)]

use coqrst::{Coqdoc, HighlightError, Highlighter};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// Single test: scripts must not be written while other tests spawn processes.
#[test]
fn coqdoc_process_outcomes() {
    let dir = tempfile::tempdir().unwrap();

    // Wraps the snippet (minus the header) in a keyword span.
    let echo = script(
        dir.path(),
        "coqdoc-echo",
        r#"[ "$1" = "--body-only" ] || exit 3
for last; do :; done
printf '<div class="code">\n<span class="id" type="keyword">'
sed 's/.*\*)//' "$last"
printf '</span>\n</div>'"#,
    );
    let coqdoc = Coqdoc::new(echo.to_string_lossy());
    let tokens = coqdoc.highlight("Check nat.").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].classes, vec!["coqdoc-keyword"]);
    assert_eq!(tokens[0].text.trim(), "Check nat.");

    let failing = script(dir.path(), "coqdoc-fail", "echo boom >&2\nexit 1");
    match Coqdoc::new(failing.to_string_lossy()).highlight("Check nat.") {
        Err(HighlightError::Failed { stderr, .. }) => assert_eq!(stderr, "boom"),
        other => panic!("Expected Failed, got {:?}", other),
    }

    let slow = script(dir.path(), "coqdoc-slow", "sleep 5");
    let result = Coqdoc::new(slow.to_string_lossy())
        .with_timeout(Duration::from_millis(100))
        .highlight("Check nat.");
    assert!(matches!(result, Err(HighlightError::Timeout(_))));

    let plain = script(dir.path(), "coqdoc-plain", "printf '<p>no code</p>'");
    assert!(matches!(
        Coqdoc::new(plain.to_string_lossy()).highlight("Check nat."),
        Err(HighlightError::MissingCode)
    ));
}
