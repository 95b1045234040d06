//! Standalone notation reference page
//!
//! A self-contained HTML document explaining how to read rendered notations, followed
//! by a few sample notations and any extra notations supplied by the caller.

use crate::error::RenderError;
use crate::formats::html::{htmlize, serialize_node, HtmlOptions};
use coqrst_notation::parse_notation;

/// Notations shown on every page, before the caller's own.
pub const SAMPLE_NOTATIONS: &[&str] = &[
    "apply {+, @term with {+ (@id := @val) } } in {+, @hyp }",
    "Global Arguments qualid {+ @name%@scope}.",
    "{? simple} apply {+, @term {? with @bindings_list}} in @ident {? as @intro_pattern}",
    "set (@ident {+ @binder} := @term) in {+ @hyp}",
    "unfold {+, @qualid at {+, num}}",
    "generalize {+, @term at {+ @num} as @ident}",
];

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Coq Notations</title>
<link rel="stylesheet" href="notations.css">
</head>
<body>
"#;

const INTRO: &str = r#"<h2>How to read this page</h2>
<div class="intro">
<p>Each line is one Coq <strong>tactic notation</strong>.
<span class="notation"><span class="hole">Green italics</span></span> indicate holes to fill; the rest is fixed syntax.</p>
<p>Boxes indicate <strong>repeated patterns</strong>.
The top-right symbol indicates the number of repetitions:
<span class="notation"><span class="repeat-wrapper"><span class="repeat">0 or 1</span><sup>?</sup></span></span>,
<span class="notation"><span class="repeat-wrapper"><span class="repeat">one or more</span><sup>+</sup></span></span>, or
<span class="notation"><span class="repeat-wrapper"><span class="repeat">any number of times</span><sup>*</sup></span></span>.
The bottom symbol indicates the separator.</p>
<p>For example,
“<span class="notation">rewrite H</span>”,
“<span class="notation">rewrite -&gt; H</span>”, and
“<span class="notation">rewrite H1, H2</span>”
are all matches for
“<span class="notation">rewrite <span class="repeat-wrapper"><span class="repeat">-&gt;</span><sup>?</sup></span> <span class="repeat-wrapper"><span class="repeat"><span class="hole">term</span></span><sup>+</sup><sub>,</sub></span></span>”.</p>
</div>
<hr>
"#;

const FOOT: &str = "</body>\n</html>\n";

/// Render the reference page.
///
/// Of `lines`, only those containing `{` are rendered; the others are skipped. Any
/// notation that fails to parse aborts the whole page.
pub fn render_page<I, S>(lines: I, options: &HtmlOptions) -> Result<String, RenderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut page = String::from(HEAD);
    page.push_str(INTRO);

    let extra = lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| line.contains('{'));

    for source in SAMPLE_NOTATIONS.iter().map(|s| s.to_string()).chain(extra) {
        let notation = parse_notation(&source)?;
        page.push_str("<p>");
        page.push_str(&serialize_node(&htmlize(&notation, options))?);
        page.push_str("</p>\n<hr>\n");
    }

    page.push_str(FOOT);
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_always_present() {
        let page = render_page(Vec::<String>::new(), &HtmlOptions::default()).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("How to read this page"));
        assert_eq!(page.matches("<p><span class=\"notation\">").count(), 6);
        assert_eq!(page.matches("<hr>").count(), 7);
    }

    #[test]
    fn test_only_lines_with_groups_are_rendered() {
        let lines = ["intros {* @ident}", "no groups here", "", "auto {? with @db}\n"];
        let page = render_page(lines, &HtmlOptions::default()).unwrap();
        assert_eq!(page.matches("<p><span class=\"notation\">").count(), 8);
        assert!(!page.contains("no groups here"));
        assert!(page.contains(r#"<span class="hole">db</span>"#));
    }

    #[test]
    fn test_invalid_line_is_an_error() {
        let result = render_page(["broken {+ @x"], &HtmlOptions::default());
        assert!(matches!(result, Err(RenderError::Notation(_))));
    }
}
