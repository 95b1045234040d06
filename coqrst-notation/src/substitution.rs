//! Textual macro expansion applied before lexing
//!
//! A couple of hole names are shorthands for longer patterns that read better when
//! spelled out. They are expanded in table order, once each, and the expanded text is
//! never rescanned.

/// Abbreviation → expansion, applied in order.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("@bindings_list", "{+ (@id := @val) }"),
    ("@qualid_or_string", "@id|@string"),
];

/// Expand every abbreviation of [SUBSTITUTIONS] in `notation`.
pub fn substitute(notation: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(notation.to_string(), |text, (abbreviation, expansion)| {
            if text.contains(abbreviation) {
                tracing::trace!(abbreviation, expansion, "expanding notation abbreviation");
                text.replace(abbreviation, expansion)
            } else {
                text
            }
        })
}
