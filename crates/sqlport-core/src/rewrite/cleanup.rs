//! Output tidying.

use std::sync::LazyLock;

use regex::Regex;

use crate::source::rewrite_code;

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*\n").expect("static cleanup pattern compiles"));
static TRAILING_AFTER_SEMICOLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m);[ \t]+$").expect("static cleanup pattern compiles"));

/// Collapses runs of blank lines to one, drops trailing whitespace after `;`
/// and trims the result. Literals and comments are copied as they are.
#[must_use]
pub fn cleanup(sql: &str) -> String {
    rewrite_code(sql, |code| {
        let collapsed = BLANK_RUNS.replace_all(code, "\n\n");
        TRAILING_AFTER_SEMICOLON
            .replace_all(&collapsed, ";")
            .into_owned()
    })
    .trim()
    .to_string()
}
