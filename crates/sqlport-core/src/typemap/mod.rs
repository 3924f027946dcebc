//! Type Mapping Engine.
//!
//! Each dialect pair owns a static table of [`TypeRule`]s. A [`TypeMapper`]
//! sorts its rules longest source first, once, and compiles them into a single
//! alternation that is applied in one pass. Two guarantees follow:
//!
//! - precision-qualified entries (`NUMBER(10)`) always win over their generic
//!   prefix (`NUMBER`), because leftmost-first alternation tries them first;
//! - replacement text is never re-scanned, so `DOUBLE → DOUBLE PRECISION`
//!   cannot fire a second time on its own output.

mod mysql;
mod oracle;

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::source::{segments, SegmentKind};

/// One source-type to target-type substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRule {
    /// Source type as written in the source dialect, e.g. `NUMBER(10)`.
    pub source: &'static str,
    /// Replacement type in the target dialect.
    pub target: &'static str,
    /// Only match when the source type is followed by an argument list.
    pub requires_args: bool,
    /// Carry a trailing `(size)` over to the target type.
    pub carries_size: bool,
    /// Only match a `(precision, scale)` argument pair.
    pub scaled: bool,
}

impl TypeRule {
    /// A rule whose target takes the same size qualifier as its source
    /// (`VARCHAR2(100)` becomes `VARCHAR(100)`).
    #[must_use]
    pub const fn sized(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            target,
            requires_args: false,
            carries_size: true,
            scaled: false,
        }
    }

    /// A rule whose target takes no size: unbounded (`TEXT`, `BYTEA`) or of
    /// fixed width (`INTEGER`, `REAL`). A source qualifier is dropped.
    #[must_use]
    pub const fn fixed(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            target,
            requires_args: false,
            carries_size: false,
            scaled: false,
        }
    }

    /// A rule that only matches when an argument list follows, as for
    /// `ENUM('a','b')`. Keeps MySQL's `SET` type apart from `UPDATE ... SET`.
    /// The arguments are dropped.
    #[must_use]
    pub const fn with_args(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            target,
            requires_args: true,
            carries_size: false,
            scaled: false,
        }
    }

    /// A rule that only matches a `(precision, scale)` pair and carries it
    /// over, as for `NUMBER(12,4)` to `DECIMAL(12,4)`.
    #[must_use]
    pub const fn scaled(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            target,
            requires_args: true,
            carries_size: true,
            scaled: true,
        }
    }

    /// Returns true if the source already names its arguments (`NUMBER(10)`).
    #[must_use]
    pub fn source_has_args(&self) -> bool {
        self.source.contains('(')
    }

    /// Returns true if a trailing size qualifier survives the mapping. Targets
    /// that already encode their size (`VARCHAR(255)`) never take another.
    #[must_use]
    pub fn keeps_size(&self) -> bool {
        self.carries_size && !self.target.contains('(')
    }

    /// Returns true if the source spans several words (`LONG RAW`).
    #[must_use]
    pub fn is_multi_word(&self) -> bool {
        self.source.contains(char::is_whitespace)
    }

    /// Builds the regex fragment for this rule, capturing the source as one
    /// group and its argument list as the next.
    ///
    /// A multi-word source takes its precision after the first word, the
    /// way Oracle writes `TIMESTAMP(6) WITH TIME ZONE`.
    fn pattern(&self) -> String {
        let args = if self.source_has_args() {
            "()"
        } else if self.scaled {
            r"(\s*\(\s*\d+\s*,\s*\d+\s*\))"
        } else if self.requires_args {
            r"(\s*\([^()]*\))"
        } else {
            r"(\s*\([^()]*\))?"
        };
        if self.is_multi_word() && !self.source_has_args() {
            let (first, rest) = self
                .source
                .split_once(char::is_whitespace)
                .unwrap_or((self.source, ""));
            return format!(
                r"(\b{}\b{args}\s+{})",
                regex::escape(first),
                source_pattern(rest.trim_start())
            );
        }
        format!(r"(\b{}){args}", source_pattern(self.source))
    }
}

/// Builds the regex fragment for a source type's text.
fn source_pattern(source: &str) -> String {
    let mut pattern = String::new();
    let mut in_space = false;
    for c in source.chars() {
        if c.is_whitespace() {
            if !in_space {
                pattern.push_str(r"\s+");
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            '(' => pattern.push_str(r"\s*\(\s*"),
            ')' => pattern.push_str(r"\s*\)"),
            ',' => pattern.push_str(r"\s*,\s*"),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    if source
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        pattern.push_str(r"\b");
    }
    pattern
}

/// One substitution performed by [`TypeMapper::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConversion {
    /// The text that matched, e.g. `varchar2(100)`.
    pub from: String,
    /// The text written in its place, e.g. `VARCHAR(100)`.
    pub to: String,
}

/// The result of running a [`TypeMapper`] over some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapped {
    /// Rewritten text.
    pub text: String,
    /// Every substitution in order of appearance.
    pub conversions: Vec<TypeConversion>,
}

/// Immutable, longest-first set of type rules for one dialect pair.
#[derive(Debug)]
pub struct TypeMapper {
    rules: Vec<TypeRule>,
    matcher: Regex,
}

impl TypeMapper {
    /// Sorts `rules` longest source first and compiles them.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the combined pattern exceeds the regex
    /// engine's size limits.
    pub fn new(rules: impl IntoIterator<Item = TypeRule>) -> Result<Self, regex::Error> {
        let mut rules: Vec<TypeRule> = rules.into_iter().collect();
        rules.sort_by(|a, b| {
            b.source
                .len()
                .cmp(&a.source.len())
                .then_with(|| a.source.cmp(b.source))
                .then_with(|| b.requires_args.cmp(&a.requires_args))
        });

        // Groups 2i+1 / 2i+2 hold rule i's source and argument list.
        let alternatives: Vec<String> = rules.iter().map(TypeRule::pattern).collect();
        let matcher = Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))?;

        Ok(Self { rules, matcher })
    }

    /// Returns the rules in match order (longest source first).
    #[must_use]
    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    /// Replaces every known source type in `text` with its target type.
    ///
    /// Words standing where an identifier belongs (a column named `date`,
    /// `t.long`, `SELECT text FROM`) are left alone.
    #[must_use]
    pub fn apply(&self, text: &str) -> Mapped {
        let mut conversions = Vec::new();
        let rewritten = self.matcher.replace_all(text, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let Some((rule, args)) = self.matched_rule(caps) else {
                return whole.to_string();
            };
            let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
            if args.is_none()
                && !rule.source_has_args()
                && is_identifier_position(text, start, end)
            {
                return whole.to_string();
            }
            let mut replacement = rule.target.to_string();
            if let Some(args) = args {
                if rule.keeps_size() {
                    replacement.push_str(&size_suffix(args));
                }
            }
            conversions.push(TypeConversion {
                from: whole.to_string(),
                to: replacement.clone(),
            });
            replacement
        });
        Mapped {
            text: rewritten.into_owned(),
            conversions,
        }
    }

    /// Like [`TypeMapper::apply`], but string literals, quoted identifiers and
    /// comments are never rewritten. Literals inside an argument list
    /// (`ENUM('a','b')`) still count as arguments.
    #[must_use]
    pub fn convert(&self, sql: &str) -> Mapped {
        let mut masked = String::with_capacity(sql.len());
        let mut held: Vec<&str> = Vec::new();
        for segment in segments(sql) {
            if segment.kind == SegmentKind::Code {
                masked.push_str(segment.text);
            } else {
                masked.push_str(&format!("\u{1}{}\u{1}", held.len()));
                held.push(segment.text);
            }
        }

        let mut mapped = self.apply(&masked);
        if !held.is_empty() {
            mapped.text = unmask(&mapped.text, &held);
            for conversion in &mut mapped.conversions {
                conversion.from = unmask(&conversion.from, &held);
            }
        }
        mapped
    }

    /// Maps a single declared type such as `VARCHAR2(100)`.
    ///
    /// Returns `None` if no rule matches the declared type.
    #[must_use]
    pub fn map_type(&self, declared: &str) -> Option<String> {
        let mapped = self.apply(declared.trim());
        if mapped.conversions.is_empty() {
            None
        } else {
            Some(mapped.text)
        }
    }

    /// Finds which rule produced `caps` and its non-empty argument list.
    fn matched_rule<'t>(&self, caps: &Captures<'t>) -> Option<(&TypeRule, Option<&'t str>)> {
        self.rules.iter().enumerate().find_map(|(i, rule)| {
            caps.get(2 * i + 1)?;
            let args = caps
                .get(2 * i + 2)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty());
            Some((rule, args))
        })
    }
}

static LENGTH_SEMANTICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:CHAR|BYTE)\s*\)").expect("static length semantics pattern compiles")
});

/// Normalizes a carried `(size)` qualifier: whitespace is dropped along with
/// Oracle's `CHAR`/`BYTE` length semantics, so `( 10 CHAR)` becomes `(10)`.
fn size_suffix(args: &str) -> String {
    LENGTH_SEMANTICS
        .replace(args, ")")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{1}(\\d+)\u{1}").expect("static placeholder pattern compiles"));

fn unmask(text: &str, held: &[&str]) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| held.get(i))
                .map_or_else(|| caps[0].to_string(), |original| (*original).to_string())
        })
        .into_owned()
}

/// Keywords after which a bare word names a table or column, never a type.
const IDENTIFIER_CONTEXT: &[&str] = &[
    "TABLE",
    "FROM",
    "JOIN",
    "INTO",
    "UPDATE",
    "REFERENCES",
    "INDEX",
    "ON",
    "SELECT",
    "WHERE",
    "AND",
    "OR",
    "BY",
    "SET",
];

/// Returns true if the word at `text[start..end]` stands in identifier
/// position.
///
/// A word is an identifier when it is qualified (`t.date`, `date.x`), follows
/// one of [`IDENTIFIER_CONTEXT`], or follows `(` or `,` directly: a type
/// always has its column or parameter name in front of it, so the word is a
/// column definition, a key, index or argument list entry. At the start of
/// text the word is an identifier when another word or a list separator
/// follows.
fn is_identifier_position(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].trim_end();
    let after = text[end..].trim_start();

    if before.ends_with('.') || after.starts_with('.') {
        return true;
    }
    if before.ends_with('(') || before.ends_with(',') {
        return true;
    }

    let previous_word: String = before
        .chars()
        .rev()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if !previous_word.is_empty() {
        return IDENTIFIER_CONTEXT
            .iter()
            .any(|kw| kw.eq_ignore_ascii_case(&previous_word));
    }

    before.is_empty()
        && after.chars().next().is_some_and(|c| {
            c.is_alphabetic() || c == '_' || c == '"' || c == ',' || c == ')'
        })
}

static ORACLE_TO_POSTGRES: LazyLock<TypeMapper> = LazyLock::new(|| {
    TypeMapper::new(oracle::TO_POSTGRES.iter().copied())
        .expect("static Oracle type rules compile")
});

static MYSQL_TO_POSTGRES: LazyLock<TypeMapper> = LazyLock::new(|| {
    TypeMapper::new(mysql::TO_POSTGRES.iter().copied()).expect("static MySQL type rules compile")
});

/// Oracle to PostgreSQL type mapper.
#[must_use]
pub fn oracle_to_postgres() -> &'static TypeMapper {
    &ORACLE_TO_POSTGRES
}

/// MySQL to PostgreSQL type mapper.
#[must_use]
pub fn mysql_to_postgres() -> &'static TypeMapper {
    &MYSQL_TO_POSTGRES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle(text: &str) -> String {
        oracle_to_postgres().apply(text).text
    }

    fn mysql(text: &str) -> String {
        mysql_to_postgres().apply(text).text
    }

    #[test]
    fn test_convert_leaves_literals_and_comments() {
        let mapped = oracle_to_postgres()
            .convert("kind VARCHAR2(10) DEFAULT 'NUMBER', -- DATE column\n\"LONG\" DATE");
        assert_eq!(
            mapped.text,
            "kind VARCHAR(10) DEFAULT 'NUMBER', -- DATE column\n\"LONG\" TIMESTAMP"
        );
        assert_eq!(mapped.conversions.len(), 2);

        let mapped = mysql_to_postgres().convert("kind ENUM('a', 'b') DEFAULT 'a'");
        assert_eq!(mapped.text, "kind VARCHAR(255) DEFAULT 'a'");
        assert_eq!(mapped.conversions[0].from, "ENUM('a', 'b')");
    }

    #[test]
    fn test_rules_sorted_longest_first() {
        let rules = oracle_to_postgres().rules();
        for pair in rules.windows(2) {
            assert!(pair[0].source.len() >= pair[1].source.len());
        }
        let pos = |s: &str| rules.iter().position(|r| r.source == s).unwrap();
        assert!(pos("NUMBER(10)") < pos("NUMBER"));
        assert!(pos("LONG RAW") < pos("LONG"));
    }

    #[test]
    fn test_precision_forms_win_over_generic_number() {
        assert_eq!(oracle("NUMBER(10)"), "INTEGER");
        assert_eq!(oracle("NUMBER(19)"), "BIGINT");
        assert_eq!(oracle("NUMBER(1)"), "BOOLEAN");
        assert_eq!(oracle("NUMBER(10,2)"), "DECIMAL(10,2)");
        assert_eq!(oracle("NUMBER( 10 , 2 )"), "DECIMAL(10,2)");
        assert_eq!(oracle("NUMBER"), "NUMERIC");
        assert_eq!(oracle("NUMBER(12,4)"), "DECIMAL(12,4)");
        assert_eq!(oracle("NUMBER( 12 , 4 )"), "DECIMAL(12,4)");
        assert_eq!(oracle("NUMBER(5)"), "NUMERIC(5)");
    }

    #[test]
    fn test_size_qualifier_is_preserved() {
        assert_eq!(oracle("VARCHAR2(100)"), "VARCHAR(100)");
        assert_eq!(oracle("nvarchar2 (50)"), "VARCHAR(50)");
        assert_eq!(oracle("TIMESTAMP(6)"), "TIMESTAMP(6)");
    }

    #[test]
    fn test_length_semantics_are_dropped() {
        assert_eq!(oracle("VARCHAR2(10 CHAR)"), "VARCHAR(10)");
        assert_eq!(oracle("name NVARCHAR2(40 byte)"), "name VARCHAR(40)");
        assert_eq!(oracle("code CHAR( 2 )"), "code CHAR(2)");
    }

    #[test]
    fn test_precision_inside_multi_word_types() {
        assert_eq!(
            oracle("TIMESTAMP(6) WITH LOCAL TIME ZONE"),
            "TIMESTAMPTZ(6)"
        );
        assert_eq!(oracle("created TIMESTAMP (3) WITH TIME ZONE"), "created TIMESTAMPTZ(3)");
    }

    #[test]
    fn test_unsized_targets_drop_source_qualifier() {
        assert_eq!(oracle("RAW(16)"), "BYTEA");
        assert_eq!(mysql("INT(11)"), "INTEGER");
        assert_eq!(mysql("TINYINT(1)"), "BOOLEAN");
        assert_eq!(mysql("TINYINT(4)"), "SMALLINT");
        assert_eq!(mysql("ENUM('a','b')"), "VARCHAR(255)");
        assert_eq!(mysql("status SET('x','y')"), "status VARCHAR(255)");
    }

    #[test]
    fn test_args_only_rules_ignore_bare_keyword() {
        assert_eq!(
            mysql("UPDATE t SET a = 1"),
            "UPDATE t SET a = 1",
            "SET keyword must not become a type"
        );
    }

    #[test]
    fn test_multi_word_types() {
        assert_eq!(oracle("TIMESTAMP WITH TIME ZONE"), "TIMESTAMPTZ");
        assert_eq!(oracle("TIMESTAMP WITH LOCAL TIME ZONE"), "TIMESTAMPTZ");
        assert_eq!(oracle("LONG RAW"), "BYTEA");
        assert_eq!(oracle("INTERVAL DAY TO SECOND"), "INTERVAL");
    }

    #[test]
    fn test_single_pass_does_not_rescan_output() {
        assert_eq!(mysql("DOUBLE"), "DOUBLE PRECISION");
        assert_eq!(mysql("DOUBLE PRECISION"), "DOUBLE PRECISION");
        assert_eq!(oracle("DATE"), "TIMESTAMP");
    }

    #[test]
    fn test_column_definition_context() {
        assert_eq!(
            oracle("(date DATE, long_note LONG, raw RAW(16))"),
            "(date TIMESTAMP, long_note TEXT, raw BYTEA)"
        );
        assert_eq!(oracle("SELECT t.date FROM t"), "SELECT t.date FROM t");
        assert_eq!(oracle("SELECT a, date FROM t"), "SELECT a, date FROM t");
    }

    #[test]
    fn test_identifiers_ending_a_list_are_kept() {
        assert_eq!(oracle("PRIMARY KEY (date)"), "PRIMARY KEY (date)");
        assert_eq!(oracle("INSERT INTO ev (id, date)"), "INSERT INTO ev (id, date)");
        assert_eq!(oracle("SELECT MAX(date) FROM ev"), "SELECT MAX(date) FROM ev");
        assert_eq!(mysql("UNIQUE (year, time)"), "UNIQUE (year, time)");
        assert_eq!(oracle("CHECK (date > SYSDATE)"), "CHECK (date > SYSDATE)");
    }

    #[test]
    fn test_conversions_are_recorded() {
        let mapped = oracle_to_postgres().apply("id NUMBER(10), name VARCHAR2(80)");
        assert_eq!(mapped.text, "id INTEGER, name VARCHAR(80)");
        assert_eq!(
            mapped.conversions,
            vec![
                TypeConversion {
                    from: "NUMBER(10)".into(),
                    to: "INTEGER".into()
                },
                TypeConversion {
                    from: "VARCHAR2(80)".into(),
                    to: "VARCHAR(80)".into()
                },
            ]
        );
    }

    #[test]
    fn test_map_type() {
        assert_eq!(
            oracle_to_postgres().map_type("CLOB"),
            Some("TEXT".to_string())
        );
        assert_eq!(oracle_to_postgres().map_type("GEOMETRY"), None);
        assert_eq!(
            mysql_to_postgres().map_type("JSON"),
            Some("JSONB".to_string())
        );
    }

    #[test]
    fn test_every_rule_maps_in_isolation() {
        for mapper in [oracle_to_postgres(), mysql_to_postgres()] {
            for rule in mapper.rules() {
                if rule.scaled {
                    let mapped = mapper.apply(&format!("{}(12,4)", rule.source)).text;
                    assert_eq!(mapped, format!("{}(12,4)", rule.target), "rule {rule:?}");
                    continue;
                }
                let input = if rule.requires_args {
                    format!("{}('a')", rule.source)
                } else {
                    rule.source.to_string()
                };
                assert_eq!(mapper.apply(&input).text, rule.target, "rule {rule:?}");
            }
        }
    }

    #[test]
    fn test_size_suffix_kept_only_for_sized_rules() {
        for mapper in [oracle_to_postgres(), mysql_to_postgres()] {
            for rule in mapper.rules() {
                if rule.source_has_args() || rule.scaled || rule.is_multi_word() {
                    continue;
                }
                let mapped = mapper.apply(&format!("x {}(42)", rule.source)).text;
                let expected = if rule.keeps_size() {
                    format!("x {}(42)", rule.target)
                } else {
                    format!("x {}", rule.target)
                };
                assert_eq!(mapped, expected, "rule {rule:?}");
            }
        }
    }
}
