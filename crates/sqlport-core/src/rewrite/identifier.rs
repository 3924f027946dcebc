//! Table and column renaming.
//!
//! Renaming is textual: every whole-word, case-insensitive occurrence of an
//! old name in code or in a quoted identifier is replaced. Tables are renamed
//! first, then columns, each in a single pass so that `a -> b, b -> c` never
//! chains into `a -> c`.

use std::collections::{BTreeMap, HashMap};

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::dialect::DialectPair;
use crate::error::Result;
use crate::schema::SqlTransformation;
use crate::source::{rewrite_segments, SegmentKind};

/// Replaces a fixed set of words in one pass.
#[derive(Debug)]
pub struct WordReplacer {
    matcher: Option<Regex>,
    targets: HashMap<String, String>,
}

impl WordReplacer {
    /// Builds a replacer. Empty words are ignored; when a word appears twice
    /// (ignoring case) the first pair wins.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TranspileError::Pattern`] if the combined pattern
    /// exceeds the regex engine's size limits.
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut targets = HashMap::new();
        for (old, new) in pairs {
            if old.is_empty() {
                continue;
            }
            targets
                .entry(old.to_lowercase())
                .or_insert_with(|| new.to_string());
        }
        if targets.is_empty() {
            return Ok(Self {
                matcher: None,
                targets,
            });
        }

        let mut words: Vec<&String> = targets.keys().collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = Regex::new(&format!("(?i)(?:{alternation})"))?;

        Ok(Self {
            matcher: Some(matcher),
            targets,
        })
    }

    /// Returns true if there is nothing to replace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Replaces every whole-word occurrence and returns the new text with the
    /// number of replacements made.
    #[must_use]
    pub fn replace(&self, text: &str) -> (String, usize) {
        let Some(matcher) = &self.matcher else {
            return (text.to_string(), 0);
        };
        let mut count = 0;
        let replaced = matcher.replace_all(text, |caps: &Captures<'_>| {
            let Some(found) = caps.get(0) else {
                return String::new();
            };
            if !is_whole_word(text, found.start(), found.end()) {
                return found.as_str().to_string();
            }
            match self.targets.get(&found.as_str().to_lowercase()) {
                Some(target) => {
                    count += 1;
                    target.clone()
                }
                None => found.as_str().to_string(),
            }
        });
        (replaced.into_owned(), count)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#')
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let joined_before = text[..start].chars().next_back().is_some_and(is_identifier_char);
    let joined_after = text[end..].chars().next().is_some_and(is_identifier_char);
    !joined_before && !joined_after
}

/// Output of [`IdentifierRewriter::rewrite`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renamed {
    /// Rewritten text.
    pub text: String,
    /// One record per table rename, with the column renames applied to it.
    pub transformations: Vec<SqlTransformation>,
    /// `old -> new` labels, one per table rename.
    pub tables_converted: Vec<String>,
    /// Conflicting column renames that were not applied.
    pub warnings: Vec<String>,
}

/// Renames tables and columns according to an entity mapping.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierRewriter<'a> {
    tables: &'a BTreeMap<String, String>,
    columns: &'a BTreeMap<String, BTreeMap<String, String>>,
}

impl<'a> IdentifierRewriter<'a> {
    /// Creates a rewriter from a table map (old to new) and a per-table column
    /// map (table to old to new). Column maps are keyed by the original table
    /// name.
    #[must_use]
    pub const fn new(
        tables: &'a BTreeMap<String, String>,
        columns: &'a BTreeMap<String, BTreeMap<String, String>>,
    ) -> Self {
        Self { tables, columns }
    }

    /// Applies the table renames, then the column renames, to `sql`.
    ///
    /// Column renames are global: the same old column name is replaced
    /// everywhere. When two tables map one column name to different targets,
    /// the first table in map order wins and the other is reported.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TranspileError::Pattern`] if a rename pattern cannot
    /// be compiled.
    pub fn rewrite(&self, sql: &str, pair: DialectPair) -> Result<Renamed> {
        let tag = pair.tag();
        let mut transformations: Vec<SqlTransformation> = Vec::new();
        let mut tables_converted = Vec::new();
        for (old, new) in self.tables.iter().filter(|(old, _)| !old.is_empty()) {
            transformations.push(SqlTransformation::new(old, new, tag.as_str()));
            tables_converted.push(format!("{old} -> {new}"));
        }

        let tables = WordReplacer::new(
            self.tables
                .iter()
                .map(|(old, new)| (old.as_str(), new.as_str())),
        )?;
        let (text, table_hits) = replace_identifiers(sql, &tables);
        debug!(
            stage = "tables",
            renames = transformations.len(),
            replaced = table_hits,
            "renamed tables"
        );

        let mut warnings = Vec::new();
        let mut accepted: Vec<(&str, &str)> = Vec::new();
        let mut owner: HashMap<String, (&str, &str)> = HashMap::new();
        for (table, mapping) in self.columns {
            for (old, new) in mapping.iter().filter(|(old, _)| !old.is_empty()) {
                let key = old.to_lowercase();
                if let Some((first_new, first_table)) = owner.get(&key) {
                    if *first_new != new.as_str() {
                        let message = format!(
                            "Column '{old}' of table '{table}' maps to '{new}', but '{first_new}' \
                             from table '{first_table}' already applies"
                        );
                        warn!("{message}");
                        warnings.push(message);
                    }
                    continue;
                }
                owner.insert(key, (new.as_str(), table.as_str()));
                accepted.push((old.as_str(), new.as_str()));
                if let Some(transformation) = transformations
                    .iter_mut()
                    .find(|t| t.original_table.eq_ignore_ascii_case(table))
                {
                    transformation
                        .column_mappings
                        .insert(old.clone(), new.clone());
                }
            }
        }

        let columns = WordReplacer::new(accepted)?;
        let (text, column_hits) = replace_identifiers(&text, &columns);
        debug!(stage = "columns", replaced = column_hits, "renamed columns");

        Ok(Renamed {
            text,
            transformations,
            tables_converted,
            warnings,
        })
    }
}

fn replace_identifiers(sql: &str, replacer: &WordReplacer) -> (String, usize) {
    if replacer.is_empty() {
        return (sql.to_string(), 0);
    }
    let mut hits = 0;
    let text = rewrite_segments(
        sql,
        |kind| matches!(kind, SegmentKind::Code | SegmentKind::QuotedIdentifier),
        |segment| {
            let (out, count) = replacer.replace(segment);
            hits += count;
            out
        },
    );
    (text, hits)
}
