//! Textual rewrite stages.
//!
//! Each stage is a pure function of its input text. Stages that rewrite SQL
//! vocabulary run on code segments only (see [`crate::source`]).

pub mod cleanup;
pub mod identifier;
pub mod sequence;
pub mod syntax;

pub use cleanup::cleanup;
pub use identifier::{IdentifierRewriter, Renamed, WordReplacer};
pub use sequence::{convert_sequences, SequenceColumn};
pub use syntax::{audit_oracle, RewriteRule, SyntaxRewriter};
