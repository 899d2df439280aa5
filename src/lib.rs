//! A suffix-automaton-backed text diff and three-way merge library.
//!
//! Five pieces build on one another, leaves first:
//!
//! - [`automaton`] — an online-constructible suffix automaton over any
//!   `Clone + Eq + Hash` token sequence.
//! - [`lcs`] — pairwise and n-way longest common *substring*, built
//!   entirely on the automaton.
//! - [`diff`] — a two-sequence diff, decomposed recursively around
//!   successive longest common substrings.
//! - [`merge`] — a three-way merge of two diffs against a common
//!   ancestor, built on top of [`diff`].
//! - [`token`] — the token abstraction and a reference line-interning
//!   tokenizer.
//!
//! None of the core engines know what a token *means* — `char` and
//! interned [`token::LineId`]s both flow through the same code paths.

pub mod automaton;
pub mod diff;
pub mod error;
pub mod lcs;
pub mod merge;
mod state_id;
pub mod token;

pub use automaton::SuffixAutomaton;
pub use diff::{diff as diff_sequences, ChangeStream, DiffOp};
pub use error::{GaspraError, Result};
pub use lcs::{find_lcs, find_lcs_multiple};
pub use merge::{merge as merge_sequences, MergedOp, MergedStream};
pub use token::{chars, graphemes, LineId, LineInterner, Token};
