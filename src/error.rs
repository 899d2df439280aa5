//! The one failure mode the core contract recognizes: a sequence too long
//! for the chosen state-index width. Everything else is total.

/// Errors produced by GASPRA's core operations.
///
/// I/O failures and encoding problems are the concern of external
/// collaborators (a CLI front-end, a file reader) and never appear here.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum GaspraError {
    /// The indexed sequence is longer than the chosen `StateId` can address.
    ///
    /// A suffix automaton over a sequence of length `n` needs up to
    /// `2n - 1` states; construction is rejected up front rather than
    /// silently wrapping indices.
    #[error("sequence of length {len} exceeds the capacity of the chosen state index (max {max})")]
    InputTooLarge { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, GaspraError>;
