//! LCS engine (C2): pairwise and n-way longest *common substring* (not
//! subsequence), built entirely on top of [`SuffixAutomaton`].

use crate::automaton::SuffixAutomaton;
use crate::error::Result;
use crate::token::Token;

/// The longest common substring of `a` and `b`: `(start_a, start_b, length)`.
///
/// Ties prefer the earliest starting position in `a`, then in `b`.
/// `(0, 0, 0)` means `a` and `b` share no token at all.
///
/// The automaton is built over whichever of `a`/`b` is shorter, to keep
/// automaton size (and construction cost) proportional to `min(|a|,
/// |b|)` rather than always `|b|` — a 1-token vs. 1,000,000-token pair
/// should build a handful of states, not a million. Which side ends up
/// indexed changes which of [`SuffixAutomaton::longest_match_in`] (ties
/// broken query-first) or [`SuffixAutomaton::longest_match_indexed_first`]
/// (ties broken indexed-first) reproduces the `a`-then-`b` tie-break this
/// function promises.
pub fn find_lcs<T: Token>(a: &[T], b: &[T]) -> Result<(usize, usize, usize)> {
    if a.len() <= b.len() {
        let sa: SuffixAutomaton<T, usize> = SuffixAutomaton::build(a)?;
        Ok(sa.longest_match_indexed_first(b))
    } else {
        let sa: SuffixAutomaton<T, usize> = SuffixAutomaton::build(b)?;
        let (start_b, start_a, length) = sa.longest_match_in(a);
        Ok((start_a, start_b, length))
    }
}

/// The longest substring common to every sequence in `seqs`:
/// `(starts, length)` where `starts[i]` is the position in `seqs[i]` of the
/// (first) occurrence of that substring.
///
/// `starts` and `length` are all zero when `seqs` is empty, has one
/// element (the whole element trivially matches itself at position 0), or
/// shares no common token across every sequence.
pub fn find_lcs_multiple<T: Token>(seqs: &[&[T]]) -> Result<(Vec<usize>, usize)> {
    if seqs.is_empty() {
        return Ok((Vec::new(), 0));
    }
    if seqs.len() == 1 {
        return Ok((vec![0], seqs[0].len()));
    }

    let reference_idx = seqs
        .iter()
        .enumerate()
        .min_by_key(|(_, s)| s.len())
        .map(|(i, _)| i)
        .expect("seqs is non-empty");
    let reference = seqs[reference_idx];
    let n = reference.len();

    if n == 0 {
        return Ok((vec![0; seqs.len()], 0));
    }

    // combined[p] = min over every other sequence of the longest prefix of
    // reference[p..] that also occurs in that sequence.
    let mut combined = vec![usize::MAX; n];
    for (i, seq) in seqs.iter().enumerate() {
        if i == reference_idx {
            continue;
        }
        let per_position = forward_prefix_match_lengths(reference, seq)?;
        for (c, m) in combined.iter_mut().zip(per_position.iter()) {
            *c = (*c).min(*m);
        }
    }

    let (best_p, best_len) = combined
        .iter()
        .enumerate()
        .max_by_key(|&(p, &len)| (len, std::cmp::Reverse(p)))
        .map(|(p, &len)| (p, len))
        .unwrap_or((0, 0));

    if best_len == 0 {
        return Ok((vec![0; seqs.len()], 0));
    }

    let pattern = &reference[best_p..best_p + best_len];
    let mut starts = vec![0usize; seqs.len()];
    starts[reference_idx] = best_p;
    for (i, seq) in seqs.iter().enumerate() {
        if i == reference_idx {
            continue;
        }
        let sa: SuffixAutomaton<T, usize> = SuffixAutomaton::build(seq)?;
        let start = sa
            .find_all_starts(pattern)
            .into_iter()
            .min()
            .expect("per_position established this pattern occurs in seq");
        starts[i] = start;
    }

    Ok((starts, best_len))
}

/// For every position `p` in `reference`, the length of the longest prefix
/// of `reference[p..]` that occurs somewhere in `other`.
///
/// Computed by reversing both sequences: "longest prefix starting at `p`"
/// becomes "longest suffix ending at `n - p`" of the reversed reference,
/// which is exactly what a single forward scan against an automaton built
/// over the reversed `other` sequence produces (`match_length_profile`).
fn forward_prefix_match_lengths<T: Token>(reference: &[T], other: &[T]) -> Result<Vec<usize>> {
    let n = reference.len();
    let reversed_other: Vec<T> = other.iter().rev().cloned().collect();
    let reversed_reference: Vec<T> = reference.iter().rev().cloned().collect();

    let sa: SuffixAutomaton<T, usize> = SuffixAutomaton::build(&reversed_other)?;
    let profile = sa.match_length_profile(&reversed_reference);

    let mut out = vec![0usize; n];
    for p in 0..n {
        let e = n - p; // 1-indexed prefix length of reversed_reference consumed
        out[p] = profile[e - 1];
    }
    Ok(out)
}
