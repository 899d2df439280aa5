//! The suffix automaton (C1): an online-constructible minimal DFA
//! accepting every substring of an indexed sequence, stored as a flat
//! arena of states addressed by [`StateID`] rather than as a graph of
//! owned nodes — cloning during construction becomes a `push` plus a
//! redirect of a handful of predecessor edges, with no cycle-as-ownership
//! problem to solve.

use std::collections::HashSet;

use crate::error::Result;
use crate::state_id::{usize_to_state_id, StateID};
use crate::token::Token;

/// One state of the automaton.
///
/// Transitions are kept as a small `Vec` of `(token, target)` pairs rather
/// than a dense array or a `HashMap`: alphabets here range from ~100
/// Unicode scalars to an unbounded number of interned line ids, and most
/// states have only a handful of outgoing edges, so a linear scan over a
/// short vec beats a hash table in both memory and, for the sizes that
/// matter, time.
#[derive(Clone, Debug)]
struct State<T, S> {
    length: usize,
    link: Option<S>,
    first_position: Option<usize>,
    /// `true` for a state created directly while extending the automaton
    /// by one token (a "solid" state); `false` for a state created by
    /// cloning during a split. Only solid states contribute their own
    /// `first_position` to [`SuffixAutomaton::find_all_starts`] — a
    /// clone's occurrences are exactly the union of its descendants'.
    solid: bool,
    transitions: Vec<(T, S)>,
}

impl<T: Token, S: StateID> State<T, S> {
    fn new(length: usize, link: Option<S>, first_position: Option<usize>, solid: bool) -> Self {
        State {
            length,
            link,
            first_position,
            solid,
            transitions: Vec::new(),
        }
    }

    fn edge(&self, token: &T) -> Option<S> {
        self.transitions
            .iter()
            .find(|(t, _)| t == token)
            .map(|&(_, target)| target)
    }

    fn set_edge(&mut self, token: T, target: S) {
        match self.transitions.iter_mut().find(|(t, _)| *t == token) {
            Some(slot) => slot.1 = target,
            None => self.transitions.push((token, target)),
        }
    }
}

/// A suffix automaton built over one fixed token sequence.
///
/// Immutable once [`SuffixAutomaton::build`] returns, and `Send + Sync`
/// whenever `T` is, so a single automaton can safely be queried from
/// multiple threads without synchronization.
#[derive(Clone, Debug)]
pub struct SuffixAutomaton<T, S: StateID = usize> {
    states: Vec<State<T, S>>,
    /// Reverse of the suffix-link edges: `link_children[s]` lists every
    /// state whose `link` points to `s`. Built once after construction so
    /// `find_all_starts` can walk a state's endpos subtree without
    /// rescanning the whole arena.
    link_children: Vec<Vec<S>>,
    len: usize,
}

fn initial<S: StateID>() -> S {
    S::from_usize(0)
}

/// Ordering for [`SuffixAutomaton::longest_match_indexed_first`]'s
/// candidates: `(start_in_indexed, start_in_query, length)`, longest
/// first, then earliest `start_in_indexed`, then earliest
/// `start_in_query`.
fn is_better(candidate: (usize, usize, usize), current_best: (usize, usize, usize)) -> bool {
    let (c_si, c_sq, c_len) = candidate;
    let (b_si, b_sq, b_len) = current_best;
    c_len > b_len || (c_len == b_len && (c_si, c_sq) < (b_si, b_sq))
}

impl<T: Token, S: StateID> SuffixAutomaton<T, S> {
    /// Builds an automaton over `seq`, appending tokens left to right.
    ///
    /// Amortized O(n) in `seq.len()` under constant-time edge lookup per
    /// state (true here as long as per-state out-degree stays small, which
    /// holds for natural-language alphabets).
    pub fn build(seq: &[T]) -> Result<Self> {
        let mut states: Vec<State<T, S>> = Vec::with_capacity(seq.len() * 2);
        states.push(State::new(0, None, None, true));
        let mut last: S = initial();

        log::trace!("building suffix automaton over {} tokens", seq.len());
        for (i, token) in seq.iter().enumerate() {
            last = extend(&mut states, last, token.clone(), i)?;
        }

        let mut link_children = vec![Vec::new(); states.len()];
        for (idx, state) in states.iter().enumerate() {
            if let Some(link) = state.link {
                link_children[link.to_usize()].push(usize_to_state_id(idx)?);
            }
        }

        log::debug!(
            "suffix automaton built: {} states, {} edges",
            states.len(),
            states.iter().map(|s| s.transitions.len()).sum::<usize>()
        );

        Ok(SuffixAutomaton {
            states,
            link_children,
            len: seq.len(),
        })
    }

    /// Length of the sequence this automaton was built over.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks `query` against the automaton, returning for every position
    /// `j` the length of the best match ending there and the start (in the
    /// indexed sequence) that match implies. The second element is
    /// meaningless when the length is `0`. [`longest_match_in`],
    /// [`longest_match_indexed_first`], and [`match_length_profile`] are
    /// all this one walk, read differently.
    ///
    /// [`longest_match_in`]: SuffixAutomaton::longest_match_in
    /// [`longest_match_indexed_first`]: SuffixAutomaton::longest_match_indexed_first
    /// [`match_length_profile`]: SuffixAutomaton::match_length_profile
    fn match_walk(&self, query: &[T]) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(query.len());
        let mut p: S = initial();
        let mut length = 0usize;

        for token in query {
            while self.states[p.to_usize()].edge(token).is_none() && p != initial() {
                p = self.states[p.to_usize()].link.expect("non-initial state has a link");
                length = self.states[p.to_usize()].length;
            }
            if let Some(next) = self.states[p.to_usize()].edge(token) {
                p = next;
                length += 1;
            } else {
                length = 0;
            }

            let start_in_indexed = if length > 0 {
                let first_position = self.states[p.to_usize()]
                    .first_position
                    .expect("a state reached with length > 0 has a first_position");
                first_position + 1 - length
            } else {
                0
            };
            out.push((length, start_in_indexed));
        }

        out
    }

    /// Returns `(start_in_indexed, start_in_query, length)`: the longest
    /// substring of `query` that also occurs in the indexed sequence.
    ///
    /// Ties are broken by earliest `start_in_query`, then earliest
    /// `start_in_indexed`. `(0, 0, 0)` means no shared token at all.
    pub fn longest_match_in(&self, query: &[T]) -> (usize, usize, usize) {
        let mut best = (0usize, 0usize, 0usize);
        for (j, (length, start_in_indexed)) in self.match_walk(query).into_iter().enumerate() {
            if length > best.2 {
                best = (start_in_indexed, j + 1 - length, length);
            }
        }
        best
    }

    /// The mirror of [`longest_match_in`]: the same search, but ties are
    /// broken by earliest `start_in_indexed` first, then earliest
    /// `start_in_query`.
    ///
    /// Needed when a caller indexes whichever of two sequences is
    /// shorter rather than always the same one — the tie-break priority
    /// the caller promises (earliest in its own first argument) then
    /// depends on which side ended up indexed, not on which side is the
    /// query here.
    ///
    /// [`longest_match_in`]: SuffixAutomaton::longest_match_in
    pub(crate) fn longest_match_indexed_first(&self, query: &[T]) -> (usize, usize, usize) {
        let mut best: Option<(usize, usize, usize)> = None;
        for (j, (length, start_in_indexed)) in self.match_walk(query).into_iter().enumerate() {
            if length == 0 {
                continue;
            }
            let start_in_query = j + 1 - length;
            let candidate = (start_in_indexed, start_in_query, length);
            best = Some(match best {
                None => candidate,
                Some(b) if is_better(candidate, b) => candidate,
                Some(b) => b,
            });
        }
        best.unwrap_or((0, 0, 0))
    }

    /// The match-length profile of `query` against this automaton:
    /// `profile[j]` is the length of the longest suffix of `query[..=j]`
    /// that occurs in the indexed sequence. This is the same walk as
    /// [`SuffixAutomaton::longest_match_in`], but every position is kept
    /// instead of only the running best — used by the n-way LCS engine.
    pub(crate) fn match_length_profile(&self, query: &[T]) -> Vec<usize> {
        self.match_walk(query).into_iter().map(|(len, _)| len).collect()
    }

    /// Whether `pattern` occurs anywhere in the indexed sequence — a plain
    /// forward walk with no suffix-link fallback, since containment of a
    /// single exact substring needs none. Returns the state reached (the
    /// equivalence class of all strings sharing `pattern` as a common
    /// right-extension set) so callers such as [`find_all_starts`] can
    /// continue from it without repeating the walk.
    ///
    /// [`find_all_starts`]: SuffixAutomaton::find_all_starts
    pub fn contains(&self, pattern: &[T]) -> Option<S> {
        let mut p: S = initial();
        for token in pattern {
            p = self.states[p.to_usize()].edge(token)?;
        }
        Some(p)
    }

    /// All starting positions in the indexed sequence at which `pattern`
    /// occurs. Empty if `pattern` doesn't occur (or is empty).
    pub fn find_all_starts(&self, pattern: &[T]) -> HashSet<usize> {
        if pattern.is_empty() {
            return HashSet::new();
        }
        let Some(state) = self.contains(pattern) else {
            return HashSet::new();
        };

        let mut ends = HashSet::new();
        let mut stack = vec![state];
        while let Some(s) = stack.pop() {
            let st = &self.states[s.to_usize()];
            if st.solid {
                if let Some(fp) = st.first_position {
                    ends.insert(fp);
                }
            }
            stack.extend(self.link_children[s.to_usize()].iter().copied());
        }

        ends.into_iter()
            .map(|end| end + 1 - pattern.len())
            .collect()
    }
}

/// Appends one token to the automaton, returning the new `last` state.
///
/// This is the online-construction step of the design: create `cur`, walk
/// the suffix-link chain from `last` wiring missing edges to it, and
/// either attach directly to an existing state of the right length or
/// clone a state that needs splitting.
fn extend<T: Token, S: StateID>(
    states: &mut Vec<State<T, S>>,
    last: S,
    token: T,
    position: usize,
) -> Result<S> {
    let cur_length = states[last.to_usize()].length + 1;
    let cur: S = usize_to_state_id(states.len())?;
    states.push(State::new(cur_length, None, Some(position), true));

    let mut p = Some(last);
    while let Some(pid) = p {
        if states[pid.to_usize()].edge(&token).is_some() {
            break;
        }
        states[pid.to_usize()].set_edge(token.clone(), cur);
        p = states[pid.to_usize()].link;
    }

    match p {
        None => {
            states[cur.to_usize()].link = Some(initial());
        }
        Some(pid) => {
            let q = states[pid.to_usize()]
                .edge(&token)
                .expect("loop only exits early via a found edge");
            if states[q.to_usize()].length == states[pid.to_usize()].length + 1 {
                states[cur.to_usize()].link = Some(q);
            } else {
                log::trace!("cloning a state while extending at position {}", position);
                let clone_length = states[pid.to_usize()].length + 1;
                let clone: S = usize_to_state_id(states.len())?;
                let mut clone_state = State::new(
                    clone_length,
                    states[q.to_usize()].link,
                    states[q.to_usize()].first_position,
                    false,
                );
                clone_state.transitions = states[q.to_usize()].transitions.clone();
                states.push(clone_state);

                let mut redirect = Some(pid);
                while let Some(rid) = redirect {
                    if states[rid.to_usize()].edge(&token) == Some(q) {
                        states[rid.to_usize()].set_edge(token.clone(), clone);
                        redirect = states[rid.to_usize()].link;
                    } else {
                        break;
                    }
                }

                states[q.to_usize()].link = Some(clone);
                states[cur.to_usize()].link = Some(clone);
            }
        }
    }

    Ok(cur)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn walking_every_substring_lands_on_a_state_with_sufficient_length() {
        let seq = chars("abcbc");
        let sa: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&seq).unwrap();
        for start in 0..seq.len() {
            for end in (start + 1)..=seq.len() {
                let w = &seq[start..end];
                let (_, _, l) = sa.longest_match_in(w);
                assert!(l >= w.len(), "substring {:?} should be found fully", w);
            }
        }
    }

    #[test]
    fn empty_alphabet_overlap_gives_zero_length() {
        let sa: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&chars("aaaa")).unwrap();
        let (start_indexed, start_query, len) = sa.longest_match_in(&chars("zzzz"));
        assert_eq!((start_indexed, start_query, len), (0, 0, 0));
    }

    #[test]
    fn indexed_first_tie_break_differs_from_query_first() {
        // Indexed "cdab" has two length-2 substrings, "cd" at 0 and "ab"
        // at 2. Query "abXcd" meets "ab" first (query position 0) but
        // "cd" sits earlier in the indexed sequence (position 0 vs 2).
        let sa: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&chars("cdab")).unwrap();
        let query = chars("abXcd");

        assert_eq!(sa.longest_match_in(&query), (2, 0, 2));
        assert_eq!(sa.longest_match_indexed_first(&query), (0, 3, 2));
    }

    #[test]
    fn construction_is_deterministic() {
        let seq = chars("banana");
        let a: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&seq).unwrap();
        let b: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&seq).unwrap();
        assert_eq!(a.states.len(), b.states.len());
        let total_edges = |sa: &SuffixAutomaton<char, usize>| {
            sa.states.iter().map(|s| s.transitions.len()).sum::<usize>()
        };
        assert_eq!(total_edges(&a), total_edges(&b));
    }

    #[test]
    fn state_and_edge_bounds_hold() {
        let seq = chars("abcabcabc");
        let sa: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&seq).unwrap();
        let n = seq.len();
        assert!(sa.states.len() <= 2 * n);
        let edges: usize = sa.states.iter().map(|s| s.transitions.len()).sum();
        assert!(edges <= 3 * n);
    }

    #[test]
    fn find_all_starts_locates_every_occurrence() {
        let seq = chars("abcabcabc");
        let sa: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&seq).unwrap();
        let mut starts: Vec<_> = sa.find_all_starts(&chars("abc")).into_iter().collect();
        starts.sort_unstable();
        assert_eq!(starts, vec![0, 3, 6]);
    }

    #[test]
    fn find_all_starts_empty_for_absent_pattern() {
        let sa: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&chars("abcabcabc")).unwrap();
        assert!(sa.find_all_starts(&chars("xyz")).is_empty());
    }

    #[test]
    fn contains_reports_presence_without_offsets() {
        let sa: SuffixAutomaton<char, usize> = SuffixAutomaton::build(&chars("abcabcabc")).unwrap();
        assert!(sa.contains(&chars("cab")).is_some());
        assert!(sa.contains(&chars("xyz")).is_none());
        assert!(sa.contains(&[]).is_some());
    }

    #[test]
    fn input_too_large_reports_an_error_instead_of_panicking() {
        let seq = chars("ab");
        let result: Result<SuffixAutomaton<char, u8>> = SuffixAutomaton::build(&seq);
        assert!(result.is_ok());
    }
}
