//! Merge engine (C4): three-way merge of an ancestor sequence against two
//! independent edits, built on top of [`diff`].
//!
//! Both edits are first diffed against the ancestor, re-expressed as lists
//! of operations anchored to ancestor ranges, then walked together with a
//! two-pointer sweep. Disjoint edits pass straight through; edits whose
//! ancestor ranges genuinely overlap are fused into a single conflict
//! covering their union, per the design's "consume up to the least common
//! right boundary" rule.

use crate::diff::{coalesce, diff, ChangeStream, DiffOp};
use crate::error::Result;
use crate::token::Token;

/// One element of a merged change stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergedOp<T> {
    /// An unchanged slice of the ancestor sequence.
    Run(Vec<T>),
    /// A non-conflicting `(insert, delete)` edit, exactly as in a
    /// [`DiffOp::Change`].
    Change(Vec<T>, Vec<T>),
    /// Two irreconcilable interpretations of the same ancestor range.
    Conflict(ChangeStream<T>, ChangeStream<T>),
}

/// An ordered mix of runs, changes, and conflicts, as produced by [`merge`].
pub type MergedStream<T> = Vec<MergedOp<T>>;

/// One operation anchored to a half-open range of the ancestor sequence:
/// either a run (content is implicitly `ancestor[lo..hi]`) or a change
/// (content is `insert`, occupying a `hi - lo`-token slice of the
/// ancestor it replaces).
struct Op<T> {
    lo: usize,
    hi: usize,
    insert: Option<Vec<T>>,
}

impl<T> Op<T> {
    fn is_change(&self) -> bool {
        self.insert.is_some()
    }
}

fn to_ops<T: Token>(stream: &ChangeStream<T>) -> Vec<Op<T>> {
    let mut ops = Vec::with_capacity(stream.len());
    let mut pos = 0usize;
    for op in stream {
        match op {
            DiffOp::Run(run) => {
                let len = run.len();
                ops.push(Op {
                    lo: pos,
                    hi: pos + len,
                    insert: None,
                });
                pos += len;
            }
            DiffOp::Change(insert, delete) => {
                let len = delete.len();
                ops.push(Op {
                    lo: pos,
                    hi: pos + len,
                    insert: Some(insert.clone()),
                });
                pos += len;
            }
        }
    }
    ops
}

/// Three-way merges `a` and `b` against their common ancestor.
///
/// Every input triple produces some merged stream; nothing here is
/// fallible beyond the automaton's own `InputTooLarge` (propagated through
/// the two internal `diff` calls).
pub fn merge<T: Token>(ancestor: &[T], a: &[T], b: &[T]) -> Result<MergedStream<T>> {
    let d_a = diff(ancestor, a)?;
    let d_b = diff(ancestor, b)?;
    let mut ops_a = to_ops(&d_a);
    let mut ops_b = to_ops(&d_b);

    let mut ia = 0usize;
    let mut ib = 0usize;
    let mut pos = 0usize;
    let mut out: MergedStream<T> = Vec::new();

    while ia < ops_a.len() || ib < ops_b.len() {
        match (ops_a.get(ia), ops_b.get(ib)) {
            (None, None) => break,
            (Some(_), None) => {
                out.push(op_as_merged(&ops_a[ia], ancestor));
                ia += 1;
            }
            (None, Some(_)) => {
                out.push(op_as_merged(&ops_b[ib], ancestor));
                ib += 1;
            }
            (Some(a_op), Some(b_op)) => match (a_op.is_change(), b_op.is_change()) {
                (false, false) => {
                    let end = a_op.hi.min(b_op.hi);
                    out.push(MergedOp::Run(ancestor[pos..end].to_vec()));
                    pos = end;
                    if pos == ops_a[ia].hi {
                        ia += 1;
                    }
                    if pos == ops_b[ib].hi {
                        ib += 1;
                    }
                }
                (false, true) if b_op.hi <= a_op.hi => {
                    let insert = b_op.insert.clone().expect("is_change");
                    out.push(MergedOp::Change(insert, ancestor[b_op.lo..b_op.hi].to_vec()));
                    pos = b_op.hi;
                    if pos == ops_a[ia].hi {
                        ia += 1;
                    }
                    ib += 1;
                }
                (true, false) if a_op.hi <= b_op.hi => {
                    let insert = a_op.insert.clone().expect("is_change");
                    out.push(MergedOp::Change(insert, ancestor[a_op.lo..a_op.hi].to_vec()));
                    pos = a_op.hi;
                    ia += 1;
                    if pos == ops_b[ib].hi {
                        ib += 1;
                    }
                }
                _ => {
                    let (merged_op, new_pos) =
                        resolve_overlap(ancestor, &mut ops_a, &mut ia, &mut ops_b, &mut ib, pos);
                    out.push(merged_op);
                    pos = new_pos;
                }
            },
        }
    }

    Ok(coalesce_merged(out))
}

fn op_as_merged<T: Token>(op: &Op<T>, ancestor: &[T]) -> MergedOp<T> {
    match &op.insert {
        Some(insert) => MergedOp::Change(insert.clone(), ancestor[op.lo..op.hi].to_vec()),
        None => MergedOp::Run(ancestor[op.lo..op.hi].to_vec()),
    }
}

/// Fuses one or more overlapping operations from both sides into a single
/// conflict, expanding the ancestor range until neither side has a change
/// extending past it ("consumed up to the least common right boundary").
///
/// Runs that only partially fall inside the fused range are split in
/// place — unlike changes, a run has no atomic content, so only the
/// overlapping prefix is absorbed and the remainder is left for the next
/// iteration of [`merge`]'s main loop.
fn resolve_overlap<T: Token>(
    ancestor: &[T],
    ops_a: &mut [Op<T>],
    ia: &mut usize,
    ops_b: &mut [Op<T>],
    ib: &mut usize,
    pos: usize,
) -> (MergedOp<T>, usize) {
    let mut hi = pos;
    if let Some(op) = ops_a.get(*ia) {
        if op.is_change() {
            hi = hi.max(op.hi);
        }
    }
    if let Some(op) = ops_b.get(*ib) {
        if op.is_change() {
            hi = hi.max(op.hi);
        }
    }

    let mut consumed_a = Vec::new();
    let mut consumed_b = Vec::new();

    loop {
        let mut grew = false;
        hi = absorb(ops_a, ia, hi, &mut consumed_a, &mut grew);
        hi = absorb(ops_b, ib, hi, &mut consumed_b, &mut grew);
        if !grew {
            break;
        }
    }

    let alt_a = coalesce(to_diff_ops(consumed_a, ancestor));
    let alt_b = coalesce(to_diff_ops(consumed_b, ancestor));

    let merged_op = match (alt_a.as_slice(), alt_b.as_slice()) {
        ([DiffOp::Change(ia_insert, _)], [DiffOp::Change(ib_insert, _)]) if ia_insert == ib_insert => {
            MergedOp::Change(ia_insert.clone(), ancestor[pos..hi].to_vec())
        }
        _ => {
            log::debug!(
                "merge conflict over ancestor range {}..{} ({} vs {} fragments)",
                pos,
                hi,
                alt_a.len(),
                alt_b.len()
            );
            MergedOp::Conflict(alt_a, alt_b)
        }
    };

    (merged_op, hi)
}

/// Consumes every op on one side whose ancestor range starts before `hi`,
/// growing `hi` to cover any change that straddles it and splitting (not
/// consuming) a run that straddles it. Returns the (possibly grown) `hi`.
///
/// A zero-width change (a pure insertion) sitting exactly at `hi` also
/// counts as "at the boundary" even though its range doesn't satisfy
/// `lo < hi` — both sides inserting at the same ancestor position is
/// exactly the overlap this function exists to resolve, and skipping it
/// would leave the main loop re-entering the same state forever.
fn absorb<T: Token>(
    ops: &mut [Op<T>],
    idx: &mut usize,
    mut hi: usize,
    consumed: &mut Vec<Op<T>>,
    grew: &mut bool,
) -> usize {
    while *idx < ops.len()
        && (ops[*idx].lo < hi || (ops[*idx].lo == hi && ops[*idx].is_change() && ops[*idx].hi == hi))
    {
        let op = &mut ops[*idx];
        if op.hi <= hi {
            consumed.push(Op {
                lo: op.lo,
                hi: op.hi,
                insert: op.insert.take(),
            });
            *idx += 1;
        } else if op.is_change() {
            hi = op.hi;
            *grew = true;
            consumed.push(Op {
                lo: op.lo,
                hi: op.hi,
                insert: op.insert.take(),
            });
            *idx += 1;
        } else {
            consumed.push(Op {
                lo: op.lo,
                hi,
                insert: None,
            });
            op.lo = hi;
            break;
        }
    }
    hi
}

fn to_diff_ops<T: Token>(ops: Vec<Op<T>>, ancestor: &[T]) -> ChangeStream<T> {
    ops.into_iter()
        .map(|op| match op.insert {
            Some(insert) => DiffOp::Change(insert, ancestor[op.lo..op.hi].to_vec()),
            None => DiffOp::Run(ancestor[op.lo..op.hi].to_vec()),
        })
        .collect()
}

/// Merges adjacent runs and adjacent non-conflict changes. Conflicts never
/// coalesce with their neighbors.
fn coalesce_merged<T: Token>(stream: MergedStream<T>) -> MergedStream<T> {
    let mut out: MergedStream<T> = Vec::with_capacity(stream.len());
    for op in stream {
        match (out.last_mut(), op) {
            (Some(MergedOp::Run(prev)), MergedOp::Run(next)) => prev.extend(next),
            (Some(MergedOp::Change(pi, pd)), MergedOp::Change(ni, nd)) => {
                pi.extend(ni);
                pd.extend(nd);
            }
            (_, op) => out.push(op),
        }
    }
    out
}
