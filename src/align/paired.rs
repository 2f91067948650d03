//! Paired-end overlap alignment.
//!
//! Three ends-free DP fills share one recurrence — diagonal pairs two
//! observed bases through the quality tables, horizontal/vertical moves
//! pay a flat gap penalty — and differ only in which matrix edges are
//! free. A k-mer shift estimate (external collaborator, [`crate::kmer`])
//! lets near-identical overlaps skip the DP entirely and bounds the fill
//! to the plausible overlap window otherwise.

use crate::arena::{DpArena, OrientArena, PathStore};
use crate::kmer::{ShiftEstimate, ShiftKmerIndex};
use crate::matrix::{Dir, Matrix};
use crate::scoring::{reverse_complement, ScoreTables};

use super::traceback::{backtrack, prepend_indel};
use super::QualSeq;

/// Which matrix edges are free of gap cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndsFree {
    /// First column and last row free: A's 5' end extends past B's start,
    /// B's 3' end extends past A's end.
    Left,
    /// First row and last column free: the mirror case.
    Right,
    /// First and last column free: B contained in A. Requires
    /// `len(a) >= len(b)`.
    Center,
}

/// Tuning for the paired-end aligner.
#[derive(Debug, Clone, Copy)]
pub struct PairParams {
    /// User-facing gap weight, anchored to the Q40 mismatch score
    pub gap: f64,
    /// Scale applied to mismatch contributions
    pub scale: f64,
    /// Consult the k-mer shift estimate before filling
    pub use_heuristic: bool,
    /// Extra positions around the estimated shift kept in the DP window
    pub shift_slack: usize,
    /// Ask the estimator for a normalized support score
    pub relative_score: bool,
}

impl Default for PairParams {
    fn default() -> Self {
        Self {
            gap: 1.0,
            scale: 1.0,
            use_heuristic: true,
            shift_slack: 2,
            relative_score: true,
        }
    }
}

/// Result of [`pe_align`]. The path borrows the worker's path store and
/// spans both full sequences.
#[derive(Debug)]
pub struct PeAlignment<'p> {
    pub left_aligned: bool,
    pub score: i32,
    pub path: &'p [i32],
    /// k-mer matches supporting the shift (0 without the heuristic)
    pub fast_matches: i32,
    /// Estimated overlap length (0 without the heuristic)
    pub overlap_len: i32,
    /// Estimator support score
    pub fast_score: f64,
}

/// Result of [`read_align`]; additionally reports the sequencing
/// orientation that won the k-mer vote.
#[derive(Debug)]
pub struct ReadAlignment<'p> {
    pub score: i32,
    pub path: &'p [i32],
    pub fast_matches: i32,
    pub overlap_len: i32,
    pub fast_score: f64,
    pub forward: bool,
}

/// Align a read pair already in a common orientation.
///
/// Without the heuristic both the left- and right-aligned fills run over
/// the whole pair and the higher score wins (ties go right). With it, the
/// k-mer shift decides the geometry: near-perfect overlaps are scored
/// straight from the match table with a trivial path, everything else
/// runs one ends-free fill over the overlap window.
pub fn pe_align<'p, K: ShiftKmerIndex>(
    a: &QualSeq,
    b: &QualSeq,
    params: &PairParams,
    indexer: &K,
    dp: &mut DpArena,
    path: &'p mut PathStore,
) -> PeAlignment<'p> {
    assert!(!a.is_empty() && !b.is_empty(), "pe_align: empty input sequence");
    let tables = ScoreTables::global();

    if !params.use_heuristic {
        let (score, left_aligned) = exhaustive(a, b, params, tables, dp, path);
        return PeAlignment {
            left_aligned,
            score,
            path: path.as_slice(),
            fast_matches: 0,
            overlap_len: 0,
            fast_score: 0.0,
        };
    }

    let index = indexer.build_index(a.bases);
    let est = indexer.estimate_shift(&index, b.bases, params.relative_score);
    // A zero shift counts as right-aligning here.
    let is_left = est.shift > 0;
    let outcome = shifted_align(a, b, &est, is_left, params, tables, dp, path);
    PeAlignment {
        left_aligned: outcome.left_aligned,
        score: outcome.score,
        path: path.as_slice(),
        fast_matches: est.matches,
        overlap_len: outcome.overlap as i32,
        fast_score: est.score,
    }
}

/// Align a read pair of unknown relative orientation.
///
/// The shift estimator is consulted against B and against B's reverse
/// complement; whichever orientation gathers more k-mer support is
/// aligned (`forward` reports the choice). Unlike [`pe_align`], a zero
/// shift left-aligns when B is at least as long as A.
pub fn read_align<'p, K: ShiftKmerIndex>(
    a: &QualSeq,
    b: &QualSeq,
    params: &PairParams,
    indexer: &K,
    dp: &mut DpArena,
    path: &'p mut PathStore,
    orient: &mut OrientArena,
) -> ReadAlignment<'p> {
    assert!(!a.is_empty() && !b.is_empty(), "read_align: empty input sequence");
    let tables = ScoreTables::global();

    let index = indexer.build_index(a.bases);
    let fwd = indexer.estimate_shift(&index, b.bases, params.relative_score);

    reverse_complement(b.bases, &mut orient.bases);
    orient.quals.clear();
    if let Some(q) = b.quals {
        orient.quals.extend(q.iter().rev());
    }
    let rev = indexer.estimate_shift(&index, &orient.bases, params.relative_score);

    let forward = fwd.matches >= rev.matches;
    log::debug!(
        "read_align orientation: forward {} vs reverse {} k-mer matches",
        fwd.matches,
        rev.matches
    );
    let (est, oriented) = if forward {
        (fwd, *b)
    } else {
        (
            rev,
            QualSeq {
                bases: &orient.bases,
                quals: b.quals.map(|_| orient.quals.as_slice()),
            },
        )
    };

    let is_left = est.shift > 0 || (est.shift == 0 && oriented.len() >= a.len());
    let outcome = if params.use_heuristic {
        shifted_align(a, &oriented, &est, is_left, params, tables, dp, path)
    } else {
        let (score, left_aligned) = exhaustive(a, &oriented, params, tables, dp, path);
        Outcome { score, left_aligned, overlap: 0 }
    };

    ReadAlignment {
        score: outcome.score,
        path: path.as_slice(),
        fast_matches: est.matches,
        overlap_len: outcome.overlap as i32,
        fast_score: est.score,
        forward,
    }
}

/// One ends-free alignment over the whole pair, with traceback.
pub fn ends_free_align<'p>(
    mode: EndsFree,
    a: &QualSeq,
    b: &QualSeq,
    params: &PairParams,
    dp: &mut DpArena,
    path: &'p mut PathStore,
) -> (i32, &'p [i32]) {
    assert!(!a.is_empty() && !b.is_empty(), "ends_free_align: empty input sequence");
    let tables = ScoreTables::global();
    let score = fill(mode, a, b, params, tables, &mut dp.scores, &mut dp.dirs);
    backtrack(&dp.dirs, a.len(), b.len(), path);
    (score, path.as_slice())
}

struct Outcome {
    score: i32,
    left_aligned: bool,
    overlap: usize,
}

/// Overlap geometry implied by a shift estimate: flanking lengths on
/// either side of the shared window. At most one of the `off` fields and
/// one of the `tail` fields is nonzero.
struct Geometry {
    a_off: usize,
    b_off: usize,
    overlap: usize,
    a_tail: usize,
    b_tail: usize,
}

fn geometry(la: usize, lb: usize, shift: i32) -> Geometry {
    let a_off = shift.max(0) as usize;
    let b_off = (-shift).max(0) as usize;
    if a_off >= la || b_off >= lb {
        return Geometry { a_off, b_off, overlap: 0, a_tail: 0, b_tail: 0 };
    }
    let overlap = (la - a_off).min(lb - b_off);
    Geometry {
        a_off,
        b_off,
        overlap,
        a_tail: la - a_off - overlap,
        b_tail: lb - b_off - overlap,
    }
}

fn shifted_align(
    a: &QualSeq,
    b: &QualSeq,
    est: &ShiftEstimate,
    is_left: bool,
    params: &PairParams,
    tables: &ScoreTables,
    dp: &mut DpArena,
    path: &mut PathStore,
) -> Outcome {
    let geom = geometry(a.len(), b.len(), est.shift);
    if geom.overlap == 0 {
        // The estimate puts the reads apart; fall back to the full fills.
        let (score, left_aligned) = exhaustive(a, b, params, tables, dp, path);
        return Outcome { score, left_aligned, overlap: 0 };
    }

    if est.matches + 3 >= geom.overlap as i32 {
        // Near-perfect overlap: no DP, score the window directly.
        log::debug!(
            "pair fast path: shift {} with {} matches over {} overlapping bases",
            est.shift,
            est.matches,
            geom.overlap
        );
        let mut score = 0i32;
        for k in 0..geom.overlap {
            score += tables.match_score(a.qual(geom.a_off + k), b.qual(geom.b_off + k));
        }
        path.reset(0);
        if geom.a_off > 0 {
            path.push_back(-(geom.a_off as i32));
        } else {
            path.push_back(geom.b_off as i32);
        }
        path.push_back(geom.overlap as i32);
        if geom.a_tail > 0 {
            path.push_back(-(geom.a_tail as i32));
            path.push_back(0);
        } else if geom.b_tail > 0 {
            path.push_back(geom.b_tail as i32);
            path.push_back(0);
        }
        return Outcome { score, left_aligned: is_left, overlap: geom.overlap };
    }

    // Fill only the plausibly-overlapping window, widened by the slack.
    let lo_a = geom.a_off.saturating_sub(params.shift_slack);
    let lo_b = geom.b_off.saturating_sub(params.shift_slack);
    let a_win = a.slice(lo_a, a.len());
    let b_win = b.slice(lo_b, b.len());
    let mode = if is_left { EndsFree::Left } else { EndsFree::Right };
    let score = fill(mode, &a_win, &b_win, params, tables, &mut dp.scores, &mut dp.dirs);
    backtrack(&dp.dirs, a_win.len(), b_win.len(), path);
    if lo_a > 0 {
        prepend_indel(path, -(lo_a as i32));
    }
    if lo_b > 0 {
        prepend_indel(path, lo_b as i32);
    }
    Outcome { score, left_aligned: is_left, overlap: geom.overlap }
}

/// Run both whole-pair fills and keep the better; ties go right.
fn exhaustive(
    a: &QualSeq,
    b: &QualSeq,
    params: &PairParams,
    tables: &ScoreTables,
    dp: &mut DpArena,
    path: &mut PathStore,
) -> (i32, bool) {
    let score_left = fill(EndsFree::Left, a, b, params, tables, &mut dp.scores, &mut dp.dirs);
    let score_right = fill(EndsFree::Right, a, b, params, tables, &mut dp.scores, &mut dp.dirs);
    let left_aligned = score_left > score_right;
    if left_aligned {
        // The direction matrix holds the right-aligned fill; redo the winner.
        fill(EndsFree::Left, a, b, params, tables, &mut dp.scores, &mut dp.dirs);
    }
    backtrack(&dp.dirs, a.len(), b.len(), path);
    (score_left.max(score_right), left_aligned)
}

fn fill(
    mode: EndsFree,
    a: &QualSeq,
    b: &QualSeq,
    params: &PairParams,
    tables: &ScoreTables,
    scores: &mut Matrix<i32>,
    dirs: &mut Matrix<Dir>,
) -> i32 {
    let (la, lb) = (a.len(), b.len());
    if mode == EndsFree::Center {
        assert!(
            la >= lb,
            "center alignment requires the first sequence to be the longer"
        );
    }
    let gap_pen = tables.gap_penalty(params.gap, params.scale);

    scores.resize(la + 1, lb + 1);
    dirs.resize(la + 1, lb + 1);

    let col0_free = matches!(mode, EndsFree::Left | EndsFree::Center);
    let row0_free = mode == EndsFree::Right;
    dirs.set(0, 0, Dir::Stop);
    scores.set(0, 0, 0);
    for i in 1..=la {
        scores.set(i, 0, if col0_free { 0 } else { i as i32 * gap_pen });
        dirs.set(i, 0, Dir::Up);
    }
    for j in 1..=lb {
        scores.set(0, j, if row0_free { 0 } else { j as i32 * gap_pen });
        dirs.set(0, j, Dir::Left);
    }

    for i in 1..=la {
        for j in 1..=lb {
            let pair = tables.pairing_score(
                a.bases[i - 1],
                a.qual(i - 1),
                b.bases[j - 1],
                b.qual(j - 1),
                params.scale,
            );
            let mut best = scores.get(i - 1, j - 1) + pair;
            let mut dir = Dir::Diag;

            let up_pen = if matches!(mode, EndsFree::Right | EndsFree::Center) && j == lb {
                0
            } else {
                gap_pen
            };
            let up = scores.get(i - 1, j) + up_pen;
            if up > best {
                best = up;
                dir = Dir::Up;
            }

            let left_pen = if mode == EndsFree::Left && i == la { 0 } else { gap_pen };
            let left = scores.get(i, j - 1) + left_pen;
            if left > best {
                best = left;
                dir = Dir::Left;
            }

            scores.set(i, j, best);
            dirs.set(i, j, dir);
        }
    }

    scores.get(la, lb)
}
