//! Full-matrix LCS for exact optimal scores.
//!
//! The unbanded engine fills the whole O(n*m) table and is used when no
//! error bound is known ahead of time (distance computations feeding
//! indexing and classification). The recurrence and tie rules are the
//! ones the banded engine uses, so the two agree exactly whenever the
//! banded call is feasible; the tests lean on that.

use crate::arena::DpArena;
use crate::matrix::{LcsCell, Matrix};
use crate::scoring::is_exact_match;

use super::banded::banded_lcs;

#[inline]
fn better(cand: LcsCell, best: LcsCell) -> bool {
    cand.score > best.score || (cand.score == best.score && cand.steps < best.steps)
}

/// Exact LCS score and alignment length over the full matrix.
///
/// Returns `(score, length)` with the same semantics as
/// [`banded_lcs`](super::banded::banded_lcs): +1 per exactly-matching
/// aligned pair, every step (diagonal or gap) counts toward the length.
/// Panics on empty input.
pub fn full_lcs(a: &[u8], b: &[u8], cells: &mut Matrix<LcsCell>) -> (i32, i32) {
    assert!(!a.is_empty() && !b.is_empty(), "full_lcs: empty input sequence");
    let (n, m) = (a.len(), b.len());
    debug_assert!(n <= i16::MAX as usize && m <= i16::MAX as usize);

    cells.resize(n + 1, m + 1);
    // Boundary rows hold the pure-gap prefixes.
    for i in 0..=n {
        cells.set(i, 0, LcsCell { score: 0, steps: i as i16 });
    }
    for j in 0..=m {
        cells.set(0, j, LcsCell { score: 0, steps: j as i16 });
    }

    for i in 1..=n {
        for j in 1..=m {
            let diag = cells.get(i - 1, j - 1);
            let hit = is_exact_match(a[i - 1], b[j - 1]) as i16;
            let mut best = LcsCell { score: diag.score + hit, steps: diag.steps + 1 };

            let up = cells.get(i - 1, j);
            let cand = LcsCell { score: up.score, steps: up.steps + 1 };
            if better(cand, best) {
                best = cand;
            }

            let left = cells.get(i, j - 1);
            let cand = LcsCell { score: left.score, steps: left.steps + 1 };
            if better(cand, best) {
                best = cand;
            }

            cells.set(i, j, best);
        }
    }

    let exit = cells.get(n, m);
    (i32::from(exit.score), i32::from(exit.steps))
}

/// LCS with an optional error bound: banded when a bound is supplied,
/// full-matrix otherwise.
pub fn lcs(a: &[u8], b: &[u8], max_error: Option<i32>, dp: &mut DpArena) -> (i32, i32) {
    match max_error {
        Some(bound) => banded_lcs(a, b, bound, false, &mut dp.band),
        None => full_lcs(a, b, &mut dp.cells),
    }
}
