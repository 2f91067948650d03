//! Bounded-error LCS via diagonal banding.
//!
//! The DP search is restricted to a corridor around the main diagonal
//! whose width follows from the error bound, so a call costs
//! O(len * max_error) instead of O(len^2). Cells are packed [`BandCell`]
//! words in two alternating rows of a caller-supplied scratch buffer;
//! a worker reuses the same buffer for millions of calls.
//!
//! Band geometry, with `a` the longer sequence (rows) and `b` the shorter
//! (columns): `delta = len(a) - len(b)`, the effective error budget is
//! `max_error` (end gaps paid) or `max_error + delta` (end gaps free),
//! `extra = effective - delta + 1`, and the band holds
//! `w = 2 * (delta + 1 + extra) - 1` diagonals. A cell `(i, j)` lives at
//! band coordinate `x = (i - j) + extra`, so the diagonal predecessor sits
//! at `prev[x]`, the up predecessor (consume `a` only) at `prev[x - 1]`,
//! and the left predecessor (consume `b` only) at `cur[x + 1]`; rows are
//! filled with `x` descending. The outermost diagonals `x == 0` and
//! `x == w - 1` are forced out-of-band every row — the only out-of-band
//! forcing — so a path that touches the corridor wall can never come back.

use crate::align::state::BandCell;
use crate::scoring::is_exact_match;

/// Result signalling that the error bound cannot be met.
pub const INFEASIBLE: (i32, i32) = (-1, -1);

/// Bounded-error LCS score and alignment length.
///
/// Returns `(score, length)`: `score` counts exactly-matching aligned
/// pairs, `length` counts DP steps (so `length - score` approximates the
/// edit distance). Returns [`INFEASIBLE`] when no alignment fits the
/// error bound. With `end_gap_free`, leading gaps before either sequence
/// starts and trailing gaps after either sequence ends cost nothing and
/// add no length.
///
/// Symmetric in its sequence arguments. Panics on empty input.
pub fn banded_lcs(
    a: &[u8],
    b: &[u8],
    max_error: i32,
    end_gap_free: bool,
    scratch: &mut Vec<u64>,
) -> (i32, i32) {
    assert!(!a.is_empty() && !b.is_empty(), "banded_lcs: empty input sequence");

    // Canonicalize the longer sequence onto the row axis.
    let (a, b) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let (n, m) = (a.len(), b.len());
    debug_assert!(n <= u16::MAX as usize, "sequence too long for packed band state");

    let delta = (n - m) as i32;
    let effective = if end_gap_free { max_error + delta } else { max_error };
    if max_error < 0 || delta > effective {
        return INFEASIBLE;
    }

    let extra = (effective - delta + 1) as usize;
    let w = 2 * (delta as usize + 1 + extra) - 1;

    if scratch.len() < 2 * w {
        scratch.resize(2 * w, BandCell::WORST.pack());
    }
    let (mut prev_off, mut cur_off) = (0usize, w);

    // Row 0: only `b` has been consumed; leading gaps on the shorter side.
    for x in 0..w {
        let j = extra as isize - x as isize;
        let mut cell = if (0..=m as isize).contains(&j) {
            BandCell {
                score: 0,
                steps: if end_gap_free { 0 } else { j as u16 },
                in_band: true,
            }
        } else {
            BandCell::WORST
        };
        if x == 0 || x == w - 1 {
            cell = cell.mark_out();
        }
        scratch[prev_off + x] = cell.pack();
    }

    for i in 1..=n {
        // Left predecessors live in the current row at x + 1.
        for x in (0..w).rev() {
            let j = i as isize + extra as isize - x as isize;
            if !(0..=m as isize).contains(&j) {
                scratch[cur_off + x] = BandCell::WORST.pack();
                continue;
            }
            let j = j as usize;

            let mut best = if j == 0 {
                // Leading gaps on the longer side.
                BandCell {
                    score: 0,
                    steps: if end_gap_free { 0 } else { i as u16 },
                    in_band: true,
                }
            } else {
                let diag = BandCell::unpack(scratch[prev_off + x])
                    .diagonal(is_exact_match(a[i - 1], b[j - 1]));
                let mut best = diag;
                if x >= 1 {
                    let up = BandCell::unpack(scratch[prev_off + x - 1])
                        .gap(end_gap_free && j == m);
                    if up > best {
                        best = up;
                    }
                }
                if x + 1 < w {
                    let left = BandCell::unpack(scratch[cur_off + x + 1])
                        .gap(end_gap_free && i == n);
                    if left > best {
                        best = left;
                    }
                }
                best
            };

            if x == 0 || x == w - 1 {
                best = best.mark_out();
            }
            scratch[cur_off + x] = best.pack();
        }
        std::mem::swap(&mut prev_off, &mut cur_off);
    }

    let exit = BandCell::unpack(scratch[prev_off + delta as usize + extra]);
    if !exit.in_band {
        return INFEASIBLE;
    }
    (exit.score as i32, exit.steps as i32)
}
