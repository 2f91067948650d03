//! End-gap-free primer/pattern localization.
//!
//! Finds where a short pattern sits inside a longer sequence, tolerating
//! substitutions and gaps. The DP matrix walks the sequence on the row
//! axis and the pattern on the column axis: the first column is free so
//! the pattern may start at any sequence position, and up-moves in the
//! last pattern column are free so it may end anywhere. Pattern bases
//! match through ambiguity-mask intersection, so a primer's IUPAC codes
//! match every base they expand to.

use crate::matrix::{Dir, Matrix};
use crate::scoring::base_mask;

/// Located occurrence of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternHit {
    /// First sequence position of the occurrence (0-based, inclusive)
    pub start: usize,
    /// One past the last sequence position (0-based, exclusive)
    pub end: usize,
    /// Substitutions plus gaps inside the occurrence
    pub errors: i32,
}

/// Locate `pattern` inside `sequence`.
///
/// Scores are match 0, mismatch −1, gap −1; the best (maximum) placement
/// wins and its error count is the negated score. Panics unless the
/// pattern is non-empty and strictly shorter than the sequence.
pub fn locate_pattern(
    pattern: &[u8],
    sequence: &[u8],
    scores: &mut Matrix<i32>,
    dirs: &mut Matrix<Dir>,
) -> PatternHit {
    assert!(!pattern.is_empty(), "locate_pattern: empty pattern");
    assert!(
        pattern.len() < sequence.len(),
        "locate_pattern: pattern must be strictly shorter than the sequence"
    );
    let (ls, lp) = (sequence.len(), pattern.len());

    scores.resize(ls + 1, lp + 1);
    dirs.resize(ls + 1, lp + 1);

    // Row 0 pays for pattern consumed before the sequence starts; column
    // 0 is free so any row can begin an occurrence.
    dirs.set(0, 0, Dir::Stop);
    scores.set(0, 0, 0);
    for j in 1..=lp {
        scores.set(0, j, -(j as i32));
        dirs.set(0, j, Dir::Left);
    }
    for i in 1..=ls {
        scores.set(i, 0, 0);
        dirs.set(i, 0, Dir::Up);
    }

    for i in 1..=ls {
        for j in 1..=lp {
            let hit = base_mask(sequence[i - 1]) & base_mask(pattern[j - 1]) != 0;
            let mut best = scores.get(i - 1, j - 1) + if hit { 0 } else { -1 };
            let mut dir = Dir::Diag;

            // Trailing sequence after the pattern's last base is free.
            let up = scores.get(i - 1, j) + if j == lp { 0 } else { -1 };
            if up > best {
                best = up;
                dir = Dir::Up;
            }

            let left = scores.get(i, j - 1) - 1;
            if left > best {
                best = left;
                dir = Dir::Left;
            }

            scores.set(i, j, best);
            dirs.set(i, j, dir);
        }
    }

    let final_score = scores.get(ls, lp);
    let (mut i, mut j) = (ls, lp);
    let mut end = ls;
    let mut in_tail = true;
    while j > 0 {
        match dirs.get(i, j) {
            Dir::Diag => {
                if in_tail {
                    end = i;
                    in_tail = false;
                }
                i -= 1;
                j -= 1;
            }
            Dir::Left => {
                if in_tail {
                    end = i;
                    in_tail = false;
                }
                j -= 1;
            }
            Dir::Up => i -= 1,
            Dir::Stop => break,
        }
    }

    PatternHit { start: i, end, errors: -final_score }
}
