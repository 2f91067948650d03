//! Quality-pair score tables.
//!
//! A base reported with quality `q` is wrong with probability
//! `e = 10^(-q/10)`, spread uniformly so each specific wrong base carries
//! `e/4` (and the reported base is right with probability `1 - 3e/4`).
//! For a pair of observations the probability that they agree is
//!
//! ```text
//! P_agree = (1 - 3e1/4)(1 - 3e2/4) + 3 (e1/4)(e2/4)
//! ```
//!
//! (both right, or both wrong on the same alternative), and
//! `P_disagree = 1 - P_agree` split into its three terms. Scores are the
//! odds against random agreement over a four-letter alphabet, in tenths of
//! a deciban: `round(10 * log10(P_agree / 0.25))` for a match and
//! `round(10 * log10(P_disagree / 0.75))` for a mismatch. Both tables are
//! precomputed for all quality pairs in `[0, 100)` so the DP inner loop
//! never calls a transcendental function.
//!
//! The tables are process-wide, built once behind a `OnceLock`, immutable
//! afterwards. Batch drivers that spawn workers should call
//! [`crate::scoring::initialize`] first so no worker pays the build cost.

use std::f64::consts::LN_10;
use std::sync::OnceLock;

use super::iupac::match_ratio;

/// Qualities are clamped into `[0, QUAL_RANGE)` before any table lookup.
pub const QUAL_RANGE: usize = 100;

/// Reference quality anchoring the user-facing gap weight.
pub const ANCHOR_QUAL: u8 = 40;

static TABLES: OnceLock<ScoreTables> = OnceLock::new();

/// Process-wide match/mismatch score tables.
pub struct ScoreTables {
    match_odds: Box<[[i32; QUAL_RANGE]; QUAL_RANGE]>,
    mismatch_odds: Box<[[i32; QUAL_RANGE]; QUAL_RANGE]>,
}

impl ScoreTables {
    /// The process-wide tables, built on first use.
    pub fn global() -> &'static ScoreTables {
        TABLES.get_or_init(|| {
            let tables = ScoreTables::build();
            log::debug!(
                "quality score tables built ({}x{} pairs)",
                QUAL_RANGE,
                QUAL_RANGE
            );
            tables
        })
    }

    fn build() -> ScoreTables {
        let mut match_odds = Box::new([[0i32; QUAL_RANGE]; QUAL_RANGE]);
        let mut mismatch_odds = Box::new([[0i32; QUAL_RANGE]; QUAL_RANGE]);

        // ln of the per-pair term coefficients.
        let ln_quarter = 0.25f64.ln();
        let ln_three_quarters = 0.75f64.ln();
        let ln_ww_same = (3.0 / 16.0f64).ln();
        let ln_ww_diff = (6.0 / 16.0f64).ln();

        for q1 in 0..QUAL_RANGE {
            let ln_e1 = ln_error_prob(q1);
            let ln_c1 = ln_correct_prob(ln_e1);
            for q2 in 0..QUAL_RANGE {
                let ln_e2 = ln_error_prob(q2);
                let ln_c2 = ln_correct_prob(ln_e2);

                let ln_agree = log_sum_exp(&[
                    ln_c1 + ln_c2,
                    ln_ww_same + ln_e1 + ln_e2,
                ]);
                let ln_disagree = log_sum_exp(&[
                    ln_c1 + ln_three_quarters + ln_e2,
                    ln_c2 + ln_three_quarters + ln_e1,
                    ln_ww_diff + ln_e1 + ln_e2,
                ]);

                match_odds[q1][q2] = to_decibans(ln_agree - ln_quarter);
                mismatch_odds[q1][q2] = to_decibans(ln_disagree - ln_three_quarters);
            }
        }

        ScoreTables { match_odds, mismatch_odds }
    }

    /// Score for two agreeing observations at the given qualities.
    #[inline]
    pub fn match_score(&self, q1: u8, q2: u8) -> i32 {
        self.match_odds[clamp_qual(q1)][clamp_qual(q2)]
    }

    /// Score (negative) for two disagreeing observations.
    #[inline]
    pub fn mismatch_score(&self, q1: u8, q2: u8) -> i32 {
        self.mismatch_odds[clamp_qual(q1)][clamp_qual(q2)]
    }

    /// Score for pairing two bases with their qualities. Full-ratio pairs
    /// take the match table, zero-ratio pairs the scaled mismatch table,
    /// partial ambiguity matches interpolate between the two with the
    /// mismatch contribution scaled.
    #[inline]
    pub fn pairing_score(&self, base_a: u8, qual_a: u8, base_b: u8, qual_b: u8, scale: f64) -> i32 {
        let ratio = match_ratio(base_a, base_b);
        let m = self.match_score(qual_a, qual_b);
        let x = self.mismatch_score(qual_a, qual_b);
        if ratio == 1.0 {
            m
        } else if ratio == 0.0 {
            (f64::from(x) * scale).round() as i32
        } else {
            (ratio * f64::from(m) + (1.0 - ratio) * f64::from(x) * scale).round() as i32
        }
    }

    /// Per-symbol gap penalty for a user-facing gap weight, anchored to
    /// the mismatch score at the reference quality so gap costs stay
    /// consistent with the quality scale.
    #[inline]
    pub fn gap_penalty(&self, gap: f64, scale: f64) -> i32 {
        let anchor = self.mismatch_score(ANCHOR_QUAL, ANCHOR_QUAL);
        (scale * gap * f64::from(anchor)).round() as i32
    }
}

#[inline]
fn clamp_qual(q: u8) -> usize {
    (q as usize).min(QUAL_RANGE - 1)
}

/// ln of the error probability at quality `q`.
#[inline]
fn ln_error_prob(q: usize) -> f64 {
    -(q as f64) * LN_10 / 10.0
}

/// ln of the probability the reported base is right: `ln(1 - 3e/4)`.
#[inline]
fn ln_correct_prob(ln_e: f64) -> f64 {
    (-0.75 * ln_e.exp()).ln_1p()
}

/// Stable `ln(sum(exp(t)))` over a few log-space terms.
fn log_sum_exp(terms: &[f64]) -> f64 {
    let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    let sum: f64 = terms.iter().map(|t| (t - max).exp()).sum();
    max + sum.ln()
}

/// `round(10 * log10(odds))` from a natural-log odds value.
#[inline]
fn to_decibans(ln_odds: f64) -> i32 {
    (10.0 * ln_odds / LN_10).round() as i32
}
