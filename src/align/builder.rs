//! Alignment reconstruction and quality consensus.
//!
//! [`build_alignment`] replays a run-length path into two gap-padded
//! byte rows of equal length. [`quality_consensus`] replays both the
//! bases and the quality tracks, then collapses each column into a single
//! consensus base: the higher-quality observation wins, equal qualities
//! take the IUPAC union, and disagreements recompute the surviving
//! quality from both observations. Output buffers live in the worker's
//! [`BuildArena`].

use itertools::izip;

use crate::arena::BuildArena;
use crate::scoring::{base_mask, mask_to_base};

use super::traceback::path_spans;
use super::{QualSeq, DEFAULT_QUAL};

/// Consensus qualities never exceed this.
pub const MAX_CONSENSUS_QUAL: i32 = 90;

/// Consensus of an aligned read pair.
#[derive(Debug)]
pub struct Consensus<'b> {
    pub bases: &'b [u8],
    pub quals: &'b [u8],
    /// Columns where both reads called the same base
    pub matching: usize,
}

/// Replay `path` over two sequences into gap-padded rows.
///
/// Both outputs have the same length; stripping `gap_byte` from either
/// yields the original sequence. Panics when the path does not span both
/// sequences exactly.
pub fn build_alignment(
    a: &[u8],
    b: &[u8],
    path: &[i32],
    gap_byte: u8,
    out_a: &mut Vec<u8>,
    out_b: &mut Vec<u8>,
) {
    assert_eq!(
        path_spans(path),
        (a.len(), b.len()),
        "alignment path does not span both sequences"
    );
    out_a.clear();
    out_b.clear();

    let (mut pa, mut pb) = (0usize, 0usize);
    for pair in path.chunks_exact(2) {
        let (indel, diag) = (pair[0], pair[1]);
        if indel < 0 {
            let k = (-indel) as usize;
            out_a.extend_from_slice(&a[pa..pa + k]);
            out_b.extend(std::iter::repeat(gap_byte).take(k));
            pa += k;
        } else if indel > 0 {
            let k = indel as usize;
            out_a.extend(std::iter::repeat(gap_byte).take(k));
            out_b.extend_from_slice(&b[pb..pb + k]);
            pb += k;
        }
        let d = diag as usize;
        out_a.extend_from_slice(&a[pa..pa + d]);
        out_b.extend_from_slice(&b[pb..pb + d]);
        pa += d;
        pb += d;
    }
}

/// Collapse an aligned pair into consensus bases and qualities.
///
/// Per column: the observation with the higher quality survives; on a
/// quality tie the bases merge into their IUPAC union and the qualities
/// add; and whenever two positive-quality observations disagree, the kept
/// quality is knocked down to
/// `q_max - round(10 * log10(1 - 10^(-q_min / 30)))`. Everything clamps
/// to [`MAX_CONSENSUS_QUAL`]. Gap columns carry quality zero, so the
/// called side always survives them.
pub fn quality_consensus<'b>(
    a: &QualSeq,
    b: &QualSeq,
    path: &[i32],
    build: &'b mut BuildArena,
) -> Consensus<'b> {
    let BuildArena {
        aligned_a,
        aligned_b,
        aligned_quals_a,
        aligned_quals_b,
        fill_a,
        fill_b,
        consensus_bases,
        consensus_quals,
    } = build;

    build_alignment(a.bases, b.bases, path, b' ', aligned_a, aligned_b);
    let qa_track = quality_track(a, fill_a);
    let qb_track = quality_track(b, fill_b);
    build_alignment(qa_track, qb_track, path, 0, aligned_quals_a, aligned_quals_b);

    consensus_bases.clear();
    consensus_quals.clear();
    let mut matching = 0usize;

    for (&ba, &bb, &qa, &qb) in izip!(
        aligned_a.iter(),
        aligned_b.iter(),
        aligned_quals_a.iter(),
        aligned_quals_b.iter()
    ) {
        let (ma, mb) = (base_mask(ba), base_mask(bb));
        if ma == mb && ma != 0 {
            matching += 1;
        }

        let (base, mut qual) = if qa > qb {
            (ba, i32::from(qa))
        } else if qb > qa {
            (bb, i32::from(qb))
        } else {
            (mask_to_base(ma | mb), i32::from(qa) + i32::from(qb))
        };

        if ma != mb && qa > 0 && qb > 0 {
            let (q_max, q_min) = (qa.max(qb), qa.min(qb));
            qual = i32::from(q_max) - combined_penalty(q_min);
        }

        consensus_bases.push(base);
        consensus_quals.push(qual.clamp(0, MAX_CONSENSUS_QUAL) as u8);
    }

    Consensus {
        bases: consensus_bases.as_slice(),
        quals: consensus_quals.as_slice(),
        matching,
    }
}

/// `round(10 * log10(1 - 10^(-q/30)))`, the (negative) correction applied
/// to the winning quality of a disagreeing column.
fn combined_penalty(q_min: u8) -> i32 {
    let p = 10f64.powf(-f64::from(q_min) / 30.0);
    (10.0 * (1.0 - p).log10()).round() as i32
}

fn quality_track<'s>(seq: &'s QualSeq, fill: &'s mut Vec<u8>) -> &'s [u8] {
    match seq.quals {
        Some(q) => q,
        None => {
            fill.clear();
            fill.resize(seq.len(), DEFAULT_QUAL);
            fill
        }
    }
}
