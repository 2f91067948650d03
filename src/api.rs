//! One-shot convenience entry points over the engine modules.

use anyhow::{ensure, Result};

use crate::align::builder::quality_consensus;
use crate::align::paired::{read_align, PairParams};
use crate::align::QualSeq;
use crate::arena::Arena;
use crate::kmer::ShiftKmerIndex;

/// A merged read pair: consensus sequence, qualities, and statistics.
#[derive(Debug, Clone)]
pub struct MergedPair {
    pub bases: Vec<u8>,
    pub quals: Vec<u8>,
    pub score: i32,
    /// Fraction of alignment columns where both reads agree
    pub identity: f64,
    /// Whether the mate aligned in its original orientation
    pub forward: bool,
}

/// Align a read pair (orientation detected via the k-mer estimator) and
/// collapse it into a quality consensus.
///
/// Batch drivers should call the engines directly and keep the arena
/// borrows; this wrapper copies the consensus out and reports failures as
/// errors instead of sentinel scores.
pub fn merge_read_pair<K: ShiftKmerIndex>(
    a: &QualSeq,
    b: &QualSeq,
    params: &PairParams,
    indexer: &K,
    arena: &mut Arena,
) -> Result<MergedPair> {
    let Arena { dp, path, orient, build } = arena;

    let aln = read_align(a, b, params, indexer, dp, path, orient);
    ensure!(
        aln.score > 0,
        "no plausible overlap between the reads (score {})",
        aln.score
    );

    let oriented;
    let mate = if aln.forward {
        *b
    } else {
        oriented = QualSeq {
            bases: &orient.bases,
            quals: b.quals.map(|_| orient.quals.as_slice()),
        };
        oriented
    };
    let cons = quality_consensus(a, &mate, aln.path, build);

    let columns = cons.bases.len();
    ensure!(columns > 0, "alignment produced no columns");
    let identity = cons.matching as f64 / columns as f64;

    Ok(MergedPair {
        bases: cons.bases.to_vec(),
        quals: cons.quals.to_vec(),
        score: aln.score,
        identity,
        forward: aln.forward,
    })
}
