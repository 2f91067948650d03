//! Shared test utilities: seeded random sequences, mutation helpers, and
//! a small k-mer shift estimator standing in for the external index.
#![allow(dead_code)]

use ampal::kmer::{ShiftEstimate, ShiftKmerIndex};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

pub const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn random_seq(rng: &mut ChaCha8Rng, len: usize) -> Vec<u8> {
    (0..len).map(|_| BASES[rng.gen_range(0..4)]).collect()
}

/// Apply `subs` substitutions and `indels` single-base indels.
pub fn mutate(rng: &mut ChaCha8Rng, seq: &[u8], subs: usize, indels: usize) -> Vec<u8> {
    let mut out = seq.to_vec();
    for _ in 0..subs {
        let pos = rng.gen_range(0..out.len());
        let old = out[pos];
        let mut new = old;
        while new == old {
            new = BASES[rng.gen_range(0..4)];
        }
        out[pos] = new;
    }
    for _ in 0..indels {
        if rng.gen_bool(0.5) && out.len() > 2 {
            out.remove(rng.gen_range(0..out.len()));
        } else {
            let pos = rng.gen_range(0..=out.len());
            out.insert(pos, BASES[rng.gen_range(0..4)]);
        }
    }
    out
}

/// 2-bit k-mer code; `None` over any non-ACGT byte.
fn encode_kmer(seq: &[u8], start: usize, k: usize) -> Option<u64> {
    if start + k > seq.len() {
        return None;
    }
    let mut encoded = 0u64;
    for &b in &seq[start..start + k] {
        let code = match b {
            b'A' | b'a' => 0,
            b'C' | b'c' => 1,
            b'G' | b'g' => 2,
            b'T' | b't' => 3,
            _ => return None,
        };
        encoded = (encoded << 2) | code;
    }
    Some(encoded)
}

/// Voting shift estimator: every shared k-mer votes for the offset it
/// implies, the best-supported offset wins. With k = 4 a perfect overlap
/// of length L gathers L - 3 votes, exactly the fast-path threshold.
pub struct VotingIndexer {
    pub k: usize,
}

impl Default for VotingIndexer {
    fn default() -> Self {
        Self { k: 4 }
    }
}

pub struct VotingIndex {
    k: usize,
    positions: FxHashMap<u64, Vec<i32>>,
}

impl ShiftKmerIndex for VotingIndexer {
    type Index = VotingIndex;

    fn build_index(&self, seq: &[u8]) -> VotingIndex {
        let mut positions: FxHashMap<u64, Vec<i32>> = FxHashMap::default();
        for p in 0..seq.len().saturating_sub(self.k - 1) {
            if let Some(code) = encode_kmer(seq, p, self.k) {
                positions.entry(code).or_default().push(p as i32);
            }
        }
        VotingIndex { k: self.k, positions }
    }

    fn estimate_shift(
        &self,
        index: &VotingIndex,
        other: &[u8],
        relative_score: bool,
    ) -> ShiftEstimate {
        let mut votes: FxHashMap<i32, i32> = FxHashMap::default();
        let mut queried = 0i32;
        for q in 0..other.len().saturating_sub(index.k - 1) {
            queried += 1;
            if let Some(code) = encode_kmer(other, q, index.k) {
                if let Some(ps) = index.positions.get(&code) {
                    for &p in ps {
                        *votes.entry(p - q as i32).or_default() += 1;
                    }
                }
            }
        }
        let (shift, matches) = votes
            .into_iter()
            .max_by_key(|&(shift, count)| (count, -shift))
            .unwrap_or((0, 0));
        let score = if relative_score && queried > 0 {
            f64::from(matches) / f64::from(queried)
        } else {
            f64::from(matches)
        };
        ShiftEstimate { shift, matches, score }
    }
}
