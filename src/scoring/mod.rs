//! Scoring model: ambiguity masks and quality-pair score tables.

pub mod iupac;
pub mod quality;

pub use iupac::{base_mask, is_exact_match, mask_to_base, match_ratio, reverse_complement};
pub use quality::{ScoreTables, ANCHOR_QUAL, QUAL_RANGE};

/// Build every process-wide lookup table now. Idempotent and thread-safe;
/// call once before spawning alignment workers so none of them pays the
/// construction cost mid-batch. Workers that skip this still initialize
/// safely on first use.
pub fn initialize() {
    iupac::warm_ratio_table();
    let _ = ScoreTables::global();
}
