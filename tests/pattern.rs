//! Primer localization scenarios.

mod common;

use ampal::align::pattern::{locate_pattern, PatternHit};
use ampal::arena::DpArena;
use common::{random_seq, rng};

fn run(pattern: &[u8], sequence: &[u8]) -> PatternHit {
    let mut dp = DpArena::default();
    locate_pattern(pattern, sequence, &mut dp.scores, &mut dp.dirs)
}

#[test]
fn interior_exact_hit() {
    assert_eq!(
        run(b"ACGT", b"TTTACGTTTT"),
        PatternHit { start: 3, end: 7, errors: 0 }
    );
}

#[test]
fn planted_pattern_is_recovered() {
    let mut r = rng(21);
    for _ in 0..50 {
        let mut seq = random_seq(&mut r, 80);
        // Plant an unmistakable primer that cannot occur at random.
        let primer = b"AAAAAAAACCCCCCCC";
        seq[30..30 + primer.len()].copy_from_slice(primer);
        let hit = run(primer, &seq);
        assert_eq!(hit.errors, 0);
        assert_eq!(hit.start, 30);
        assert_eq!(hit.end, 30 + primer.len());
    }
}

#[test]
fn degenerate_primer_matches_expansions() {
    // V = A|C|G, W = A|T, N = anything.
    let hit = run(b"GTGVCAGCMGCCGCGGTAW", b"TTTTGTGCCAGCAGCCGCGGTAATTTT");
    assert_eq!(hit.errors, 0);
    assert_eq!(hit.start, 4);
    assert_eq!(hit.end, 23);
}

#[test]
fn error_count_reflects_divergence() {
    let hit = run(b"ACGTACGT", b"TTTTACGTTCGTTTTT");
    assert_eq!(hit.errors, 1);
}

#[test]
#[should_panic(expected = "strictly shorter")]
fn oversized_pattern_is_fatal() {
    run(b"ACGTACGTA", b"ACGT");
}
