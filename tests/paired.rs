//! Paired-end alignment driven by a real voting shift estimator.

mod common;

use ampal::align::builder::build_alignment;
use ampal::align::paired::{pe_align, read_align, PairParams};
use ampal::align::traceback::path_spans;
use ampal::arena::Arena;
use ampal::scoring::reverse_complement;
use ampal::QualSeq;
use common::{mutate, random_seq, rng, VotingIndexer};

fn strip(aligned: &[u8], gap: u8) -> Vec<u8> {
    aligned.iter().copied().filter(|&c| c != gap).collect()
}

#[test]
fn perfect_overlap_takes_fast_path() {
    let mut r = rng(11);
    let template = random_seq(&mut r, 60);
    let a = QualSeq::new(&template[..40], None);
    let b = QualSeq::new(&template[20..], None);

    let mut arena = Arena::new();
    let out = pe_align(
        &a,
        &b,
        &PairParams::default(),
        &VotingIndexer::default(),
        &mut arena.dp,
        &mut arena.path,
    );
    assert!(out.left_aligned);
    assert_eq!(out.overlap_len, 20);
    // A perfect 20-base overlap yields 17 four-mer votes, enough to skip
    // the DP: the path is the trivial flank/diagonal/flank shape.
    assert_eq!(out.fast_matches, 17);
    assert_eq!(out.path, &[-20, 20, 20, 0]);
}

#[test]
fn noisy_overlap_runs_windowed_dp() {
    let mut r = rng(12);
    let template = random_seq(&mut r, 60);
    let mutated_tail = mutate(&mut r, &template[20..], 4, 1);
    let a = QualSeq::new(&template[..40], None);
    let b = QualSeq::new(&mutated_tail, None);

    let mut arena = Arena::new();
    let out = pe_align(
        &a,
        &b,
        &PairParams::default(),
        &VotingIndexer::default(),
        &mut arena.dp,
        &mut arena.path,
    );
    assert_eq!(path_spans(out.path), (a.len(), b.len()));

    // The path must replay both sequences exactly.
    let (mut out_a, mut out_b) = (Vec::new(), Vec::new());
    build_alignment(a.bases, b.bases, out.path, b'-', &mut out_a, &mut out_b);
    assert_eq!(out_a.len(), out_b.len());
    assert_eq!(strip(&out_a, b'-'), a.bases);
    assert_eq!(strip(&out_b, b'-'), b.bases);
}

#[test]
fn exhaustive_and_heuristic_agree_on_clean_pairs() {
    let mut r = rng(13);
    let template = random_seq(&mut r, 50);
    let a = QualSeq::new(&template[..35], None);
    let b = QualSeq::new(&template[15..], None);

    let mut arena = Arena::new();
    let heuristic = pe_align(
        &a,
        &b,
        &PairParams::default(),
        &VotingIndexer::default(),
        &mut arena.dp,
        &mut arena.path,
    );
    let h_score = heuristic.score;
    let h_path: Vec<i32> = heuristic.path.to_vec();

    let exhaustive = pe_align(
        &a,
        &b,
        &PairParams { use_heuristic: false, ..PairParams::default() },
        &VotingIndexer::default(),
        &mut arena.dp,
        &mut arena.path,
    );
    assert_eq!(exhaustive.score, h_score);
    assert_eq!(exhaustive.path, h_path.as_slice());
}

#[test]
fn read_align_detects_orientation() {
    let mut r = rng(14);
    let template = random_seq(&mut r, 60);
    let mut mate = Vec::new();
    reverse_complement(&template[20..], &mut mate);

    let a = QualSeq::new(&template[..40], None);
    let b = QualSeq::new(&mate, None);
    let mut arena = Arena::new();
    let out = read_align(
        &a,
        &b,
        &PairParams::default(),
        &VotingIndexer::default(),
        &mut arena.dp,
        &mut arena.path,
        &mut arena.orient,
    );
    assert!(!out.forward, "the mate only aligns after reverse complementing");
    assert_eq!(out.overlap_len, 20);
    assert_eq!(out.path, &[-20, 20, 20, 0]);

    // A forward mate reports forward orientation.
    let fwd_mate = QualSeq::new(&template[20..], None);
    let out = read_align(
        &a,
        &fwd_mate,
        &PairParams::default(),
        &VotingIndexer::default(),
        &mut arena.dp,
        &mut arena.path,
        &mut arena.orient,
    );
    assert!(out.forward);
}

#[test]
fn arena_reuse_over_many_pairs() {
    let mut r = rng(15);
    let mut arena = Arena::with_capacity(80);
    let indexer = VotingIndexer::default();
    for _ in 0..200 {
        let template = random_seq(&mut r, 70);
        let a_end = 45 + (template[0] % 10) as usize;
        let b_start = 20 + (template[1] % 5) as usize;
        let a = QualSeq::new(&template[..a_end], None);
        let b = QualSeq::new(&template[b_start..], None);
        let out = pe_align(
            &a,
            &b,
            &PairParams::default(),
            &indexer,
            &mut arena.dp,
            &mut arena.path,
        );
        assert_eq!(path_spans(out.path), (a.len(), b.len()));
        assert!(out.score > 0);
    }
}
