//! Approximate sequence alignment for amplicon read processing.
//!
//! The crate provides the dynamic-programming core of a sequence
//! toolkit: bounded-error LCS scores over a diagonal band
//! ([`align::banded`]), exact full-matrix LCS ([`align::full`]),
//! paired-end overlap alignment with a k-mer fast path
//! ([`align::paired`]), primer localization ([`align::pattern`]), and
//! alignment/consensus reconstruction ([`align::builder`]). Scoring is
//! quality-aware through precomputed tables ([`scoring`]); all transient
//! state lives in per-worker [`arena::Arena`] buffers so batch drivers
//! can align millions of pairs without allocating.
//!
//! Everything is synchronous and CPU-bound; parallelism belongs to the
//! caller, one arena per worker. Call [`scoring::initialize`] before
//! spawning workers to front-load the one-time table construction.

pub mod align;
pub mod api;
pub mod arena;
pub mod kmer;
pub mod matrix;
pub mod scoring;

pub use align::paired::PairParams;
pub use align::QualSeq;
pub use arena::Arena;
