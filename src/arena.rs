//! Per-worker reusable buffers for the alignment engines.
//!
//! An [`Arena`] bundles every piece of scratch state a worker needs: DP
//! matrices, the banded row buffer, the alignment-path store, orientation
//! scratch and builder output buffers. Arenas carry no locking and must
//! never be shared between concurrently executing calls; a batch driver
//! owns one arena per worker and hands it to every engine call that worker
//! makes. Buffers grow to the largest problem seen and are then reused.

use crate::matrix::{Dir, LcsCell, Matrix};

/// DP scratch: banded rows plus the score/direction/cell matrices.
#[derive(Debug, Default)]
pub struct DpArena {
    /// Two alternating packed rows for the banded LCS engine
    pub band: Vec<u64>,
    /// Score matrix for ends-free and pattern fills
    pub scores: Matrix<i32>,
    /// Direction matrix for traceback
    pub dirs: Matrix<Dir>,
    /// Full LCS matrix
    pub cells: Matrix<LcsCell>,
}

/// Reusable store for alignment paths.
///
/// Backtracking walks from the exit cell toward the origin, so runs are
/// known tail-first; they are written from the end of the buffer backward
/// and the valid window `[start, end)` is returned as a slice. Flank runs
/// can still be appended past `end` after the walk.
#[derive(Debug, Default)]
pub struct PathStore {
    buf: Vec<i32>,
    start: usize,
    end: usize,
}

impl PathStore {
    /// Prepare for a path of at most `cap` runs. The window starts empty
    /// at the far end of the buffer.
    pub fn reset(&mut self, cap: usize) {
        if self.buf.len() < cap {
            self.buf.resize(cap, 0);
        }
        self.start = cap;
        self.end = cap;
    }

    #[inline]
    pub fn push_front(&mut self, value: i32) {
        debug_assert!(self.start > 0, "path store window exhausted");
        self.start -= 1;
        self.buf[self.start] = value;
    }

    #[inline]
    pub fn push_back(&mut self, value: i32) {
        if self.end == self.buf.len() {
            self.buf.push(value);
        } else {
            self.buf[self.end] = value;
        }
        self.end += 1;
    }

    #[inline]
    pub fn first(&self) -> Option<i32> {
        (self.start < self.end).then(|| self.buf[self.start])
    }

    #[inline]
    pub fn set_first(&mut self, value: i32) {
        debug_assert!(self.start < self.end);
        self.buf[self.start] = value;
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.buf[self.start..self.end]
    }
}

/// Scratch for reverse-complement orientation probing.
#[derive(Debug, Default)]
pub struct OrientArena {
    /// Reverse complement of the mate's bases
    pub bases: Vec<u8>,
    /// The mate's qualities, reversed
    pub quals: Vec<u8>,
}

/// Output buffers for the alignment builder.
#[derive(Debug, Default)]
pub struct BuildArena {
    pub aligned_a: Vec<u8>,
    pub aligned_b: Vec<u8>,
    pub aligned_quals_a: Vec<u8>,
    pub aligned_quals_b: Vec<u8>,
    /// Synthesized quality tracks for reads without one
    pub fill_a: Vec<u8>,
    pub fill_b: Vec<u8>,
    pub consensus_bases: Vec<u8>,
    pub consensus_quals: Vec<u8>,
}

/// Everything one worker needs, grouped so a path borrowed from `path`
/// can be replayed through `build` without copying.
#[derive(Debug, Default)]
pub struct Arena {
    pub dp: DpArena,
    pub path: PathStore,
    pub orient: OrientArena,
    pub build: BuildArena,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate for reads up to `max_len` so the first calls do not
    /// grow any buffer.
    pub fn with_capacity(max_len: usize) -> Self {
        let mut arena = Self::default();
        arena.dp.band = Vec::with_capacity(4 * max_len + 8);
        arena.dp.scores = Matrix::with_capacity(max_len + 1, max_len + 1);
        arena.dp.dirs = Matrix::with_capacity(max_len + 1, max_len + 1);
        arena.dp.cells = Matrix::with_capacity(max_len + 1, max_len + 1);
        arena.path.reset(4 * max_len + 8);
        arena.orient.bases = Vec::with_capacity(max_len);
        arena.orient.quals = Vec::with_capacity(max_len);
        arena
    }
}
