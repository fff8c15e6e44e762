//! Move-selection policies for random choices made during search.
//!
//! Expansion, rollouts and the best-first fallback all draw their random
//! choices from a [`MovePolicy`], so a deterministic policy can be swapped in
//! to make a search reproducible.

/// Picks one move out of a candidate list.
pub trait MovePolicy {
    /// Return one element of `moves`, or `None` if it is empty.
    fn pick(&mut self, moves: &[usize]) -> Option<usize>;
}

/// Uniform random choice backed by a `fastrand` generator.
pub struct UniformRandom {
    rng: fastrand::Rng,
}

impl Default for UniformRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandom {
    /// Seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl MovePolicy for UniformRandom {
    fn pick(&mut self, moves: &[usize]) -> Option<usize> {
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.usize(..moves.len())])
    }
}

/// Replays a fixed sequence of indices, wrapping around at the end.
///
/// Each index is reduced modulo the number of candidates, so any sequence is
/// valid for any move list.
pub struct Scripted {
    indices: Vec<usize>,
    cursor: usize,
}

impl Scripted {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, cursor: 0 }
    }

    /// Always picks the first candidate.
    pub fn first() -> Self {
        Self::new(vec![0])
    }
}

impl MovePolicy for Scripted {
    fn pick(&mut self, moves: &[usize]) -> Option<usize> {
        if moves.is_empty() {
            return None;
        }
        let index = if self.indices.is_empty() {
            0
        } else {
            let i = self.indices[self.cursor % self.indices.len()];
            self.cursor += 1;
            i
        };
        Some(moves[index % moves.len()])
    }
}
