//! Candidate selection strategies.
//!
//! A postcode can map to several coordinates. The resolver asks a
//! strategy to pick one the first time the postcode is seen in a
//! session, then reuses that pick for the rest of the session.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::domain::Coordinate;

/// Picks one coordinate out of a postcode's candidates.
pub trait SelectionStrategy: Send {
    /// Choose a candidate. Returns `None` only for an empty slice.
    fn select(&mut self, candidates: &[Coordinate]) -> Option<Coordinate>;
}

/// Always picks the first candidate in file order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl SelectionStrategy for FirstCandidate {
    fn select(&mut self, candidates: &[Coordinate]) -> Option<Coordinate> {
        candidates.first().copied()
    }
}

/// Picks a candidate uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomCandidate {
    rng: StdRng,
}

impl RandomCandidate {
    /// Seeded from OS entropy: re-runs may pick differently.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded deterministically: the same seed replays the same picks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SelectionStrategy for RandomCandidate {
    fn select(&mut self, candidates: &[Coordinate]) -> Option<Coordinate> {
        candidates.choose(&mut self.rng).copied()
    }
}

/// Configured selection policy, turned into a strategy per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Uniform random pick seeded from OS entropy
    #[default]
    Random,
    /// Uniform random pick from a fixed seed
    Seeded(u64),
    /// Deterministic first candidate
    First,
}

impl SelectionMode {
    /// Build a fresh strategy for one session.
    pub fn strategy(&self) -> Box<dyn SelectionStrategy> {
        match self {
            SelectionMode::Random => Box::new(RandomCandidate::from_entropy()),
            SelectionMode::Seeded(seed) => Box::new(RandomCandidate::seeded(*seed)),
            SelectionMode::First => Box::new(FirstCandidate),
        }
    }
}
