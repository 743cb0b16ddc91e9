//! RNG module - uniform random piece selection
//!
//! Each draw picks one of the seven kinds independently and uniformly; there is
//! no bag, so droughts and repeats are possible. A fixed cycling sequence is
//! also available for scripted games and tests.
//!
//! The generator is a simple seedable LCG so that a seed fully determines a game.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state, usable as a seed to replay from here
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Where the session gets its pieces from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PieceSource {
    /// Independent uniform draws over all seven kinds
    Uniform(SimpleRng),
    /// A fixed list, repeated forever
    Sequence { kinds: Vec<PieceKind>, index: usize },
}

impl PieceSource {
    /// Seeded uniform source
    pub fn uniform(seed: u32) -> Self {
        PieceSource::Uniform(SimpleRng::new(seed))
    }

    /// Cycling source; an empty list falls back to the I piece
    pub fn sequence(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        PieceSource::Sequence {
            kinds: kinds.into_iter().collect(),
            index: 0,
        }
    }

    /// Draw the next piece kind
    pub fn next_kind(&mut self) -> PieceKind {
        match self {
            PieceSource::Uniform(rng) => PieceKind::ALL[rng.next_range(7) as usize],
            PieceSource::Sequence { kinds, index } => {
                if kinds.is_empty() {
                    return PieceKind::I;
                }
                let kind = kinds[*index % kinds.len()];
                *index = (*index + 1) % kinds.len();
                kind
            }
        }
    }
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::uniform(1)
    }
}
