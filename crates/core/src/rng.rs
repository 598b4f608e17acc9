//! RNG module - bag randomizer and piece preview queue
//!
//! A [`NumberBag`] dispenses every value of an inclusive range once per fill,
//! in random order. Fills use rejection sampling: draw uniformly, discard
//! values already in the bag, repeat until the bag holds the whole range.
//!
//! [`PieceQueue`] wraps a bag over the seven kinds and keeps a fixed-depth preview.
//!
//! Also provides a simple LCG for deterministic sequences.

use std::collections::VecDeque;

use crate::types::{PieceKind, NEXT_DEPTH, PIECE_KINDS};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
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
        // LCG formula: (a * state + c) mod m
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Uniform value in `min..=max`
    pub fn next_inclusive(&mut self, min: i32, max: i32) -> i32 {
        let span = (max as i64 - min as i64 + 1) as u32;
        min + self.next_range(span) as i32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Tokens `min..=max`, each dispensed once per fill
#[derive(Debug, Clone)]
pub struct NumberBag {
    min: i32,
    max: i32,
    bag: VecDeque<i32>,
    rng: SimpleRng,
}

impl NumberBag {
    /// Bounds given in the wrong order are swapped
    pub fn new(min: i32, max: i32, seed: u32) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self {
            min,
            max,
            bag: VecDeque::with_capacity((max - min + 1) as usize),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn range(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    /// Top the bag up until every value in range is present
    pub fn fill(&mut self) {
        let total = (self.max - self.min + 1) as usize;
        while self.bag.len() < total {
            let value = self.rng.next_inclusive(self.min, self.max);
            if !self.bag.contains(&value) {
                self.bag.push_back(value);
            }
        }
    }

    /// Pop the front token, refilling first when empty
    pub fn next(&mut self) -> i32 {
        if self.bag.is_empty() {
            self.fill();
        }
        self.bag.pop_front().unwrap_or(self.min)
    }

    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Tokens still waiting in the current fill, front first
    pub fn contents(&self) -> impl Iterator<Item = i32> + '_ {
        self.bag.iter().copied()
    }

    /// Forget the current fill and reseed
    pub fn reset(&mut self, seed: u32) {
        self.bag.clear();
        self.rng = SimpleRng::new(seed);
    }
}

/// Upcoming pieces: a bag over the seven kinds plus a fixed-depth preview
#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: NumberBag,
    next: VecDeque<PieceKind>,
    depth: usize,
}

impl PieceQueue {
    /// Create a queue and fill the preview from the bag
    pub fn new(seed: u32, depth: usize) -> Self {
        let depth = depth.max(1);
        let mut queue = Self {
            bag: NumberBag::new(0, PIECE_KINDS as i32 - 1, seed),
            next: VecDeque::with_capacity(depth),
            depth,
        };
        queue.top_up();
        queue
    }

    fn top_up(&mut self) {
        while self.next.len() < self.depth {
            let kind = PieceKind::from_index(self.bag.next());
            self.next.push_back(kind);
        }
    }

    /// Take the front of the preview and refill its tail from the bag
    pub fn advance(&mut self) -> PieceKind {
        let kind = self
            .next
            .pop_front()
            .unwrap_or_else(|| PieceKind::from_index(self.bag.next()));
        self.top_up();
        kind
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> Option<PieceKind> {
        self.next.front().copied()
    }

    /// The preview, front first
    pub fn preview(&self) -> Vec<PieceKind> {
        self.next.iter().copied().collect()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Discard the preview and the bag, reseed, and refill
    pub fn reset(&mut self, seed: u32) {
        self.bag.reset(seed);
        self.next.clear();
        self.top_up();
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1, NEXT_DEPTH)
    }
}
