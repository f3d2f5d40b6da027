//! Deterministic random number generation.
//!
//! RULE: Nothing in the wheel core may call any platform RNG.
//! Every draw flows through a [`UniformSource`], either a seeded
//! [`WheelRng`] stream derived from one master seed or a source
//! injected by the caller (tests, replay tooling).
//!
//! Each stream is seeded from (master_seed XOR slot_index), so adding
//! a new stream never shifts the draws of an existing one.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A uniform generator `U() -> [0, 1)`.
pub trait UniformSource: Send {
    /// Draw a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Draw an integer in the inclusive range [lo, hi].
    fn next_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi, "empty range {lo}..={hi}");
        let span = (u64::from(hi) - u64::from(lo) + 1) as f64;
        let offset = (self.next_f64() * span) as u64;
        lo + offset.min(u64::from(hi - lo)) as u32
    }

    /// Draw a float in [lo, hi).
    fn next_between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// A named, deterministic PCG stream.
pub struct WheelRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl WheelRng {
    /// Create a stream from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl UniformSource for WheelRng {
    fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
/// Used by tests and replay tooling to pin every random choice.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "scripted source needs at least one draw");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "scripted draws must lie in [0, 1)"
        );
        Self { draws, cursor: 0 }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl UniformSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}

/// Hands out the streams for a single wheel session, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_slot(&self, slot: RngSlot) -> WheelRng {
        WheelRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    Spin = 0,
    Celebration = 1,
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spin => "spin",
            Self::Celebration => "celebration",
        }
    }
}
