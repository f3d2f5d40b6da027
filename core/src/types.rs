//! Shared primitive types used across the wheel core.

/// One animation frame. The driver advances exactly once per tick.
pub type Tick = u64;

/// Milliseconds read from a monotonic [`Clock`](crate::clock::Clock).
pub type Millis = u64;

/// Monotonic identifier handed out per accepted spin request.
pub type SpinId = u64;

/// A full turn, in radians.
pub const TAU: f64 = std::f64::consts::TAU;
