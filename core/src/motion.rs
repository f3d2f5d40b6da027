//! Spin motion profiles.
//!
//! Velocity is in radians per frame interval. A spin coasts at its launch
//! velocity until the minimum spin time has passed, then each frame
//! multiplies the velocity by the friction coefficient. The first decayed
//! velocity under the stop epsilon ends the spin without advancing the wheel.
//!
//! Profiles are planned at one tick per frame interval. Hosts that tick at
//! another rate are handled by the driver, which scales each step by the
//! frames elapsed and refits aimed spins with [`fit_velocity`].

use crate::{config::MotionConfig, types::Millis};
use serde::{Deserialize, Serialize};

/// Upper bound on decay ticks, reached only with friction a hair under 1.
const MAX_DECAY_TICKS: u64 = 10_000_000;

/// Bisection steps when solving a velocity for a distance.
const SOLVE_ITERATIONS: usize = 48;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotionProfile {
    pub initial_velocity: f64,
    pub friction:         f64,
    pub stop_epsilon:     f64,
    /// Ticks before friction engages, at one tick per frame interval.
    pub coast_ticks:      u64,
    /// Ticks from friction engaging until the wheel stops.
    pub decay_ticks:      u64,
    /// Distance the schedule covers if every tick lands on a frame boundary.
    pub planned_distance: f64,
    pub planned_duration_ms: Millis,
}

impl MotionProfile {
    /// Launch velocity chosen so the coast + decay schedule covers
    /// `distance`, overshooting by at most one decayed step.
    pub fn aimed(distance: f64, config: &MotionConfig) -> Self {
        let coast = config.coast_ticks() as f64;
        let velocity = solve_velocity(distance, coast, config.friction, config.stop_epsilon);
        Self::from_velocity(velocity, config)
    }

    /// Profile for a free launch; where it ends is up to the friction.
    pub fn free(initial_velocity: f64, config: &MotionConfig) -> Self {
        Self::from_velocity(initial_velocity, config)
    }

    fn from_velocity(initial_velocity: f64, config: &MotionConfig) -> Self {
        let coast_ticks = config.coast_ticks();
        let decay_ticks = ticks_to_stop(initial_velocity, config.friction, config.stop_epsilon);
        let planned_distance = coast_ticks as f64 * initial_velocity
            + decay_distance(initial_velocity, config.friction, config.stop_epsilon);
        Self {
            initial_velocity,
            friction: config.friction,
            stop_epsilon: config.stop_epsilon,
            coast_ticks,
            decay_ticks,
            planned_distance,
            planned_duration_ms: (coast_ticks + decay_ticks) * config.frame_interval_ms,
        }
    }

    pub fn total_ticks(&self) -> u64 {
        self.coast_ticks + self.decay_ticks
    }
}

/// Velocity for a schedule that moves `lead_ticks` frames at full speed,
/// then decays under `friction`, covering `distance` in total.
pub fn solve_velocity(distance: f64, lead_ticks: f64, friction: f64, epsilon: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }
    let covered = |v: f64| lead_ticks * v + decay_distance(v, friction, epsilon);

    // covered() never decreases with velocity, and its first decayed term
    // alone reaches `distance` at the upper bound.
    let (mut lo, mut hi) = (0.0, 2.0 * distance.max(epsilon) / friction);
    for _ in 0..SOLVE_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if covered(mid) < distance {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

/// Velocity for the current frame of a decaying aimed spin with `remaining`
/// travel left: this frame's step plus the decay after it covers the rest.
pub fn fit_velocity(remaining: f64, friction: f64, epsilon: f64) -> f64 {
    solve_velocity(remaining, 1.0, friction, epsilon)
}

/// Friction applied over `frames` frame intervals. Exact at the nominal rate.
pub fn friction_over(friction: f64, frames: f64) -> f64 {
    if frames == 1.0 {
        friction
    } else {
        friction.powf(frames)
    }
}

/// Decay ticks until `velocity` falls below `epsilon` under `friction`.
/// Counts the stopping tick. Pure and deterministic.
pub fn ticks_to_stop(velocity: f64, friction: f64, epsilon: f64) -> u64 {
    let mut v = velocity;
    let mut ticks = 0;
    while ticks < MAX_DECAY_TICKS {
        ticks += 1;
        v *= friction;
        if v < epsilon {
            break;
        }
    }
    ticks
}

/// Angle covered during decay: every decayed velocity still at or above
/// `epsilon` is added once.
pub fn decay_distance(velocity: f64, friction: f64, epsilon: f64) -> f64 {
    let mut v = velocity;
    let mut distance = 0.0;
    for _ in 0..MAX_DECAY_TICKS {
        v *= friction;
        if v < epsilon {
            break;
        }
        distance += v;
    }
    distance
}
