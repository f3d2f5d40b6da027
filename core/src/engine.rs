//! The animation driver: owns the spin state and advances it one tick
//! at a time.
//!
//! SPIN LIFECYCLE:
//!   1. `request_spin()` while Idle draws the outcome (aimed policy) or
//!      the launch velocity (free-friction policy) and enters Spinning.
//!      While Spinning it is a no-op.
//!   2. Each `tick()` reads the clock, applies friction once the minimum
//!      spin time has elapsed, advances the angle by the velocity times
//!      the frame intervals since the last tick, and checks the stop
//!      condition. Aimed spins refit their velocity to the travel left
//!      while decaying, so they settle on target at any tick rate.
//!   3. On stop the resolver reads the sector under the pointer and
//!      `SpinCompleted` is emitted, once.
//!
//! RULES:
//!   - Only the engine mutates `SpinState`.
//!   - The engine never schedules itself; hosts call `tick()`.
//!   - All randomness flows through the injected sources.

use crate::{
    celebration::{celebrates, confetti_burst, ConfettiPiece},
    clock::{Clock, ManualClock},
    config::{SpinPolicy, WheelConfig},
    error::{WheelError, WheelResult},
    event::{SpinOutcome, WheelEvent},
    layout::WheelLayout,
    motion::{fit_velocity, friction_over, MotionProfile},
    reconciler::{reconcile, OutcomeDraw},
    resolver::{pointer_angle, resolve},
    rng::{RngBank, RngSlot, UniformSource},
    selector::select_sector,
    snapshot::FrameSnapshot,
    types::{Millis, SpinId, Tick, TAU},
};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Remaining travel below which an aimed spin counts as arrived.
const ARRIVAL_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinState {
    pub current_angle:    f64,
    /// Radians per frame interval.
    pub angular_velocity: f64,
    pub is_spinning:      bool,
    pub spin_started_at:  Millis,
    pub target_angle:     Option<f64>,
}

impl Default for SpinState {
    fn default() -> Self {
        Self {
            current_angle:    0.0,
            angular_velocity: 0.0,
            is_spinning:      false,
            spin_started_at:  0,
            target_angle:     None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    Spinning,
}

struct ActiveSpin {
    spin_id:          SpinId,
    draw:             Option<OutcomeDraw>,
    profile:          MotionProfile,
    /// Travel left before the aimed target; `None` under free friction.
    remaining:        Option<f64>,
    last_tick_ms:     Millis,
    ticks:            u64,
    friction_engaged: bool,
}

pub struct WheelEngine {
    config:       WheelConfig,
    layout:       WheelLayout,
    state:        SpinState,
    random:       Box<dyn UniformSource>,
    confetti_rng: Box<dyn UniformSource>,
    clock:        Box<dyn Clock>,
    current_tick: Tick,
    next_spin_id: SpinId,
    active:       Option<ActiveSpin>,
    pending:      Vec<WheelEvent>,
    completions:  Option<Sender<SpinOutcome>>,
    last_outcome: Option<SpinOutcome>,
}

impl WheelEngine {
    /// Engine whose draws come from seeded streams of `seed`.
    pub fn new(config: WheelConfig, seed: u64, clock: Box<dyn Clock>) -> WheelResult<Self> {
        let bank = RngBank::new(seed);
        Self::assemble(
            config,
            Box::new(bank.for_slot(RngSlot::Spin)),
            Box::new(bank.for_slot(RngSlot::Celebration)),
            clock,
        )
    }

    /// Engine whose spin draws and confetti come from caller-supplied sources.
    pub fn with_random(
        config: WheelConfig,
        random: Box<dyn UniformSource>,
        confetti_rng: Box<dyn UniformSource>,
        clock: Box<dyn Clock>,
    ) -> WheelResult<Self> {
        Self::assemble(config, random, confetti_rng, clock)
    }

    /// Test wiring: the default test wheel on a manual clock.
    /// The returned clock handle drives the engine's clock.
    pub fn build_test(seed: u64) -> WheelResult<(Self, ManualClock)> {
        let clock = ManualClock::new();
        let engine = Self::new(WheelConfig::default_test(), seed, Box::new(clock.clone()))?;
        Ok((engine, clock))
    }

    fn assemble(
        config: WheelConfig,
        random: Box<dyn UniformSource>,
        confetti_rng: Box<dyn UniformSource>,
        clock: Box<dyn Clock>,
    ) -> WheelResult<Self> {
        config.validate()?;
        let layout = config.layout()?;
        log::debug!(
            "engine ready: wheel='{}' sectors={} policy={:?}",
            config.name,
            layout.len(),
            config.motion.policy
        );
        Ok(Self {
            config,
            layout,
            state: SpinState::default(),
            random,
            confetti_rng,
            clock,
            current_tick: 0,
            next_spin_id: 1,
            active: None,
            pending: Vec::new(),
            completions: None,
            last_outcome: None,
        })
    }

    pub fn config(&self) -> &WheelConfig { &self.config }
    pub fn layout(&self) -> &WheelLayout { &self.layout }
    pub fn state(&self) -> &SpinState { &self.state }
    pub fn current_tick(&self) -> Tick { self.current_tick }
    pub fn last_outcome(&self) -> Option<&SpinOutcome> { self.last_outcome.as_ref() }

    pub fn phase(&self) -> DriverPhase {
        if self.state.is_spinning { DriverPhase::Spinning } else { DriverPhase::Idle }
    }

    /// The draw behind the spin in flight, if it was aimed.
    pub fn active_draw(&self) -> Option<&OutcomeDraw> {
        self.active.as_ref().and_then(|a| a.draw.as_ref())
    }

    /// The motion profile of the spin in flight.
    pub fn active_profile(&self) -> Option<&MotionProfile> {
        self.active.as_ref().map(|a| &a.profile)
    }

    /// Open a channel that receives every completed spin.
    /// Replaces any previously registered receiver.
    pub fn subscribe(&mut self) -> Receiver<SpinOutcome> {
        let (tx, rx) = channel();
        self.completions = Some(tx);
        rx
    }

    /// Start a spin. Returns `None`, leaving the state untouched, when a
    /// spin is already in flight.
    pub fn request_spin(&mut self) -> Option<SpinId> {
        if self.state.is_spinning {
            log::warn!("tick={} spin request ignored: wheel already spinning", self.current_tick);
            self.pending.push(WheelEvent::SpinRejected { tick: self.current_tick });
            return None;
        }

        let spin_id = self.next_spin_id;
        self.next_spin_id += 1;
        let now = self.clock.now_ms();
        let motion = &self.config.motion;

        let (draw, profile) = match motion.policy {
            SpinPolicy::Aimed => {
                let sector = select_sector(&self.layout, self.random.as_mut());
                let target = reconcile(
                    sector,
                    self.state.current_angle,
                    &self.config.reconcile,
                    self.random.as_mut(),
                );
                let profile = MotionProfile::aimed(target.final_angular_distance, motion);
                let draw = OutcomeDraw {
                    spin_id,
                    sector_index: sector.index,
                    label: sector.label.clone(),
                    target,
                };
                (Some(draw), profile)
            }
            SpinPolicy::FreeFriction => {
                let range = motion.launch_velocity;
                let velocity = self.random.next_between(range.min, range.max);
                (None, MotionProfile::free(velocity, motion))
            }
        };

        log::debug!(
            "tick={} spin {spin_id} started: v0={:.4} coast={} decay={} target={:?}",
            self.current_tick,
            profile.initial_velocity,
            profile.coast_ticks,
            profile.decay_ticks,
            draw.as_ref().map(|d| d.label.as_str())
        );

        self.state.is_spinning = true;
        self.state.angular_velocity = profile.initial_velocity;
        self.state.spin_started_at = now;
        self.state.target_angle = draw.as_ref().map(|d| d.target.target_angle);

        self.pending.push(WheelEvent::SpinStarted {
            tick: self.current_tick,
            spin_id,
            policy: motion.policy,
            initial_velocity: profile.initial_velocity,
            target_label: draw.as_ref().map(|d| d.label.clone()),
            target_angle: draw.as_ref().map(|d| d.target.target_angle),
            final_angular_distance: draw.as_ref().map(|d| d.target.final_angular_distance),
        });

        self.active = Some(ActiveSpin {
            spin_id,
            remaining: draw.as_ref().map(|d| d.target.final_angular_distance),
            draw,
            profile,
            last_tick_ms: now,
            ticks: 0,
            friction_engaged: false,
        });
        Some(spin_id)
    }

    /// Advance one frame. Returns the events raised since the last tick,
    /// including those queued by `request_spin()`.
    pub fn tick(&mut self) -> Vec<WheelEvent> {
        self.current_tick += 1;
        let tick = self.current_tick;
        let mut events = std::mem::take(&mut self.pending);

        let Some(mut spin) = self.active.take() else {
            return events;
        };

        let now = self.clock.now_ms();
        let elapsed = now.saturating_sub(self.state.spin_started_at);
        let motion = &self.config.motion;
        let frames =
            now.saturating_sub(spin.last_tick_ms) as f64 / motion.frame_interval_ms as f64;
        spin.last_tick_ms = now;
        spin.ticks += 1;

        if elapsed > motion.min_spin_ms {
            if !spin.friction_engaged {
                spin.friction_engaged = true;
                events.push(WheelEvent::FrictionEngaged {
                    tick,
                    spin_id: spin.spin_id,
                    elapsed_ms: elapsed,
                });
            }
            self.state.angular_velocity = match spin.remaining {
                Some(remaining) => fit_velocity(remaining, motion.friction, motion.stop_epsilon),
                None => self.state.angular_velocity * friction_over(motion.friction, frames),
            };
        }

        let velocity = self.state.angular_velocity;
        let below_epsilon = velocity < motion.stop_epsilon;
        let step = match spin.remaining.as_mut() {
            Some(remaining) => {
                // Too slow to go on: the last step closes the gap.
                let step = if below_epsilon {
                    *remaining
                } else {
                    (velocity * frames).min(*remaining)
                };
                *remaining -= step;
                step
            }
            None if below_epsilon => 0.0,
            None => velocity * frames,
        };
        self.state.current_angle = (self.state.current_angle + step).rem_euclid(TAU);

        let stopped = spin.remaining.is_none() && below_epsilon;
        let arrived = spin.remaining.is_some_and(|r| r <= ARRIVAL_EPSILON);
        if stopped || arrived {
            events.push(self.finish(spin, tick, elapsed));
        } else {
            self.active = Some(spin);
        }
        events
    }

    fn finish(&mut self, spin: ActiveSpin, tick: Tick, elapsed_ms: Millis) -> WheelEvent {
        if let Some(draw) = &spin.draw {
            let residual = spin.remaining.unwrap_or(0.0);
            log::debug!("spin {} settling onto target, residual={residual:.5} rad", spin.spin_id);
            self.state.current_angle = draw.target.target_angle;
        }
        self.state.angular_velocity = 0.0;
        self.state.is_spinning = false;

        let final_angle = self.state.current_angle;
        let sector = resolve(&self.layout, final_angle);
        let (sector_index, label) = (sector.index, sector.label.clone());
        let intended_index = spin.draw.as_ref().map(|d| d.sector_index);

        let outcome = SpinOutcome {
            spin_id: spin.spin_id,
            sector_index,
            celebrate: celebrates(&label, &self.config.celebration.loss_label),
            label,
            final_angle,
            pointer_angle: pointer_angle(final_angle),
            intended_index,
            ticks: spin.ticks,
            elapsed_ms,
        };

        if !outcome.matches_intent() {
            log::error!(
                "spin {} landed on sector {} but was aimed at {:?}; resolver result stands",
                outcome.spin_id,
                outcome.sector_index,
                outcome.intended_index
            );
        }
        log::info!(
            "tick={tick} spin {} stopped on '{}' after {} ticks",
            outcome.spin_id,
            outcome.label,
            outcome.ticks
        );

        let receiver_gone = self
            .completions
            .as_ref()
            .is_some_and(|tx| tx.send(outcome.clone()).is_err());
        if receiver_gone {
            log::warn!("completion receiver dropped; no longer publishing outcomes");
            self.completions = None;
        }
        self.last_outcome = Some(outcome.clone());
        WheelEvent::SpinCompleted { tick, outcome }
    }

    /// Tick until the wheel is idle, advancing `clock` by one frame
    /// interval before each tick. Used for headless runs and tests.
    pub fn run_until_idle(
        &mut self,
        clock: &ManualClock,
        max_ticks: u64,
    ) -> WheelResult<Vec<WheelEvent>> {
        let frame = self.config.motion.frame_interval_ms;
        let mut events = Vec::new();
        let mut ticks = 0;
        while self.state.is_spinning {
            if ticks == max_ticks {
                let spin_id = self.active.as_ref().map(|a| a.spin_id).unwrap_or_default();
                return Err(WheelError::SpinStalled { spin_id, ticks });
            }
            clock.advance(frame);
            events.extend(self.tick());
            ticks += 1;
        }
        // Flush anything queued after the last spin settled.
        events.append(&mut self.pending);
        Ok(events)
    }

    /// What the renderer needs for the current frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        let sector = resolve(&self.layout, self.state.current_angle);
        FrameSnapshot {
            tick: self.current_tick,
            current_angle: self.state.current_angle,
            css_rotation: self.state.current_angle - std::f64::consts::FRAC_PI_2,
            angular_velocity: self.state.angular_velocity,
            is_spinning: self.state.is_spinning,
            pointer_sector_index: sector.index,
            pointer_label: sector.label.clone(),
        }
    }

    /// Spawn seeds for a confetti burst, sized by configuration.
    pub fn celebration_burst(&mut self) -> Vec<ConfettiPiece> {
        confetti_burst(self.config.celebration.confetti_count, self.confetti_rng.as_mut())
    }
}
