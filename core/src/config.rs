//! Wheel configuration: sectors, layout mode, reconciliation and motion
//! tuning. Deserialised from JSON; validated once, at startup.

use crate::{
    error::{WheelError, WheelResult},
    layout::{build_layout, interleave_losses, ArcMode, DisplayShape, WheelLayout},
    types::Millis,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorConfig {
    pub label: String,
    pub weight: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default)]
    pub shape: DisplayShape,
}

impl SectorConfig {
    pub fn new(label: &str, weight: f64, color: &str, text_color: &str) -> Self {
        Self {
            label: label.into(),
            weight,
            color: color.into(),
            text_color: text_color.into(),
            shape: DisplayShape::Uniform,
        }
    }
}

fn default_color() -> String { "#7F8C8D".into() }
fn default_text_color() -> String { "#FFFFFF".into() }

/// Explicit reorder applied before layout: prizes alternate with copies
/// of the loss sector, which together keep `loss_share` percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterleaveConfig {
    pub loss_label: String,
    pub loss_share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Fraction of the arc width kept clear on both edges.
    pub edge_margin: f64,
    /// Smallest visible travel (radians) beyond the full turns.
    pub min_delta: f64,
    pub min_rotations: u32,
    pub max_rotations: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            edge_margin:   0.1,
            min_delta:     0.5,
            min_rotations: 4,
            max_rotations: 7,
        }
    }
}

impl ReconcileConfig {
    pub fn validate(&self) -> WheelResult<()> {
        // A zero margin lets the aim sit on a boundary, which the pointer
        // may read as the neighbouring sector.
        if !(self.edge_margin > 0.0 && self.edge_margin < 0.5) {
            return Err(WheelError::invalid(format!(
                "edge_margin must be in (0, 0.5), got {}",
                self.edge_margin
            )));
        }
        if !self.min_delta.is_finite() || self.min_delta < 0.0 {
            return Err(WheelError::invalid(format!(
                "min_delta must be a non-negative finite angle, got {}",
                self.min_delta
            )));
        }
        if self.min_rotations > self.max_rotations {
            return Err(WheelError::invalid(format!(
                "rotation range {}..={} is empty",
                self.min_rotations, self.max_rotations
            )));
        }
        Ok(())
    }
}

/// Which landing design every spin of the wheel follows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpinPolicy {
    /// Draw the outcome first, then aim the spin at it.
    #[default]
    Aimed,
    /// Launch at a random velocity and read whatever lands under the pointer.
    FreeFriction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VelocityRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    pub policy: SpinPolicy,
    /// Per-tick velocity multiplier once friction engages. Closer to 1 = longer spin.
    pub friction: f64,
    /// Radians per tick below which the wheel is considered stopped.
    pub stop_epsilon: f64,
    /// Friction stays off until this much time has elapsed.
    pub min_spin_ms: Millis,
    pub frame_interval_ms: Millis,
    /// Launch velocities (radians per tick) for the free-friction policy.
    pub launch_velocity: VelocityRange,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            policy:            SpinPolicy::Aimed,
            friction:          0.975,
            stop_epsilon:      0.002,
            min_spin_ms:       1099,
            frame_interval_ms: 16,
            launch_velocity:   VelocityRange { min: 0.25, max: 0.45 },
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> WheelResult<()> {
        // Also rejects NaN.
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(WheelError::invalid(format!(
                "friction must lie strictly between 0 and 1, got {}",
                self.friction
            )));
        }
        if !(self.stop_epsilon > 0.0 && self.stop_epsilon.is_finite()) {
            return Err(WheelError::invalid(format!(
                "stop_epsilon must be positive, got {}",
                self.stop_epsilon
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(WheelError::invalid("frame_interval_ms must be at least 1"));
        }
        let VelocityRange { min, max } = self.launch_velocity;
        if !(min.is_finite() && max.is_finite() && min > self.stop_epsilon && min <= max) {
            return Err(WheelError::invalid(format!(
                "launch_velocity {min}..{max} must be ordered and above stop_epsilon"
            )));
        }
        Ok(())
    }

    /// Ticks that run before friction engages, assuming one tick per frame.
    pub fn coast_ticks(&self) -> u64 {
        self.min_spin_ms / self.frame_interval_ms.max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CelebrationConfig {
    /// Landing on this label does not celebrate.
    pub loss_label: String,
    pub confetti_count: usize,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            loss_label:     "Perdu".into(),
            confetti_count: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelConfig {
    #[serde(default)]
    pub name: String,
    pub sectors: Vec<SectorConfig>,
    #[serde(default)]
    pub arc_mode: ArcMode,
    #[serde(default)]
    pub interleave: Option<InterleaveConfig>,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub celebration: CelebrationConfig,
}

impl WheelConfig {
    /// Load and validate a wheel definition from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid wheel config {path}: {e}"))?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> WheelResult<Self> {
        let config: WheelConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on anything that could misbehave mid-spin.
    pub fn validate(&self) -> WheelResult<()> {
        self.motion.validate()?;
        self.reconcile.validate()?;
        self.layout()?;
        Ok(())
    }

    /// Build a fresh immutable layout from the current configuration.
    pub fn layout(&self) -> WheelResult<WheelLayout> {
        match &self.interleave {
            Some(rule) => {
                let ordered = interleave_losses(&self.sectors, &rule.loss_label, rule.loss_share)?;
                build_layout(&ordered, self.arc_mode)
            }
            None => build_layout(&self.sectors, self.arc_mode),
        }
    }

    /// Eight equal slices, three of them losing.
    pub fn classic() -> Self {
        let sectors = vec![
            SectorConfig::new("Bonbon",   1.0, "#FFBC03", "#333333"),
            SectorConfig::new("Soda",     1.0, "#FF5A10", "#333333"),
            SectorConfig::new("Sandwich", 1.0, "#FFBC03", "#333333"),
            SectorConfig::new("Perdu",    1.0, "#7F8C8D", "#FFFFFF"),
            SectorConfig::new("Perdu",    1.0, "#7F8C8D", "#FFFFFF"),
            SectorConfig::new("Perdu",    1.0, "#7F8C8D", "#FFFFFF"),
            SectorConfig::new("Soda",     1.0, "#FF5A10", "#333333"),
            SectorConfig::new("Bonbon",   1.0, "#FFBC03", "#333333"),
        ];
        Self {
            name: "classic".into(),
            sectors,
            arc_mode: ArcMode::Uniform,
            interleave: None,
            reconcile: ReconcileConfig::default(),
            motion: MotionConfig {
                friction: 0.991,
                min_spin_ms: 0,
                ..MotionConfig::default()
            },
            celebration: CelebrationConfig::default(),
        }
    }

    /// Prize slices alternating with a dominant "Perdu" slice (92%).
    pub fn interleaved() -> Self {
        let sectors = vec![
            SectorConfig::new("Perdu",       1.0, "#333",    "#FFFFFF"),
            SectorConfig::new("Soda",        1.0, "#6e8efb", "#333333"),
            SectorConfig::new("Barre Choco", 1.0, "#a777e3", "#333333"),
            SectorConfig::new("1 Frite !",   1.0, "#FF9800", "#333333"),
        ];
        Self {
            name: "interleaved".into(),
            sectors,
            arc_mode: ArcMode::Weighted,
            interleave: Some(InterleaveConfig {
                loss_label: "Perdu".into(),
                loss_share: 92.0,
            }),
            reconcile: ReconcileConfig::default(),
            motion: MotionConfig::default(),
            celebration: CelebrationConfig::default(),
        }
    }

    /// Config with hardcoded weights for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            name: "test".into(),
            sectors: vec![
                SectorConfig::new("Perdu", 92.0, "#333",    "#FFFFFF"),
                SectorConfig::new("Soda",   6.0, "#6e8efb", "#333333"),
                SectorConfig::new("Choco",  2.0, "#a777e3", "#333333"),
            ],
            arc_mode: ArcMode::Weighted,
            interleave: None,
            reconcile: ReconcileConfig::default(),
            motion: MotionConfig::default(),
            celebration: CelebrationConfig::default(),
        }
    }

    /// Pick a built-in configuration by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "classic"     => Some(Self::classic()),
            "interleaved" => Some(Self::interleaved()),
            "test"        => Some(Self::default_test()),
            _             => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for name in ["classic", "interleaved", "test"] {
            let config = WheelConfig::preset(name).expect("known preset");
            config.validate().unwrap_or_else(|e| panic!("{name} invalid: {e}"));
        }
    }

    #[test]
    fn friction_outside_unit_interval_rejected() {
        for friction in [0.0, 1.0, 1.2, -0.5, f64::NAN] {
            let motion = MotionConfig { friction, ..MotionConfig::default() };
            assert!(
                matches!(motion.validate(), Err(WheelError::InvalidConfiguration { .. })),
                "friction {friction} should be rejected"
            );
        }
    }

    #[test]
    fn empty_rotation_range_rejected() {
        let reconcile = ReconcileConfig {
            min_rotations: 8,
            max_rotations: 4,
            ..ReconcileConfig::default()
        };
        assert!(reconcile.validate().is_err());
    }

    #[test]
    fn edge_margin_must_keep_aim_off_boundaries() {
        for edge_margin in [0.0, -0.1, 0.5, f64::NAN] {
            let reconcile = ReconcileConfig { edge_margin, ..ReconcileConfig::default() };
            let err = reconcile.validate().unwrap_err();
            assert!(err.to_string().contains("edge_margin"), "{edge_margin}: {err}");
        }
        let thin = ReconcileConfig { edge_margin: 0.001, ..ReconcileConfig::default() };
        assert!(thin.validate().is_ok());
    }

    #[test]
    fn json_sections_fall_back_to_defaults() {
        let json = r##"{
            "sectors": [
                { "label": "Perdu", "weight": 3 },
                { "label": "Soda",  "weight": 1, "color": "#FF5A10" }
            ],
            "motion": { "friction": 0.98 }
        }"##;
        let config = WheelConfig::from_json(json).unwrap();
        assert_eq!(config.arc_mode, ArcMode::Weighted);
        assert_eq!(config.motion.friction, 0.98);
        assert_eq!(config.motion.stop_epsilon, 0.002);
        assert_eq!(config.reconcile, ReconcileConfig::default());
        assert_eq!(config.sectors[1].color, "#FF5A10");
    }

    #[test]
    fn json_with_zero_weight_fails_fast() {
        let json = r#"{ "sectors": [ { "label": "Perdu", "weight": 0 } ] }"#;
        assert!(matches!(
            WheelConfig::from_json(json),
            Err(WheelError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn coast_ticks_round_down() {
        let motion = MotionConfig::default();
        assert_eq!(motion.coast_ticks(), 68);
    }
}
