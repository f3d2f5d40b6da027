//! Sector layout: turns an ordered list of weighted sectors into angular
//! ranges that tile `[0, 2π)` exactly.
//!
//! RULE: the builder never reorders. Visual reordering (for example the
//! prize/loss interleave) is an explicit transform on the input list.

use crate::{
    config::SectorConfig,
    error::{WheelError, WheelResult},
    types::TAU,
};
use serde::{Deserialize, Serialize};

/// How arc widths are assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArcMode {
    /// Arc width proportional to weight.
    #[default]
    Weighted,
    /// Every sector gets `2π / n`; weights only drive the draw.
    Uniform,
}

/// Rendering hint. Selection logic never looks at it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayShape {
    #[default]
    Uniform,
    TriangleAccent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sector {
    pub index:         usize,
    pub label:         String,
    pub weight:        f64,
    pub color:         String,
    pub text_color:    String,
    pub start_angle:   f64,
    pub end_angle:     f64,
    pub display_shape: DisplayShape,
}

impl Sector {
    pub fn arc_width(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Half-open containment: `[start, end)`.
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }

    pub fn center_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Immutable snapshot of the wheel for one render/selection cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelLayout {
    sectors:      Vec<Sector>,
    total_weight: f64,
    arc_mode:     ArcMode,
}

impl WheelLayout {
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn arc_mode(&self) -> ArcMode {
        self.arc_mode
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sector> {
        self.sectors.get(index)
    }

    /// The share of the draw a sector receives, in [0, 1].
    pub fn probability(&self, index: usize) -> f64 {
        self.sectors
            .get(index)
            .map(|s| s.weight / self.total_weight)
            .unwrap_or(0.0)
    }

    /// Aggregate probability per distinct label, in first-seen order.
    pub fn label_probabilities(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = Vec::new();
        for sector in &self.sectors {
            let p = sector.weight / self.total_weight;
            match out.iter_mut().find(|(label, _)| *label == sector.label) {
                Some((_, acc)) => *acc += p,
                None => out.push((sector.label.clone(), p)),
            }
        }
        out
    }
}

/// Assign each sector its angular range, in input order.
pub fn build_layout(configs: &[SectorConfig], arc_mode: ArcMode) -> WheelResult<WheelLayout> {
    if configs.is_empty() {
        return Err(WheelError::invalid("a wheel needs at least one sector"));
    }
    if let Some(bad) = configs.iter().find(|c| !(c.weight > 0.0 && c.weight.is_finite())) {
        return Err(WheelError::invalid(format!(
            "sector '{}' has non-positive weight {}",
            bad.label, bad.weight
        )));
    }

    let total_weight: f64 = configs.iter().map(|c| c.weight).sum();
    let count = configs.len();

    let mut sectors = Vec::with_capacity(count);
    let mut cursor = 0.0;
    // Arcs are accumulated from the running weight sum rather than by adding
    // widths, so the last sector closes the circle at exactly 2π.
    let mut cumulative = 0.0;
    for (index, config) in configs.iter().enumerate() {
        let end = if index + 1 == count {
            TAU
        } else {
            match arc_mode {
                ArcMode::Weighted => {
                    cumulative += config.weight;
                    TAU * cumulative / total_weight
                }
                ArcMode::Uniform => TAU * (index + 1) as f64 / count as f64,
            }
        };
        sectors.push(Sector {
            index,
            label:         config.label.clone(),
            weight:        config.weight,
            color:         config.color.clone(),
            text_color:    config.text_color.clone(),
            start_angle:   cursor,
            end_angle:     end,
            display_shape: config.shape,
        });
        cursor = end;
    }

    log::debug!(
        "layout built: {count} sectors, total_weight={total_weight}, mode={arc_mode:?}"
    );

    Ok(WheelLayout { sectors, total_weight, arc_mode })
}

/// Reorder a prize list so every prize is followed by a copy of the loss
/// sector. Prizes split `100 - loss_share` percent evenly, loss copies split
/// `loss_share` percent evenly.
pub fn interleave_losses(
    configs: &[SectorConfig],
    loss_label: &str,
    loss_share: f64,
) -> WheelResult<Vec<SectorConfig>> {
    if !(loss_share > 0.0 && loss_share < 100.0) {
        return Err(WheelError::invalid(format!(
            "loss_share must be between 0 and 100 percent, got {loss_share}"
        )));
    }
    let loss = configs
        .iter()
        .find(|c| c.label == loss_label)
        .ok_or_else(|| WheelError::invalid(format!("no loss sector labelled '{loss_label}'")))?;
    let prizes: Vec<&SectorConfig> = configs.iter().filter(|c| c.label != loss_label).collect();
    if prizes.is_empty() {
        return Err(WheelError::invalid("interleave needs at least one prize sector"));
    }

    let prize_weight = (100.0 - loss_share) / prizes.len() as f64;
    let loss_weight = loss_share / prizes.len() as f64;

    let mut out = Vec::with_capacity(prizes.len() * 2);
    for prize in prizes {
        out.push(SectorConfig {
            weight: prize_weight,
            shape: DisplayShape::TriangleAccent,
            ..prize.clone()
        });
        out.push(SectorConfig {
            weight: loss_weight,
            shape: DisplayShape::Uniform,
            ..loss.clone()
        });
    }
    Ok(out)
}
