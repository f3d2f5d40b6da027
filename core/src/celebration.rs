//! Celebration hints for the renderer: whether an outcome earns confetti,
//! and the spawn seeds for a burst. Animating the particles is the
//! renderer's job; every random choice is made here, once per piece.

use crate::rng::UniformSource;
use serde::Serialize;

pub const CONFETTI_PALETTE: [&str; 7] = [
    "#6e8efb", "#a777e3", "#FF9800", "#00B74A", "#9C27B0", "#F44336", "#3F51B5",
];

pub fn celebrates(label: &str, loss_label: &str) -> bool {
    label != loss_label
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfettiShape {
    Square,
    Circle,
    Triangle,
}

impl ConfettiShape {
    pub fn from_draw(u: f64) -> Self {
        match (u * 3.0) as usize {
            0 => Self::Square,
            1 => Self::Circle,
            _ => Self::Triangle,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal spawn position as a fraction of the viewport width.
    pub x_fraction:   f64,
    /// Vertical spawn offset as a fraction of the viewport height, above the top edge.
    pub y_fraction:   f64,
    pub size:         f64,
    pub color:        &'static str,
    pub rotation_deg: f64,
    pub speed_y:      f64,
    pub speed_x:      f64,
    pub spin:         f64,
    pub shape:        ConfettiShape,
}

pub fn confetti_burst(count: usize, random: &mut dyn UniformSource) -> Vec<ConfettiPiece> {
    (0..count)
        .map(|_| {
            let x_fraction = random.next_f64();
            let y_fraction = -random.next_f64();
            let size = random.next_between(5.0, 15.0);
            let color_index = (random.next_f64() * CONFETTI_PALETTE.len() as f64) as usize;
            ConfettiPiece {
                x_fraction,
                y_fraction,
                size,
                color: CONFETTI_PALETTE[color_index.min(CONFETTI_PALETTE.len() - 1)],
                rotation_deg: random.next_between(0.0, 360.0),
                speed_y: random.next_between(2.0, 5.0),
                speed_x: random.next_between(-3.0, 3.0),
                spin: random.next_between(-1.0, 1.0),
                shape: ConfettiShape::from_draw(random.next_f64()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, RngSlot, ScriptedSource};

    #[test]
    fn loss_label_does_not_celebrate() {
        assert!(!celebrates("Perdu", "Perdu"));
        assert!(celebrates("Soda", "Perdu"));
    }

    #[test]
    fn shape_draws_cover_all_three() {
        assert_eq!(ConfettiShape::from_draw(0.0), ConfettiShape::Square);
        assert_eq!(ConfettiShape::from_draw(0.5), ConfettiShape::Circle);
        assert_eq!(ConfettiShape::from_draw(0.999), ConfettiShape::Triangle);
    }

    #[test]
    fn burst_pieces_stay_in_range() {
        let mut rng = RngBank::new(5).for_slot(RngSlot::Celebration);
        let burst = confetti_burst(200, &mut rng);
        assert_eq!(burst.len(), 200);
        for piece in &burst {
            assert!((0.0..1.0).contains(&piece.x_fraction));
            assert!(piece.y_fraction <= 0.0 && piece.y_fraction > -1.0);
            assert!((5.0..15.0).contains(&piece.size));
            assert!((2.0..5.0).contains(&piece.speed_y));
        }
    }

    #[test]
    fn scripted_burst_is_reproducible() {
        let mut a = ScriptedSource::new(vec![0.1, 0.4, 0.7]);
        let mut b = ScriptedSource::new(vec![0.1, 0.4, 0.7]);
        assert_eq!(confetti_burst(3, &mut a), confetti_burst(3, &mut b));
    }
}
