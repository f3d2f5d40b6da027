//! Weighted outcome selection, independent of geometry.

use crate::{layout::{Sector, WheelLayout}, rng::UniformSource};

/// Draw one sector with probability proportional to its weight.
pub fn select_sector<'a>(layout: &'a WheelLayout, random: &mut dyn UniformSource) -> &'a Sector {
    let threshold = random.next_f64() * layout.total_weight();
    let index = index_for_threshold(layout, threshold);
    &layout.sectors()[index]
}

/// The first sector whose cumulative weight reaches `threshold`.
/// Falls back to the last sector when accumulation drift leaves the
/// threshold unmatched.
pub fn index_for_threshold(layout: &WheelLayout, threshold: f64) -> usize {
    let mut cumulative = 0.0;
    for sector in layout.sectors() {
        cumulative += sector.weight;
        if cumulative >= threshold {
            return sector.index;
        }
    }
    layout.len() - 1
}
