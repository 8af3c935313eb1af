//! Tramp geometry and mass model.

use crate::types::{BurdenSeverity, Orientation, TrampGeometry, TrampShape};

const MM_TO_M: f64 = 1.0e-3;

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Estimated mass (kg), volume times density.
///
/// Missing or non-positive dimensions give 0.0: no mass information.
pub fn estimate_mass(geometry: &TrampGeometry) -> f64 {
    let volume_m3 = match geometry.shape {
        TrampShape::Cube => match positive(geometry.cube_size_mm) {
            Some(side) => (side * MM_TO_M).powi(3),
            None => return 0.0,
        },
        _ => match (
            positive(geometry.length_mm),
            positive(geometry.width_mm),
            positive(geometry.thickness_mm),
        ) {
            (Some(l), Some(w), Some(t)) => (l * MM_TO_M) * (w * MM_TO_M) * (t * MM_TO_M),
            _ => return 0.0,
        },
    };
    volume_m3 * geometry.density()
}

/// Area (m^2) the object presents to the magnet face in the given orientation.
///
/// Cubes scale one face by the orientation's cube area factor. Rectangular
/// shapes lying flat present `length x max(width, thickness)`; any other
/// orientation presents `length x min(width, thickness)` scaled by the edge
/// area factor. Returns 0.0 when width and thickness are both unusable.
pub fn effective_contact_area(geometry: &TrampGeometry, orientation: Orientation) -> f64 {
    if geometry.shape == TrampShape::Cube {
        return match positive(geometry.cube_size_mm) {
            Some(side) => (side * MM_TO_M).powi(2) * orientation.cube_area_factor(),
            None => 0.0,
        };
    }

    let width = positive(geometry.width_mm);
    let thickness = positive(geometry.thickness_mm);
    let (broad, narrow) = match (width, thickness) {
        (None, None) => return 0.0,
        (Some(w), None) => (w, w),
        (None, Some(t)) => (t, t),
        (Some(w), Some(t)) => (w.max(t), w.min(t)),
    };
    let length = positive(geometry.length_mm).unwrap_or(broad);

    match orientation {
        Orientation::Flat => (length * MM_TO_M) * (broad * MM_TO_M),
        _ => (length * MM_TO_M) * (narrow * MM_TO_M) * orientation.edge_area_factor(),
    }
}

/// Force-demand multiplier for an orientation.
pub fn orientation_factor(orientation: Orientation) -> f64 {
    orientation.force_factor()
}

/// Force-demand multiplier for a burden severity.
pub fn burden_factor(severity: BurdenSeverity) -> f64 {
    severity.factor()
}
