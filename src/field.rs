//! Parametric magnet field model: surface Gauss and Force Factor derived
//! from geometry, decayed exponentially with air gap.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::field::*;
use crate::error::{require_positive, Result};
use crate::types::{Grade, MagnetGeometry};

/// Gauss decay constant, `k = 0.1485 / backplate^0.95`.
///
/// Legacy records without a usable backplate get the fixed fallback.
pub fn decay_constant_gauss(backplate_mm: f64) -> f64 {
    if backplate_mm <= 0.0 {
        warn!(backplate_mm, "non-positive backplate, using legacy gauss decay");
        return LEGACY_GAUSS_DECAY;
    }
    GAUSS_DECAY_COEFFICIENT / backplate_mm.powf(GAUSS_DECAY_EXPONENT)
}

/// Force Factor decay constant, `k = 0.3438 / backplate`.
pub fn decay_constant_force_factor(backplate_mm: f64) -> f64 {
    if backplate_mm <= 0.0 {
        warn!(backplate_mm, "non-positive backplate, using legacy force factor decay");
        return LEGACY_FORCE_FACTOR_DECAY;
    }
    FORCE_FACTOR_DECAY_COEFFICIENT / backplate_mm
}

/// Surface field, `G0 = 2701 * core^0.88 / backplate^1.08 * grade`.
pub fn surface_gauss(core_mm: f64, backplate_mm: f64, grade: Grade) -> Result<f64> {
    let core_mm = require_positive("core_mm", core_mm)?;
    let backplate_mm = require_positive("backplate_mm", backplate_mm)?;
    Ok(GAUSS_COEFFICIENT * core_mm.powf(GAUSS_CORE_EXPONENT)
        / backplate_mm.powf(GAUSS_BACKPLATE_EXPONENT)
        * grade.multiplier())
}

/// Surface Force Factor, `FF0 = 1.725 * G0^2 / backplate`.
pub fn surface_force_factor(surface_gauss: f64, backplate_mm: f64) -> Result<f64> {
    let backplate_mm = require_positive("backplate_mm", backplate_mm)?;
    Ok(FORCE_FACTOR_COEFFICIENT * surface_gauss.powi(2) / backplate_mm)
}

/// Inverse of `surface_force_factor`: `G0 = sqrt(FF0 * backplate / 1.725)`.
pub fn gauss_for_force_factor(force_factor: f64, backplate_mm: f64) -> Result<f64> {
    let backplate_mm = require_positive("backplate_mm", backplate_mm)?;
    Ok((force_factor * backplate_mm / FORCE_FACTOR_COEFFICIENT).sqrt())
}

/// Exponential decay, `value * e^(-k * gap)`. A zero gap returns the surface value.
pub fn field_at_gap(surface_value: f64, gap_mm: f64, k: f64) -> f64 {
    surface_value * (-k * gap_mm).exp()
}

/// Distance at which a field with decay constant `k` falls to half strength.
pub fn half_strength_distance(k: f64) -> f64 {
    std::f64::consts::LN_2 / k
}

/// Field snapshot for one magnet at one gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagneticFieldValues {
    pub gap_mm: f64,
    pub surface_gauss: f64,
    pub gauss_at_gap: f64,
    pub surface_force_factor: f64,
    pub force_factor_at_gap: f64,
    pub k_gauss: f64,
    pub k_force_factor: f64,
    /// Gap at which Gauss reaches 50% of its surface value, `ln(2)/k_gauss`.
    pub gauss_half_distance_mm: f64,
    /// Gap at which Force Factor reaches 50% of its surface value.
    pub force_factor_half_distance_mm: f64,
}

pub fn all_field_values(magnet: &MagnetGeometry, gap_mm: f64) -> Result<MagneticFieldValues> {
    let g0 = surface_gauss(magnet.core_mm, magnet.backplate_mm, magnet.grade)?;
    let ff0 = surface_force_factor(g0, magnet.backplate_mm)?;
    let k_gauss = decay_constant_gauss(magnet.backplate_mm);
    let k_force_factor = decay_constant_force_factor(magnet.backplate_mm);

    let values = MagneticFieldValues {
        gap_mm,
        surface_gauss: g0,
        gauss_at_gap: field_at_gap(g0, gap_mm, k_gauss),
        surface_force_factor: ff0,
        force_factor_at_gap: field_at_gap(ff0, gap_mm, k_force_factor),
        k_gauss,
        k_force_factor,
        gauss_half_distance_mm: half_strength_distance(k_gauss),
        force_factor_half_distance_mm: half_strength_distance(k_force_factor),
    };
    debug!(
        core_mm = magnet.core_mm,
        backplate_mm = magnet.backplate_mm,
        gap_mm,
        gauss_at_gap = values.gauss_at_gap,
        force_factor_at_gap = values.force_factor_at_gap,
        "field values computed"
    );
    Ok(values)
}

/// Core and backplate dimensions recovered from a catalog model name.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDimensions {
    pub core_mm: f64,
    pub backplate_mm: f64,
}

fn model_name_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // "70 OCW 30", "70OCW30"; a single letter is a grade suffix, not a series code
            r"\b(\d+(?:\.\d+)?)\s*[A-Za-z]{2,}\s*(\d+(?:\.\d+)?)\b",
            // "70-30"
            r"\b(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\b",
            // "70 30"
            r"\b(\d+(?:\.\d+)?)\s+(\d+(?:\.\d+)?)\b",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

fn dimension(caps: &regex::Captures<'_>, idx: usize) -> Option<f64> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Best-effort parse of names like `"70 OCW 30"`, `"70-30 A30"` or `"70 30"`.
///
/// Patterns are tried in that order; a pattern yielding a zero dimension
/// falls through to the next one. `None` when nothing usable matches.
pub fn parse_model_name(name: &str) -> Option<ModelDimensions> {
    for re in model_name_patterns() {
        let Some(caps) = re.captures(name) else {
            continue;
        };
        let (Some(core_mm), Some(backplate_mm)) = (dimension(&caps, 1), dimension(&caps, 2)) else {
            continue;
        };
        if core_mm > 0.0 && backplate_mm > 0.0 {
            return Some(ModelDimensions {
                core_mm,
                backplate_mm,
            });
        }
        debug!(name, core_mm, backplate_mm, "zero dimension in model name, trying next pattern");
    }
    None
}
