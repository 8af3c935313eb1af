//! Required-force models.
//!
//! Three calibrations live side by side and are kept separate on purpose:
//!
//! * [`required_gauss_for_pickup`]: weight-based, converted to Gauss through
//!   the Force Factor surface/decay formulas.
//! * [`required_gauss_v2`]: legacy Gauss heuristic, still shown on older
//!   comparison pages.
//! * [`required_force_factor`]: current Force Factor heuristic, used to rank
//!   magnet/tramp combinations.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::extraction::*;
use crate::constants::physics::STEEL_DENSITY_G_CM3;
use crate::error::Result;
use crate::field::{
    decay_constant_force_factor, decay_constant_gauss, field_at_gap, gauss_for_force_factor,
};
use crate::tramp::{burden_factor, estimate_mass, orientation_factor};
use crate::types::{PartType, TrampExtractionInput, TrampScenario};

/* =========================
   (a) weight-based model
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBasedRequirement {
    pub mass_kg: f64,
    pub weight_n: f64,
    pub orientation_factor: f64,
    pub burden_factor: f64,
    pub safety_factor: f64,
    /// `weight * orientation * burden * safety`, read as Force Factor at the gap.
    pub required_force_n: f64,
    pub required_surface_force_factor: f64,
    pub required_surface_gauss: f64,
    pub required_gauss_at_gap: f64,
    pub k_gauss: f64,
    pub k_force_factor: f64,
    pub notes: Vec<String>,
}

/// Weight-based required field for a magnet with the given backplate.
///
/// The lifting force is lifted back to the surface with the Force Factor
/// decay, inverted through `FF0 = 1.725 * G0^2 / backplate`, then decayed
/// to the gap again with the Gauss decay constant.
pub fn required_gauss_for_pickup(
    scenario: &TrampScenario,
    backplate_mm: f64,
    gap_mm: f64,
    safety_factor: f64,
    gravity: f64,
) -> Result<WeightBasedRequirement> {
    let mass_kg = estimate_mass(&scenario.geometry);
    let weight_n = mass_kg * gravity;
    let of = orientation_factor(scenario.orientation);
    let bf = burden_factor(scenario.burden);
    let required_force_n = weight_n * of * bf * safety_factor;

    let k_force_factor = decay_constant_force_factor(backplate_mm);
    let k_gauss = decay_constant_gauss(backplate_mm);
    let required_surface_force_factor = required_force_n * (k_force_factor * gap_mm).exp();
    let required_surface_gauss = gauss_for_force_factor(required_surface_force_factor, backplate_mm)?;
    let required_gauss_at_gap = field_at_gap(required_surface_gauss, gap_mm, k_gauss);

    let mut notes = vec![
        format!("Estimated mass {:.3} kg, weight {:.2} N", mass_kg, weight_n),
        format!(
            "Orientation x{:.1}, burden x{:.1}, safety x{:.1}",
            of, bf, safety_factor
        ),
        format!(
            "Required {:.0} G at {:.0} mm ({:.0} G at surface)",
            required_gauss_at_gap, gap_mm, required_surface_gauss
        ),
    ];
    if mass_kg == 0.0 {
        notes.push("No usable dimensions; mass treated as zero".to_string());
    }

    Ok(WeightBasedRequirement {
        mass_kg,
        weight_n,
        orientation_factor: of,
        burden_factor: bf,
        safety_factor,
        required_force_n,
        required_surface_force_factor,
        required_surface_gauss,
        required_gauss_at_gap,
        k_gauss,
        k_force_factor,
        notes,
    })
}

/* =========================
   shared heuristic pipeline
   ========================= */

/// Ease factor for a bulk material, `None` when the material is not tabled.
pub fn material_factor(material: &str) -> Option<f64> {
    let key = material.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    MATERIAL_FACTORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, factor)| *factor)
}

/// Intermediate factors of the heuristic models, all after clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyBreakdown {
    pub width_mm: f64,
    pub length_mm: f64,
    pub height_mm: f64,
    pub belt_speed_mps: f64,
    pub burden_mm: f64,
    pub water_percent: f64,
    pub material_factor: f64,
    pub speed_loss: f64,
    pub embedding_loss: f64,
    pub water_penalty: f64,
    pub aspect_ratio: f64,
    pub thinness: f64,
    pub shape_penalty: f64,
    pub volume_cm3: f64,
    pub mass_g: f64,
    /// `mass_g * sqrt(volume_cm3)`.
    pub moment_factor: f64,
    pub ease_factor: f64,
    /// `1 / max(ease, 0.05)`, so at most 20.
    pub difficulty_multiplier: f64,
}

fn floor_dimension(name: &str, value: f64, notes: &mut Vec<String>) -> f64 {
    if value >= MIN_DIMENSION_MM {
        return value;
    }
    warn!(dimension = name, value, "non-positive tramp dimension floored");
    notes.push(format!("{name} {value} mm floored to {MIN_DIMENSION_MM} mm"));
    MIN_DIMENSION_MM
}

pub fn difficulty_breakdown(input: &TrampExtractionInput, notes: &mut Vec<String>) -> DifficultyBreakdown {
    let w = floor_dimension("width", input.width_mm, notes);
    let l = floor_dimension("length", input.length_mm, notes);
    let h = floor_dimension("height", input.height_mm, notes);
    let belt_speed_mps = input.belt_speed_mps.max(0.0);
    let burden_mm = input.burden_mm.max(0.0);
    let water_percent = input.water_percent.max(0.0).min(100.0);

    let material_factor = match material_factor(&input.material) {
        Some(f) => f,
        None => {
            warn!(material = %input.material, "unknown material, using default ease factor");
            notes.push(format!(
                "Unknown material '{}', default factor {:.2} applied",
                input.material, DEFAULT_MATERIAL_FACTOR
            ));
            DEFAULT_MATERIAL_FACTOR
        }
    };

    let speed_loss = 1.0 - (belt_speed_mps / SPEED_REFERENCE_MPS).min(MAX_SPEED_LOSS);
    let embedding_loss =
        1.0 - (burden_mm / BURDEN_REFERENCE_MM).powf(BURDEN_EXPONENT).min(MAX_EMBEDDING_LOSS);
    let water_penalty = 1.0 - (water_percent / WATER_REFERENCE_PERCENT).min(MAX_WATER_PENALTY);

    let min_side = w.min(l);
    let aspect_ratio = w.max(l) / min_side;
    let thinness = h / min_side;
    let shape_penalty = (SHAPE_BASE
        - SHAPE_ASPECT_WEIGHT * (aspect_ratio - 1.0)
        - SHAPE_THINNESS_WEIGHT * (SHAPE_THINNESS_LIMIT - thinness).max(0.0))
    .clamp(SHAPE_PENALTY_MIN, SHAPE_PENALTY_MAX);

    let volume_cm3 = w * l * h / 1000.0;
    let mass_g = volume_cm3 * STEEL_DENSITY_G_CM3;
    let moment_factor = mass_g * volume_cm3.sqrt();

    let ease_factor = shape_penalty * material_factor * embedding_loss * speed_loss * water_penalty;
    let difficulty_multiplier = 1.0 / ease_factor.max(MIN_EASE);
    if ease_factor < MIN_EASE {
        notes.push("Difficulty capped at 20x".to_string());
    }

    notes.push(format!(
        "Shape {:.2}, material {:.2}, embedding {:.2}, speed {:.2}, water {:.2} -> difficulty x{:.2}",
        shape_penalty, material_factor, embedding_loss, speed_loss, water_penalty, difficulty_multiplier
    ));

    DifficultyBreakdown {
        width_mm: w,
        length_mm: l,
        height_mm: h,
        belt_speed_mps,
        burden_mm,
        water_percent,
        material_factor,
        speed_loss,
        embedding_loss,
        water_penalty,
        aspect_ratio,
        thinness,
        shape_penalty,
        volume_cm3,
        mass_g,
        moment_factor,
        ease_factor,
        difficulty_multiplier,
    }
}

/// Contact type from free text (case-insensitive "nut" then "bolt"), then
/// thin-plate geometry.
pub fn infer_part_type(description: Option<&str>, width_mm: f64, length_mm: f64, height_mm: f64) -> PartType {
    let text = description.unwrap_or_default().to_lowercase();
    if text.contains("nut") {
        PartType::Nut
    } else if text.contains("bolt") {
        PartType::Bolt
    } else if height_mm < THIN_PLATE_RATIO * width_mm.min(length_mm) {
        PartType::Plate
    } else {
        PartType::Generic
    }
}

/* =========================
   (b) legacy Gauss heuristic
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussRequirement {
    /// Rounded to the nearest Gauss.
    pub required_gauss: f64,
    pub baseline_gauss: f64,
    pub force_factor: f64,
    pub stability_factor: f64,
    pub contact_type: PartType,
    pub breakdown: DifficultyBreakdown,
    pub notes: Vec<String>,
}

/// Legacy Gauss heuristic, independent of magnet decay.
///
/// Retained for pages that still display a required Gauss figure; rank with
/// [`required_force_factor`] instead. Only the description text and the
/// thin-plate rule select the contact type here.
pub fn required_gauss_v2(input: &TrampExtractionInput) -> GaussRequirement {
    let mut notes = Vec::new();
    let breakdown = difficulty_breakdown(input, &mut notes);
    let contact_type = infer_part_type(
        input.description.as_deref(),
        breakdown.width_mm,
        breakdown.length_mm,
        breakdown.height_mm,
    );
    let stability_factor = contact_type.stability_factor();

    let force_factor = breakdown.moment_factor * breakdown.difficulty_multiplier;
    let baseline_gauss = GAUSS_MAP_SCALE * force_factor.powf(GAUSS_MAP_EXPONENT) + GAUSS_MAP_OFFSET;
    let required_gauss = (baseline_gauss * stability_factor).round();

    notes.push(format!(
        "Baseline {:.0} G x stability {:.1} ({:?}) = {:.0} G",
        baseline_gauss, stability_factor, contact_type, required_gauss
    ));
    debug!(required_gauss, force_factor, "legacy gauss requirement");

    GaussRequirement {
        required_gauss,
        baseline_gauss,
        force_factor,
        stability_factor,
        contact_type,
        breakdown,
        notes,
    }
}

/* =========================
   (c) Force Factor heuristic
   ========================= */

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartTypeSource {
    Explicit,
    Description,
    Geometry,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceFactorRequirement {
    pub required_force_factor: f64,
    pub effective_type: PartType,
    pub type_source: PartTypeSource,
    pub stability_factor: f64,
    pub calibration: f64,
    pub breakdown: DifficultyBreakdown,
    pub notes: Vec<String>,
}

/// Explicit `part_type` wins; `Generic` falls back to description text and
/// then thin-plate geometry.
fn resolve_part_type(input: &TrampExtractionInput, breakdown: &DifficultyBreakdown) -> (PartType, PartTypeSource) {
    if input.part_type != PartType::Generic {
        return (input.part_type, PartTypeSource::Explicit);
    }
    let inferred = infer_part_type(
        input.description.as_deref(),
        breakdown.width_mm,
        breakdown.length_mm,
        breakdown.height_mm,
    );
    let source = match inferred {
        PartType::Nut | PartType::Bolt => PartTypeSource::Description,
        PartType::Plate => PartTypeSource::Geometry,
        PartType::Generic => PartTypeSource::Default,
    };
    (inferred, source)
}

/// Required Force Factor, `moment * difficulty * stability * calibration`.
pub fn required_force_factor(input: &TrampExtractionInput) -> ForceFactorRequirement {
    let mut notes = Vec::new();
    let breakdown = difficulty_breakdown(input, &mut notes);
    let (effective_type, type_source) = resolve_part_type(input, &breakdown);
    let stability_factor = effective_type.stability_factor();

    let required_force_factor = breakdown.moment_factor
        * breakdown.difficulty_multiplier
        * stability_factor
        * FORCE_FACTOR_CALIBRATION;

    notes.push(format!(
        "Contact {:?} ({:?}) stability x{:.1}",
        effective_type, type_source, stability_factor
    ));
    notes.push(format!(
        "Moment {:.1} x difficulty {:.2} x stability {:.1} = FF {:.1}",
        breakdown.moment_factor, breakdown.difficulty_multiplier, stability_factor, required_force_factor
    ));
    debug!(required_force_factor, ?effective_type, "force factor requirement");

    ForceFactorRequirement {
        required_force_factor,
        effective_type,
        type_source,
        stability_factor,
        calibration: FORCE_FACTOR_CALIBRATION,
        breakdown,
        notes,
    }
}
