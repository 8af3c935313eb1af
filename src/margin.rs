//! Margin and confidence evaluation: available vs required force.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VerdictThresholds;
use crate::constants::field::TESLA_PER_GAUSS;
use crate::constants::physics::MU_0;
use crate::error::{require_positive, PickupError, Result};
use crate::field::{decay_constant_force_factor, decay_constant_gauss, field_at_gap};
use crate::required::{required_force_factor, ForceFactorRequirement};
use crate::tramp::{burden_factor, effective_contact_area, estimate_mass, orientation_factor};
use crate::types::{BurdenSeverity, Orientation, TrampExtractionInput, TrampGeometry, TrampScenario};

/// Badge shown next to a confidence percentage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupVerdict {
    Confident,
    Marginal,
    Unlikely,
}

impl PickupVerdict {
    pub fn classify(confidence_percent: u8, thresholds: &VerdictThresholds) -> Self {
        if confidence_percent >= thresholds.confident_percent {
            PickupVerdict::Confident
        } else if confidence_percent >= thresholds.marginal_percent {
            PickupVerdict::Marginal
        } else {
            PickupVerdict::Unlikely
        }
    }
}

/// Piecewise-linear map from margin ratio to a confidence percentage in [0, 99].
///
/// The `[0.8, 1.0)` segment is anchored at `ratio - 1.0`, so it restarts at 30%
/// just above 0.8 while `[0.5, 0.8)` ends near 40%. The legacy pages show the
/// same numbers; keep it until the owners confirm the intended curve.
pub fn margin_ratio_to_confidence(ratio: f64) -> u8 {
    if ratio.is_nan() || ratio < 0.0 {
        return 0;
    }
    let percent = if ratio < 0.5 {
        ratio * 50.0
    } else if ratio < 0.8 {
        25.0 + (ratio - 0.5) * 50.0
    } else if ratio < 1.0 {
        40.0 + (ratio - 1.0) * 50.0
    } else if ratio < 1.5 {
        50.0 + (ratio - 1.0) * 50.0
    } else if ratio < 2.0 {
        75.0 + (ratio - 1.5) * 30.0
    } else if ratio < 3.0 {
        90.0 + (ratio - 2.0) * 8.0
    } else {
        return 99;
    };
    percent.round() as u8
}

fn ratio_of(available: f64, required: f64) -> f64 {
    if required == 0.0 {
        f64::INFINITY
    } else {
        available / required
    }
}

/// Weight vs magnetic-pressure verdict for one tramp object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrampPickupResult {
    pub mass_kg: f64,
    pub weight_n: f64,
    pub contact_area_m2: f64,
    pub flux_density_t: f64,
    pub orientation_factor: f64,
    pub burden_factor: f64,
    pub safety_factor: f64,
    pub required_force_n: f64,
    pub available_force_n: f64,
    pub margin_n: f64,
    pub margin_ratio: f64,
    pub is_likely_pickup: bool,
    pub confidence_percent: u8,
    pub notes: Vec<String>,
}

/// Compare required lifting force against magnetic pressure `F = B^2 A / (2 mu0)`.
///
/// Required force is `weight * safety * orientation * burden`. Zero required
/// force (no mass information) gives an infinite margin ratio.
pub fn evaluate_tramp_pickup(
    geometry: &TrampGeometry,
    orientation: Orientation,
    burden: BurdenSeverity,
    flux_density_t: f64,
    base_safety_factor: f64,
    gravity: f64,
) -> Result<TrampPickupResult> {
    let flux_density_t = require_positive("flux_density_t", flux_density_t)?;
    let contact_area_m2 = effective_contact_area(geometry, orientation);
    if contact_area_m2 <= 0.0 {
        return Err(PickupError::invalid("contact_area_m2", contact_area_m2));
    }

    let mass_kg = estimate_mass(geometry);
    let weight_n = mass_kg * gravity;
    let of = orientation_factor(orientation);
    let bf = burden_factor(burden);
    let required_force_n = weight_n * base_safety_factor * of * bf;
    let available_force_n = flux_density_t.powi(2) * contact_area_m2 / (2.0 * MU_0);
    let margin_n = available_force_n - required_force_n;
    let margin_ratio = ratio_of(available_force_n, required_force_n);
    let is_likely_pickup = margin_ratio >= 1.0;
    let confidence_percent = margin_ratio_to_confidence(margin_ratio);

    let mut notes = vec![
        format!(
            "Mass {:.3} kg, contact area {:.1} cm2 ({:?})",
            mass_kg,
            contact_area_m2 * 1.0e4,
            orientation
        ),
        format!(
            "Required {:.1} N = weight {:.2} N x safety {:.1} x orientation {:.1} x burden {:.1}",
            required_force_n, weight_n, base_safety_factor, of, bf
        ),
        format!(
            "Available {:.1} N at {:.4} T, margin ratio {:.2}",
            available_force_n, flux_density_t, margin_ratio
        ),
    ];
    if mass_kg == 0.0 {
        notes.push("No mass information; required force is zero".to_string());
    }
    debug!(margin_ratio, confidence_percent, "tramp pickup evaluated");

    Ok(TrampPickupResult {
        mass_kg,
        weight_n,
        contact_area_m2,
        flux_density_t,
        orientation_factor: of,
        burden_factor: bf,
        safety_factor: base_safety_factor,
        required_force_n,
        available_force_n,
        margin_n,
        margin_ratio,
        is_likely_pickup,
        confidence_percent,
        notes,
    })
}

/// Legacy Gauss path: decay a surface Gauss rating to the gap, convert to
/// Tesla and run [`evaluate_tramp_pickup`].
pub fn margin_from_gauss(
    surface_gauss: f64,
    gap_mm: f64,
    backplate_mm: f64,
    scenario: &TrampScenario,
    base_safety_factor: f64,
    gravity: f64,
) -> Result<TrampPickupResult> {
    let surface_gauss = require_positive("surface_gauss", surface_gauss)?;
    let k = decay_constant_gauss(backplate_mm);
    let gauss_at_gap = field_at_gap(surface_gauss, gap_mm, k);
    let mut result = evaluate_tramp_pickup(
        &scenario.geometry,
        scenario.orientation,
        scenario.burden,
        gauss_at_gap * TESLA_PER_GAUSS,
        base_safety_factor,
        gravity,
    )?;
    result.notes.insert(
        0,
        format!(
            "{:.0} G surface -> {:.0} G at {:.0} mm (k = {:.5})",
            surface_gauss, gauss_at_gap, gap_mm, k
        ),
    );
    Ok(result)
}

/// Force Factor verdict for one magnet at one gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrampExtractionResult {
    pub gap_mm: f64,
    pub surface_force_factor: f64,
    pub k_force_factor: f64,
    pub force_factor_at_gap: f64,
    pub required_force_factor: f64,
    pub margin: f64,
    pub margin_ratio: f64,
    pub is_likely_pickup: bool,
    pub confidence_percent: u8,
    pub requirement: ForceFactorRequirement,
    pub notes: Vec<String>,
}

/// Force Factor path against an already computed requirement.
pub fn assess_against_requirement(
    surface_force_factor: f64,
    gap_mm: f64,
    backplate_mm: f64,
    requirement: &ForceFactorRequirement,
) -> Result<TrampExtractionResult> {
    let surface_force_factor = require_positive("surface_force_factor", surface_force_factor)?;
    let k_force_factor = decay_constant_force_factor(backplate_mm);
    let force_factor_at_gap = field_at_gap(surface_force_factor, gap_mm, k_force_factor);
    let required = requirement.required_force_factor;
    let margin_ratio = ratio_of(force_factor_at_gap, required);
    let confidence_percent = margin_ratio_to_confidence(margin_ratio);

    let mut notes = requirement.notes.clone();
    notes.push(format!(
        "FF {:.0} surface -> {:.0} at {:.0} mm vs required {:.1}, margin ratio {:.2}",
        surface_force_factor, force_factor_at_gap, gap_mm, required, margin_ratio
    ));

    Ok(TrampExtractionResult {
        gap_mm,
        surface_force_factor,
        k_force_factor,
        force_factor_at_gap,
        required_force_factor: required,
        margin: force_factor_at_gap - required,
        margin_ratio,
        is_likely_pickup: margin_ratio >= 1.0,
        confidence_percent,
        requirement: requirement.clone(),
        notes,
    })
}

/// Force Factor path used to rank magnets: decay the surface FF to the gap
/// and compare with [`required_force_factor`].
pub fn assess_extraction(
    surface_force_factor: f64,
    gap_mm: f64,
    backplate_mm: f64,
    input: &TrampExtractionInput,
) -> Result<TrampExtractionResult> {
    let requirement = required_force_factor(input);
    assess_against_requirement(surface_force_factor, gap_mm, backplate_mm, &requirement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_breakpoints() {
        assert_eq!(margin_ratio_to_confidence(-0.5), 0);
        assert_eq!(margin_ratio_to_confidence(0.0), 0);
        assert_eq!(margin_ratio_to_confidence(0.25), 13);
        assert_eq!(margin_ratio_to_confidence(0.5), 25);
        assert_eq!(margin_ratio_to_confidence(0.7), 35);
        assert_eq!(margin_ratio_to_confidence(1.0), 50);
        assert_eq!(margin_ratio_to_confidence(1.25), 63);
        assert_eq!(margin_ratio_to_confidence(1.5), 75);
        assert_eq!(margin_ratio_to_confidence(2.0), 90);
        assert_eq!(margin_ratio_to_confidence(2.5), 94);
        assert_eq!(margin_ratio_to_confidence(3.0), 99);
        assert_eq!(margin_ratio_to_confidence(f64::INFINITY), 99);
        assert_eq!(margin_ratio_to_confidence(f64::NAN), 0);
    }

    #[test]
    fn test_confidence_quirk_between_0_8_and_1_0() {
        // Anchored at ratio - 1.0, not ratio - 0.8.
        assert_eq!(margin_ratio_to_confidence(0.8), 30);
        assert_eq!(margin_ratio_to_confidence(0.9), 35);
        assert_eq!(margin_ratio_to_confidence(0.99), 40);
    }

    #[test]
    fn test_verdict_classification() {
        let t = VerdictThresholds::default();
        assert_eq!(PickupVerdict::classify(99, &t), PickupVerdict::Confident);
        assert_eq!(PickupVerdict::classify(75, &t), PickupVerdict::Confident);
        assert_eq!(PickupVerdict::classify(50, &t), PickupVerdict::Marginal);
        assert_eq!(PickupVerdict::classify(49, &t), PickupVerdict::Unlikely);
    }

    #[test]
    fn test_magnetic_pressure() {
        // 1 T over 1 cm2 -> 1e-4 / (2 mu0) ~ 39.79 N.
        let cube = TrampGeometry::cube(10.0);
        let r = evaluate_tramp_pickup(&cube, Orientation::Flat, BurdenSeverity::None, 1.0, 3.0, 9.81)
            .unwrap();
        assert!((r.available_force_n - 1.0e-4 / (2.0 * MU_0)).abs() < 1e-9);
        assert!((r.available_force_n - 39.789).abs() < 1e-2);
        assert!(r.is_likely_pickup);
        assert_eq!(r.is_likely_pickup, r.margin_ratio >= 1.0);
    }

    #[test]
    fn test_evaluate_rejects_structural_errors() {
        let cube = TrampGeometry::cube(10.0);
        assert!(evaluate_tramp_pickup(&cube, Orientation::Flat, BurdenSeverity::None, 0.0, 3.0, 9.81).is_err());
        let mut empty = TrampGeometry::cube(10.0);
        empty.cube_size_mm = None;
        assert!(matches!(
            evaluate_tramp_pickup(&empty, Orientation::Flat, BurdenSeverity::None, 0.5, 3.0, 9.81),
            Err(PickupError::InvalidInput { what: "contact_area_m2", .. })
        ));
    }

    #[test]
    fn test_zero_mass_gives_infinite_ratio() {
        let mut cube = TrampGeometry::cube(10.0);
        cube.density_kg_m3 = Some(0.0);
        let r = evaluate_tramp_pickup(&cube, Orientation::Flat, BurdenSeverity::None, 0.2, 3.0, 9.81)
            .unwrap();
        assert!(r.margin_ratio.is_infinite());
        assert_eq!(r.confidence_percent, 99);
    }

    #[test]
    fn test_margin_from_gauss_decays_first() {
        let scenario = TrampScenario {
            geometry: TrampGeometry::cube(25.0),
            orientation: Orientation::Flat,
            burden: BurdenSeverity::Moderate,
        };
        let near = margin_from_gauss(2000.0, 0.0, 30.0, &scenario, 3.0, 9.81).unwrap();
        let far = margin_from_gauss(2000.0, 200.0, 30.0, &scenario, 3.0, 9.81).unwrap();
        assert!((near.flux_density_t - 0.2).abs() < 1e-12);
        assert!(far.available_force_n < near.available_force_n);
        assert!(margin_from_gauss(0.0, 100.0, 30.0, &scenario, 3.0, 9.81).is_err());
    }

    #[test]
    fn test_assess_extraction() {
        let input = TrampExtractionInput::new(50.0, 50.0, 50.0);
        let r = assess_extraction(1.0e6, 100.0, 30.0, &input).unwrap();
        let expected_at_gap = 1.0e6 * (-0.3438 / 30.0 * 100.0f64).exp();
        assert!((r.force_factor_at_gap - expected_at_gap).abs() < 1e-6);
        assert!((r.margin_ratio - expected_at_gap / r.required_force_factor).abs() < 1e-9);
        assert_eq!(r.confidence_percent, margin_ratio_to_confidence(r.margin_ratio));
        assert!(assess_extraction(0.0, 100.0, 30.0, &input).is_err());
    }
}
