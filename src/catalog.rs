//! Magnet catalog rows and Force Factor ranking for comparison tables.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PickupError, Result};
use crate::field::{parse_model_name, surface_force_factor, surface_gauss};
use crate::margin::{assess_against_requirement, TrampExtractionResult};
use crate::required::required_force_factor;
use crate::types::{Grade, MagnetGeometry, TrampExtractionInput};

/// Catalog row as mapped from the data store. Any numeric column may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnetModel {
    pub name: String,
    #[serde(default)]
    pub core_mm: Option<f64>,
    #[serde(default)]
    pub backplate_mm: Option<f64>,
    #[serde(default)]
    pub grade: Grade,
    #[serde(default)]
    pub surface_gauss: Option<f64>,
    #[serde(default)]
    pub force_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMagnet {
    pub name: String,
    pub geometry: MagnetGeometry,
    pub surface_gauss: f64,
    pub surface_force_factor: f64,
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Fill in geometry from the model name and field values from the field model
/// wherever the row leaves them out.
pub fn resolve(model: &MagnetModel) -> Result<ResolvedMagnet> {
    let (core_mm, backplate_mm) = match (usable(model.core_mm), usable(model.backplate_mm)) {
        (Some(core), Some(backplate)) => (core, backplate),
        _ => {
            let parsed = parse_model_name(&model.name).ok_or_else(|| {
                PickupError::Catalog(format!("no dimensions for model '{}'", model.name))
            })?;
            (
                usable(model.core_mm).unwrap_or(parsed.core_mm),
                usable(model.backplate_mm).unwrap_or(parsed.backplate_mm),
            )
        }
    };
    let geometry = MagnetGeometry {
        core_mm,
        backplate_mm,
        grade: model.grade,
    };

    let g0 = match usable(model.surface_gauss) {
        Some(g) => g,
        None => surface_gauss(core_mm, backplate_mm, model.grade)?,
    };
    let ff0 = match usable(model.force_factor) {
        Some(ff) => ff,
        None => surface_force_factor(g0, backplate_mm)?,
    };

    Ok(ResolvedMagnet {
        name: model.name.clone(),
        geometry,
        surface_gauss: g0,
        surface_force_factor: ff0,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMagnet {
    pub rank: usize,
    pub magnet: ResolvedMagnet,
    pub result: TrampExtractionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedMagnet {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRanking {
    pub gap_mm: f64,
    pub required_force_factor: f64,
    pub ranked: Vec<RankedMagnet>,
    pub skipped: Vec<SkippedMagnet>,
}

/// Rank every resolvable model by Force Factor margin ratio at the gap,
/// best first, ties broken by name. Rows that cannot be resolved are listed
/// in `skipped` instead of failing the ranking.
pub fn rank_catalog(models: &[MagnetModel], gap_mm: f64, input: &TrampExtractionInput) -> CatalogRanking {
    let requirement = required_force_factor(input);
    let mut ranked = Vec::with_capacity(models.len());
    let mut skipped = Vec::new();

    for model in models {
        let assessed = resolve(model).and_then(|magnet| {
            let result = assess_against_requirement(
                magnet.surface_force_factor,
                gap_mm,
                magnet.geometry.backplate_mm,
                &requirement,
            )?;
            Ok((magnet, result))
        });
        match assessed {
            Ok((magnet, result)) => ranked.push(RankedMagnet {
                rank: 0,
                magnet,
                result,
            }),
            Err(e) => {
                warn!(model = %model.name, error = %e, "catalog row skipped");
                skipped.push(SkippedMagnet {
                    name: model.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    ranked.sort_by(|a, b| {
        b.result
            .margin_ratio
            .partial_cmp(&a.result.margin_ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.magnet.name.cmp(&b.magnet.name))
    });
    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    info!(ranked = ranked.len(), skipped = skipped.len(), gap_mm, "catalog ranked");

    CatalogRanking {
        gap_mm,
        required_force_factor: requirement.required_force_factor,
        ranked,
        skipped,
    }
}

/// Parse a JSON array of catalog rows.
pub fn load_catalog_json(raw: &str) -> Result<Vec<MagnetModel>> {
    serde_json::from_str(raw).map_err(|e| PickupError::Catalog(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str) -> MagnetModel {
        MagnetModel {
            name: name.to_string(),
            core_mm: None,
            backplate_mm: None,
            grade: Grade::A20,
            surface_gauss: None,
            force_factor: None,
        }
    }

    #[test]
    fn test_resolve_from_name() {
        let m = resolve(&model("70 OCW 30")).unwrap();
        assert_eq!(m.geometry.core_mm, 70.0);
        assert_eq!(m.geometry.backplate_mm, 30.0);
        let g0 = surface_gauss(70.0, 30.0, Grade::A20).unwrap();
        assert!((m.surface_gauss - g0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_name_with_grade_suffix() {
        for name in ["70-30 A30", "SRE 70-30 A30", "70 30 A20"] {
            let m = resolve(&model(name)).unwrap();
            assert_eq!((m.geometry.core_mm, m.geometry.backplate_mm), (70.0, 30.0), "{name}");
        }
    }

    #[test]
    fn test_resolve_prefers_catalog_values() {
        let mut row = model("Custom");
        row.core_mm = Some(55.0);
        row.backplate_mm = Some(20.0);
        row.surface_gauss = Some(3000.0);
        row.force_factor = Some(123_456.0);
        let m = resolve(&row).unwrap();
        assert_eq!(m.surface_gauss, 3000.0);
        assert_eq!(m.surface_force_factor, 123_456.0);
    }

    #[test]
    fn test_resolve_fails_without_dimensions() {
        assert!(matches!(resolve(&model("Mystery")), Err(PickupError::Catalog(_))));
    }

    #[test]
    fn test_rank_orders_by_margin_and_skips_bad_rows() {
        let models = vec![model("35 OCW 15"), model("Mystery"), model("70 OCW 30"), model("55-20")];
        let input = TrampExtractionInput::new(50.0, 50.0, 20.0);
        let ranking = rank_catalog(&models, 150.0, &input);
        assert_eq!(ranking.ranked.len(), 3);
        assert_eq!(ranking.skipped.len(), 1);
        assert_eq!(ranking.skipped[0].name, "Mystery");
        for pair in ranking.ranked.windows(2) {
            assert!(pair[0].result.margin_ratio >= pair[1].result.margin_ratio);
        }
        assert_eq!(ranking.ranked[0].rank, 1);
        assert_eq!(ranking.ranked[2].rank, 3);
    }

    #[test]
    fn test_load_catalog_json() {
        let rows = load_catalog_json(
            r#"[{"name":"70 OCW 30","grade":"A30"},{"name":"X","core_mm":40,"backplate_mm":15}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].grade, Grade::A30);
        assert_eq!(rows[1].core_mm, Some(40.0));
        assert!(load_catalog_json("{not json").is_err());
    }
}
