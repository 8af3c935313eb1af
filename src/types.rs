use serde::{Deserialize, Serialize};

use crate::constants::{extraction, physics};

/// Temperature/altitude derating class of a magnet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    A20,
    A30,
    A40,
    A45,
}

impl Grade {
    /// Field multiplier; A20 is the undiminished reference.
    pub fn multiplier(self) -> f64 {
        match self {
            Grade::A20 => 1.000,
            Grade::A30 => 0.975,
            Grade::A40 => 0.950,
            Grade::A45 => 0.9375,
        }
    }
}

/// How the tramp object presents itself to the magnet face.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Flat,
    Edge,
    Corner,
    #[default]
    Unknown,
}

impl Orientation {
    /// Force-demand multiplier.
    pub fn force_factor(self) -> f64 {
        match self {
            Orientation::Flat => 1.0,
            Orientation::Edge => 4.0,
            Orientation::Corner => 6.0,
            Orientation::Unknown => 5.0,
        }
    }

    /// Face-area multiplier for cubes. Independent of `force_factor`.
    pub fn cube_area_factor(self) -> f64 {
        match self {
            Orientation::Flat => 1.0,
            Orientation::Edge => 0.75,
            Orientation::Corner => 0.5,
            Orientation::Unknown => 0.6,
        }
    }

    /// Edge-area multiplier for rectangular shapes that are not lying flat.
    pub fn edge_area_factor(self) -> f64 {
        match self {
            Orientation::Flat | Orientation::Edge => 1.0,
            Orientation::Corner => 0.6,
            Orientation::Unknown => 0.8,
        }
    }
}

/// How much burden sits on top of the tramp object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurdenSeverity {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
    Severe,
}

impl BurdenSeverity {
    pub fn factor(self) -> f64 {
        match self {
            BurdenSeverity::None => 1.0,
            BurdenSeverity::Light => 1.5,
            BurdenSeverity::Moderate => 2.5,
            BurdenSeverity::Heavy => 4.0,
            BurdenSeverity::Severe => 6.0,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrampShape {
    Plate,
    Bar,
    Cube,
    Irregular,
}

/// Contact-stability class used by the heuristic extraction models.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    #[default]
    Generic,
    Nut,
    Bolt,
    Plate,
}

impl PartType {
    pub fn stability_factor(self) -> f64 {
        match self {
            PartType::Nut => 1.8,
            PartType::Bolt => 1.3,
            PartType::Plate => 1.5,
            PartType::Generic => 1.0,
        }
    }
}

/// Suspension magnet geometry.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnetGeometry {
    pub core_mm: f64,
    pub backplate_mm: f64,
    #[serde(default)]
    pub grade: Grade,
}

/// Ferrous contaminant dimensions. `cube_size_mm` replaces the three edge
/// lengths when `shape` is `Cube`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrampGeometry {
    pub shape: TrampShape,
    #[serde(default)]
    pub length_mm: Option<f64>,
    #[serde(default)]
    pub width_mm: Option<f64>,
    #[serde(default)]
    pub thickness_mm: Option<f64>,
    #[serde(default)]
    pub cube_size_mm: Option<f64>,
    #[serde(default)]
    pub density_kg_m3: Option<f64>,
}

impl TrampGeometry {
    pub fn cube(side_mm: f64) -> Self {
        TrampGeometry {
            shape: TrampShape::Cube,
            length_mm: None,
            width_mm: None,
            thickness_mm: None,
            cube_size_mm: Some(side_mm),
            density_kg_m3: None,
        }
    }

    pub fn rectangular(shape: TrampShape, length_mm: f64, width_mm: f64, thickness_mm: f64) -> Self {
        TrampGeometry {
            shape,
            length_mm: Some(length_mm),
            width_mm: Some(width_mm),
            thickness_mm: Some(thickness_mm),
            cube_size_mm: None,
            density_kg_m3: None,
        }
    }

    pub fn density(&self) -> f64 {
        self.density_kg_m3.unwrap_or(physics::STEEL_DENSITY_KG_M3)
    }
}

/// Tramp object plus how it sits in the burden, for the weight-based models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrampScenario {
    pub geometry: TrampGeometry,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub burden: BurdenSeverity,
}

/// One extraction scenario for the heuristic models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrampExtractionInput {
    pub width_mm: f64,
    pub length_mm: f64,
    pub height_mm: f64,
    #[serde(default = "default_belt_speed")]
    pub belt_speed_mps: f64,
    #[serde(default)]
    pub burden_mm: f64,
    #[serde(default)]
    pub water_percent: f64,
    #[serde(default = "default_material")]
    pub material: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub part_type: PartType,
}

fn default_belt_speed() -> f64 {
    extraction::DEFAULT_BELT_SPEED_MPS
}

fn default_material() -> String {
    extraction::DEFAULT_MATERIAL.to_string()
}

impl TrampExtractionInput {
    /// Scenario with default belt speed, no burden, dry coal, generic part.
    pub fn new(width_mm: f64, length_mm: f64, height_mm: f64) -> Self {
        TrampExtractionInput {
            width_mm,
            length_mm,
            height_mm,
            belt_speed_mps: default_belt_speed(),
            burden_mm: 0.0,
            water_percent: 0.0,
            material: default_material(),
            description: None,
            part_type: PartType::Generic,
        }
    }
}
