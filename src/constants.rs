//! Fixed empirical and physical constants.
//!
//! The coefficients below come from a regression fit over measured
//! suspension-magnet fields. They are part of the physical prediction and are
//! deliberately not exposed through `CalculatorConfig`.

/// Field model coefficients, `G0 = 2701 * core^0.88 / backplate^1.08 * grade`.
pub mod field {
    pub const GAUSS_COEFFICIENT: f64 = 2701.0;
    pub const GAUSS_CORE_EXPONENT: f64 = 0.88;
    pub const GAUSS_BACKPLATE_EXPONENT: f64 = 1.08;

    /// `FF0 = 1.725 * G0^2 / backplate`.
    pub const FORCE_FACTOR_COEFFICIENT: f64 = 1.725;

    /// `k_gauss = 0.1485 / backplate^0.95`.
    pub const GAUSS_DECAY_COEFFICIENT: f64 = 0.1485;
    pub const GAUSS_DECAY_EXPONENT: f64 = 0.95;
    /// `k_ff = 0.3438 / backplate`.
    pub const FORCE_FACTOR_DECAY_COEFFICIENT: f64 = 0.3438;

    /// Legacy decay constants used when a record has no usable backplate.
    pub const LEGACY_GAUSS_DECAY: f64 = 0.00575;
    pub const LEGACY_FORCE_FACTOR_DECAY: f64 = 0.0115;

    /// 1 Gauss = 1e-4 Tesla.
    pub const TESLA_PER_GAUSS: f64 = 1.0e-4;
}

/// Physical constants for the weight/pressure pickup model.
pub mod physics {
    /// Vacuum permeability (H/m).
    pub const MU_0: f64 = 4.0 * std::f64::consts::PI * 1.0e-7;
    /// Standard gravity (m/s^2).
    pub const GRAVITY: f64 = 9.81;
    /// Mild steel (kg/m^3).
    pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;
    /// Mild steel (g/cm^3), used by the heuristic moment proxy.
    pub const STEEL_DENSITY_G_CM3: f64 = 7.85;
    pub const DEFAULT_SAFETY_FACTOR: f64 = 3.0;
}

/// Heuristic extraction model constants.
pub mod extraction {
    pub const DEFAULT_BELT_SPEED_MPS: f64 = 1.5;
    pub const DEFAULT_MATERIAL: &str = "coal";
    pub const DEFAULT_MATERIAL_FACTOR: f64 = 0.75;
    /// Non-positive tramp dimensions are floored to this value (mm).
    pub const MIN_DIMENSION_MM: f64 = 0.001;

    pub const SPEED_REFERENCE_MPS: f64 = 8.0;
    pub const MAX_SPEED_LOSS: f64 = 0.50;
    pub const BURDEN_REFERENCE_MM: f64 = 800.0;
    pub const BURDEN_EXPONENT: f64 = 0.7;
    pub const MAX_EMBEDDING_LOSS: f64 = 0.50;
    pub const WATER_REFERENCE_PERCENT: f64 = 50.0;
    pub const MAX_WATER_PENALTY: f64 = 0.40;

    pub const SHAPE_BASE: f64 = 0.9;
    pub const SHAPE_ASPECT_WEIGHT: f64 = 0.25;
    pub const SHAPE_THINNESS_WEIGHT: f64 = 0.3;
    pub const SHAPE_THINNESS_LIMIT: f64 = 0.2;
    pub const SHAPE_PENALTY_MIN: f64 = 0.25;
    pub const SHAPE_PENALTY_MAX: f64 = 1.0;

    /// Floor on the combined ease factor; caps the difficulty multiplier at 20x.
    pub const MIN_EASE: f64 = 0.05;

    /// Thin-plate detection: `height < 0.15 * min(width, length)`.
    pub const THIN_PLATE_RATIO: f64 = 0.15;

    /// Baseline Gauss mapping, `30 * ff^0.33 + 70`.
    pub const GAUSS_MAP_SCALE: f64 = 30.0;
    pub const GAUSS_MAP_EXPONENT: f64 = 0.33;
    pub const GAUSS_MAP_OFFSET: f64 = 70.0;

    /// Force-factor model calibration, held at unity.
    pub const FORCE_FACTOR_CALIBRATION: f64 = 1.0;

    /// Bulk-material ease factors; lower means harder to pull tramp out of.
    pub const MATERIAL_FACTORS: &[(&str, f64)] = &[
        ("coal", 0.90),
        ("coke", 0.85),
        ("limestone", 0.80),
        ("gravel", 0.80),
        ("aggregate", 0.80),
        ("sand", 0.75),
        ("wood_chips", 0.70),
        ("biomass", 0.70),
        ("iron_ore", 0.65),
        ("slag", 0.60),
        ("glass", 0.60),
        ("recycling", 0.55),
        ("msw", 0.50),
    ];
}
