#![forbid(unsafe_code)]
//! Tramp-metal pickup calculator for suspension magnets.
//!
//! Field strength and Force Factor are derived from magnet geometry and
//! decayed with air gap; required force comes from one of three calibrated
//! models; the margin between the two maps to a pickup confidence.
//!
//! Every operation is a pure function of its arguments.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod margin;
pub mod required;
pub mod tramp;
pub mod types;

pub use catalog::{load_catalog_json, rank_catalog, resolve, CatalogRanking, MagnetModel, RankedMagnet};
pub use config::{CalculatorConfig, VerdictThresholds};
pub use error::{PickupError, Result};
pub use field::{
    all_field_values, decay_constant_force_factor, decay_constant_gauss, field_at_gap,
    parse_model_name, surface_force_factor, surface_gauss, MagneticFieldValues, ModelDimensions,
};
pub use margin::{
    assess_extraction, evaluate_tramp_pickup, margin_from_gauss, margin_ratio_to_confidence,
    PickupVerdict, TrampExtractionResult, TrampPickupResult,
};
pub use required::{
    required_force_factor, required_gauss_for_pickup, required_gauss_v2, ForceFactorRequirement,
    GaussRequirement, WeightBasedRequirement,
};
pub use tramp::{burden_factor, effective_contact_area, estimate_mass, orientation_factor};
pub use types::{
    BurdenSeverity, Grade, MagnetGeometry, Orientation, PartType, TrampExtractionInput,
    TrampGeometry, TrampScenario, TrampShape,
};
