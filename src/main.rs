use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tramp_pickup::margin::PickupVerdict;
use tramp_pickup::{
    all_field_values, assess_extraction, load_catalog_json, margin_from_gauss, parse_model_name,
    rank_catalog, required_force_factor, required_gauss_for_pickup, required_gauss_v2,
    surface_force_factor, surface_gauss, BurdenSeverity, CalculatorConfig, Grade, MagnetGeometry,
    Orientation, PartType, TrampExtractionInput, TrampGeometry, TrampScenario, TrampShape,
};

#[derive(Parser)]
#[command(name = "tramp-pickup")]
#[command(about = "Suspension magnet tramp-metal pickup calculator")]
struct Cli {
    /// TOML config; falls back to $TRAMP_PICKUP_CONFIG, then built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Field strength and Force Factor of a magnet at a gap.
    Field {
        #[command(flatten)]
        magnet: MagnetArgs,
        #[arg(long)]
        gap: Option<f64>,
    },
    /// Recover core/backplate dimensions from a model name.
    Parse { name: String },
    /// Weight vs magnetic pressure verdict through the Gauss rating.
    Pickup {
        #[command(flatten)]
        tramp: TrampArgs,
        #[command(flatten)]
        magnet: MagnetArgs,
        /// Catalog surface Gauss; derived from geometry when omitted.
        #[arg(long)]
        surface_gauss: Option<f64>,
        #[arg(long)]
        gap: Option<f64>,
    },
    /// Weight-based required Gauss at the gap.
    RequireWeight {
        #[command(flatten)]
        tramp: TrampArgs,
        #[arg(long)]
        backplate: f64,
        #[arg(long)]
        gap: Option<f64>,
    },
    /// Legacy Gauss and current Force Factor requirements side by side.
    Require {
        #[command(flatten)]
        scenario: ExtractionArgs,
    },
    /// Force Factor verdict for one magnet.
    Extract {
        #[command(flatten)]
        scenario: ExtractionArgs,
        #[command(flatten)]
        magnet: MagnetArgs,
        /// Catalog surface Force Factor; derived from geometry when omitted.
        #[arg(long)]
        surface_ff: Option<f64>,
        #[arg(long)]
        gap: Option<f64>,
    },
    /// Rank a JSON catalog of magnets for one scenario.
    Rank {
        #[arg(long)]
        catalog: PathBuf,
        #[command(flatten)]
        scenario: ExtractionArgs,
        #[arg(long)]
        gap: Option<f64>,
    },
}

#[derive(Args)]
struct MagnetArgs {
    #[arg(long, default_value_t = 0.0)]
    core: f64,
    #[arg(long, default_value_t = 0.0)]
    backplate: f64,
    #[arg(long, value_enum, default_value_t = GradeCli::A20)]
    grade: GradeCli,
}

impl MagnetArgs {
    fn geometry(&self) -> MagnetGeometry {
        MagnetGeometry {
            core_mm: self.core,
            backplate_mm: self.backplate,
            grade: self.grade.into(),
        }
    }
}

#[derive(Args)]
struct TrampArgs {
    #[arg(long, value_enum, default_value_t = ShapeCli::Cube)]
    shape: ShapeCli,
    #[arg(long)]
    cube_size: Option<f64>,
    #[arg(long)]
    length: Option<f64>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    thickness: Option<f64>,
    #[arg(long)]
    density: Option<f64>,
    #[arg(long, value_enum, default_value_t = OrientationCli::Unknown)]
    orientation: OrientationCli,
    #[arg(long, value_enum, default_value_t = BurdenCli::None)]
    burden: BurdenCli,
}

impl TrampArgs {
    fn scenario(&self) -> TrampScenario {
        TrampScenario {
            geometry: TrampGeometry {
                shape: self.shape.into(),
                length_mm: self.length,
                width_mm: self.width,
                thickness_mm: self.thickness,
                cube_size_mm: self.cube_size,
                density_kg_m3: self.density,
            },
            orientation: self.orientation.into(),
            burden: self.burden.into(),
        }
    }
}

#[derive(Args)]
struct ExtractionArgs {
    #[arg(long)]
    width: f64,
    #[arg(long)]
    length: f64,
    #[arg(long)]
    height: f64,
    #[arg(long, default_value_t = 1.5)]
    belt_speed: f64,
    #[arg(long, default_value_t = 0.0)]
    burden_depth: f64,
    #[arg(long, default_value_t = 0.0)]
    water: f64,
    #[arg(long, default_value = "coal")]
    material: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_enum, default_value_t = PartTypeCli::Generic)]
    part_type: PartTypeCli,
}

impl ExtractionArgs {
    fn input(&self) -> TrampExtractionInput {
        TrampExtractionInput {
            width_mm: self.width,
            length_mm: self.length,
            height_mm: self.height,
            belt_speed_mps: self.belt_speed,
            burden_mm: self.burden_depth,
            water_percent: self.water,
            material: self.material.clone(),
            description: self.description.clone(),
            part_type: self.part_type.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GradeCli {
    A20,
    A30,
    A40,
    A45,
}

impl From<GradeCli> for Grade {
    fn from(value: GradeCli) -> Self {
        match value {
            GradeCli::A20 => Grade::A20,
            GradeCli::A30 => Grade::A30,
            GradeCli::A40 => Grade::A40,
            GradeCli::A45 => Grade::A45,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeCli {
    Plate,
    Bar,
    Cube,
    Irregular,
}

impl From<ShapeCli> for TrampShape {
    fn from(value: ShapeCli) -> Self {
        match value {
            ShapeCli::Plate => TrampShape::Plate,
            ShapeCli::Bar => TrampShape::Bar,
            ShapeCli::Cube => TrampShape::Cube,
            ShapeCli::Irregular => TrampShape::Irregular,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrientationCli {
    Flat,
    Edge,
    Corner,
    Unknown,
}

impl From<OrientationCli> for Orientation {
    fn from(value: OrientationCli) -> Self {
        match value {
            OrientationCli::Flat => Orientation::Flat,
            OrientationCli::Edge => Orientation::Edge,
            OrientationCli::Corner => Orientation::Corner,
            OrientationCli::Unknown => Orientation::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BurdenCli {
    None,
    Light,
    Moderate,
    Heavy,
    Severe,
}

impl From<BurdenCli> for BurdenSeverity {
    fn from(value: BurdenCli) -> Self {
        match value {
            BurdenCli::None => BurdenSeverity::None,
            BurdenCli::Light => BurdenSeverity::Light,
            BurdenCli::Moderate => BurdenSeverity::Moderate,
            BurdenCli::Heavy => BurdenSeverity::Heavy,
            BurdenCli::Severe => BurdenSeverity::Severe,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PartTypeCli {
    Generic,
    Nut,
    Bolt,
    Plate,
}

impl From<PartTypeCli> for PartType {
    fn from(value: PartTypeCli) -> Self {
        match value {
            PartTypeCli::Generic => PartType::Generic,
            PartTypeCli::Nut => PartType::Nut,
            PartTypeCli::Bolt => PartType::Bolt,
            PartTypeCli::Plate => PartType::Plate,
        }
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Pretty JSON with `--json`, otherwise the comma-separated summary line(s).
fn emit<T: Serialize>(json: bool, value: &T, summary: impl FnOnce() -> String) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", summary());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    let cfg = CalculatorConfig::resolve(cli.config.as_deref())?;
    info!(safety_factor = cfg.safety_factor, gap_mm = cfg.default_gap_mm, "config loaded");

    match cli.command {
        Commands::Field { magnet, gap } => {
            let values = all_field_values(&magnet.geometry(), gap.unwrap_or(cfg.default_gap_mm))?;
            emit(cli.json, &values, || {
                format!(
                    "{:.1},{:.1},{:.1},{:.1},{:.1},{:.1}",
                    values.gap_mm,
                    values.surface_gauss,
                    values.gauss_at_gap,
                    values.surface_force_factor,
                    values.force_factor_at_gap,
                    values.gauss_half_distance_mm
                )
            })?;
        }
        Commands::Parse { name } => {
            let parsed = parse_model_name(&name);
            emit(cli.json, &parsed, || match parsed {
                Some(d) => format!("{},{},{}", name, d.core_mm, d.backplate_mm),
                None => format!("{name},no match"),
            })?;
        }
        Commands::Pickup {
            tramp,
            magnet,
            surface_gauss: catalog_gauss,
            gap,
        } => {
            let geometry = magnet.geometry();
            let g0 = match catalog_gauss {
                Some(g) => g,
                None => surface_gauss(geometry.core_mm, geometry.backplate_mm, geometry.grade)?,
            };
            let result = margin_from_gauss(
                g0,
                gap.unwrap_or(cfg.default_gap_mm),
                geometry.backplate_mm,
                &tramp.scenario(),
                cfg.safety_factor,
                cfg.gravity_m_s2,
            )?;
            let verdict = PickupVerdict::classify(result.confidence_percent, &cfg.verdict);
            emit(cli.json, &result, || {
                format!(
                    "{:.2},{:.2},{:.3},{},{},{:?}",
                    result.required_force_n,
                    result.available_force_n,
                    result.margin_ratio,
                    result.is_likely_pickup,
                    result.confidence_percent,
                    verdict
                )
            })?;
        }
        Commands::RequireWeight {
            tramp,
            backplate,
            gap,
        } => {
            let result = required_gauss_for_pickup(
                &tramp.scenario(),
                backplate,
                gap.unwrap_or(cfg.default_gap_mm),
                cfg.safety_factor,
                cfg.gravity_m_s2,
            )?;
            emit(cli.json, &result, || {
                format!(
                    "{:.3},{:.2},{:.0},{:.0}",
                    result.mass_kg,
                    result.required_force_n,
                    result.required_surface_gauss,
                    result.required_gauss_at_gap
                )
            })?;
        }
        Commands::Require { scenario } => {
            let input = scenario.input();
            let legacy = required_gauss_v2(&input);
            let current = required_force_factor(&input);
            let both = serde_json::json!({ "gauss_v2": legacy, "force_factor": current });
            emit(cli.json, &both, || {
                format!(
                    "{:.0},{:.2},{:?},{:.1}",
                    legacy.required_gauss,
                    current.required_force_factor,
                    current.effective_type,
                    current.stability_factor
                )
            })?;
        }
        Commands::Extract {
            scenario,
            magnet,
            surface_ff,
            gap,
        } => {
            let geometry = magnet.geometry();
            let ff0 = match surface_ff {
                Some(ff) => ff,
                None => {
                    let g0 = surface_gauss(geometry.core_mm, geometry.backplate_mm, geometry.grade)?;
                    surface_force_factor(g0, geometry.backplate_mm)?
                }
            };
            let result = assess_extraction(
                ff0,
                gap.unwrap_or(cfg.default_gap_mm),
                geometry.backplate_mm,
                &scenario.input(),
            )?;
            let verdict = PickupVerdict::classify(result.confidence_percent, &cfg.verdict);
            emit(cli.json, &result, || {
                let mut lines = vec![format!(
                    "{:.1},{:.1},{:.3},{},{},{:?}",
                    result.force_factor_at_gap,
                    result.required_force_factor,
                    result.margin_ratio,
                    result.is_likely_pickup,
                    result.confidence_percent,
                    verdict
                )];
                lines.extend(result.notes.iter().map(|n| format!("# {n}")));
                lines.join("\n")
            })?;
        }
        Commands::Rank {
            catalog,
            scenario,
            gap,
        } => {
            let raw = fs::read_to_string(&catalog)?;
            let models = load_catalog_json(&raw)?;
            let ranking = rank_catalog(&models, gap.unwrap_or(cfg.default_gap_mm), &scenario.input());
            emit(cli.json, &ranking, || {
                let mut lines: Vec<String> = ranking
                    .ranked
                    .iter()
                    .map(|r| {
                        format!(
                            "{},{},{:.1},{:.3},{},{:?}",
                            r.rank,
                            r.magnet.name,
                            r.result.force_factor_at_gap,
                            r.result.margin_ratio,
                            r.result.confidence_percent,
                            PickupVerdict::classify(r.result.confidence_percent, &cfg.verdict)
                        )
                    })
                    .collect();
                lines.extend(
                    ranking
                        .skipped
                        .iter()
                        .map(|s| format!("-,{},skipped: {}", s.name, s.reason)),
                );
                lines.join("\n")
            })?;
        }
    }

    Ok(())
}
