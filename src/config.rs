use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::physics::{DEFAULT_SAFETY_FACTOR, GRAVITY};
use crate::error::{PickupError, Result};

/// Environment variable naming a TOML config file for the CLI.
pub const ENV_CONFIG_PATH: &str = "TRAMP_PICKUP_CONFIG";

/// Confidence cut-offs for the verdict badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerdictThresholds {
    pub confident_percent: u8,
    pub marginal_percent: u8,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        VerdictThresholds {
            confident_percent: 75,
            marginal_percent: 50,
        }
    }
}

/// Caller-side tunables. Regression coefficients are not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    pub safety_factor: f64,
    pub gravity_m_s2: f64,
    pub default_gap_mm: f64,
    pub verdict: VerdictThresholds,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        CalculatorConfig {
            safety_factor: DEFAULT_SAFETY_FACTOR,
            gravity_m_s2: GRAVITY,
            default_gap_mm: 150.0,
            verdict: VerdictThresholds::default(),
        }
    }
}

impl CalculatorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: CalculatorConfig =
            toml::from_str(raw).map_err(|e| PickupError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| PickupError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Explicit path, else `TRAMP_PICKUP_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.safety_factor.is_nan() || self.safety_factor <= 0.0 {
            return Err(PickupError::Config("safety_factor must be > 0".into()));
        }
        if self.gravity_m_s2.is_nan() || self.gravity_m_s2 <= 0.0 {
            return Err(PickupError::Config("gravity_m_s2 must be > 0".into()));
        }
        if self.default_gap_mm.is_nan() || self.default_gap_mm < 0.0 {
            return Err(PickupError::Config("default_gap_mm must be >= 0".into()));
        }
        if self.verdict.marginal_percent > self.verdict.confident_percent {
            return Err(PickupError::Config(
                "verdict.marginal_percent must not exceed verdict.confident_percent".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = CalculatorConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, CalculatorConfig::default());
        assert_eq!(cfg.safety_factor, 3.0);
        assert_eq!(cfg.gravity_m_s2, 9.81);
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg = CalculatorConfig::from_toml_str(
            "safety_factor = 2.0\n[verdict]\nconfident_percent = 80\n",
        )
        .unwrap();
        assert_eq!(cfg.safety_factor, 2.0);
        assert_eq!(cfg.verdict.confident_percent, 80);
        assert_eq!(cfg.verdict.marginal_percent, 50);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            CalculatorConfig::from_toml_str("safety_factor = 0.0"),
            Err(PickupError::Config(_))
        ));
        assert!(CalculatorConfig::from_toml_str("unknown_key = 1").is_err());
        assert!(CalculatorConfig::from_toml_str(
            "[verdict]\nconfident_percent = 40\nmarginal_percent = 60\n"
        )
        .is_err());
    }

    fn temp_config(prefix: &str, body: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("duration")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("tramp-pickup-{prefix}-{unique}.toml"));
        fs::write(&path, body).expect("write config");
        path
    }

    #[test]
    fn resolve_reads_explicit_path() {
        let path = temp_config("explicit", "safety_factor = 2.5\ndefault_gap_mm = 200.0\n");
        let cfg = CalculatorConfig::resolve(Some(&path)).unwrap();
        assert_eq!(cfg.safety_factor, 2.5);
        assert_eq!(cfg.default_gap_mm, 200.0);
        assert_eq!(cfg.gravity_m_s2, 9.81);
        let _ = fs::remove_file(&path);

        assert!(matches!(
            CalculatorConfig::resolve(Some(&path)),
            Err(PickupError::Config(_))
        ));
    }

    // Only test touching the variable, so parallel tests cannot race on it.
    #[test]
    fn resolve_follows_env_var() {
        let path = temp_config("env", "[verdict]\nconfident_percent = 90\n");

        std::env::set_var(ENV_CONFIG_PATH, &path);
        let from_env = CalculatorConfig::resolve(None);

        std::env::set_var(ENV_CONFIG_PATH, "   ");
        let blank = CalculatorConfig::resolve(None);

        std::env::remove_var(ENV_CONFIG_PATH);
        let unset = CalculatorConfig::resolve(None);
        let _ = fs::remove_file(&path);

        assert_eq!(from_env.unwrap().verdict.confident_percent, 90);
        assert_eq!(blank.unwrap(), CalculatorConfig::default());
        assert_eq!(unset.unwrap(), CalculatorConfig::default());
    }
}
