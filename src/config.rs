//! Call-site simulation settings, loadable from TOML.
//!
//! Only trial counts, targets, season and seed live here. Noise factors,
//! derivation fractions, complementarity tiers and pick weights are constants.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    ALLIANCE_TARGET, DEFAULT_SEASON, MATCH_ITERATIONS, PAIRWISE_ITERATIONS, PICK_LIST_TARGET, QUICK_ITERATIONS,
    TOURNAMENT_TRIALS,
};
use crate::error::ConfigError;

/// Which estimate feeds a candidate's `win_prob`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinModel {
    /// Beat every feasible rival pair while reaching the target
    #[default]
    Pairwise,
    /// Only reach the target (quick check)
    Target,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub season: u16,
    pub match_iterations: usize,
    pub quick_iterations: usize,
    pub pairwise_iterations: usize,
    pub tournament_trials: usize,
    /// Target used by pick-list win estimates
    pub target_score: f64,
    /// Target used by standalone two-team simulations
    pub single_alliance_target: f64,
    pub win_model: WinModel,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            season: DEFAULT_SEASON,
            match_iterations: MATCH_ITERATIONS,
            quick_iterations: QUICK_ITERATIONS,
            pairwise_iterations: PAIRWISE_ITERATIONS,
            tournament_trials: TOURNAMENT_TRIALS,
            target_score: PICK_LIST_TARGET,
            single_alliance_target: ALLIANCE_TARGET,
            win_model: WinModel::Pairwise,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("match_iterations", self.match_iterations),
            ("quick_iterations", self.quick_iterations),
            ("pairwise_iterations", self.pairwise_iterations),
            ("tournament_trials", self.tournament_trials),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, n)| *n == 0) {
            return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
        }
        if !self.target_score.is_finite() || !self.single_alliance_target.is_finite() {
            return Err(ConfigError::Invalid("target scores must be finite".to_string()));
        }
        Ok(())
    }
}

/// Load and validate a config from a TOML file. Missing keys take defaults.
pub fn load_config(path: &Path) -> Result<SimulationConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SimulationConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    tracing::info!(path = %path.display(), season = config.season, "loaded simulation config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pairwise_iterations, 500);
        assert_eq!(config.tournament_trials, 100);
        assert_eq!(config.win_model, WinModel::Pairwise);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "season = 2024\ntarget_score = 120.5\nwin_model = \"target\"\nseed = 7").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.season, 2024);
        assert_eq!(config.target_score, 120.5);
        assert_eq!(config.win_model, WinModel::Target);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.match_iterations, MATCH_ITERATIONS);
    }

    #[test]
    fn test_rejects_zero_trials() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tournament_trials = 0").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("tournament_trials"));
    }

    #[test]
    fn test_parse_and_io_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "season = \"soon\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            load_config(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
