use std::path::PathBuf;

/// Failures reported by a rating provider, or while normalizing what it returned.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("team {team} not found")]
    TeamNotFound { team: u32 },

    #[error("event {code} not found")]
    EventNotFound { code: String },

    #[error("no stats for team {team} in {season} season")]
    NoRatingData { team: u32, season: u16 },

    #[error("failed to fetch {}: {message}", fetch_subject(.team))]
    Upstream { team: Option<u32>, message: String },

    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn fetch_subject(team: &Option<u32>) -> String {
    match team {
        Some(t) => format!("team {t}"),
        None => "ratings".to_string(),
    }
}

impl RatingError {
    /// True for "does not exist" failures, as opposed to missing data or transport problems.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RatingError::TeamNotFound { .. } | RatingError::EventNotFound { .. })
    }
}

/// User input rejected before any fetch or simulation work starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter all {expected} team numbers")]
    MissingTeamIds { expected: usize },

    #[error("'{0}' is not a valid team number")]
    InvalidTeamId(String),

    #[error("Please enter an event code (e.g., USNYNYBRQ2)")]
    MissingEventCode,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from the end-to-end prediction and pick-list entry points.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
