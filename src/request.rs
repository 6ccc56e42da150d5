//! User-facing requests: validation, then the full fetch-and-simulate run.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::distribution::{simulate_alliance, AllianceSimulation};
use crate::error::{PipelineError, ValidationError};
use crate::match_prediction::{predict_match, MatchPrediction};
use crate::pick_list::{build_pick_list, PickList};
use crate::random::seeded_rng;
use crate::rating_source::{fetch_event_roster, fetch_team_rating, fetch_teams, RatingProvider};
use crate::score_model::ScoreModel;

fn parse_team_id(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ValidationError::InvalidTeamId(trimmed.to_string()))
}

/// Every entry must be non-blank before any is parsed, so a half-filled form
/// reports the missing fields rather than the first bad number.
fn parse_team_ids(raw: &[String]) -> Result<Vec<u32>, ValidationError> {
    if raw.iter().any(|r| r.trim().is_empty()) {
        return Err(ValidationError::MissingTeamIds { expected: raw.len() });
    }
    raw.iter().map(|r| parse_team_id(r)).collect()
}

/// Two alliances facing each other.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub your: [String; 2],
    pub opponent: [String; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidMatchRequest {
    pub your: [u32; 2],
    pub opponent: [u32; 2],
}

impl MatchRequest {
    pub fn validate(&self) -> Result<ValidMatchRequest, ValidationError> {
        let all: Vec<String> = self.your.iter().chain(self.opponent.iter()).cloned().collect();
        let ids = parse_team_ids(&all)?;
        Ok(ValidMatchRequest {
            your: [ids[0], ids[1]],
            opponent: [ids[2], ids[3]],
        })
    }
}

/// One alliance measured against a target.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub teams: [String; 2],
    pub target: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidSimulationRequest {
    pub teams: [u32; 2],
    pub target: Option<f64>,
}

impl SimulationRequest {
    pub fn validate(&self) -> Result<ValidSimulationRequest, ValidationError> {
        let ids = parse_team_ids(&self.teams)?;
        Ok(ValidSimulationRequest {
            teams: [ids[0], ids[1]],
            target: self.target.filter(|t| t.is_finite()),
        })
    }
}

/// Rank partners at an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PickListRequest {
    pub event_code: String,
    pub your_team: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidPickListRequest {
    /// Upper-cased
    pub event_code: String,
    pub your_team: u32,
}

impl PickListRequest {
    pub fn validate(&self) -> Result<ValidPickListRequest, ValidationError> {
        let event_code = self.event_code.trim().to_uppercase();
        if event_code.is_empty() {
            return Err(ValidationError::MissingEventCode);
        }
        let ids = parse_team_ids(std::slice::from_ref(&self.your_team))?;
        Ok(ValidPickListRequest {
            event_code,
            your_team: ids[0],
        })
    }
}

/// Validate, fetch all four teams, and predict the match.
pub fn run_match_prediction<P: RatingProvider + ?Sized>(
    provider: &P,
    request: &MatchRequest,
    config: &SimulationConfig,
) -> Result<MatchPrediction, PipelineError> {
    let valid = request.validate()?;
    config.validate()?;

    let mut rng = seeded_rng(config.seed);
    let ids = [valid.your[0], valid.your[1], valid.opponent[0], valid.opponent[1]];
    let teams = fetch_teams(provider, &ids, config.season, &mut rng)?;

    Ok(predict_match(
        &ScoreModel::MATCH,
        (&teams[0], &teams[1]),
        (&teams[2], &teams[3]),
        config.match_iterations,
        &mut rng,
    ))
}

/// Validate, fetch both teams, and simulate the alliance. A request without a
/// target uses `single_alliance_target`.
pub fn run_alliance_simulation<P: RatingProvider + ?Sized>(
    provider: &P,
    request: &SimulationRequest,
    config: &SimulationConfig,
) -> Result<AllianceSimulation, PipelineError> {
    let valid = request.validate()?;
    config.validate()?;

    let mut rng = seeded_rng(config.seed);
    let teams = fetch_teams(provider, &valid.teams, config.season, &mut rng)?;
    let target = valid.target.unwrap_or(config.single_alliance_target);

    Ok(simulate_alliance(
        &ScoreModel::MATCH,
        &teams[0],
        &teams[1],
        target,
        config.match_iterations,
        &mut rng,
    ))
}

/// Validate, load the event roster, and rank every other rated team.
///
/// Your team is taken from the roster when present, otherwise fetched on its
/// own; failing that fetch fails the run.
pub fn run_pick_list<P: RatingProvider + ?Sized>(
    provider: &P,
    request: &PickListRequest,
    config: &SimulationConfig,
) -> Result<PickList, PipelineError> {
    let valid = request.validate()?;
    config.validate()?;

    let mut rng = seeded_rng(config.seed);
    let roster = fetch_event_roster(provider, &valid.event_code, config.season, &mut rng)?;

    let your_team = match roster.find(valid.your_team) {
        Some(team) => team.clone(),
        None => {
            tracing::info!(
                team = valid.your_team,
                event = %roster.code,
                "team not rated at event, fetching directly"
            );
            fetch_team_rating(provider, valid.your_team, config.season, &mut rng)?
        }
    };

    Ok(build_pick_list(&roster, &your_team, config, &mut rng))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: [&str; 2]) -> [String; 2] {
        [v[0].to_string(), v[1].to_string()]
    }

    #[test]
    fn test_match_request_validation() {
        let ok = MatchRequest {
            your: strings([" 1234 ", "5678"]),
            opponent: strings(["42", "9999"]),
        };
        assert_eq!(
            ok.validate().unwrap(),
            ValidMatchRequest {
                your: [1234, 5678],
                opponent: [42, 9999],
            }
        );

        let missing = MatchRequest {
            your: strings(["1234", ""]),
            opponent: strings(["abc", "9999"]),
        };
        assert_eq!(missing.validate(), Err(ValidationError::MissingTeamIds { expected: 4 }));
        assert_eq!(
            missing.validate().unwrap_err().to_string(),
            "Please enter all 4 team numbers"
        );

        let bad = MatchRequest {
            your: strings(["1234", "12a"]),
            opponent: strings(["42", "9999"]),
        };
        assert_eq!(bad.validate(), Err(ValidationError::InvalidTeamId("12a".to_string())));
    }

    #[test]
    fn test_simulation_request_validation() {
        let req = SimulationRequest {
            teams: strings(["7", "8"]),
            target: Some(f64::NAN),
        };
        let valid = req.validate().unwrap();
        assert_eq!(valid.teams, [7, 8]);
        assert_eq!(valid.target, None);

        let zero = SimulationRequest {
            teams: strings(["0", "8"]),
            target: None,
        };
        assert!(matches!(zero.validate(), Err(ValidationError::InvalidTeamId(_))));

        let blank = SimulationRequest {
            teams: strings(["  ", "8"]),
            target: None,
        };
        assert_eq!(blank.validate(), Err(ValidationError::MissingTeamIds { expected: 2 }));
    }

    #[test]
    fn test_pick_list_request_validation() {
        let req = PickListRequest {
            event_code: " usnynybrq2 ".to_string(),
            your_team: "1234".to_string(),
        };
        assert_eq!(
            req.validate().unwrap(),
            ValidPickListRequest {
                event_code: "USNYNYBRQ2".to_string(),
                your_team: 1234,
            }
        );

        let no_code = PickListRequest {
            event_code: "   ".to_string(),
            your_team: "1234".to_string(),
        };
        assert_eq!(no_code.validate(), Err(ValidationError::MissingEventCode));

        let no_team = PickListRequest {
            event_code: "X".to_string(),
            your_team: String::new(),
        };
        assert_eq!(no_team.validate(), Err(ValidationError::MissingTeamIds { expected: 1 }));
    }
}
