//! Team ratings from an external statistics provider.
//!
//! The provider itself (an HTTP GraphQL service) lives outside this crate and
//! plugs in through [`RatingProvider`]. This module owns the record shapes the
//! provider returns, the decoding of its response envelopes, and the
//! normalization of raw records into [`TeamRating`]s.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RatingError;
use crate::random::RandomSource;
use crate::team::{synthetic_consistency, PhaseRates, TeamRating};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub value: Option<f64>,
}

/// Season summary block; every entry may be absent or null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    #[serde(default)]
    pub tot: Option<StatValue>,
    #[serde(default)]
    pub auto: Option<StatValue>,
    #[serde(default)]
    pub dc: Option<StatValue>,
    #[serde(default)]
    pub eg: Option<StatValue>,
}

impl QuickStats {
    fn total(&self) -> Option<f64> {
        self.tot.as_ref().and_then(|s| s.value)
    }

    fn phases(&self) -> PhaseRates {
        let get = |s: &Option<StatValue>| s.as_ref().and_then(|v| v.value);
        PhaseRates {
            auto: get(&self.auto),
            teleop: get(&self.dc),
            endgame: get(&self.eg),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    pub number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quick_stats: Option<QuickStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTeamInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quick_stats: Option<QuickStats>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTeam {
    pub team_number: u32,
    #[serde(default)]
    pub team: Option<RawEventTeamInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub teams: Vec<RawEventTeam>,
}

/// A source of raw team and event records.
///
/// Implementations must report absent teams/events and transport failures as
/// errors; they never fabricate zeroed records.
pub trait RatingProvider: Send + Sync {
    fn fetch_team(&self, team: u32, season: u16) -> Result<RawTeam, RatingError>;

    fn fetch_event(&self, code: &str, season: u16) -> Result<RawEvent, RatingError>;
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamData {
    team_by_number: Option<RawTeam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventData {
    event_by_code: Option<RawEvent>,
}

fn first_error(errors: Option<Vec<GraphQlError>>) -> Option<String> {
    errors.and_then(|errs| errs.into_iter().next()).map(|e| e.message)
}

/// Decode a provider response body for a single-team query.
pub fn decode_team_response(body: &str, team: u32) -> Result<RawTeam, RatingError> {
    let envelope: Envelope<TeamData> = serde_json::from_str(body)?;
    if let Some(message) = first_error(envelope.errors) {
        return Err(RatingError::Upstream {
            team: Some(team),
            message,
        });
    }
    envelope
        .data
        .and_then(|d| d.team_by_number)
        .ok_or(RatingError::TeamNotFound { team })
}

/// Decode a provider response body for an event roster query.
pub fn decode_event_response(body: &str, code: &str) -> Result<RawEvent, RatingError> {
    let envelope: Envelope<EventData> = serde_json::from_str(body)?;
    if let Some(message) = first_error(envelope.errors) {
        return Err(RatingError::Upstream { team: None, message });
    }
    envelope
        .data
        .and_then(|d| d.event_by_code)
        .ok_or_else(|| RatingError::EventNotFound {
            code: code.to_string(),
        })
}

/// Turn a single-team record into a rating. A missing or zero aggregate is an
/// error, not a zero rating.
pub fn normalize_team<R: RandomSource + ?Sized>(
    raw: &RawTeam,
    season: u16,
    rng: &mut R,
) -> Result<TeamRating, RatingError> {
    let stats = raw.quick_stats.as_ref();
    let aggregate = stats
        .and_then(QuickStats::total)
        .filter(|v| *v != 0.0)
        .ok_or(RatingError::NoRatingData {
            team: raw.number,
            season,
        })?;
    let phases = stats.map(QuickStats::phases).unwrap_or_default();
    let consistency = synthetic_consistency(aggregate, rng);
    Ok(TeamRating::from_aggregate(
        raw.number,
        raw.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        aggregate,
        phases,
        consistency,
    ))
}

/// Rated teams at an event, plus the roster entries that had no usable rating.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventRoster {
    pub name: String,
    pub code: String,
    pub teams: Vec<TeamRating>,
    pub unrated: Vec<u32>,
}

impl EventRoster {
    pub fn find(&self, team: u32) -> Option<&TeamRating> {
        self.teams.iter().find(|t| t.id == team)
    }
}

pub fn normalize_event<R: RandomSource + ?Sized>(raw: &RawEvent, season: u16, rng: &mut R) -> EventRoster {
    let mut teams = Vec::with_capacity(raw.teams.len());
    let mut unrated = Vec::new();

    for entry in &raw.teams {
        let info = entry.team.clone().unwrap_or_default();
        let record = RawTeam {
            number: entry.team_number,
            name: info.name,
            quick_stats: info.quick_stats,
        };
        match normalize_team(&record, season, rng) {
            Ok(rating) => teams.push(rating),
            Err(e) => {
                tracing::warn!(team = entry.team_number, event = %raw.code, error = %e, "excluding unrated team");
                unrated.push(entry.team_number);
            }
        }
    }

    EventRoster {
        name: raw.name.clone(),
        code: raw.code.clone(),
        teams,
        unrated,
    }
}

/// Fetch and normalize one team.
pub fn fetch_team_rating<P, R>(provider: &P, team: u32, season: u16, rng: &mut R) -> Result<TeamRating, RatingError>
where
    P: RatingProvider + ?Sized,
    R: RandomSource + ?Sized,
{
    let raw = provider.fetch_team(team, season)?;
    normalize_team(&raw, season, rng)
}

/// Fetch several teams in parallel, failing on the first error.
///
/// Requests are independent; normalization runs afterwards in input order so
/// the consistency draws stay reproducible for a seeded `rng`.
pub fn fetch_teams<P, R>(provider: &P, teams: &[u32], season: u16, rng: &mut R) -> Result<Vec<TeamRating>, RatingError>
where
    P: RatingProvider + ?Sized,
    R: RandomSource + ?Sized,
{
    let raw: Vec<RawTeam> = teams
        .par_iter()
        .map(|&team| provider.fetch_team(team, season))
        .collect::<Result<_, _>>()?;

    tracing::debug!(count = raw.len(), season, "fetched team records");

    raw.iter().map(|r| normalize_team(r, season, rng)).collect()
}

/// Fetch and normalize an event roster.
pub fn fetch_event_roster<P, R>(provider: &P, code: &str, season: u16, rng: &mut R) -> Result<EventRoster, RatingError>
where
    P: RatingProvider + ?Sized,
    R: RandomSource + ?Sized,
{
    let raw = provider.fetch_event(code, season)?;
    let roster = normalize_event(&raw, season, rng);
    tracing::info!(
        event = %roster.code,
        rated = roster.teams.len(),
        unrated = roster.unrated.len(),
        "loaded event roster"
    );
    Ok(roster)
}

/// Provider backed by preloaded records, for offline runs and tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProvider {
    teams: HashMap<u32, RawTeam>,
    events: HashMap<String, RawEvent>,
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    teams: Vec<RawTeam>,
    #[serde(default)]
    events: Vec<RawEvent>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON snapshot: `{ "teams": [RawTeam...], "events": [RawEvent...] }`.
    pub fn from_json(json: &str) -> Result<Self, RatingError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut provider = InMemoryProvider::new();
        for team in snapshot.teams {
            provider.add_team(team);
        }
        for event in snapshot.events {
            provider.add_event(event);
        }
        Ok(provider)
    }

    pub fn add_team(&mut self, team: RawTeam) {
        self.teams.insert(team.number, team);
    }

    pub fn add_event(&mut self, event: RawEvent) {
        self.events.insert(event.code.to_uppercase(), event);
    }
}

impl RatingProvider for InMemoryProvider {
    fn fetch_team(&self, team: u32, _season: u16) -> Result<RawTeam, RatingError> {
        self.teams
            .get(&team)
            .cloned()
            .ok_or(RatingError::TeamNotFound { team })
    }

    fn fetch_event(&self, code: &str, _season: u16) -> Result<RawEvent, RatingError> {
        self.events
            .get(&code.to_uppercase())
            .cloned()
            .ok_or_else(|| RatingError::EventNotFound {
                code: code.to_string(),
            })
    }
}
