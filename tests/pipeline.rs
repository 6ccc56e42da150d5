use alliance_core::config::WinModel;
use alliance_core::error::{PipelineError, RatingError, ValidationError};
use alliance_core::export::{read_ranks, write_csv};
use alliance_core::pick_list::{PickListFilter, SortKey, StrengthFilter};
use alliance_core::rating_source::InMemoryProvider;
use alliance_core::request::{
    run_alliance_simulation, run_match_prediction, run_pick_list, MatchRequest, PickListRequest, SimulationRequest,
};
use alliance_core::SimulationConfig;

const SNAPSHOT: &str = r#"{
    "teams": [
        {"number": 101, "name": "Gearheads", "quickStats": {"tot": {"value": 95}, "auto": {"value": 30}, "dc": {"value": 50}, "eg": {"value": 15}}},
        {"number": 102, "name": "Sprockets", "quickStats": {"tot": {"value": 40}}},
        {"number": 103, "name": "Torque", "quickStats": {"tot": {"value": 25}}},
        {"number": 104, "name": "Ratchets", "quickStats": {"tot": {"value": 30}}},
        {"number": 9999, "name": "Visitors", "quickStats": {"tot": {"value": 55}}},
        {"number": 404, "name": "Ghosts", "quickStats": {"tot": null}}
    ],
    "events": [
        {
            "name": "Brooklyn Qualifier",
            "code": "USNYNYBRQ2",
            "teams": [
                {"teamNumber": 101, "team": {"name": "Gearheads", "quickStats": {"tot": {"value": 95}, "auto": {"value": 30}, "dc": {"value": 50}, "eg": {"value": 15}}}},
                {"teamNumber": 102, "team": {"name": "Sprockets", "quickStats": {"tot": {"value": 40}}}},
                {"teamNumber": 103, "team": {"name": "Torque", "quickStats": {"tot": {"value": 25}}}},
                {"teamNumber": 104, "team": {"name": "Ratchets", "quickStats": {"tot": {"value": 30}}}},
                {"teamNumber": 105, "team": {"name": "Pistons", "quickStats": {"tot": {"value": 70}, "auto": {"value": 35}}}},
                {"teamNumber": 106, "team": {"name": "Axles", "quickStats": {"tot": {"value": 50}, "dc": {"value": 38}}}},
                {"teamNumber": 107, "team": {"name": "Bolts", "quickStats": {"tot": {"value": 60}}}},
                {"teamNumber": 108, "team": {"name": "Rookies", "quickStats": null}}
            ]
        }
    ]
}"#;

fn provider() -> InMemoryProvider {
    InMemoryProvider::from_json(SNAPSHOT).unwrap()
}

fn config() -> SimulationConfig {
    SimulationConfig {
        match_iterations: 2_000,
        pairwise_iterations: 60,
        tournament_trials: 40,
        seed: Some(2025),
        ..SimulationConfig::default()
    }
}

fn pick_request(team: &str) -> PickListRequest {
    PickListRequest {
        event_code: "usnynybrq2".to_string(),
        your_team: team.to_string(),
    }
}

#[test]
fn pick_list_end_to_end() {
    let list = run_pick_list(&provider(), &pick_request("102"), &config()).unwrap();

    assert_eq!(list.event_name, "Brooklyn Qualifier");
    assert_eq!(list.event_code, "USNYNYBRQ2");
    assert_eq!(list.your_team.id, 102);
    assert_eq!(list.unrated, vec![108]);
    assert_eq!(list.len(), 6);
    assert!(list.get(102).is_none());

    let orders: Vec<usize> = list.candidates.iter().map(|c| c.pick_order).collect();
    assert_eq!(orders, (1..=6).collect::<Vec<_>>());
    for pair in list.candidates.windows(2) {
        assert!(pair[0].pick_score >= pair[1].pick_score);
    }
    assert_eq!(list.candidates[0].team.id, 101);

    for c in &list.candidates {
        assert!((0.0..=100.0).contains(&c.win_prob));
        assert!((0.0..=100.0).contains(&c.complementary));
        assert!((0.0..=100.0).contains(&c.event_win_percent));
        assert!(c.team.consistency >= 5.0);
    }
}

#[test]
fn pick_list_is_reproducible_with_seed() {
    let a = run_pick_list(&provider(), &pick_request("102"), &config()).unwrap();
    let b = run_pick_list(&provider(), &pick_request("102"), &config()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn pick_list_fetches_team_missing_from_event() {
    let list = run_pick_list(&provider(), &pick_request("9999"), &config()).unwrap();
    assert_eq!(list.your_team.id, 9999);
    assert_eq!(list.len(), 7);
}

#[test]
fn pick_list_errors() {
    let unknown_team = run_pick_list(&provider(), &pick_request("31337"), &config()).unwrap_err();
    assert!(matches!(unknown_team, PipelineError::Rating(RatingError::TeamNotFound { team: 31337 })));

    let unrated_team = run_pick_list(&provider(), &pick_request("404"), &config()).unwrap_err();
    assert!(matches!(unrated_team, PipelineError::Rating(RatingError::NoRatingData { .. })));

    let no_event = PickListRequest {
        event_code: "NOPE".to_string(),
        your_team: "101".to_string(),
    };
    let err = run_pick_list(&provider(), &no_event, &config()).unwrap_err();
    assert!(matches!(err, PipelineError::Rating(ref e) if e.is_not_found()));

    let blank = PickListRequest {
        event_code: String::new(),
        your_team: "101".to_string(),
    };
    let err = run_pick_list(&provider(), &blank, &config()).unwrap_err();
    assert!(matches!(err, PipelineError::Validation(ValidationError::MissingEventCode)));

    let bad_config = SimulationConfig {
        tournament_trials: 0,
        ..config()
    };
    let err = run_pick_list(&provider(), &pick_request("101"), &bad_config).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn pick_list_target_model_and_views() {
    let config = SimulationConfig {
        win_model: WinModel::Target,
        quick_iterations: 500,
        ..config()
    };
    let list = run_pick_list(&provider(), &pick_request("102"), &config).unwrap();

    let strong = list.view(
        &PickListFilter {
            min_rating: 50.0,
            strength: StrengthFilter::Any,
        },
        SortKey::Aggregate,
    );
    let ids: Vec<u32> = strong.iter().map(|c| c.team.id).collect();
    assert_eq!(ids, vec![101, 105, 107, 106]);

    let auto = list.filtered(&PickListFilter {
        min_rating: 0.0,
        strength: StrengthFilter::Auto,
    });
    // 105: 35 of 70 from auto
    let ids: Vec<u32> = auto.iter().map(|c| c.team.id).collect();
    assert_eq!(ids, vec![105]);
}

#[test]
fn csv_round_trip_preserves_order() {
    let list = run_pick_list(&provider(), &pick_request("102"), &config()).unwrap();

    let mut buf = Vec::new();
    write_csv(&list.candidates, &mut buf).unwrap();
    let ranks = read_ranks(buf.as_slice()).unwrap();

    let expected: Vec<(usize, u32)> = list.candidates.iter().map(|c| (c.pick_order, c.team.id)).collect();
    assert_eq!(ranks, expected);
}

#[test]
fn match_prediction_end_to_end() {
    let request = MatchRequest {
        your: ["101".to_string(), "9999".to_string()],
        opponent: ["103".to_string(), "104".to_string()],
    };
    let prediction = run_match_prediction(&provider(), &request, &config()).unwrap();

    assert_eq!(prediction.your_distribution.len(), 2_000);
    assert_eq!(prediction.opponent_distribution.len(), 2_000);
    assert!(prediction.your_win_probability > 95.0);
    assert!((prediction.your_win_probability + prediction.opponent_win_probability - 100.0).abs() < 1e-9);
    assert!(prediction.expected_differential > 0.0);
    assert!(prediction.analytic_win_probability > 95.0);
    assert!(!prediction.insights.is_empty());
    assert_eq!(prediction.insights[0].title(), "Score Advantage");

    let missing = MatchRequest {
        your: ["101".to_string(), String::new()],
        opponent: ["103".to_string(), "104".to_string()],
    };
    let err = run_match_prediction(&provider(), &missing, &config()).unwrap_err();
    assert_eq!(err.to_string(), "Please enter all 4 team numbers");
}

#[test]
fn alliance_simulation_end_to_end() {
    let request = SimulationRequest {
        teams: ["101".to_string(), "9999".to_string()],
        target: None,
    };
    let sim = run_alliance_simulation(&provider(), &request, &config()).unwrap();
    assert_eq!(sim.target_score, 200.0);
    assert_eq!(sim.distribution.histogram.len(), 20);
    let counted: usize = sim.distribution.histogram.iter().map(|b| b.count).sum();
    assert_eq!(counted, 2_000);

    let low = SimulationRequest {
        teams: ["101".to_string(), "9999".to_string()],
        target: Some(50.0),
    };
    let sim = run_alliance_simulation(&provider(), &low, &config()).unwrap();
    assert!(sim.target_win_probability > 99.0);
}
